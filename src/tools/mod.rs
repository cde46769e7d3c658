//! MCP tool parameter types and shared helpers.

mod helpers;
mod params;

pub use helpers::*;
pub use params::*;
