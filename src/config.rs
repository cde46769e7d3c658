//! Phone endpoint configuration resolved from the environment.
//!
//! Variable names and defaults match the deployed configuration surface:
//! `TASKER_PHONE_HOST`, `TASKER_PHONE_PORT`, and `TASKER_TIMEOUT` locate the
//! phone's Tasker HTTP endpoint; `TASKER_PHONE_MAC`, `TASKER_WOL_BROADCAST`,
//! and `TASKER_WOL_PORT` configure the optional wake-on-LAN target.

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use thiserror::Error;

use crate::wol::MacAddr;

/// Default phone host (Tailscale address of the phone).
pub const DEFAULT_PHONE_HOST: &str = "100.123.253.113";
/// Default port of the Tasker HTTP-request profile on the phone.
pub const DEFAULT_PHONE_PORT: u16 = 1821;
/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: f64 = 5.0;
/// Standard wake-on-LAN discard port.
pub const DEFAULT_WOL_PORT: u16 = 9;

/// Configuration resolution error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: '{value}' ({reason})")]
    InvalidVar {
        name: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(name: &'static str, value: &str, reason: impl ToString) -> Self {
        Self::InvalidVar {
            name,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Wake-on-LAN target for the phone's companion machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WolConfig {
    pub mac: MacAddr,
    pub broadcast: IpAddr,
    pub port: u16,
}

/// Resolved connection settings for the phone's Tasker endpoint.
#[derive(Debug, Clone)]
pub struct PhoneConfig {
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
    /// Present only when `TASKER_PHONE_MAC` is set.
    pub wol: Option<WolConfig>,
}

impl Default for PhoneConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_PHONE_HOST.to_string(),
            port: DEFAULT_PHONE_PORT,
            timeout: Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS),
            wol: None,
        }
    }
}

impl PhoneConfig {
    /// Resolve configuration from the process environment.
    ///
    /// Call [`dotenvy::dotenv`] first if `.env` support is wanted; dotenvy
    /// never overrides variables already present in the real environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("TASKER_PHONE_HOST").unwrap_or_else(|| DEFAULT_PHONE_HOST.to_string());

        let port = match lookup("TASKER_PHONE_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| ConfigError::invalid("TASKER_PHONE_PORT", &raw, e))?,
            None => DEFAULT_PHONE_PORT,
        };

        let timeout_secs = match lookup("TASKER_TIMEOUT") {
            Some(raw) => {
                let secs = raw
                    .parse::<f64>()
                    .map_err(|e| ConfigError::invalid("TASKER_TIMEOUT", &raw, e))?;
                if !secs.is_finite() || secs <= 0.0 {
                    return Err(ConfigError::invalid(
                        "TASKER_TIMEOUT",
                        &raw,
                        "timeout must be a positive number of seconds",
                    ));
                }
                secs
            }
            None => DEFAULT_TIMEOUT_SECS,
        };

        let wol = match lookup("TASKER_PHONE_MAC") {
            Some(raw) => {
                let mac = raw
                    .parse::<MacAddr>()
                    .map_err(|e| ConfigError::invalid("TASKER_PHONE_MAC", &raw, e))?;

                let broadcast = match lookup("TASKER_WOL_BROADCAST") {
                    Some(raw) => raw
                        .parse::<IpAddr>()
                        .map_err(|e| ConfigError::invalid("TASKER_WOL_BROADCAST", &raw, e))?,
                    None => IpAddr::V4(Ipv4Addr::BROADCAST),
                };

                let port = match lookup("TASKER_WOL_PORT") {
                    Some(raw) => raw
                        .parse::<u16>()
                        .map_err(|e| ConfigError::invalid("TASKER_WOL_PORT", &raw, e))?,
                    None => DEFAULT_WOL_PORT,
                };

                Some(WolConfig {
                    mac,
                    broadcast,
                    port,
                })
            }
            None => None,
        };

        Ok(Self {
            host,
            port,
            timeout: Duration::from_secs_f64(timeout_secs),
            wol,
        })
    }

    /// `host:port` form used in log and error messages.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
