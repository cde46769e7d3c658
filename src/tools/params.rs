//! Parameter structs for all MCP tools.

use schemars::JsonSchema;
use serde::Deserialize;

// ── launch_app ──

/// Parameters for the `launch_app` tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct LaunchAppParams {
    /// Name of the app as it appears on the phone.
    #[schemars(
        description = "Name of the app as it appears on the phone (e.g., Spotify, Chrome, Camera, Settings)"
    )]
    pub app_name: String,
}

// ── wake_device ──

/// Parameters for the `wake_device` tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct WakeDeviceParams {
    /// MAC address to wake (falls back to TASKER_PHONE_MAC).
    #[schemars(
        description = "MAC address to wake, e.g. 'aa:bb:cc:dd:ee:ff' (defaults to the configured TASKER_PHONE_MAC)"
    )]
    pub mac: Option<String>,
    /// Broadcast address to send to (defaults to configuration, then 255.255.255.255).
    #[schemars(
        description = "Broadcast address to send the packet to (defaults to the configured broadcast, then 255.255.255.255)"
    )]
    pub broadcast: Option<String>,
    /// UDP port for the magic packet (defaults to configuration, then 9).
    #[schemars(description = "UDP port for the magic packet (defaults to the configured port, then 9)")]
    pub port: Option<u16>,
}

// ── phone_status ──

/// Parameters for the `phone_status` tool.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct PhoneStatusParams {
    /// Set to false to report configuration without probing the phone.
    #[schemars(
        description = "Set to false to report configuration without probing the phone (default: true)"
    )]
    #[serde(default)]
    pub probe: Option<bool>,
}
