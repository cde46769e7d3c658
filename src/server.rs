//! MCP ServerHandler implementation for Tasker phone control.
//!
//! Exposes the phone's Tasker automation endpoints as MCP tools:
//!
//! - `torch_on` / `torch_off` — toggle the phone's flashlight
//! - `launch_app` — open an app on the phone by name
//! - `wake_device` — send a wake-on-LAN magic packet
//! - `phone_status` — report endpoint configuration and reachability
//!
//! Every tool returns a JSON string. Phone-side and transport failures are
//! serialized into the result (`success: false` with an error code) rather
//! than surfaced as MCP protocol errors, so agents can read and react to them.

use std::net::{IpAddr, Ipv4Addr};

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ServerHandler};

use crate::client::{ClientError, PhoneClient};
use crate::config::{PhoneConfig, DEFAULT_WOL_PORT};
use crate::tools::*;
use crate::wol::{self, MacAddr};

/// Tasker MCP server handler.
#[derive(Debug, Clone)]
pub struct TaskerMcpServer {
    tool_router: ToolRouter<Self>,
    client: PhoneClient,
    config: PhoneConfig,
}

impl TaskerMcpServer {
    /// Create a server for an explicit configuration.
    pub fn with_config(config: PhoneConfig) -> Result<Self, ClientError> {
        let client = PhoneClient::new(&config)?;
        Ok(Self {
            tool_router: Self::tool_router(),
            client,
            config,
        })
    }

    /// Create a server configured from the environment.
    pub fn from_env() -> anyhow::Result<Self> {
        let config = PhoneConfig::from_env()?;
        Ok(Self::with_config(config)?)
    }

    /// The resolved phone configuration.
    pub fn config(&self) -> &PhoneConfig {
        &self.config
    }

    /// Run a Tasker endpoint command and serialize the outcome.
    async fn run_command(&self, path: &str) -> String {
        match self.client.get(path).await {
            Ok(outcome) => serde_json::to_string_pretty(&outcome)
                .unwrap_or_else(|e| error_json("serialization_error", &e.to_string())),
            Err(e) => error_json(e.code(), &e.to_string()),
        }
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for TaskerMcpServer {
    fn get_info(&self) -> ServerInfo {
        let wol_note = if self.config.wol.is_some() {
            "wake_device is configured with a default MAC address."
        } else {
            "wake_device requires an explicit 'mac' argument (TASKER_PHONE_MAC is not set)."
        };

        let instructions = format!(
            "Control an Android phone running the Tasker automation app. \
             Tools proxy to the phone's Tasker HTTP endpoint at {}.\n\
             torch_on/torch_off toggle the flashlight. launch_app opens an app by its \
             on-screen name. wake_device sends a wake-on-LAN magic packet to power on a \
             nearby machine. phone_status checks whether the phone is reachable — use it \
             first when other tools report timeouts or connection failures.\n\
             {}",
            self.client.endpoint(),
            wol_note,
        );

        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "tasker-mcp".to_string(),
                title: Some("Tasker Phone Control".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(instructions),
        }
    }
}

#[tool_router(router = tool_router)]
impl TaskerMcpServer {
    /// Turn on the phone's flashlight.
    #[tool(
        name = "torch_on",
        description = "Turn on the phone's flashlight/torch. Returns success, HTTP status code, and the phone's response."
    )]
    pub async fn torch_on(&self) -> String {
        self.run_command("/torch/on").await
    }

    /// Turn off the phone's flashlight.
    #[tool(
        name = "torch_off",
        description = "Turn off the phone's flashlight/torch. Returns success, HTTP status code, and the phone's response."
    )]
    pub async fn torch_off(&self) -> String {
        self.run_command("/torch/off").await
    }

    /// Launch an app on the phone by its on-screen name.
    #[tool(
        name = "launch_app",
        description = "Launch an app on the phone by its name as it appears on screen (e.g., Spotify, Chrome, Camera, Settings)."
    )]
    pub async fn launch_app(&self, Parameters(params): Parameters<LaunchAppParams>) -> String {
        let app_name = params.app_name.trim();
        if app_name.is_empty() {
            return error_json("invalid_app_name", "App name must not be empty");
        }

        let path = format!("/app/launch/{}", PhoneClient::encode_segment(app_name));
        self.run_command(&path).await
    }

    /// Send a wake-on-LAN magic packet.
    #[tool(
        name = "wake_device",
        description = "Send a wake-on-LAN magic packet to power on a machine. Uses the configured MAC address unless one is passed explicitly. Delivery is fire-and-forget; give the machine a few seconds to boot."
    )]
    pub async fn wake_device(&self, Parameters(params): Parameters<WakeDeviceParams>) -> String {
        let mac = match params.mac.as_deref() {
            Some(raw) => match raw.parse::<MacAddr>() {
                Ok(mac) => mac,
                Err(e) => return error_json("invalid_mac", &e.to_string()),
            },
            None => match self.config.wol.as_ref() {
                Some(wol) => wol.mac,
                None => {
                    return error_json(
                        "config_error",
                        "No MAC address given and TASKER_PHONE_MAC is not set. \
                         Pass 'mac' explicitly or configure the environment.",
                    )
                }
            },
        };

        let broadcast = match params.broadcast.as_deref() {
            Some(raw) => match raw.parse::<IpAddr>() {
                Ok(ip) => ip,
                Err(e) => return error_json("invalid_broadcast", &e.to_string()),
            },
            None => self
                .config
                .wol
                .as_ref()
                .map(|wol| wol.broadcast)
                .unwrap_or(IpAddr::V4(Ipv4Addr::BROADCAST)),
        };

        let port = params
            .port
            .or_else(|| self.config.wol.as_ref().map(|wol| wol.port))
            .unwrap_or(DEFAULT_WOL_PORT);

        match wol::send_magic_packet(mac, broadcast, port).await {
            Ok(()) => serde_json::json!({
                "success": true,
                "mac": mac.to_string(),
                "broadcast": broadcast.to_string(),
                "port": port,
                "message": "Magic packet sent. The target may take a few seconds to wake.",
            })
            .to_string(),
            Err(e) => error_json("wol_send_failed", &e.to_string()),
        }
    }

    /// Report phone endpoint configuration and reachability.
    #[tool(
        name = "phone_status",
        description = "Report the configured phone endpoint, timeout, and wake-on-LAN setup, and probe whether the phone's Tasker endpoint is reachable. Pass probe=false to skip the network check."
    )]
    pub async fn phone_status(&self, Parameters(params): Parameters<PhoneStatusParams>) -> String {
        let mut status = serde_json::json!({
            "phone": self.client.endpoint(),
            "timeout_seconds": self.client.timeout().as_secs_f64(),
            "wake_on_lan_configured": self.config.wol.is_some(),
        });

        if params.probe.unwrap_or(true) {
            match self.client.get("/").await {
                Ok(outcome) => {
                    status["reachable"] = serde_json::json!(true);
                    status["status_code"] = serde_json::json!(outcome.status_code);
                }
                Err(e) => {
                    status["reachable"] = serde_json::json!(false);
                    status["error"] = serde_json::json!(e.code());
                    status["message"] = serde_json::json!(e.to_string());
                }
            }
        }

        serde_json::to_string_pretty(&status)
            .unwrap_or_else(|e| error_json("serialization_error", &e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn unreachable_config() -> PhoneConfig {
        PhoneConfig {
            host: "127.0.0.1".to_string(),
            // Nothing listens on port 1; connects are refused immediately
            port: 1,
            timeout: Duration::from_millis(500),
            wol: None,
        }
    }

    #[test]
    fn test_server_info() {
        let server = TaskerMcpServer::with_config(unreachable_config()).unwrap();
        let info = server.get_info();

        assert_eq!(info.server_info.name, "tasker-mcp");
        assert_eq!(info.server_info.version, env!("CARGO_PKG_VERSION"));
        let instructions = info.instructions.unwrap();
        assert!(instructions.contains("torch_on"));
        assert!(instructions.contains("wake_device"));
        assert!(instructions.contains("phone_status"));
    }

    #[test]
    fn test_server_info_notes_missing_mac() {
        let server = TaskerMcpServer::with_config(unreachable_config()).unwrap();
        let instructions = server.get_info().instructions.unwrap();
        assert!(instructions.contains("TASKER_PHONE_MAC is not set"));
    }

    #[tokio::test]
    async fn test_torch_on_unreachable_reports_error_json() {
        let server = TaskerMcpServer::with_config(unreachable_config()).unwrap();
        let result = server.torch_on().await;
        let parsed: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert_eq!(parsed["success"], false);
        assert_eq!(parsed["error"], "connect_failed");
        assert!(parsed["message"]
            .as_str()
            .unwrap()
            .contains("127.0.0.1:1"));
    }

    #[tokio::test]
    async fn test_launch_app_empty_name() {
        let server = TaskerMcpServer::with_config(unreachable_config()).unwrap();
        let result = server
            .launch_app(Parameters(LaunchAppParams {
                app_name: "   ".to_string(),
            }))
            .await;
        let parsed: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert_eq!(parsed["error"], "invalid_app_name");
    }

    #[tokio::test]
    async fn test_wake_device_without_mac_is_config_error() {
        let server = TaskerMcpServer::with_config(unreachable_config()).unwrap();
        let result = server
            .wake_device(Parameters(WakeDeviceParams {
                mac: None,
                broadcast: None,
                port: None,
            }))
            .await;
        let parsed: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert_eq!(parsed["success"], false);
        assert_eq!(parsed["error"], "config_error");
    }

    #[tokio::test]
    async fn test_wake_device_invalid_mac() {
        let server = TaskerMcpServer::with_config(unreachable_config()).unwrap();
        let result = server
            .wake_device(Parameters(WakeDeviceParams {
                mac: Some("not-a-mac".to_string()),
                broadcast: None,
                port: None,
            }))
            .await;
        let parsed: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert_eq!(parsed["error"], "invalid_mac");
    }

    #[tokio::test]
    async fn test_wake_device_explicit_loopback() {
        // Loopback target keeps the packet off the network while exercising
        // the full resolution and send path
        let server = TaskerMcpServer::with_config(unreachable_config()).unwrap();
        let receiver = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = receiver.local_addr().unwrap().port();

        let result = server
            .wake_device(Parameters(WakeDeviceParams {
                mac: Some("aa:bb:cc:dd:ee:ff".to_string()),
                broadcast: Some("127.0.0.1".to_string()),
                port: Some(port),
            }))
            .await;
        let parsed: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert_eq!(parsed["success"], true);
        assert_eq!(parsed["mac"], "aa:bb:cc:dd:ee:ff");
        assert_eq!(parsed["port"], port);
    }

    #[tokio::test]
    async fn test_phone_status_without_probe() {
        let server = TaskerMcpServer::with_config(unreachable_config()).unwrap();
        let result = server
            .phone_status(Parameters(PhoneStatusParams { probe: Some(false) }))
            .await;
        let parsed: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert_eq!(parsed["phone"], "127.0.0.1:1");
        assert_eq!(parsed["wake_on_lan_configured"], false);
        assert!(parsed.get("reachable").is_none());
    }

    #[tokio::test]
    async fn test_phone_status_probe_unreachable() {
        let server = TaskerMcpServer::with_config(unreachable_config()).unwrap();
        let result = server
            .phone_status(Parameters(PhoneStatusParams { probe: None }))
            .await;
        let parsed: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert_eq!(parsed["reachable"], false);
        assert_eq!(parsed["error"], "connect_failed");
    }
}
