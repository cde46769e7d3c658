//! Tasker MCP Server
//!
//! Model Context Protocol server exposing an Android phone's Tasker
//! automation (flashlight, app launching) plus wake-on-LAN to LLM agents.
//! Serves over stdio for local agent wiring or SSE for container deployment.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use clap::{Parser, ValueEnum};
use rmcp::transport::sse_server::SseServer;
use rmcp::ServiceExt;
use tracing_subscriber::EnvFilter;

use tasker_mcp::server::TaskerMcpServer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Transport {
    /// Line-delimited JSON-RPC over stdin/stdout
    Stdio,
    /// HTTP server-sent events, for container deployment
    Sse,
}

#[derive(Debug, Parser)]
#[command(name = "tasker-mcp", version, about = "MCP server for Tasker phone control")]
struct Cli {
    /// Transport to serve MCP over
    #[arg(long, value_enum, default_value_t = Transport::Sse)]
    transport: Transport,

    /// Port for the SSE transport (the container runs 8100)
    #[arg(long, default_value_t = 8000)]
    port: u16,

    /// Bind address for the SSE transport
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    host: IpAddr,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env values never override the real environment
    dotenvy::dotenv().ok();

    // stdout belongs to the stdio transport; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("tasker_mcp=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let server = TaskerMcpServer::from_env()?;
    tracing::info!(
        phone = %server.config().endpoint(),
        transport = ?cli.transport,
        "tasker-mcp starting"
    );

    match cli.transport {
        Transport::Stdio => {
            let service = server.serve(rmcp::transport::io::stdio()).await?;
            service.waiting().await?;
        }
        Transport::Sse => {
            let bind = SocketAddr::new(cli.host, cli.port);
            let ct = SseServer::serve(bind)
                .await?
                .with_service(move || server.clone());
            tracing::info!(%bind, "SSE transport listening");

            tokio::signal::ctrl_c().await?;
            tracing::info!("shutting down");
            ct.cancel();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["tasker-mcp"]).unwrap();
        assert_eq!(cli.transport, Transport::Sse);
        assert_eq!(cli.port, 8000);
        assert_eq!(cli.host, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    }

    #[test]
    fn test_cli_container_command() {
        // The exact command the container image runs
        let cli =
            Cli::try_parse_from(["tasker-mcp", "--transport", "sse", "--port", "8100"]).unwrap();
        assert_eq!(cli.transport, Transport::Sse);
        assert_eq!(cli.port, 8100);
    }

    #[test]
    fn test_cli_stdio() {
        let cli = Cli::try_parse_from(["tasker-mcp", "--transport", "stdio"]).unwrap();
        assert_eq!(cli.transport, Transport::Stdio);
    }

    #[test]
    fn test_cli_rejects_unknown_transport() {
        assert!(Cli::try_parse_from(["tasker-mcp", "--transport", "grpc"]).is_err());
    }
}
