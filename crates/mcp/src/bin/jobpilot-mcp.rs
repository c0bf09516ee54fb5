// Standalone MCP server binary

use anyhow::{Context, Result};
use clap::Parser;
use jobpilot_mcp::{default_registry, ConfigOverrides, McpConfig, McpServer, ToolServices};
use jobpilot_sdk::{DashScopeClient, SchedulerClient};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "jobpilot-mcp")]
#[command(about = "Scheduling assistant tools over line-delimited JSON on stdio", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "JOBPILOT_CONFIG")]
    config: Option<PathBuf>,

    /// Base URL of the Go-Job scheduling API
    #[arg(long, env = "GO_JOB_API_URL")]
    api_url: Option<String>,

    /// Bearer token for the scheduling API
    #[arg(long, env = "GO_JOB_AUTH_TOKEN", hide_env_values = true)]
    auth_token: Option<String>,

    /// DashScope API key
    #[arg(long, env = "DASHSCOPE_API_KEY", hide_env_values = true)]
    dashscope_api_key: Option<String>,

    /// DashScope model name
    #[arg(long, env = "DASHSCOPE_MODEL")]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries protocol responses, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();

    tracing::info!("Jobpilot MCP server starting...");

    let mut config = McpConfig::load(args.config.as_deref())?;
    config.apply_overrides(ConfigOverrides {
        api_url: args.api_url,
        auth_token: args.auth_token,
        api_key: args.dashscope_api_key,
        model: args.model,
    });

    let api = SchedulerClient::from_config(config.client_config()?)
        .context("Failed to create scheduling API client")?;
    let reasoning = DashScopeClient::new(config.reasoning_config()?)
        .context("Failed to create reasoning client")?;

    if !reasoning.config().is_configured() {
        tracing::warn!("DASHSCOPE_API_KEY is not set; AI analysis will be unavailable");
    }
    tracing::info!(api = %api.base_url(), model = %reasoning.config().model, "Clients configured");

    let registry = default_registry(ToolServices::new(api, Arc::new(reasoning)));
    tracing::info!("Registered {} tools", registry.len());

    let server = McpServer::new(registry);
    server.start().await?;

    Ok(())
}
