// Line-delimited JSON tool server that fronts the Go-Job scheduling API
// and the DashScope reasoning service

pub mod config;
pub mod protocol;
pub mod server;
pub mod tools;

pub use config::{ConfigOverrides, McpConfig};
pub use server::McpServer;
pub use tools::{default_registry, ToolServices};
