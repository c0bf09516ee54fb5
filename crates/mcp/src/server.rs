// Line-delimited JSON server over stdio

use crate::protocol::{
    CallToolParams, ErrorResponse, ListToolsResult, Method, Request, Response, ToolDefinition,
    ToolResponse,
};
use crate::tools::ToolRegistry;
use anyhow::{Context, Result};
use futures_util::StreamExt;
use serde_json::Map;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio_util::codec::{AnyDelimiterCodec, FramedRead};
use tracing::{debug, error, info, warn};

/// Reads one request per line and writes exactly one response line back,
/// strictly in order.
pub struct McpServer {
    registry: ToolRegistry,
}

impl McpServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    pub fn definitions(&self) -> &[ToolDefinition] {
        self.registry.definitions()
    }

    /// Serve stdin/stdout until end of input or an empty line.
    pub async fn start(&self) -> Result<()> {
        info!(tools = self.registry.len(), "Jobpilot MCP server started");
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await?;
        info!("Jobpilot MCP server stopped");
        Ok(())
    }

    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        // Raw byte lines, so a line that is not UTF-8 is answered instead of ending the stream
        let mut lines = FramedRead::new(reader, AnyDelimiterCodec::new(b"\n".to_vec(), Vec::new()));

        while let Some(line) = lines.next().await {
            let bytes = match line {
                Ok(bytes) => bytes,
                Err(e) => {
                    error!(error = %e, "Failed to read request line");
                    break;
                }
            };

            let response = match String::from_utf8(bytes.to_vec()) {
                Ok(line) => {
                    let line = line.trim_end_matches('\r');
                    if line.trim().is_empty() {
                        debug!("Empty line received, shutting down");
                        break;
                    }
                    self.handle_line(line).await
                }
                Err(e) => {
                    warn!(error = %e, "Request line is not valid UTF-8");
                    Response::Error(ErrorResponse::new(format!("Invalid request: {}", e)))
                }
            };

            write_response(&mut writer, &response).await?;
        }

        Ok(())
    }

    /// Decode one request line and produce its response.
    pub async fn handle_line(&self, line: &str) -> Response {
        let request: Request = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Malformed request line");
                return Response::Error(ErrorResponse::new(format!("Invalid request: {}", e)));
            }
        };

        match request.method() {
            Method::ListTools => Response::Tools(ListToolsResult {
                tools: self.registry.definitions().to_vec(),
            }),
            Method::CallTool => {
                let params = CallToolParams::from_params(request.params);
                let name = params.tool_name();
                let arguments = match params.into_arguments() {
                    Ok(arguments) => arguments,
                    Err(message) if self.registry.contains(&name) => {
                        warn!(tool = %name, "Malformed tools/call arguments");
                        return Response::Tool(ToolResponse::failure(message));
                    }
                    // Unknown names are reported as such whatever the arguments
                    Err(_) => Map::new(),
                };

                Response::Tool(self.registry.dispatch(&name, arguments).await)
            }
            Method::Unknown(method) => {
                let method = method.unwrap_or_else(|| "null".to_string());
                Response::Error(ErrorResponse::new(format!("Unknown method: {}", method)))
            }
        }
    }
}

async fn write_response<W>(writer: &mut W, response: &Response) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut encoded = serde_json::to_string(response).context("Failed to encode response")?;
    encoded.push('\n');

    writer
        .write_all(encoded.as_bytes())
        .await
        .context("Failed to write response")?;
    writer.flush().await.context("Failed to flush response")
}
