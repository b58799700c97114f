//! Line-delimited JSON-RPC 2.0 over stdio, enough of MCP to list and call
//! the three tools.

use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use smcp::{error::Result, ToolHandler};
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::tools;

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "sqlite-mcp";

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;

#[derive(Debug, Deserialize)]
struct Request {
    #[serde(default)]
    id: Option<JsonValue>,
    method: String,
    #[serde(default)]
    params: Option<JsonValue>,
}

#[derive(Debug, Deserialize)]
struct CallParams {
    name: String,
    #[serde(default)]
    arguments: Option<JsonValue>,
}

#[derive(Debug, PartialEq)]
struct RpcError {
    code: i64,
    message: String,
}

impl RpcError {
    fn new<S: Into<String>>(code: i64, message: S) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<smcp::error::Error> for RpcError {
    fn from(e: smcp::error::Error) -> Self {
        Self::new(INVALID_PARAMS, e.message())
    }
}

pub struct RpcServer {
    handler: ToolHandler,
}

impl RpcServer {
    pub fn new(handler: ToolHandler) -> Self {
        Self { handler }
    }

    /// Handles one request line. Notifications produce no response.
    pub async fn handle_line(&self, line: &str) -> Option<JsonValue> {
        let raw = match serde_json::from_str::<JsonValue>(line) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("Unparseable request: {}", e);
                return Some(error_response(JsonValue::Null, PARSE_ERROR, "Parse error"));
            }
        };
        let request = match serde_json::from_value::<Request>(raw) {
            Ok(request) => request,
            Err(e) => {
                log::warn!("Invalid request: {}", e);
                return Some(error_response(
                    JsonValue::Null,
                    INVALID_REQUEST,
                    "Invalid Request",
                ));
            }
        };

        log::debug!("Received `{}`", request.method);
        let outcome = self.dispatch(&request.method, request.params).await;

        let id = request.id?;
        Some(match outcome {
            Ok(result) => json!({"jsonrpc": "2.0", "id": id, "result": result}),
            Err(e) => error_response(id, e.code, &e.message),
        })
    }

    async fn dispatch(
        &self,
        method: &str,
        params: Option<JsonValue>,
    ) -> std::result::Result<JsonValue, RpcError> {
        match method {
            "initialize" => Ok(json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {"tools": {}},
                "serverInfo": {"name": SERVER_NAME, "version": env!("CARGO_PKG_VERSION")},
            })),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({"tools": tools::descriptors()})),
            "tools/call" => {
                let call = call_params(params)?;
                let out = self.handler.call(&call.name, call.arguments.as_ref()).await;
                Ok(json!({
                    "content": [{"type": "text", "text": out.text}],
                    "isError": out.is_error,
                }))
            }
            m if m.starts_with("notifications/") => Ok(JsonValue::Null),
            m => Err(RpcError::new(
                METHOD_NOT_FOUND,
                format!("Method not found: {}", m),
            )),
        }
    }
}

fn call_params(params: Option<JsonValue>) -> Result<CallParams> {
    let params = params.ok_or_else(|| smcp::error::protocol!("tools/call requires params"))?;
    serde_json::from_value(params)
        .map_err(|e| smcp::error::protocol!("Invalid tools/call params: {}", e))
}

fn error_response(id: JsonValue, code: i64, message: &str) -> JsonValue {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {"code": code, "message": message},
    })
}

/// Serves requests until the reader reaches EOF. One response line per request.
pub async fn serve<R, W>(server: &RpcServer, reader: R, mut writer: W) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        if let Some(response) = server.handle_line(&line).await {
            let mut out = serde_json::to_string(&response)?;
            out.push('\n');
            writer.write_all(out.as_bytes()).await?;
            writer.flush().await?;
        }
    }

    Ok(())
}
