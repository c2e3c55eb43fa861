//! stdio transport for MCP JSON-RPC

use crate::GmServer;
use crate::mcp::{
    InitializeResult, PROTOCOL_VERSION, Request, RequestId, Response, ServerCapabilities,
    ToolCallParams, ToolsCapability, error_codes,
};
use crate::tools::list_tools;
use rimworld_gm_bridge::RemoteClient;
use rimworld_gm_core::{GmError, Result};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Run the MCP server on stdio
pub async fn run<C: RemoteClient + 'static>(server: GmServer<C>) -> Result<()> {
    let reader = BufReader::new(tokio::io::stdin());
    run_with_io(server, reader, tokio::io::stdout()).await
}

/// Serve newline-delimited JSON-RPC from `reader`, replying on `writer`.
///
/// Each request is handled on its own task; replies may be written out of
/// order and carry their request id.
pub async fn run_with_io<C, R, W>(server: GmServer<C>, mut reader: R, writer: W) -> Result<()>
where
    C: RemoteClient + 'static,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let server = Arc::new(server);
    let writer = Arc::new(Mutex::new(writer));
    let mut in_flight = JoinSet::new();
    let mut line = String::new();

    info!("RimWorld GM MCP server starting on stdio");

    loop {
        line.clear();
        let bytes_read = reader
            .read_line(&mut line)
            .await
            .map_err(|e| GmError::ServerError(format!("Failed to read stdin: {}", e)))?;

        if bytes_read == 0 {
            // EOF - client disconnected
            info!("Client disconnected (EOF)");
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        debug!("Received: {}", trimmed);

        let request: Request = match serde_json::from_str(trimmed) {
            Ok(r) => r,
            Err(e) => {
                error!("Failed to parse request: {}", e);
                continue;
            }
        };

        let server = server.clone();
        let writer = writer.clone();
        in_flight.spawn(async move {
            if let Some(response) = handle_request(request, &server).await {
                if let Err(e) = write_response(&writer, &response).await {
                    error!("{}", e);
                }
            }
        });

        // Reap finished requests so the set does not grow unbounded
        while in_flight.try_join_next().is_some() {}
    }

    while let Some(joined) = in_flight.join_next().await {
        if let Err(e) = joined {
            warn!("Request task failed: {}", e);
        }
    }

    Ok(())
}

async fn write_response<W: AsyncWrite + Unpin>(
    writer: &Mutex<W>,
    response: &Response,
) -> Result<()> {
    let response_json = serde_json::to_string(response)?;
    debug!("Sending: {}", response_json);

    let mut out = writer.lock().await;
    out.write_all(response_json.as_bytes())
        .await
        .map_err(|e| GmError::ServerError(format!("Failed to write stdout: {}", e)))?;
    out.write_all(b"\n")
        .await
        .map_err(|e| GmError::ServerError(format!("Failed to write newline: {}", e)))?;
    out.flush()
        .await
        .map_err(|e| GmError::ServerError(format!("Failed to flush stdout: {}", e)))?;
    Ok(())
}

/// Route one request. Notifications yield `None`.
pub async fn handle_request<C: RemoteClient + 'static>(
    request: Request,
    server: &GmServer<C>,
) -> Option<Response> {
    let Some(id) = request.id.clone() else {
        debug!("Notification: {}", request.method);
        return None;
    };

    let response = match request.method.as_str() {
        "initialize" => handle_initialize(id, server),
        "ping" => Response::success(id, serde_json::json!({})),
        "tools/list" => Response::success(id, serde_json::json!({ "tools": list_tools() })),
        "tools/call" => handle_tools_call(id, request.params, server).await,
        _ => Response::error(
            id,
            error_codes::METHOD_NOT_FOUND,
            format!("Method not found: {}", request.method),
        ),
    };

    Some(response)
}

fn handle_initialize<C: RemoteClient + 'static>(
    id: RequestId,
    server: &GmServer<C>,
) -> Response {
    let result = InitializeResult {
        protocol_version: PROTOCOL_VERSION.to_string(),
        capabilities: ServerCapabilities {
            tools: ToolsCapability {
                list_changed: false,
            },
        },
        server_info: server.info().clone(),
    };

    match serde_json::to_value(result) {
        Ok(value) => Response::success(id, value),
        Err(e) => Response::error(id, error_codes::INTERNAL_ERROR, e.to_string()),
    }
}

async fn handle_tools_call<C: RemoteClient + 'static>(
    id: RequestId,
    params: serde_json::Value,
    server: &GmServer<C>,
) -> Response {
    let params: ToolCallParams = match serde_json::from_value(params) {
        Ok(p) => p,
        Err(e) => {
            return Response::error(
                id,
                error_codes::INVALID_PARAMS,
                format!("Invalid tool call params: {}", e),
            );
        }
    };

    let text = server
        .dispatcher()
        .dispatch(&params.name, params.arguments)
        .await;
    Response::tool_text(id, text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rimworld_gm_bridge::{HttpMethod, RemoteResponse};
    use serde_json::Value;

    struct AcceptingClient;

    #[async_trait]
    impl RemoteClient for AcceptingClient {
        async fn perform(
            &self,
            _method: HttpMethod,
            _path: &str,
            _body: Option<Value>,
        ) -> Result<RemoteResponse> {
            Ok(RemoteResponse {
                status: 200,
                body: serde_json::json!({ "success": true }),
            })
        }
    }

    fn request(json: Value) -> Request {
        serde_json::from_value(json).unwrap()
    }

    #[tokio::test]
    async fn test_initialize_reports_server_info() {
        let server = GmServer::new(AcceptingClient);
        let response = handle_request(
            request(serde_json::json!({
                "jsonrpc": "2.0", "id": 1, "method": "initialize",
                "params": { "protocolVersion": "2025-06-18", "capabilities": {}, "clientInfo": { "name": "test", "version": "0" } }
            })),
            &server,
        )
        .await
        .unwrap();

        let result = response.result.unwrap();
        assert_eq!(result["serverInfo"]["name"], "rimworld-gm");
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(result["capabilities"]["tools"]["listChanged"], false);
    }

    #[tokio::test]
    async fn test_notifications_get_no_reply() {
        let server = GmServer::new(AcceptingClient);
        let response = handle_request(
            request(serde_json::json!({ "jsonrpc": "2.0", "method": "notifications/initialized" })),
            &server,
        )
        .await;
        assert!(response.is_none());
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let server = GmServer::new(AcceptingClient);
        let response = handle_request(
            request(serde_json::json!({ "jsonrpc": "2.0", "id": "x", "method": "resources/list" })),
            &server,
        )
        .await
        .unwrap();

        assert_eq!(response.id, RequestId::String("x".into()));
        assert_eq!(response.error.unwrap().code, error_codes::METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_tools_call_without_name_is_invalid_params() {
        let server = GmServer::new(AcceptingClient);
        let response = handle_request(
            request(serde_json::json!({
                "jsonrpc": "2.0", "id": 3, "method": "tools/call", "params": { "arguments": {} }
            })),
            &server,
        )
        .await
        .unwrap();

        assert_eq!(response.error.unwrap().code, error_codes::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_stdio_session() {
        let (client_end, server_end) = tokio::io::duplex(64 * 1024);
        let (server_read, server_write) = tokio::io::split(server_end);
        let server = GmServer::new(AcceptingClient);
        let session = tokio::spawn(run_with_io(server, BufReader::new(server_read), server_write));

        let (client_read, mut client_write) = tokio::io::split(client_end);
        let input = [
            r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#,
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "not json at all",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"rimworld_send_message","arguments":{"text":"hi"}}}"#,
        ];
        for line in input {
            client_write.write_all(line.as_bytes()).await.unwrap();
            client_write.write_all(b"\n").await.unwrap();
        }
        client_write.shutdown().await.unwrap();

        session.await.unwrap().unwrap();

        let mut lines = BufReader::new(client_read).lines();
        let mut responses = Vec::new();
        while let Some(line) = lines.next_line().await.unwrap() {
            responses.push(serde_json::from_str::<Value>(&line).unwrap());
        }

        assert_eq!(responses.len(), 2);
        let listing = responses.iter().find(|r| r["id"] == 1).unwrap();
        assert_eq!(listing["result"]["tools"].as_array().unwrap().len(), 3);

        let call = responses.iter().find(|r| r["id"] == 2).unwrap();
        assert_eq!(call["result"]["content"][0]["text"], "{\"success\":true}");
    }
}
