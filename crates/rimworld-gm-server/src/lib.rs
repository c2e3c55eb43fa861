//! # rimworld-gm-server
//!
//! MCP server exposing the RimWorld GM HTTP API as agent tools.
//!
//! This crate provides:
//! - `BridgeDispatcher`, which maps a tool call onto one remote call and folds
//!   the outcome into a text payload
//! - MCP JSON-RPC protocol handling
//! - stdio transport

pub mod mcp;
pub mod tools;
pub mod transport;

pub use mcp::ServerInfo;
pub use tools::{BridgeDispatcher, CONNECTION_UNAVAILABLE_MESSAGE, ToolKind, ToolRoute, list_tools};

use rimworld_gm_bridge::RemoteClient;
use rimworld_gm_core::Result;
use std::sync::Arc;

/// RimWorld GM MCP server
pub struct GmServer<C: RemoteClient> {
    /// Tool dispatcher, shared with in-flight requests
    dispatcher: Arc<BridgeDispatcher<C>>,
    /// Identity reported during initialize
    info: ServerInfo,
}

impl<C: RemoteClient + 'static> GmServer<C> {
    /// Create a new server around a remote client
    pub fn new(client: C) -> Self {
        Self::with_info(client, ServerInfo::default())
    }

    pub fn with_info(client: C, info: ServerInfo) -> Self {
        Self {
            dispatcher: Arc::new(BridgeDispatcher::new(client)),
            info,
        }
    }

    /// Run the server on stdio transport
    pub async fn run_stdio(self) -> Result<()> {
        transport::stdio::run(self).await
    }

    pub fn info(&self) -> &ServerInfo {
        &self.info
    }

    pub fn dispatcher(&self) -> &Arc<BridgeDispatcher<C>> {
        &self.dispatcher
    }
}
