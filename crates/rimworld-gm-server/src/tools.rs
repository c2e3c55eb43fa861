//! MCP tool handlers for the RimWorld GM bridge

use rimworld_gm_bridge::{RemoteClient, RemoteResponse};
use rimworld_gm_core::{
    ApiErrorResponse, ErrorCategory, EventIntensity, EventTriggerPayload, EventType, GmError,
    MessagePayload, MessageStyle, Result,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, warn};

/// Text returned for every tool when the game-side API is not listening
pub const CONNECTION_UNAVAILABLE_MESSAGE: &str =
    "Error: Could not connect to RimWorld. Is the game running with the mod enabled?";

/// Tool definition for MCP tools/list
#[derive(Debug, Clone, Serialize)]
pub struct ToolDef {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// The tools this bridge exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    GetStatus,
    TriggerEvent,
    SendMessage,
}

/// Tool name to handler table
const TOOL_TABLE: [(&str, ToolKind); 3] = [
    ("rimworld_get_status", ToolKind::GetStatus),
    ("rimworld_trigger_event", ToolKind::TriggerEvent),
    ("rimworld_send_message", ToolKind::SendMessage),
];

impl ToolKind {
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::GetStatus => TOOL_TABLE[0].0,
            ToolKind::TriggerEvent => TOOL_TABLE[1].0,
            ToolKind::SendMessage => TOOL_TABLE[2].0,
        }
    }

    fn definition(self) -> ToolDef {
        match self {
            ToolKind::GetStatus => ToolDef {
                name: self.name().into(),
                description: "Get the current status of the RimWorld colony including colonists, resources, and threats".into(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "include_colonists": {
                            "type": "boolean",
                            "description": "Include detailed colonist info",
                            "default": true
                        },
                        "include_resources": {
                            "type": "boolean",
                            "description": "Include resource counts",
                            "default": true
                        }
                    }
                }),
            },
            ToolKind::TriggerEvent => ToolDef {
                name: self.name().into(),
                description: "Trigger an event in RimWorld (raids, cargo drops, weather, etc.)".into(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "event_type": {
                            "type": "string",
                            "enum": EventType::ALL.map(EventType::as_str),
                            "description": "Type of event to trigger"
                        },
                        "intensity": {
                            "type": "string",
                            "enum": EventIntensity::ALL.map(EventIntensity::as_str),
                            "description": "Event intensity/difficulty",
                            "default": EventIntensity::default().as_str()
                        },
                        "target_colonist": {
                            "type": "string",
                            "description": "Target colonist name (for inspiration events)"
                        }
                    },
                    "required": ["event_type"]
                }),
            },
            ToolKind::SendMessage => ToolDef {
                name: self.name().into(),
                description: "Display a message to the player in RimWorld".into(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "text": {
                            "type": "string",
                            "description": "Message text to display"
                        },
                        "style": {
                            "type": "string",
                            "enum": MessageStyle::ALL.map(MessageStyle::as_str),
                            "default": MessageStyle::default().as_str()
                        }
                    },
                    "required": ["text"]
                }),
            },
        }
    }
}

/// Result of looking a tool name up in the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolRoute {
    Known(ToolKind),
    Unknown(String),
}

impl ToolRoute {
    pub fn resolve(name: &str) -> Self {
        TOOL_TABLE
            .iter()
            .find(|(tool_name, _)| *tool_name == name)
            .map(|(_, kind)| ToolRoute::Known(*kind))
            .unwrap_or_else(|| ToolRoute::Unknown(name.to_string()))
    }
}

/// Get list of available tools
pub fn list_tools() -> Vec<ToolDef> {
    TOOL_TABLE
        .iter()
        .map(|(_, kind)| kind.definition())
        .collect()
}

/// Parameters for rimworld_get_status
///
/// Accepted for schema compatibility; the remote always returns the full snapshot.
#[derive(Debug, Default, Deserialize)]
pub struct GetStatusParams {
    pub include_colonists: Option<Value>,
    pub include_resources: Option<Value>,
}

/// Parameters for rimworld_trigger_event
///
/// Values are kept as raw JSON; the remote decides what it accepts.
#[derive(Debug, Default, Deserialize)]
pub struct TriggerEventParams {
    pub event_type: Option<Value>,
    pub intensity: Option<Value>,
    pub target_colonist: Option<Value>,
}

/// Parameters for rimworld_send_message
#[derive(Debug, Default, Deserialize)]
pub struct SendMessageParams {
    pub text: Option<Value>,
    pub style: Option<Value>,
}

fn parse_params<T: for<'de> Deserialize<'de>>(arguments: Value) -> Result<T> {
    let arguments = if arguments.is_null() {
        Value::Object(Default::default())
    } else {
        arguments
    };
    serde_json::from_value(arguments).map_err(|e| GmError::InvalidArguments(e.to_string()))
}

/// Maps tool calls onto remote API calls and folds every outcome into text.
///
/// Holds nothing but the client, so one instance can serve any number of
/// concurrent calls.
pub struct BridgeDispatcher<C> {
    client: C,
}

impl<C: RemoteClient> BridgeDispatcher<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Handle a tools/call. Never fails; errors come back as text.
    pub async fn dispatch(&self, name: &str, arguments: Value) -> String {
        let outcome = match ToolRoute::resolve(name) {
            ToolRoute::Known(kind) => self.invoke(kind, arguments).await,
            ToolRoute::Unknown(name) => {
                warn!("Unknown tool requested: {}", name);
                Ok(serde_json::json!({ "error": format!("Unknown tool: {}", name) }))
            }
        };

        match outcome {
            Ok(value) => value.to_string(),
            Err(e) if e.category() == ErrorCategory::ConnectionUnavailable => {
                warn!("{} failed: {}", name, e);
                CONNECTION_UNAVAILABLE_MESSAGE.to_string()
            }
            Err(e) => {
                error!("{} failed: {}", name, e);
                format!("Error: {}", e)
            }
        }
    }

    async fn invoke(&self, kind: ToolKind, arguments: Value) -> Result<Value> {
        let response = match kind {
            ToolKind::GetStatus => self.get_status(parse_params(arguments)?).await?,
            ToolKind::TriggerEvent => self.trigger_event(parse_params(arguments)?).await?,
            ToolKind::SendMessage => self.send_message(parse_params(arguments)?).await?,
        };

        if !response.is_success() {
            match ApiErrorResponse::from_body(&response.body) {
                Some(api_error) => warn!(
                    "{} rejected by game: status={} code={} category={:?}",
                    kind.name(),
                    response.status,
                    api_error.error,
                    api_error.error.category()
                ),
                None => warn!(
                    "{} rejected by game: status={}",
                    kind.name(),
                    response.status
                ),
            }
        }

        Ok(response.body)
    }

    async fn get_status(&self, params: GetStatusParams) -> Result<RemoteResponse> {
        if params.include_colonists.is_some() || params.include_resources.is_some() {
            debug!(
                "Status filters not forwarded (include_colonists={:?}, include_resources={:?})",
                params.include_colonists, params.include_resources
            );
        }
        self.client.get("/state").await
    }

    async fn trigger_event(&self, params: TriggerEventParams) -> Result<RemoteResponse> {
        let intensity = EventIntensity::resolve(params.intensity.as_ref());
        let payload =
            EventTriggerPayload::new(params.event_type, intensity, params.target_colonist);
        self.client
            .post("/event", serde_json::to_value(payload)?)
            .await
    }

    async fn send_message(&self, params: SendMessageParams) -> Result<RemoteResponse> {
        let payload = MessagePayload::new(params.text, params.style);
        self.client
            .post("/message", serde_json::to_value(payload)?)
            .await
    }
}
