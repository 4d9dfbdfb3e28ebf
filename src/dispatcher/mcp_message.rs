use crate::robot_controller::state::RobotStatus;

/// Body of `POST /mcp`.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
pub struct McpMessage {
    pub messages: Vec<serde_json::Value>,
    #[serde(default)]
    pub context: Option<serde_json::Value>,
    #[serde(default)]
    pub response_format: Option<serde_json::Value>,
}

impl McpMessage {
    pub fn from_text(text: &str) -> Self {
        Self {
            messages: vec![serde_json::Value::String(text.to_string())],
            context: None,
            response_format: None,
        }
    }
}

/// Text of a message, either a bare string or an object with a `content` string.
pub fn message_text(message: &serde_json::Value) -> Option<&str> {
    match message {
        serde_json::Value::String(text) => Some(text.as_str()),
        serde_json::Value::Object(fields) => fields.get("content").and_then(|content| content.as_str()),
        _ => None,
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct CommandResult {
    pub status: String,
    pub message: String,
}

impl CommandResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct ResponseContext {
    pub robot_status: RobotStatus,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct McpResponse {
    pub response: CommandResult,
    pub context: ResponseContext,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorResponse {
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ResponseContext>,
}
