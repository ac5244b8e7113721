//! In-process chat messages: text, action execution, and action result.
//!
//! `Message` is a closed set of variants. The JSON form is tagged with `"type"` and uses
//! camelCase field names; `id`, `createdAt` and `status` may be omitted and are filled in
//! the same way the constructors fill them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Generate a fresh message id (`ck-<uuid>`).
pub fn new_message_id() -> String {
    format!("ck-{}", uuid::Uuid::new_v4())
}

fn empty_arguments() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageStatusCode {
    #[default]
    Pending,
    Success,
    Failed,
}

/// Delivery status of a message. `reason` is only meaningful for `Failed`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageStatus {
    pub code: MessageStatusCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl MessageStatus {
    pub fn pending() -> Self {
        Self::default()
    }

    pub fn success() -> Self {
        Self {
            code: MessageStatusCode::Success,
            reason: None,
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            code: MessageStatusCode::Failed,
            reason: Some(reason.into()),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.code == MessageStatusCode::Pending
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

/// Where an action runs: in the client that sent the request or on the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionExecutionScope {
    Client,
    Server,
}

/// Plain text from a user, the assistant, or the system prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextMessage {
    #[serde(default = "new_message_id")]
    pub id: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub status: MessageStatus,
    pub role: MessageRole,
    pub content: String,
}

impl TextMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: new_message_id(),
            created_at: Utc::now(),
            status: MessageStatus::default(),
            role,
            content: content.into(),
        }
    }
}

/// A request to run a named action with structured arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionExecutionMessage {
    #[serde(default = "new_message_id")]
    pub id: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub status: MessageStatus,
    pub name: String,
    #[serde(default = "empty_arguments")]
    pub arguments: serde_json::Value,
    pub scope: ActionExecutionScope,
}

impl ActionExecutionMessage {
    pub fn new(
        name: impl Into<String>,
        arguments: serde_json::Value,
        scope: ActionExecutionScope,
    ) -> Self {
        Self {
            id: new_message_id(),
            created_at: Utc::now(),
            status: MessageStatus::default(),
            name: name.into(),
            arguments,
            scope,
        }
    }
}

/// Output of an action; `action_execution_id` is the id of the `ActionExecutionMessage` it answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultMessage {
    #[serde(default = "new_message_id")]
    pub id: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub status: MessageStatus,
    pub result: String,
    pub action_execution_id: String,
    pub action_name: String,
}

impl ResultMessage {
    pub fn new(
        result: impl Into<String>,
        action_execution_id: impl Into<String>,
        action_name: impl Into<String>,
    ) -> Self {
        Self {
            id: new_message_id(),
            created_at: Utc::now(),
            status: MessageStatus::default(),
            result: result.into(),
            action_execution_id: action_execution_id.into(),
            action_name: action_name.into(),
        }
    }
}

macro_rules! common_builders {
    ($($ty:ty),*) => {
        $(
            impl $ty {
                pub fn with_id(mut self, id: impl Into<String>) -> Self {
                    self.id = id.into();
                    self
                }

                pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
                    self.created_at = created_at;
                    self
                }

                pub fn with_status(mut self, status: MessageStatus) -> Self {
                    self.status = status;
                    self
                }
            }
        )*
    };
}

common_builders!(TextMessage, ActionExecutionMessage, ResultMessage);

pub const TEXT_MESSAGE: &str = "TextMessage";
pub const ACTION_EXECUTION_MESSAGE: &str = "ActionExecutionMessage";
pub const RESULT_MESSAGE: &str = "ResultMessage";

/// A chat message. Exactly one variant; match exhaustively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Message {
    #[serde(rename = "TextMessage")]
    Text(TextMessage),
    #[serde(rename = "ActionExecutionMessage")]
    ActionExecution(ActionExecutionMessage),
    #[serde(rename = "ResultMessage")]
    Result(ResultMessage),
}

impl Message {
    pub fn id(&self) -> &str {
        match self {
            Message::Text(m) => &m.id,
            Message::ActionExecution(m) => &m.id,
            Message::Result(m) => &m.id,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            Message::Text(m) => m.created_at,
            Message::ActionExecution(m) => m.created_at,
            Message::Result(m) => m.created_at,
        }
    }

    pub fn status(&self) -> &MessageStatus {
        match self {
            Message::Text(m) => &m.status,
            Message::ActionExecution(m) => &m.status,
            Message::Result(m) => &m.status,
        }
    }

    /// The `"type"` tag used in the JSON form.
    pub fn type_name(&self) -> &'static str {
        match self {
            Message::Text(_) => TEXT_MESSAGE,
            Message::ActionExecution(_) => ACTION_EXECUTION_MESSAGE,
            Message::Result(_) => RESULT_MESSAGE,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Message::Text(_))
    }

    pub fn is_action_execution(&self) -> bool {
        matches!(self, Message::ActionExecution(_))
    }

    pub fn is_result(&self) -> bool {
        matches!(self, Message::Result(_))
    }

    pub fn as_text(&self) -> Option<&TextMessage> {
        match self {
            Message::Text(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_action_execution(&self) -> Option<&ActionExecutionMessage> {
        match self {
            Message::ActionExecution(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_result(&self) -> Option<&ResultMessage> {
        match self {
            Message::Result(m) => Some(m),
            _ => None,
        }
    }
}

impl From<TextMessage> for Message {
    fn from(m: TextMessage) -> Self {
        Message::Text(m)
    }
}

impl From<ActionExecutionMessage> for Message {
    fn from(m: ActionExecutionMessage) -> Self {
        Message::ActionExecution(m)
    }
}

impl From<ResultMessage> for Message {
    fn from(m: ResultMessage) -> Self {
        Message::Result(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn constructors_fill_defaults() {
        let m = TextMessage::new(MessageRole::User, "hi");
        assert!(m.id.starts_with("ck-"));
        assert!(m.status.is_pending());
        assert_ne!(m.id, TextMessage::new(MessageRole::User, "hi").id);
    }

    #[test]
    fn json_form_is_tagged_and_camel_case() {
        let m: Message = ResultMessage::new("42", "exec-1", "answer")
            .with_id("r-1")
            .into();
        let v = serde_json::to_value(&m).unwrap();
        assert_eq!(v["type"], "ResultMessage");
        assert_eq!(v["id"], "r-1");
        assert_eq!(v["actionExecutionId"], "exec-1");
        assert_eq!(v["status"], json!({ "code": "Pending" }));
    }

    #[test]
    fn json_form_defaults_missing_fields() {
        let m: Message = serde_json::from_value(json!({
            "type": "ActionExecutionMessage",
            "name": "search",
            "scope": "client"
        }))
        .unwrap();
        let a = m.as_action_execution().unwrap();
        assert!(a.id.starts_with("ck-"));
        assert_eq!(a.arguments, json!({}));
        assert_eq!(a.scope, ActionExecutionScope::Client);
        assert!(m.status().is_pending());
    }

    #[test]
    fn failed_status_keeps_reason() {
        let v = serde_json::to_value(MessageStatus::failed("timeout")).unwrap();
        assert_eq!(v, json!({ "code": "Failed", "reason": "timeout" }));
    }
}
