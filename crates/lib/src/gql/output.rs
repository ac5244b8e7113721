//! Message records returned by `createChatCompletion`, tagged by `__typename`.
//!
//! Text content and action arguments arrive as ordered string fragments because the server
//! streams them; arguments may be an incomplete JSON document.

use serde::de::{self, Deserializer};
use serde::Deserialize;

use crate::message::{ActionExecutionScope, MessageRole, MessageStatus};

pub const TEXT_MESSAGE_OUTPUT: &str = "TextMessageOutput";
pub const ACTION_EXECUTION_MESSAGE_OUTPUT: &str = "ActionExecutionMessageOutput";
pub const RESULT_MESSAGE_OUTPUT: &str = "ResultMessageOutput";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextMessageOutput {
    pub id: String,
    #[serde(default)]
    pub status: Option<MessageStatus>,
    pub role: MessageRole,
    #[serde(default)]
    pub content: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionExecutionMessageOutput {
    pub id: String,
    #[serde(default)]
    pub status: Option<MessageStatus>,
    pub name: String,
    pub scope: ActionExecutionScope,
    /// Fragments of a JSON document, possibly cut off mid-token.
    #[serde(default)]
    pub arguments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultMessageOutput {
    pub id: String,
    #[serde(default)]
    pub status: Option<MessageStatus>,
    pub result: String,
    pub action_execution_id: String,
    pub action_name: String,
}

/// One output record. Unrecognized `__typename` values are kept as `Unknown` so that the
/// caller decides how to reject them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageOutput {
    Text(TextMessageOutput),
    ActionExecution(ActionExecutionMessageOutput),
    Result(ResultMessageOutput),
    Unknown(String),
}

impl MessageOutput {
    /// The `__typename` this record was (or would be) tagged with.
    pub fn typename(&self) -> &str {
        match self {
            MessageOutput::Text(_) => TEXT_MESSAGE_OUTPUT,
            MessageOutput::ActionExecution(_) => ACTION_EXECUTION_MESSAGE_OUTPUT,
            MessageOutput::Result(_) => RESULT_MESSAGE_OUTPUT,
            MessageOutput::Unknown(name) => name,
        }
    }
}

impl<'de> Deserialize<'de> for MessageOutput {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        let typename = value
            .get("__typename")
            .and_then(|v| v.as_str())
            .ok_or_else(|| <D::Error as de::Error>::missing_field("__typename"))?
            .to_string();
        let parsed = match typename.as_str() {
            TEXT_MESSAGE_OUTPUT => serde_json::from_value(value).map(MessageOutput::Text),
            ACTION_EXECUTION_MESSAGE_OUTPUT => {
                serde_json::from_value(value).map(MessageOutput::ActionExecution)
            }
            RESULT_MESSAGE_OUTPUT => serde_json::from_value(value).map(MessageOutput::Result),
            _ => return Ok(MessageOutput::Unknown(typename)),
        };
        parsed.map_err(|e| de::Error::custom(format!("{}: {}", typename, e)))
    }
}

/// `createChatCompletion` result: thread/run ids and the produced messages.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChatCompletionOutput {
    #[serde(default)]
    pub thread_id: Option<String>,
    #[serde(default)]
    pub run_id: Option<String>,
    #[serde(default)]
    pub messages: Vec<MessageOutput>,
}

/// The mutation's `data` object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChatCompletionData {
    pub create_chat_completion: CreateChatCompletionOutput,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageStatusCode;
    use serde_json::json;

    #[test]
    fn dispatches_on_typename() {
        let out: MessageOutput = serde_json::from_value(json!({
            "__typename": "ActionExecutionMessageOutput",
            "id": "a-1",
            "createdAt": "2024-05-01T12:00:00Z",
            "name": "search",
            "scope": "server",
            "arguments": ["{\"q\":", "\"rust\"}"],
            "status": { "__typename": "SuccessMessageStatus", "code": "Success" }
        }))
        .unwrap();
        let MessageOutput::ActionExecution(a) = out else {
            panic!("expected ActionExecutionMessageOutput");
        };
        assert_eq!(a.arguments.len(), 2);
        assert_eq!(a.status.unwrap().code, MessageStatusCode::Success);
    }

    #[test]
    fn unknown_typename_is_kept() {
        let out: MessageOutput =
            serde_json::from_value(json!({ "__typename": "BogusOutput", "id": "x" })).unwrap();
        assert_eq!(out, MessageOutput::Unknown("BogusOutput".to_string()));
        assert_eq!(out.typename(), "BogusOutput");
    }

    #[test]
    fn missing_typename_is_an_error() {
        let res: Result<MessageOutput, _> = serde_json::from_value(json!({ "id": "x" }));
        assert!(res.is_err());
    }

    #[test]
    fn null_status_is_absent() {
        let out: MessageOutput = serde_json::from_value(json!({
            "__typename": "TextMessageOutput",
            "id": "t-1",
            "role": "assistant",
            "content": ["a", "b"],
            "status": null
        }))
        .unwrap();
        let MessageOutput::Text(t) = out else {
            panic!("expected TextMessageOutput");
        };
        assert!(t.status.is_none());
    }
}
