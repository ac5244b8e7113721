//! `MessageInput`: one message as sent in the mutation variables.
//!
//! Wire shape: `{ "id", "createdAt", "textMessage" | "actionExecutionMessage" | "resultMessage" }`,
//! with exactly one of the variant records present.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::message::{ActionExecutionScope, MessageRole};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextMessageInput {
    pub content: String,
    pub role: MessageRole,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionExecutionMessageInput {
    pub name: String,
    /// Arguments serialized to JSON text.
    pub arguments: String,
    pub scope: ActionExecutionScope,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultMessageInput {
    pub result: String,
    pub action_execution_id: String,
    pub action_name: String,
}

/// Envelope with id, timestamp and one populated variant record.
/// Build with [`MessageInput::text`], [`MessageInput::action_execution`] or [`MessageInput::result`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageInput {
    pub id: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text_message: Option<TextMessageInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    action_execution_message: Option<ActionExecutionMessageInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result_message: Option<ResultMessageInput>,
}

/// Borrowed view of the populated variant of a [`MessageInput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageInputVariant<'a> {
    Text(&'a TextMessageInput),
    ActionExecution(&'a ActionExecutionMessageInput),
    Result(&'a ResultMessageInput),
}

impl MessageInput {
    fn empty(id: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            created_at,
            text_message: None,
            action_execution_message: None,
            result_message: None,
        }
    }

    pub fn text(id: impl Into<String>, created_at: DateTime<Utc>, text: TextMessageInput) -> Self {
        Self {
            text_message: Some(text),
            ..Self::empty(id.into(), created_at)
        }
    }

    pub fn action_execution(
        id: impl Into<String>,
        created_at: DateTime<Utc>,
        action: ActionExecutionMessageInput,
    ) -> Self {
        Self {
            action_execution_message: Some(action),
            ..Self::empty(id.into(), created_at)
        }
    }

    pub fn result(
        id: impl Into<String>,
        created_at: DateTime<Utc>,
        result: ResultMessageInput,
    ) -> Self {
        Self {
            result_message: Some(result),
            ..Self::empty(id.into(), created_at)
        }
    }

    pub fn variant(&self) -> MessageInputVariant<'_> {
        match (
            &self.text_message,
            &self.action_execution_message,
            &self.result_message,
        ) {
            (Some(t), None, None) => MessageInputVariant::Text(t),
            (None, Some(a), None) => MessageInputVariant::ActionExecution(a),
            (None, None, Some(r)) => MessageInputVariant::Result(r),
            // Constructors set exactly one record.
            _ => unreachable!("MessageInput must carry exactly one variant"),
        }
    }

    pub fn text_message(&self) -> Option<&TextMessageInput> {
        self.text_message.as_ref()
    }

    pub fn action_execution_message(&self) -> Option<&ActionExecutionMessageInput> {
        self.action_execution_message.as_ref()
    }

    pub fn result_message(&self) -> Option<&ResultMessageInput> {
        self.result_message.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_only_the_populated_variant() {
        let created_at = DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let input = MessageInput::result(
            "r-1",
            created_at,
            ResultMessageInput {
                result: "done".to_string(),
                action_execution_id: "a-1".to_string(),
                action_name: "lookup".to_string(),
            },
        );
        let v = serde_json::to_value(&input).unwrap();
        assert_eq!(
            v,
            json!({
                "id": "r-1",
                "createdAt": "2024-05-01T12:00:00Z",
                "resultMessage": {
                    "result": "done",
                    "actionExecutionId": "a-1",
                    "actionName": "lookup"
                }
            })
        );
        assert!(matches!(input.variant(), MessageInputVariant::Result(_)));
    }
}
