//! Messages to `MessageInput` records for the mutation variables.

use serde_json::Value;

use super::ConversionError;
use crate::gql::{
    ActionExecutionMessageInput, MessageInput, ResultMessageInput, TextMessageInput,
};
use crate::message::{
    Message, ACTION_EXECUTION_MESSAGE, RESULT_MESSAGE, TEXT_MESSAGE,
};

/// Convert messages to wire input, one record per message, in order.
pub fn convert_messages_to_gql_input(
    messages: &[Message],
) -> Result<Vec<MessageInput>, ConversionError> {
    log::debug!("converting {} message(s) to gql input", messages.len());
    messages.iter().map(to_input).collect()
}

fn to_input(message: &Message) -> Result<MessageInput, ConversionError> {
    let input = match message {
        Message::Text(m) => MessageInput::text(
            m.id.clone(),
            m.created_at,
            TextMessageInput {
                content: m.content.clone(),
                role: m.role,
            },
        ),
        Message::ActionExecution(m) => {
            let arguments =
                serde_json::to_string(&m.arguments).map_err(|source| ConversionError::Arguments {
                    id: m.id.clone(),
                    source,
                })?;
            MessageInput::action_execution(
                m.id.clone(),
                m.created_at,
                ActionExecutionMessageInput {
                    name: m.name.clone(),
                    arguments,
                    scope: m.scope,
                },
            )
        }
        Message::Result(m) => MessageInput::result(
            m.id.clone(),
            m.created_at,
            ResultMessageInput {
                result: m.result.clone(),
                action_execution_id: m.action_execution_id.clone(),
                action_name: m.action_name.clone(),
            },
        ),
    };
    Ok(input)
}

/// Decode messages from their JSON form (tagged by `"type"`).
/// An element with any other tag fails the whole call with `UnknownMessageType`.
pub fn decode_messages(values: &[Value]) -> Result<Vec<Message>, ConversionError> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            let typ = value.get("type").and_then(|v| v.as_str()).unwrap_or("");
            match typ {
                TEXT_MESSAGE | ACTION_EXECUTION_MESSAGE | RESULT_MESSAGE => {
                    serde_json::from_value(value.clone())
                        .map_err(|source| ConversionError::InvalidMessage { index, source })
                }
                other => Err(ConversionError::UnknownMessageType(other.to_string())),
            }
        })
        .collect()
}

/// [`decode_messages`] followed by [`convert_messages_to_gql_input`].
pub fn convert_json_messages_to_gql_input(
    values: &[Value],
) -> Result<Vec<MessageInput>, ConversionError> {
    let messages = decode_messages(values)?;
    convert_messages_to_gql_input(&messages)
}
