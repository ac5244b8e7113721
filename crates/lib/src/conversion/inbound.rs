//! `MessageOutput` records from a mutation result to messages.
//!
//! Every converted message is stamped with the conversion time; timestamps on the wire are
//! not used. A record without a status gets the Pending status.

use super::repair::{parse_arguments, parse_partial_arguments};
use super::ConversionError;
use crate::clock::{Clock, SystemClock};
use crate::gql::{CreateChatCompletionOutput, MessageOutput};
use crate::message::{ActionExecutionMessage, Message, ResultMessage, TextMessage};

/// Inbound conversion knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InboundOptions {
    /// Repair truncated argument JSON before parsing (default true). When false, arguments
    /// that do not parse as-is become an empty object.
    pub repair_arguments: bool,
}

impl Default for InboundOptions {
    fn default() -> Self {
        Self {
            repair_arguments: true,
        }
    }
}

/// Convert output records to messages using the wall clock and default options.
pub fn convert_gql_output_to_messages(
    outputs: &[MessageOutput],
) -> Result<Vec<Message>, ConversionError> {
    convert_gql_output_to_messages_with(outputs, &SystemClock, &InboundOptions::default())
}

/// Convert output records to messages, one per record, in order.
pub fn convert_gql_output_to_messages_with(
    outputs: &[MessageOutput],
    clock: &dyn Clock,
    options: &InboundOptions,
) -> Result<Vec<Message>, ConversionError> {
    log::debug!("converting {} gql output record(s) to messages", outputs.len());
    outputs
        .iter()
        .map(|output| to_message(output, clock, options))
        .collect()
}

/// Convert the messages of a `createChatCompletion` result.
pub fn convert_completion_output(
    output: &CreateChatCompletionOutput,
    clock: &dyn Clock,
    options: &InboundOptions,
) -> Result<Vec<Message>, ConversionError> {
    convert_gql_output_to_messages_with(&output.messages, clock, options)
}

fn to_message(
    output: &MessageOutput,
    clock: &dyn Clock,
    options: &InboundOptions,
) -> Result<Message, ConversionError> {
    let message = match output {
        MessageOutput::Text(t) => Message::Text(TextMessage {
            id: t.id.clone(),
            created_at: clock.now(),
            status: t.status.clone().unwrap_or_default(),
            role: t.role,
            content: t.content.concat(),
        }),
        MessageOutput::ActionExecution(a) => {
            let arguments = if options.repair_arguments {
                parse_partial_arguments(&a.arguments)
            } else {
                parse_arguments(&a.arguments)
            };
            Message::ActionExecution(ActionExecutionMessage {
                id: a.id.clone(),
                created_at: clock.now(),
                status: a.status.clone().unwrap_or_default(),
                name: a.name.clone(),
                arguments,
                scope: a.scope,
            })
        }
        MessageOutput::Result(r) => Message::Result(ResultMessage {
            id: r.id.clone(),
            created_at: clock.now(),
            status: r.status.clone().unwrap_or_default(),
            result: r.result.clone(),
            action_execution_id: r.action_execution_id.clone(),
            action_name: r.action_name.clone(),
        }),
        MessageOutput::Unknown(typename) => {
            return Err(ConversionError::UnknownMessageType(typename.clone()))
        }
    };
    Ok(message)
}
