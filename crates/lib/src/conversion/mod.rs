//! Conversion between [`Message`](crate::message::Message) and the GraphQL wire records.
//!
//! Outbound: messages to `MessageInput` before a mutation is sent.
//! Inbound: `MessageOutput` records from the mutation result back to messages.

mod inbound;
mod outbound;
mod repair;

pub use inbound::{
    convert_completion_output, convert_gql_output_to_messages,
    convert_gql_output_to_messages_with, InboundOptions,
};
pub use outbound::{
    convert_json_messages_to_gql_input, convert_messages_to_gql_input, decode_messages,
};
pub use repair::{parse_arguments, parse_partial_arguments, repair_json};

/// Errors from either direction. Any error aborts the whole batch.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("unknown message type: {0:?}")]
    UnknownMessageType(String),
    #[error("invalid message at index {index}: {source}")]
    InvalidMessage {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("serializing arguments of action execution {id}: {source}")]
    Arguments {
        id: String,
        #[source]
        source: serde_json::Error,
    },
}
