//! chatgql: convert chat messages to and from the `createChatCompletion` GraphQL wire format,
//! including recovery of streamed, possibly truncated action arguments.

pub mod clock;
pub mod config;
pub mod conversion;
pub mod gql;
pub mod init;
pub mod message;

pub use conversion::ConversionError;
pub use message::Message;
