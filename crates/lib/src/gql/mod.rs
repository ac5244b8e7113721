//! Wire types for the `createChatCompletion` GraphQL mutation.
//!
//! `input` holds the `MessageInput` records sent as mutation variables; `output` holds the
//! message records returned in the mutation result, discriminated by `__typename`.

mod input;
mod output;

pub use input::{
    ActionExecutionMessageInput, MessageInput, MessageInputVariant, ResultMessageInput,
    TextMessageInput,
};
pub use output::{
    ActionExecutionMessageOutput, CreateChatCompletionData, CreateChatCompletionOutput,
    MessageOutput, ResultMessageOutput, TextMessageOutput, ACTION_EXECUTION_MESSAGE_OUTPUT,
    RESULT_MESSAGE_OUTPUT, TEXT_MESSAGE_OUTPUT,
};
