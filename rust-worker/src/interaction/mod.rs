//! Interaction data model.
//!
//! ```text
//! raw body + headers → InteractionRequest → dispatcher → InteractionResponse
//! ```

pub mod response;
pub mod types;

pub use response::{
    CallbackData, Diagnostic, InteractionCallback, InteractionResponse, InteractionResponseType,
    MessageFlags, ResponseBody, INVALID_SIGNATURE, MALFORMED_PAYLOAD, UNHANDLED_TYPE,
};
pub use types::{
    CommandData, CommandDataOption, CommandOptionType, CommandType, InteractionRequest,
    InteractionType,
};
