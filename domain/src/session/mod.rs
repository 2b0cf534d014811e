//! Conversation primitives: message history, provider response
//! primitives, and streaming events.

pub mod entities;
pub mod response;
pub mod stream;

pub use entities::{latest_user_content, Message, Role};
pub use response::{FinishReason, TokenUsage};
pub use stream::StreamEvent;
