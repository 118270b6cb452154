// Service exports
pub mod llm;
pub mod profiles;

pub use llm::{CompletionParams, LlmClient, LlmError};
pub use profiles::{JsonProfileStore, ProfileError, ProfileSource};
