//! Core library for `weather-chat`.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeatherMap lookup behind the `get_weather` tool
//! - The chat-completion model client
//! - The conversation controller that ties them together
//!
//! It is used by the `weather-chat` binary, but can also be embedded in other front-ends.

pub mod config;
pub mod conversation;
pub mod error;
pub mod llm;
pub mod model;
pub mod provider;
pub mod tools;

pub use config::Config;
pub use conversation::{Conversation, SYSTEM_PROMPT};
pub use error::{ChatError, WeatherError};
pub use llm::{ChatModel, ChatRequest, ModelReply};
pub use model::{Message, Role, ToolCall, WeatherReport};
pub use provider::WeatherProvider;

/// Build a conversation wired to the configured model and weather provider.
pub fn conversation_from_config(config: &Config) -> anyhow::Result<Conversation> {
    config.require_keys()?;
    let model = llm::model_from_config(config)?;
    let weather = provider::provider_from_config(config)?;
    Ok(Conversation::new(model, weather))
}
