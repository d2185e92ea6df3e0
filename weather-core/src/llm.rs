//! Chat-completion model access.

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::warn;

use crate::{ChatError, Config, Message, Role, ToolCall, llm::groq::GroqClient};

pub mod groq;

/// A request already in chat-completions wire form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatRequest {
    pub messages: Vec<Value>,
    /// Tool declarations. Empty means the model may not call tools.
    pub tools: Vec<Value>,
}

/// What the model answered: text, tool calls, or both.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelReply {
    pub content: Option<String>,
    pub tool_calls: Vec<ToolCall>,
}

impl ModelReply {
    pub fn text(content: impl Into<String>) -> Self {
        Self { content: Some(content.into()), tool_calls: Vec::new() }
    }

    pub fn tool_call(call: ToolCall) -> Self {
        Self { content: None, tool_calls: vec![call] }
    }
}

#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> Result<ModelReply, ChatError>;
}

/// Construct the Groq client from config.
pub fn model_from_config(config: &Config) -> anyhow::Result<Box<dyn ChatModel>> {
    let api_key = config.groq_api_key()?;

    let client = GroqClient::new(api_key.to_owned())
        .with_base_url(config.groq_base_url())
        .with_model(config.model())
        .with_sampling(config.temperature(), config.max_tokens());

    Ok(Box::new(client))
}

/// Render the system prompt and transcript as chat-completions messages.
///
/// A tool entry expands to the assistant message that requested the call,
/// followed by the tool result that answers it.
pub fn wire_messages<'a>(
    system_prompt: &str,
    transcript: impl IntoIterator<Item = &'a Message>,
) -> Vec<Value> {
    let mut out = vec![json!({ "role": "system", "content": system_prompt })];

    for msg in transcript {
        match (msg.role, &msg.tool_call) {
            (Role::Tool, Some(call)) => {
                out.push(json!({
                    "role": "assistant",
                    "content": "",
                    "tool_calls": [{
                        "id": call.id,
                        "type": "function",
                        "function": { "name": call.name, "arguments": call.arguments },
                    }],
                }));
                out.push(json!({
                    "role": "tool",
                    "tool_call_id": call.id,
                    "content": msg.content,
                }));
            }
            (Role::Tool, None) => {
                warn!("Dropping tool message without a tool call from the request");
            }
            (role, _) => out.push(json!({ "role": role, "content": msg.content })),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_prompt_comes_first() {
        let wire = wire_messages("be nice", &[Message::user("hi")]);

        assert_eq!(wire.len(), 2);
        assert_eq!(wire[0], json!({"role": "system", "content": "be nice"}));
        assert_eq!(wire[1], json!({"role": "user", "content": "hi"}));
    }

    #[test]
    fn tool_entry_expands_to_call_and_result() {
        let call = ToolCall {
            id: "call_1".into(),
            name: "get_weather".into(),
            arguments: r#"{"city":"Tokyo"}"#.into(),
        };
        let transcript = vec![
            Message::user("weather in Tokyo?"),
            Message::tool(call, "Weather in Tokyo, JP: ..."),
            Message::assistant("It is mild in Tokyo."),
        ];

        let wire = wire_messages("sys", &transcript);
        assert_eq!(wire.len(), 5);

        assert_eq!(wire[2]["role"], "assistant");
        assert_eq!(wire[2]["tool_calls"][0]["id"], "call_1");
        assert_eq!(wire[2]["tool_calls"][0]["type"], "function");
        assert_eq!(wire[2]["tool_calls"][0]["function"]["name"], "get_weather");
        assert_eq!(wire[2]["tool_calls"][0]["function"]["arguments"], r#"{"city":"Tokyo"}"#);

        assert_eq!(wire[3]["role"], "tool");
        assert_eq!(wire[3]["tool_call_id"], "call_1");
        assert_eq!(wire[3]["content"], "Weather in Tokyo, JP: ...");

        assert_eq!(wire[4], json!({"role": "assistant", "content": "It is mild in Tokyo."}));
    }

    #[test]
    fn model_from_config_requires_groq_key() {
        let err = model_from_config(&Config::default()).err().expect("key is missing");
        assert!(err.to_string().contains("GROQ_API_KEY is not set"));
    }
}
