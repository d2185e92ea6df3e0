use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, error, info};

use crate::{ChatError, ToolCall, config, error::truncate_body, provider::http_client};

use super::{ChatModel, ChatRequest, ModelReply};

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Groq's OpenAI-compatible chat-completions endpoint.
#[derive(Clone)]
pub struct GroqClient {
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    http: Client,
}

impl std::fmt::Debug for GroqClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroqClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl GroqClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: config::DEFAULT_TEMPERATURE,
            max_tokens: config::DEFAULT_MAX_TOKENS,
            http: http_client(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_sampling(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    fn request_body(&self, request: &ChatRequest) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": request.messages,
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        });

        if !request.tools.is_empty() {
            body["tools"] = json!(request.tools);
            body["tool_choice"] = json!("auto");
            body["parallel_tool_calls"] = json!(false);
        }

        body
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
    tool_calls: Option<Vec<WireToolCall>>,
}

#[derive(Debug, Deserialize)]
struct WireToolCall {
    id: String,
    function: WireFunction,
}

#[derive(Debug, Deserialize)]
struct WireFunction {
    name: String,
    #[serde(default)]
    arguments: String,
}

fn parse_completion(text: &str) -> Result<ModelReply, ChatError> {
    let parsed: CompletionResponse =
        serde_json::from_str(text).map_err(|e| ChatError::Malformed(e.to_string()))?;

    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ChatError::Malformed("no choices in response".to_string()))?;

    let tool_calls = choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|tc| ToolCall { id: tc.id, name: tc.function.name, arguments: tc.function.arguments })
        .collect();

    Ok(ModelReply { content: choice.message.content, tool_calls })
}

#[async_trait]
impl ChatModel for GroqClient {
    async fn complete(&self, request: &ChatRequest) -> Result<ModelReply, ChatError> {
        let url = format!("{}/chat/completions", self.base_url);
        info!(model = %self.model, tools = request.tools.len(), "Calling model API");

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(request))
            .send()
            .await
            .map_err(|e| {
                error!("Model API request failed: {e}");
                ChatError::network(&e)
            })?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| ChatError::network(&e))?;

        if !status.is_success() {
            error!(status = %status, "Model API error: {}", truncate_body(&text));
            return Err(ChatError::from_status(status.as_u16(), &text));
        }

        debug!("Model API response: {}", truncate_body(&text));
        parse_completion(&text)
    }
}
