//! The per-session conversation and its turn protocol.

use tracing::{debug, info, warn};

use crate::{
    ChatError, ChatModel, Message, WeatherProvider,
    llm::{ChatRequest, ModelReply, wire_messages},
    tools,
};

pub const SYSTEM_PROMPT: &str = "You are a helpful AI assistant with access to weather information.
You can look up current weather conditions for any city in the world.

When users ask about weather, you should use the get_weather tool to fetch real-time data.
Always be friendly, concise, and accurate in your responses.

If a user asks about weather without specifying a city, politely ask them which city they'd like to know about.";

/// One user's chat session.
///
/// Each turn adds a user entry and an assistant entry, with one tool entry in
/// between when the model looked up weather. A failed turn leaves the
/// transcript as it was before the turn started.
pub struct Conversation {
    model: Box<dyn ChatModel>,
    weather: Box<dyn WeatherProvider>,
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new(model: Box<dyn ChatModel>, weather: Box<dyn WeatherProvider>) -> Self {
        Self { model, weather, messages: Vec::new() }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn clear(&mut self) {
        info!(dropped = self.messages.len(), "Clearing chat history");
        self.messages.clear();
    }

    /// Answer one user message, returning the assistant's final text.
    ///
    /// The turn is built aside and appended only once it completes, so an
    /// error or a dropped future leaves the transcript untouched.
    pub async fn send(&mut self, user_text: &str) -> Result<String, ChatError> {
        let text = user_text.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let mut turn = vec![Message::user(text)];

        match self.run_turn(&mut turn).await {
            Ok(answer) => {
                turn.push(Message::assistant(answer.clone()));
                self.messages.append(&mut turn);
                Ok(answer)
            }
            Err(e) => {
                warn!("Turn failed, discarding it: {e}");
                Err(e)
            }
        }
    }

    async fn run_turn(&self, turn: &mut Vec<Message>) -> Result<String, ChatError> {
        let request = ChatRequest {
            messages: wire_messages(SYSTEM_PROMPT, self.messages.iter().chain(turn.iter())),
            tools: tools::declarations(),
        };
        let reply = self.model.complete(&request).await?;

        let mut calls = reply.tool_calls.into_iter();
        let Some(call) = calls.next() else {
            return final_text(reply.content);
        };

        let ignored = calls.count();
        if ignored > 0 {
            warn!(ignored, "Model requested several tool calls; only the first is run");
        }

        info!(tool = %call.name, "Model requested a tool call");
        let result = tools::execute(&call, self.weather.as_ref()).await;
        debug!(tool = %call.name, "Tool result: {result}");
        turn.push(Message::tool(call, result));

        // Follow-up without tools, so the model has to answer in text.
        let request = ChatRequest {
            messages: wire_messages(SYSTEM_PROMPT, self.messages.iter().chain(turn.iter())),
            tools: Vec::new(),
        };
        let ModelReply { content, .. } = self.model.complete(&request).await?;
        final_text(content)
    }
}

fn final_text(content: Option<String>) -> Result<String, ChatError> {
    content
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| ChatError::Malformed("model returned an empty reply".to_string()))
}
