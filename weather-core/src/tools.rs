//! Tools the model may call, and their dispatch.

use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::{ToolCall, WeatherProvider};

pub const WEATHER_TOOL_NAME: &str = "get_weather";

/// Declaration of the weather lookup in chat-completions `tools` form.
pub fn weather_tool() -> Value {
    json!({
        "type": "function",
        "function": {
            "name": WEATHER_TOOL_NAME,
            "description": "Get current weather information for a specified city",
            "parameters": {
                "type": "object",
                "properties": {
                    "city": {
                        "type": "string",
                        "description": "The city name (e.g., 'London', 'New York', 'Tokyo')"
                    }
                },
                "required": ["city"]
            }
        }
    })
}

/// Every tool offered to the model.
pub fn declarations() -> Vec<Value> {
    vec![weather_tool()]
}

#[derive(Debug, Deserialize)]
struct WeatherArgs {
    city: String,
}

/// Run one tool call. Failures become result text for the model to relay.
pub async fn execute(call: &ToolCall, weather: &dyn WeatherProvider) -> String {
    if call.name != WEATHER_TOOL_NAME {
        warn!(tool = %call.name, "Model requested an unknown tool");
        return format!("Unknown tool '{}'", call.name);
    }

    let raw = if call.arguments.trim().is_empty() { "{}" } else { call.arguments.as_str() };
    let args: WeatherArgs = match serde_json::from_str(raw) {
        Ok(args) => args,
        Err(e) => {
            warn!(arguments = %call.arguments, "Invalid tool arguments: {e}");
            return format!("Invalid arguments for {WEATHER_TOOL_NAME}: {e}");
        }
    };

    info!(city = %args.city, "Looking up weather");
    match weather.get_weather(&args.city).await {
        Ok(report) => report.to_tool_text(),
        Err(e) => {
            warn!(city = %args.city, "Weather lookup failed: {e}");
            e.tool_text()
        }
    }
}
