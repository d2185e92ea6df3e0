use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Normalized current conditions for one city. Temperatures are Celsius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub city: String,
    pub country: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub description: String,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub observation_time: DateTime<Utc>,
}

impl WeatherReport {
    /// Multi-line summary fed back to the model as the tool result.
    pub fn to_tool_text(&self) -> String {
        let location = if self.country.is_empty() {
            self.city.clone()
        } else {
            format!("{}, {}", self.city, self.country)
        };

        format!(
            "Weather in {location}:\n\
             - Temperature: {}°C (feels like {}°C)\n\
             - Conditions: {}\n\
             - Humidity: {}%\n\
             - Wind Speed: {} m/s",
            self.temperature_c,
            self.feels_like_c,
            capitalize(&self.description),
            self.humidity_pct,
            self.wind_speed_mps,
        )
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    /// Raw JSON object, exactly as the model produced it.
    pub arguments: String,
}

/// One transcript entry.
///
/// Tool entries carry the call they answer, so a single entry stands for the
/// whole request/result exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call: Option<ToolCall>,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into(), tool_call: None }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into(), tool_call: None }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into(), tool_call: None }
    }

    pub fn tool(call: ToolCall, result: impl Into<String>) -> Self {
        Self { role: Role::Tool, content: result.into(), tool_call: Some(call) }
    }

    /// Whether the UI should render this entry.
    pub fn is_visible(&self) -> bool {
        matches!(self.role, Role::User | Role::Assistant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokyo() -> WeatherReport {
        WeatherReport {
            city: "Tokyo".into(),
            country: "JP".into(),
            temperature_c: 18.5,
            feels_like_c: 17.9,
            description: "light rain".into(),
            humidity_pct: 82,
            wind_speed_mps: 3.6,
            observation_time: Utc::now(),
        }
    }

    #[test]
    fn tool_text_lists_all_fields() {
        let text = tokyo().to_tool_text();

        assert!(text.starts_with("Weather in Tokyo, JP:"));
        assert!(text.contains("- Temperature: 18.5°C (feels like 17.9°C)"));
        assert!(text.contains("- Conditions: Light rain"));
        assert!(text.contains("- Humidity: 82%"));
        assert!(text.contains("- Wind Speed: 3.6 m/s"));
    }

    #[test]
    fn tool_text_without_country() {
        let mut report = tokyo();
        report.country.clear();
        assert!(report.to_tool_text().starts_with("Weather in Tokyo:"));
    }

    #[test]
    fn only_user_and_assistant_are_visible() {
        let call = ToolCall { id: "c1".into(), name: "get_weather".into(), arguments: "{}".into() };

        assert!(Message::user("hi").is_visible());
        assert!(Message::assistant("hello").is_visible());
        assert!(!Message::system("rules").is_visible());
        assert!(!Message::tool(call, "sunny").is_visible());
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&Role::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
    }
}
