use thiserror::Error;

/// Failure of a single weather lookup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeatherError {
    #[error("no city given")]
    MissingCity,

    #[error("city '{city}' not found")]
    NotFound { city: String },

    #[error("weather provider rejected the API key")]
    Auth,

    #[error("failed to reach weather provider: {0}")]
    Network(String),

    #[error("weather provider returned status {status}: {body}")]
    Http { status: u16, body: String },

    #[error("failed to parse weather provider response: {0}")]
    Malformed(String),
}

impl WeatherError {
    pub fn from_status(status: u16, body: &str, city: &str) -> Self {
        match status {
            404 => WeatherError::NotFound { city: city.to_string() },
            401 | 403 => WeatherError::Auth,
            _ => WeatherError::Http { status, body: truncate_body(body) },
        }
    }

    /// Text handed back to the model (and shown by `show`) in place of a report.
    pub fn tool_text(&self) -> String {
        match self {
            WeatherError::MissingCity => {
                "No city was given. Please name the city to look up.".to_string()
            }
            WeatherError::NotFound { city } => {
                format!("City '{city}' not found. Please check the spelling.")
            }
            WeatherError::Auth => {
                "Weather lookup failed: the OpenWeatherMap API key was rejected.".to_string()
            }
            WeatherError::Network(msg) => format!("Error fetching weather data: {msg}"),
            WeatherError::Http { status, .. } => format!("HTTP error occurred: status {status}"),
            WeatherError::Malformed(msg) => format!("Error reading weather data: {msg}"),
        }
    }
}

/// Failure of a conversation turn. Everything here is recoverable: the session
/// stays usable and accepts the next message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChatError {
    #[error("message is empty")]
    EmptyMessage,

    #[error("model API rejected the API key")]
    Auth,

    #[error("model API rate limit reached")]
    RateLimited,

    #[error("failed to reach model API: {0}")]
    Network(String),

    #[error("model API returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("malformed model response: {0}")]
    Malformed(String),
}

impl ChatError {
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            401 | 403 => ChatError::Auth,
            429 => ChatError::RateLimited,
            _ => ChatError::Api { status, body: truncate_body(body) },
        }
    }

    pub fn network(err: &reqwest::Error) -> Self {
        ChatError::Network(err.to_string())
    }

    /// User-facing summary for the UI.
    pub fn user_message(&self) -> String {
        match self {
            ChatError::EmptyMessage => "Please type a message first.".to_string(),
            ChatError::Auth => {
                "Model API authentication failed. Check GROQ_API_KEY.".to_string()
            }
            ChatError::RateLimited => {
                "The model API is rate limiting requests. Try again in a moment.".to_string()
            }
            other => format!("Error communicating with Groq API: {other}"),
        }
    }
}

/// Cut an error body down for logs and messages, respecting char boundaries.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weather_status_classification() {
        assert_eq!(
            WeatherError::from_status(404, "{}", "Atlantis"),
            WeatherError::NotFound { city: "Atlantis".into() }
        );
        assert_eq!(WeatherError::from_status(401, "", "Paris"), WeatherError::Auth);
        assert!(matches!(
            WeatherError::from_status(500, "boom", "Paris"),
            WeatherError::Http { status: 500, .. }
        ));
    }

    #[test]
    fn not_found_tool_text_names_city() {
        let err = WeatherError::NotFound { city: "Atlantis".into() };
        assert_eq!(err.tool_text(), "City 'Atlantis' not found. Please check the spelling.");
    }

    #[test]
    fn missing_city_has_its_own_text() {
        let text = WeatherError::MissingCity.tool_text();
        assert_eq!(text, "No city was given. Please name the city to look up.");
        assert!(!text.contains("''"));
    }

    #[test]
    fn chat_status_classification() {
        assert_eq!(ChatError::from_status(401, ""), ChatError::Auth);
        assert_eq!(ChatError::from_status(403, ""), ChatError::Auth);
        assert_eq!(ChatError::from_status(429, ""), ChatError::RateLimited);
        assert!(matches!(ChatError::from_status(503, "down"), ChatError::Api { status: 503, .. }));
    }

    #[test]
    fn user_message_mentions_provider_for_generic_errors() {
        let msg = ChatError::Malformed("no choices".into()).user_message();
        assert!(msg.starts_with("Error communicating with Groq API"));
        assert!(msg.contains("no choices"));
    }

    #[test]
    fn truncate_body_keeps_char_boundaries() {
        let body = "é".repeat(150);
        let out = truncate_body(&body);
        assert!(out.ends_with("..."));
        assert!(out.len() <= 203);

        assert_eq!(truncate_body("short"), "short");
    }
}
