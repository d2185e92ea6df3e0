use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, Text};
use weather_core::{Config, WeatherProvider, provider::provider_from_config};

use crate::web;

const DEFAULT_ADDR: &str = "127.0.0.1:8080";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-chat", version, about = "AI weather chatbot")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the chat page.
    Serve {
        /// Address to listen on.
        #[arg(long, default_value = DEFAULT_ADDR)]
        addr: String,
    },

    /// Chat in the terminal.
    Chat,

    /// Show current weather for a city without involving the model.
    Show {
        /// City name, e.g. "London".
        city: String,
    },

    /// Store API keys and model settings in the config file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Serve { addr } => {
                let config = Config::load_with_env()?;
                let conversation = weather_core::conversation_from_config(&config)?;
                web::serve(&addr, conversation).await
            }
            Command::Chat => chat_loop().await,
            Command::Show { city } => show(&city).await,
            Command::Configure => configure(),
        }
    }
}

async fn show(city: &str) -> anyhow::Result<()> {
    let config = Config::load_with_env()?;
    let provider = provider_from_config(&config)?;

    match provider.get_weather(city).await {
        Ok(report) => {
            println!("{}", report.to_tool_text());
            Ok(())
        }
        Err(e) => anyhow::bail!(e.tool_text()),
    }
}

enum Input {
    Quit,
    Clear,
    Message(String),
}

fn read_input() -> anyhow::Result<Input> {
    let line = match Text::new("You:").prompt() {
        Ok(line) => line,
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
            return Ok(Input::Quit);
        }
        Err(e) => return Err(e).context("Failed to read input"),
    };

    Ok(match line.trim() {
        "" | "/quit" | "/exit" => Input::Quit,
        "/clear" => Input::Clear,
        text => Input::Message(text.to_string()),
    })
}

async fn chat_loop() -> anyhow::Result<()> {
    let mut conversation = weather_core::conversation_from_config(&Config::load_with_env()?)?;

    println!("AI Weather Chatbot");
    println!("Ask me anything or request weather information.");
    println!("Try: \"What's the weather in Tokyo?\"  (/clear resets, empty line quits)\n");

    loop {
        let input = tokio::task::spawn_blocking(read_input)
            .await
            .context("Input task failed")??;

        match input {
            Input::Quit => break,
            Input::Clear => {
                conversation.clear();
                println!("Chat history cleared.\n");
            }
            Input::Message(text) => match conversation.send(&text).await {
                Ok(reply) => println!("Assistant: {reply}\n"),
                Err(e) => eprintln!("{}\n", e.user_message()),
            },
        }
    }

    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let groq = Password::new("Groq API key:")
        .without_confirmation()
        .with_help_message("Leave empty to keep the current value")
        .prompt()?;
    if !groq.trim().is_empty() {
        config.groq_api_key = Some(groq.trim().to_string());
    }

    let openweather = Password::new("OpenWeatherMap API key:")
        .without_confirmation()
        .with_help_message("Leave empty to keep the current value")
        .prompt()?;
    if !openweather.trim().is_empty() {
        config.openweather_api_key = Some(openweather.trim().to_string());
    }

    let current_model = config.model().to_string();
    let model = Text::new("Model:").with_default(&current_model).prompt()?;
    config.model = Some(model.trim().to_string()).filter(|m| !m.is_empty());

    config.save()?;
    println!("Configuration saved to {}", Config::config_file_path()?.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_defaults_to_localhost() {
        let cli = Cli::try_parse_from(["weather-chat", "serve"]).unwrap();
        match cli.command {
            Command::Serve { addr } => assert_eq!(addr, "127.0.0.1:8080"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn show_takes_a_city() {
        let cli = Cli::try_parse_from(["weather-chat", "show", "New York"]).unwrap();
        match cli.command {
            Command::Show { city } => assert_eq!(city, "New York"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["weather-chat"]).is_err());
    }
}
