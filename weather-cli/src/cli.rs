use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use wunderweather_core::{Config, WeatherService};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather forecasts from wunderground.com")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the wunderground API key and defaults.
    Configure {
        /// Country appended to locations the provider does not recognize.
        #[arg(long)]
        country: Option<String>,

        /// Response language code, e.g. "EN" or "SK".
        #[arg(long)]
        lang: Option<String>,
    },

    /// Show the forecast for a location, e.g. `weather show Bratislava - 20.12.2014`.
    Show {
        /// Location, optionally followed by `- DD.MM.YYYY`.
        #[arg(required = true, num_args = 1..)]
        args: Vec<String>,

        /// Override the configured fallback country for this call.
        #[arg(long)]
        country: Option<String>,

        /// Override the configured response language for this call.
        #[arg(long)]
        lang: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { country, lang } => configure(country, lang),
            Command::Show { args, country, lang } => show(args, country, lang).await,
        }
    }
}

fn configure(country: Option<String>, lang: Option<String>) -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("wunderground API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(api_key.trim().to_string());

    if let Some(country) = country {
        config.country = country;
    }
    if let Some(lang) = lang {
        config.lang = lang;
    }

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

async fn show(
    args: Vec<String>,
    country: Option<String>,
    lang: Option<String>,
) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    if let Some(country) = country {
        config.country = country;
    }
    if let Some(lang) = lang {
        config.lang = lang;
    }

    let service = WeatherService::from_config(&config)?;
    let today = Local::now().date_naive();

    if let Some(reply) = service.answer(&args.join(" "), today).await {
        println!("{reply}");
    }

    Ok(())
}
