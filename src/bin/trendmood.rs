//! trendmood - sentiment of trending Mastodon hashtags
//!
//! Classifies recent posts of the currently trending tags with Gemini and
//! prints the per-tag distribution as JSON.

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use trendmood::config::{Config, Secrets};
use trendmood::providers::MastodonClient;

/// Trendmood CLI
#[derive(Parser)]
#[command(name = "trendmood")]
#[command(version = trendmood::PKG_VERSION)]
#[command(about = "Sentiment of trending social-media topics")]
struct Args {
    /// Config file (default: ~/.trendmood/config.toml, then /etc/trendmood/config.toml)
    #[arg(short, long, env = "TRENDMOOD_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyse the sentiment of trending hashtags
    Trends {
        /// Number of trending tags to analyse
        #[arg(short, long, default_value_t = 5)]
        groups: usize,
        /// Number of posts per tag
        #[arg(short, long, default_value_t = 10)]
        items: usize,
        /// Mastodon instance host (overrides config)
        #[arg(long)]
        instance: Option<String>,
    },

    /// Classify a single text
    Classify {
        /// Text to classify (or omit to read from stdin)
        text: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;
    let secrets = Secrets::load()?;

    let gemini_key = secrets
        .get("gemini")
        .ok_or("no Gemini API key (set GEMINI_API_KEY or add [gemini] to secrets.toml)")?;
    let pipeline = config.pipeline_builder().gemini(gemini_key).build()?;

    match args.command {
        Command::Trends {
            groups,
            items,
            instance,
        } => {
            let token = secrets
                .get("mastodon")
                .ok_or("no Mastodon token (set MASTODON_TOKEN or add [mastodon] to secrets.toml)")?;
            let instance = instance.unwrap_or_else(|| config.mastodon.instance.clone());
            let mastodon = MastodonClient::new(token, instance)?;

            let result = pipeline.analyze_trending(&mastodon, groups, items).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }

        Command::Classify { text } => {
            let text = resolve_text(text)?;
            let label = pipeline.classify_text(&text).await;
            println!("{label}");
        }
    }

    Ok(())
}

/// Resolve text input from an optional CLI argument or stdin.
///
/// The argument wins when both are present.
fn resolve_text(arg: Option<String>) -> Result<String, Box<dyn std::error::Error>> {
    if let Some(text) = arg {
        return Ok(text);
    }

    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Err("classify: no input provided (pass text as argument or via stdin)".into());
    }

    let mut buf = String::new();
    stdin.lock().read_to_string(&mut buf)?;
    let trimmed = buf.trim();
    if trimmed.is_empty() {
        return Err("classify: stdin was empty".into());
    }
    Ok(trimmed.to_string())
}
