use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use brief::summarizer::SummaryLength;
use brief::{Config, Pipeline};

/// Get the config directory path (~/.config/brief/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("brief"))
}

#[derive(Parser, Debug)]
#[command(
    name = "brief",
    about = "Feed reader that summarizes articles via a text-generation backend"
)]
struct Args {
    /// Config file path (defaults to ~/.config/brief/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print results as JSON instead of text
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch a feed and list its articles, newest first
    Feed {
        /// Feed URL (https:// is assumed when the scheme is missing)
        url: String,
    },
    /// Fetch an article and print an AI-generated summary
    Summarize {
        /// Article URL
        url: String,
        /// Desired summary length
        #[arg(long, value_enum, default_value_t = SummaryLength::Medium)]
        length: SummaryLength,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing for debug logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => get_config_dir()?.join("config.toml"),
    };
    let config = Config::load(&config_path).context("Failed to load configuration")?;

    let pipeline = Pipeline::new(&config).context("Failed to build pipeline")?;

    match args.command {
        Command::Feed { url } => {
            let items = pipeline.load_feed(&url).await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else if items.is_empty() {
                println!("No articles found. The feed may be empty or malformed.");
            } else {
                for item in &items {
                    if item.published_at.is_empty() {
                        println!("{}", item.title);
                    } else {
                        println!("{}  ({})", item.title, item.published_at);
                    }
                    println!("    {}", item.link);
                }
            }
        }
        Command::Summarize { url, length } => {
            let result = pipeline.summarize(&url, length).await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", result.summary);
            }
        }
    }

    Ok(())
}
