use anyhow::Context;
use clap::Parser;
use reddit_watcher::{Dispatcher, MandrillNotifier, RedditSource, WatchConfig, Watcher};
use std::path::PathBuf;
use tracing::info;

/// Polls subreddit listings and emails alerts for new matching posts.
#[derive(Debug, Parser)]
#[command(name = "reddit-watcher")]
struct Args {
    /// Path to the configuration file.
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Overrides the mail API key from the configuration file.
    #[arg(short, long)]
    key: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let raw = std::fs::read_to_string(&args.config)
        .with_context(|| format!("reading {}", args.config.display()))?;
    let mut config: WatchConfig = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {}", args.config.display()))?;

    if let Some(key) = args.key {
        config.mandrill_key = key;
    }
    if config.mandrill_key.is_empty() {
        anyhow::bail!("no mail API key configured; set mandrillKey in the config or pass --key");
    }

    info!(
        "launching reddit-watcher with {} configured watchers",
        config.watchers.len()
    );

    let watchers: Vec<Watcher> = config
        .watchers
        .iter()
        .cloned()
        .map(|entry| Watcher::from_config(entry, config.default_email_template.as_ref()))
        .collect();

    let source = RedditSource::new()?;
    let notifier = MandrillNotifier::new(config.mandrill_key.clone())?;

    let dispatcher = Dispatcher::new(watchers, source, notifier);
    dispatcher.start().await;
    info!("dispatcher engaged; press Ctrl-C to stop");

    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    Ok(())
}
