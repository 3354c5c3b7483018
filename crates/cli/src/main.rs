//! SSAssist CLI
//!
//! Terminal front end for the SSAssist benefits assistant: an
//! interactive chat loop over the same client pipeline the widget uses.

mod config;
mod logging;
mod repl;

use std::path::PathBuf;

use clap::Parser;
use ssassist_client::{ChatClient, HttpTransport};
use tracing::info;

use crate::repl::Repl;

#[derive(Parser, Debug)]
#[command(name = "ssassist", about = "Chat with the SSAssist benefits assistant")]
struct Cli {
    /// Base URL of the assistant backend (overrides config.toml)
    #[arg(long)]
    base_url: Option<String>,

    /// Data directory (config, logs, transcripts)
    #[arg(long, env = "SSASSIST_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log format: json or pretty
    #[arg(long)]
    log_format: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let data_dir = config::resolve_data_dir(cli.data_dir.as_deref())?;
    config::ensure_dirs(&data_dir)?;
    let _logging = logging::init_logging(&config::log_dir(&data_dir), cli.log_format.as_deref())?;

    let settings = config::Config::load(&data_dir)?;
    let base_url = cli.base_url.unwrap_or(settings.base_url);
    info!(component = "cli", base_url = %base_url, "starting chat");

    let client = ChatClient::new(HttpTransport::new(&base_url));
    let mut repl = Repl::new(client, config::transcripts_dir(&data_dir));
    repl.run().await
}
