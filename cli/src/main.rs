use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use sparkmail_core::SessionConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod util;

use commands::classify::ClassifyArgs;

#[derive(Parser)]
#[command(name = "sparkmail", version, about = "SparkMail CLI: classify emails as productive or unproductive")]
struct Cli {
    /// Classification API base URL
    #[arg(long, env = "SPARKMAIL_API_URL", default_value = sparkmail_core::config::DEFAULT_API_URL)]
    api_url: String,

    /// Minimum number of non-blank characters an email text must have
    #[arg(long, env = "SPARKMAIL_MIN_TEXT_LEN", default_value_t = sparkmail_core::submission::DEFAULT_MIN_TEXT_LEN)]
    min_text_len: usize,

    /// Request timeout in seconds
    #[arg(long, env = "SPARKMAIL_TIMEOUT_SECS", default_value_t = sparkmail_core::config::DEFAULT_REQUEST_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Keep at most this many history entries (unbounded if omitted)
    #[arg(long, env = "SPARKMAIL_HISTORY_CAP")]
    history_cap: Option<usize>,

    /// Seed the session history with the sample entries
    #[arg(long, env = "SPARKMAIL_DEMO_HISTORY")]
    demo_history: bool,

    /// Seed the session history from a JSON file
    #[arg(long, conflicts_with = "demo_history")]
    history_seed: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check API health
    Health,
    /// Classify a single email (text or file)
    Classify(ClassifyArgs),
    /// Interactive classification session
    Shell,
    /// Show the history a new session starts with
    DemoHistory,
}

impl Cli {
    fn session_config(&self) -> SessionConfig {
        SessionConfig {
            api_url: self.api_url.clone(),
            min_text_len: self.min_text_len,
            request_timeout: Duration::from_secs(self.timeout_secs),
            history_cap: self.history_cap,
            history_seed: util::history_seed(self.demo_history, self.history_seed.as_deref()),
        }
    }
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sparkmail_cli=warn,sparkmail_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = cli.session_config();

    let code = match cli.command {
        Commands::Health => commands::health::run(&config).await,
        Commands::Classify(args) => commands::classify::run(&config, args).await,
        Commands::Shell => commands::shell::run(&config).await,
        Commands::DemoHistory => commands::history::run(&config),
    };
    std::process::exit(code);
}
