mod check_commands;
mod dispatch_commands;
mod run_commands;

use std::path::PathBuf;

use {
    clap::{Parser, Subcommand},
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "metamapa", about = "MetaMapa — Telegram bot for the MetaMapa services")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Config file (overrides discovery in ./ and ~/.config/metamapa/).
    #[arg(long, global = true, env = "METAMAPA_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the Telegram bot (default when no subcommand is provided).
    Run,
    /// Validate the configuration and print a report.
    Check,
    /// Run one message through the command dispatcher and print the replies.
    Dispatch {
        /// Message text, e.g. "/hecho 12".
        #[arg(short, long)]
        text: String,
        /// Conversation ID stamped on the replies.
        #[arg(long, default_value = "local")]
        conversation: String,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "metamapa starting");

    let loaded = metamapa_config::load_or_discover(cli.config.as_deref())?;

    match cli.command {
        None | Some(Commands::Run) => run_commands::handle_run(loaded).await,
        Some(Commands::Check) => check_commands::handle_check(&loaded),
        Some(Commands::Dispatch { text, conversation }) => {
            dispatch_commands::handle_dispatch(&loaded.config, &conversation, &text).await
        },
    }
}
