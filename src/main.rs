// Entrypoint for the CLI application.
// - Loads `.env`, sets up logging on stderr, then hands off to `app::run`.
// - Returns `anyhow::Result` so any failure prints once and exits non-zero.

use clap::Parser;
use dotenvy::dotenv;
use pasteup::{app, cli::Cli};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("pasteup=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "pasteup=warn".into())
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();

    app::run(cli)
}
