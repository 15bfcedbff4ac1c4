//! dynamap CLI entry point.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dynamap::ClientHandle;
use dynamap_client::cli::Cli;
use dynamap_client::output::render;
use dynamap_client::{execute, load_registry};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so JSON output stays pipeable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dynamap=info,dynamap_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let registry = load_registry(&cli.schema)?;

    let handle = ClientHandle::new();
    handle.initialize(&cli.config()).await;

    let (format, quiet) = (cli.format, cli.quiet);
    let report = execute(cli.command, &handle, &registry).await?;
    if let Some(output) = render(&report, format, quiet) {
        println!("{output}");
    }

    Ok(())
}
