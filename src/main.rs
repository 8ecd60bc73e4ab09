use anyhow::Context;
use clap::Parser;
use tower_lsp::{LspService, Server};
use tracing::info;

use jq_language_server::logging;
use jq_language_server::lsp::JqBackend;

/// Language server for the jq query language.
#[derive(Debug, Parser)]
#[command(name = "jq-language-server", version, about)]
struct Cli {
    /// Communicate over stdio (the default and only transport)
    #[arg(long)]
    stdio: bool,

    /// Override the log level (otherwise RUST_LOG or "info")
    #[arg(long)]
    log_level: Option<String>,

    /// Disable ANSI colors in stderr output
    #[arg(long)]
    no_color: bool,

    /// Disable the session log file in the user cache directory
    #[arg(long)]
    no_file_log: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _guard = logging::init_logger(cli.no_color, cli.log_level.as_deref(), !cli.no_file_log)
        .context("failed to initialize logging")?;

    // stdio is the only transport; the flag exists for client launch configs
    // that pass it unconditionally
    let _ = cli.stdio;

    info!(
        "Starting {} {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(JqBackend::new);

    Server::new(stdin, stdout, socket).serve(service).await;

    info!("Server stopped");
    Ok(())
}
