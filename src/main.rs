use clap::Parser;

use opencode_usage::{config::Config, logging, report};

#[derive(Parser)]
#[command(name = "opencode-usage")]
#[command(about = "Show Claude and Codex usage limits for the accounts OpenCode is signed in to")]
#[command(version)]
#[command(long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("OPENCODE_USAGE_GIT_SHA"), ")"))]
struct Cli {}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let _cli = Cli::parse();
    logging::init();

    let config = Config::from_env();
    tracing::debug!("Auth store candidates: {:?}", config.auth_paths);

    // The exit status stays 0 whatever happens; failures are part of the report.
    let mut stdout = std::io::stdout();
    if let Err(e) = report::run(&config, &mut stdout).await {
        eprintln!("[opencode-usage] Failed to write report: {}", e);
    }
}
