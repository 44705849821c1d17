use clap::Parser;

use borsa_go_cli::commands::{run, Cli};
use borsa_go_cli::config::Config;
use borsa_go_cli::{build_state, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env();
    init_tracing(config.log_format);
    let state = build_state(&config).await?;
    tracing::debug!("Using database at {}", state.db_path);

    let mut stdout = std::io::stdout().lock();
    run(cli, &state, &config, &mut stdout).await
}
