// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use ac_cli::config::load_config;
use ac_cli::{Cli, Commands, Parser, connect};
use ac_logging::{CliLogLevel, redact};
use ac_rest_client::RestSettingsRemote;
use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), &cli.config_overrides())?;

    cli.logging
        .clone()
        .merge_config(&config.logging)
        .init("admin-console", CliLogLevel::Warn)?;
    tracing::debug!(
        base_url = ?config.network.service_base_url,
        api_token = config.network.api_token.as_ref().map(redact),
        "Configuration loaded"
    );

    let client = connect(&config.network)?;
    let admin = cli.admin_identity();
    let mut stdout = std::io::stdout();

    match cli.command {
        Commands::Settings { subcommand } => {
            subcommand.run(RestSettingsRemote::system(client), &mut stdout).await
        }
        Commands::Users { subcommand } => subcommand.run(client, &mut stdout).await,
        Commands::Profile { subcommand } => subcommand.run(client, admin, &mut stdout).await,
    }
}
