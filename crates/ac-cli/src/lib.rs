// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use std::path::PathBuf;

use ac_console_core::AdminIdentity;
use ac_logging::CliLoggingArgs;
use ac_rest_client::RestClient;
use ac_rest_client::network_config::NetworkConfig;
use anyhow::{Context, Result};
use clap::Subcommand;
use url::Url;

pub use clap::Parser;

pub mod config;
pub mod profile;
pub mod settings;
pub mod users;

#[derive(clap::Parser, Debug)]
#[command(
    name = "admin-console",
    about = "Manage system settings, users and the admin profile",
    version,
    propagate_version = true
)]
pub struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Admin API base URL, e.g. https://example.com/api
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Bearer token of the signed-in admin
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Static API key sent as x-api-key
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Email of the signed-in admin, used when resetting the profile form
    #[arg(long, global = true)]
    pub admin_email: Option<String>,

    #[command(flatten)]
    pub logging: CliLoggingArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// System settings
    Settings {
        #[command(subcommand)]
        subcommand: settings::SettingsCommands,
    },
    /// Platform users
    Users {
        #[command(subcommand)]
        subcommand: users::UsersCommands,
    },
    /// The admin's own profile
    Profile {
        #[command(subcommand)]
        subcommand: profile::ProfileCommands,
    },
}

impl Cli {
    /// Configuration keys set by flags
    pub fn config_overrides(&self) -> Vec<config::Override> {
        vec![
            ("service-base-url", self.base_url.clone()),
            ("api-token", self.token.clone()),
            ("api-key", self.api_key.clone()),
            ("request-timeout-secs", self.timeout_secs.map(|s| s.to_string())),
        ]
    }

    pub fn admin_identity(&self) -> Option<AdminIdentity> {
        self.admin_email.clone().map(AdminIdentity::new)
    }
}

/// Build the REST client from the resolved network configuration
pub fn connect(network: &NetworkConfig) -> Result<RestClient> {
    let base_url = network.service_base_url.as_deref().context(
        "No service base URL configured. Pass --base-url, set ADMIN_CONSOLE_SERVICE_BASE_URL \
         or add service-base-url to the config file",
    )?;
    let base_url: Url = base_url
        .parse()
        .with_context(|| format!("Invalid service base URL: {}", base_url))?;
    Ok(RestClient::with_timeout(
        base_url,
        network.auth(),
        network.request_timeout(),
    )?)
}
