// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Root configuration struct and loading for the admin console CLI
//!
//! Layers, lowest precedence first:
//!
//! 1. TOML file: `--config <path>` (must exist) or the user config file
//!    `<config dir>/admin-console/config.toml` (optional)
//! 2. `ADMIN_CONSOLE_*` environment variables, e.g.
//!    `ADMIN_CONSOLE_SERVICE_BASE_URL` for `service-base-url`
//! 3. Command-line flags

use std::path::{Path, PathBuf};

use ac_logging::logging_config::LoggingConfig;
use ac_rest_client::network_config::NetworkConfig;
use anyhow::Result;
use config::{Environment, File, FileFormat};

/// Prefix of the environment variables read into the configuration
pub const ENV_PREFIX: &str = "ADMIN_CONSOLE";

/// Root configuration composed of the subsystem configurations
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub network: NetworkConfig,
    pub logging: LoggingConfig,
}

/// A configuration key set from the command line, `None` when the flag was
/// not given
pub type Override = (&'static str, Option<String>);

/// Path of the per-user configuration file
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("admin-console").join("config.toml"))
}

/// Load and merge configuration from the file, the environment and flags
pub fn load_config(cli_config: Option<&Path>, overrides: &[Override]) -> Result<Config> {
    let (path, required) = match cli_config {
        Some(path) => (Some(path.to_path_buf()), true),
        None => (user_config_path(), false),
    };
    load_config_from(path.as_deref(), required, None, overrides)
}

/// Load configuration from explicit sources
///
/// `env` replaces the process environment when given.
pub fn load_config_from(
    path: Option<&Path>,
    required: bool,
    env: Option<config::Map<String, String>>,
    overrides: &[Override],
) -> Result<Config> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        tracing::debug!(path = %path.display(), required, "Reading configuration file");
        builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(required));
    }
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .convert_case(config::Case::Kebab)
            .source(env),
    );
    for (key, value) in overrides {
        builder = builder.set_override_option(*key, value.clone())?;
    }

    let built = builder.build()?;
    Ok(Config {
        network: built.clone().try_deserialize()?,
        logging: built.try_deserialize()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ac_logging::{CliLogLevel, LogFormat};
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> config::Map<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_layers_override_in_order() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
service-base-url = "https://file.example.com/api"
api-token = "from-file"
log-level = "debug"
log-format = "json"
"#
        )
        .unwrap();

        let config = load_config_from(
            Some(file.path()),
            true,
            Some(env(&[
                ("ADMIN_CONSOLE_API_TOKEN", "from-env"),
                ("ADMIN_CONSOLE_REQUEST_TIMEOUT_SECS", "15"),
                ("ADMIN_CONSOLE_SERVICE_BASE_URL", "https://env.example.com/api"),
            ])),
            &[
                ("service-base-url", Some("https://flag.example.com/api".to_string())),
                ("api-key", None),
            ],
        )
        .unwrap();

        assert_eq!(
            config.network.service_base_url.as_deref(),
            Some("https://flag.example.com/api")
        );
        assert_eq!(config.network.api_token.as_deref(), Some("from-env"));
        assert_eq!(config.network.api_key, None);
        assert_eq!(config.network.request_timeout_secs, Some(15));
        assert_eq!(config.logging.level, Some(CliLogLevel::Debug));
        assert_eq!(config.logging.format, Some(LogFormat::Json));
    }

    #[test]
    fn test_missing_optional_file_is_empty_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(
            Some(&dir.path().join("absent.toml")),
            false,
            Some(config::Map::new()),
            &[],
        )
        .unwrap();
        assert_eq!(config.network.service_base_url, None);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config_from(
            Some(&dir.path().join("absent.toml")),
            true,
            Some(config::Map::new()),
            &[],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_log_level_is_rejected() {
        let result = load_config_from(
            None,
            false,
            Some(env(&[("ADMIN_CONSOLE_LOG_LEVEL", "chatty")])),
            &[],
        );
        assert!(result.is_err());
    }
}
