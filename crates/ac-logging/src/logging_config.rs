// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Logging configuration types

use serde::{Deserialize, Serialize};

use crate::{CliLogLevel, LogFormat};

/// Logging section of the configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Logging verbosity level
    #[serde(rename = "log-level", default, skip_serializing_if = "Option::is_none")]
    pub level: Option<CliLogLevel>,

    /// Log output format
    #[serde(rename = "log-format", default, skip_serializing_if = "Option::is_none")]
    pub format: Option<LogFormat>,
}
