// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Network configuration types

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::auth::AuthConfig;

/// Network configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Admin API base URL
    #[serde(rename = "service-base-url")]
    pub service_base_url: Option<String>,

    /// Bearer token of the signed-in admin
    #[serde(rename = "api-token")]
    pub api_token: Option<String>,

    /// Static API key
    #[serde(rename = "api-key")]
    pub api_key: Option<String>,

    /// Per-request timeout; the transport default applies when unset
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: Option<u64>,
}

impl NetworkConfig {
    pub fn auth(&self) -> AuthConfig {
        AuthConfig {
            bearer_token: self.api_token.clone(),
            api_key: self.api_key.clone(),
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
