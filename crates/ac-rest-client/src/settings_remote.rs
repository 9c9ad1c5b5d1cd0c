// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Settings documents backed by a REST endpoint

use std::marker::PhantomData;

use ac_api_contract::{SectionedSettings, SettingsDocument};
use ac_client_api::{ClientApiResult, SettingsRemote};
use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::client::{RestClient, SYSTEM_SETTINGS_PATH};

/// [`SettingsRemote`] that reads with `GET path` and writes with `PUT path`
#[derive(Debug, Clone)]
pub struct RestSettingsRemote<D> {
    client: RestClient,
    path: String,
    _document: PhantomData<fn() -> D>,
}

impl<D> RestSettingsRemote<D> {
    pub fn new(client: RestClient, path: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
            _document: PhantomData,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl RestSettingsRemote<SectionedSettings> {
    /// The system settings endpoint
    pub fn system(client: RestClient) -> Self {
        Self::new(client, SYSTEM_SETTINGS_PATH)
    }
}

#[async_trait]
impl<D> SettingsRemote<D> for RestSettingsRemote<D>
where
    D: SettingsDocument + DeserializeOwned,
{
    async fn fetch(&self) -> ClientApiResult<D> {
        Ok(self.client.get_settings(&self.path).await?)
    }

    async fn store(&self, payload: &D::Payload) -> ClientApiResult<()> {
        Ok(self.client.put_settings(&self.path, payload).await?)
    }
}
