// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! REST API client for the admin console backend
//!
//! This crate provides the HTTP client for the admin endpoints (system
//! settings, users, profile). Every response goes through the envelope
//! normalization in `ac-api-contract`, so bare and `{ "data": ... }`
//! payloads decode identically. It implements the `AdminApi` and
//! `SettingsRemote` traits so the view-state components never depend on
//! reqwest directly.

pub mod auth;
pub mod client;
pub mod error;
pub mod network_config;
pub mod settings_remote;

pub use auth::*;
pub use client::*;
pub use error::*;
pub use settings_remote::*;

use ac_api_contract::*;
use ac_client_api::{AdminApi, ClientApiResult};
use async_trait::async_trait;

#[async_trait]
impl AdminApi for client::RestClient {
    async fn list_users(&self, page: u32) -> ClientApiResult<UserPage> {
        Ok(self.list_users(page).await?)
    }

    async fn update_user_status(&self, user_id: &str, status: UserStatus) -> ClientApiResult<()> {
        Ok(self.update_user_status(user_id, status).await?)
    }

    async fn add_user_balance(
        &self,
        user_id: &str,
        request: &AddBalanceRequest,
    ) -> ClientApiResult<()> {
        Ok(self.add_user_balance(user_id, request).await?)
    }

    async fn get_profile(&self) -> ClientApiResult<AdminProfile> {
        Ok(self.get_profile().await?)
    }

    async fn update_profile(&self, request: &UpdateProfileRequest) -> ClientApiResult<()> {
        Ok(self.update_profile(request).await?)
    }

    async fn change_password(&self, request: &ChangePasswordRequest) -> ClientApiResult<()> {
        Ok(self.change_password(request).await?)
    }
}
