// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Client API traits for the admin console
//!
//! The view-state components only ever talk to these traits. The REST
//! client implements them against the real backend; the mock client
//! implements them in memory for tests and offline demos.

use ac_api_contract::{
    AddBalanceRequest, AdminProfile, ChangePasswordRequest, SettingsDocument,
    UpdateProfileRequest, UserPage, UserStatus,
};
use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced through the client API
///
/// Every variant is recoverable: the caller reports it and the user may
/// retry the action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientApiError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Server returned {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Invalid request: {0}")]
    Validation(String),
}

pub type ClientApiResult<T> = Result<T, ClientApiError>;

/// Remote authority for one settings document
///
/// `fetch` returns the authoritative document; `store` submits the
/// document's payload projection.
#[async_trait]
pub trait SettingsRemote<D: SettingsDocument>: Send + Sync {
    async fn fetch(&self) -> ClientApiResult<D>;

    async fn store(&self, payload: &D::Payload) -> ClientApiResult<()>;
}

/// Admin endpoints used by the user directory and the profile form
#[async_trait]
pub trait AdminApi: Send + Sync {
    async fn list_users(&self, page: u32) -> ClientApiResult<UserPage>;

    async fn update_user_status(&self, user_id: &str, status: UserStatus) -> ClientApiResult<()>;

    async fn add_user_balance(
        &self,
        user_id: &str,
        request: &AddBalanceRequest,
    ) -> ClientApiResult<()>;

    async fn get_profile(&self) -> ClientApiResult<AdminProfile>;

    async fn update_profile(&self, request: &UpdateProfileRequest) -> ClientApiResult<()>;

    async fn change_password(&self, request: &ChangePasswordRequest) -> ClientApiResult<()>;
}

#[async_trait]
impl<D, R> SettingsRemote<D> for std::sync::Arc<R>
where
    D: SettingsDocument,
    R: SettingsRemote<D> + ?Sized,
{
    async fn fetch(&self) -> ClientApiResult<D> {
        (**self).fetch().await
    }

    async fn store(&self, payload: &D::Payload) -> ClientApiResult<()> {
        (**self).store(payload).await
    }
}

#[async_trait]
impl<A: AdminApi + ?Sized> AdminApi for std::sync::Arc<A> {
    async fn list_users(&self, page: u32) -> ClientApiResult<UserPage> {
        (**self).list_users(page).await
    }

    async fn update_user_status(&self, user_id: &str, status: UserStatus) -> ClientApiResult<()> {
        (**self).update_user_status(user_id, status).await
    }

    async fn add_user_balance(
        &self,
        user_id: &str,
        request: &AddBalanceRequest,
    ) -> ClientApiResult<()> {
        (**self).add_user_balance(user_id, request).await
    }

    async fn get_profile(&self) -> ClientApiResult<AdminProfile> {
        (**self).get_profile().await
    }

    async fn update_profile(&self, request: &UpdateProfileRequest) -> ClientApiResult<()> {
        (**self).update_profile(request).await
    }

    async fn change_password(&self, request: &ChangePasswordRequest) -> ClientApiResult<()> {
        (**self).change_password(request).await
    }
}
