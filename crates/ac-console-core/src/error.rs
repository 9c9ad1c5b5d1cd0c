// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Component error types
//!
//! The `Display` text of each variant is the message shown to the admin.
//! Every variant is recoverable.

use ac_client_api::ClientApiError;
use thiserror::Error;

/// Errors returned by [`crate::SettingsSync`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error("Failed to load system settings: {0}")]
    Load(ClientApiError),

    #[error("Failed to update system settings: {0}")]
    Save(ClientApiError),

    #[error("Settings have not been loaded yet")]
    NotLoaded,

    /// A newer load or a reset started while this load was in flight; its
    /// response was discarded.
    #[error("Settings request was superseded by a newer one")]
    Superseded,
}

/// Errors returned by the user directory and the profile form
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsoleError {
    #[error("Failed to fetch users: {0}")]
    FetchUsers(ClientApiError),

    #[error("Failed to update user status: {0}")]
    UpdateStatus(ClientApiError),

    #[error("Failed to add amount: {0}")]
    AddBalance(ClientApiError),

    #[error("Please enter a valid amount greater than 0")]
    InvalidAmount,

    #[error("User {0} is not on the current page")]
    UnknownUser(String),

    #[error("Failed to load profile: {0}")]
    LoadProfile(ClientApiError),

    #[error("Failed to update profile: {0}")]
    SaveProfile(ClientApiError),

    #[error("Please fill all password fields")]
    MissingPasswordFields,

    #[error("New password and confirmation don't match")]
    PasswordMismatch,

    #[error("Failed to change password: {0}")]
    ChangePassword(ClientApiError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_messages() {
        let outage = ClientApiError::Transport("connection refused".to_string());
        assert!(SyncError::Load(outage.clone())
            .to_string()
            .starts_with("Failed to load system settings: "));
        assert!(SyncError::Save(outage)
            .to_string()
            .starts_with("Failed to update system settings: "));
    }
}
