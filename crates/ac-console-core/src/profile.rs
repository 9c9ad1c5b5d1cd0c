// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Admin profile form and password change

use ac_api_contract::{ChangePasswordRequest, UpdateProfileRequest};
use ac_client_api::AdminApi;
use tracing::{info, warn};

use crate::error::ConsoleError;

/// The signed-in admin, as known from authentication
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminIdentity {
    pub email: String,
}

impl AdminIdentity {
    pub fn new(email: impl Into<String>) -> Self {
        Self { email: email.into() }
    }
}

/// Editable profile fields and the password change inputs
pub struct ProfileForm<A> {
    api: A,
    admin: Option<AdminIdentity>,
    name: String,
    email: String,
    current_password: String,
    new_password: String,
    confirm_password: String,
}

impl<A: AdminApi> ProfileForm<A> {
    /// Create a form prefilled with the signed-in admin's email
    pub fn new(api: A, admin: Option<AdminIdentity>) -> Self {
        let email = admin.as_ref().map(|a| a.email.clone()).unwrap_or_default();
        Self {
            api,
            admin,
            name: String::new(),
            email,
            current_password: String::new(),
            new_password: String::new(),
            confirm_password: String::new(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    pub fn set_current_password(&mut self, password: impl Into<String>) {
        self.current_password = password.into();
    }

    pub fn set_new_password(&mut self, password: impl Into<String>) {
        self.new_password = password.into();
    }

    pub fn set_confirm_password(&mut self, password: impl Into<String>) {
        self.confirm_password = password.into();
    }

    /// Whether any password input holds text
    pub fn has_password_input(&self) -> bool {
        !(self.current_password.is_empty()
            && self.new_password.is_empty()
            && self.confirm_password.is_empty())
    }

    /// Fill the fields from the stored profile
    ///
    /// Fields the backend leaves empty keep their current value.
    pub async fn load(&mut self) -> Result<(), ConsoleError> {
        let profile = self.api.get_profile().await.map_err(|e| {
            warn!(error = %e, "Failed to load profile");
            ConsoleError::LoadProfile(e)
        })?;
        if let Some(name) = profile.name.filter(|n| !n.is_empty()) {
            self.name = name;
        }
        if let Some(email) = profile.email.filter(|e| !e.is_empty()) {
            self.email = email;
        }
        Ok(())
    }

    /// Submit the name and email fields
    pub async fn save(&mut self) -> Result<(), ConsoleError> {
        let request = UpdateProfileRequest {
            name: self.name.clone(),
            email: self.email.clone(),
        };
        self.api.update_profile(&request).await.map_err(|e| {
            warn!(error = %e, "Failed to update profile");
            ConsoleError::SaveProfile(e)
        })?;
        info!("Profile updated");
        Ok(())
    }

    /// Clear the name and restore the signed-in admin's email
    pub fn reset(&mut self) {
        self.name.clear();
        self.email = self
            .admin
            .as_ref()
            .map(|a| a.email.clone())
            .unwrap_or_default();
    }

    /// Change the admin password
    ///
    /// Current and new password are required and the confirmation must
    /// match. The inputs are cleared only when the backend accepts the
    /// change.
    pub async fn change_password(&mut self) -> Result<(), ConsoleError> {
        if self.current_password.is_empty() || self.new_password.is_empty() {
            return Err(ConsoleError::MissingPasswordFields);
        }
        if self.new_password != self.confirm_password {
            return Err(ConsoleError::PasswordMismatch);
        }
        let request = ChangePasswordRequest {
            current_password: self.current_password.clone(),
            new_password: self.new_password.clone(),
        };
        self.api.change_password(&request).await.map_err(|e| {
            warn!(error = %e, "Failed to change password");
            ConsoleError::ChangePassword(e)
        })?;
        self.current_password.clear();
        self.new_password.clear();
        self.confirm_password.clear();
        info!("Password changed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ac_api_contract::AdminProfile;
    use ac_rest_mock_client::MockAdminClient;

    fn form(api: MockAdminClient) -> ProfileForm<MockAdminClient> {
        ProfileForm::new(api, Some(AdminIdentity::new("signed-in@example.com")))
    }

    #[test]
    fn test_new_prefills_identity_email() {
        let form = form(MockAdminClient::new());
        assert_eq!(form.name(), "");
        assert_eq!(form.email(), "signed-in@example.com");

        let anonymous = ProfileForm::new(MockAdminClient::new(), None);
        assert_eq!(anonymous.email(), "");
    }

    #[tokio::test]
    async fn test_load_fills_fields() {
        let mut form = form(MockAdminClient::with_mock_data());
        form.load().await.unwrap();
        assert_eq!(form.name(), "Root Admin");
        assert_eq!(form.email(), "root@example.com");
    }

    #[tokio::test]
    async fn test_load_keeps_fields_the_backend_leaves_empty() {
        let api = MockAdminClient::new().with_profile(AdminProfile {
            name: Some("Ops".to_string()),
            email: None,
        });
        let mut form = form(api);
        form.load().await.unwrap();
        assert_eq!(form.name(), "Ops");
        assert_eq!(form.email(), "signed-in@example.com");
    }

    #[tokio::test]
    async fn test_save_and_reset() {
        let mut form = form(MockAdminClient::with_mock_data());
        form.set_name("New Name");
        form.set_email("new@example.com");
        form.save().await.unwrap();
        assert_eq!(form.api().profile().name.as_deref(), Some("New Name"));

        form.reset();
        assert_eq!(form.name(), "");
        assert_eq!(form.email(), "signed-in@example.com");
    }

    #[tokio::test]
    async fn test_failed_save_reports_error() {
        let api = MockAdminClient::with_mock_data();
        api.set_failing(true);
        let mut form = form(api);
        form.set_name("Someone");
        let err = form.save().await.unwrap_err();
        assert!(err.to_string().starts_with("Failed to update profile"));
        assert_eq!(form.name(), "Someone");
    }

    #[tokio::test]
    async fn test_change_password_requires_fields() {
        let mut form = form(MockAdminClient::with_mock_data());
        form.set_new_password("next");
        form.set_confirm_password("next");
        assert_eq!(
            form.change_password().await,
            Err(ConsoleError::MissingPasswordFields)
        );
        assert!(form.api().calls().is_empty());
    }

    #[tokio::test]
    async fn test_change_password_requires_matching_confirmation() {
        let mut form = form(MockAdminClient::with_mock_data());
        form.set_current_password("hunter2");
        form.set_new_password("next");
        form.set_confirm_password("nxet");
        assert_eq!(
            form.change_password().await,
            Err(ConsoleError::PasswordMismatch)
        );
        assert_eq!(form.api().password(), "hunter2");
    }

    #[tokio::test]
    async fn test_change_password_clears_inputs_on_success() {
        let mut form = form(MockAdminClient::with_mock_data());
        form.set_current_password("hunter2");
        form.set_new_password("next");
        form.set_confirm_password("next");
        form.change_password().await.unwrap();

        assert_eq!(form.api().password(), "next");
        assert!(!form.has_password_input());
    }

    #[tokio::test]
    async fn test_rejected_password_change_keeps_inputs() {
        let mut form = form(MockAdminClient::with_mock_data());
        form.set_current_password("wrong");
        form.set_new_password("next");
        form.set_confirm_password("next");
        let err = form.change_password().await.unwrap_err();

        assert!(matches!(err, ConsoleError::ChangePassword(_)));
        assert!(form.has_password_input());
        assert_eq!(form.api().password(), "hunter2");
    }
}
