// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Main REST API client implementation

use std::time::Duration;

use ac_api_contract::validation::{validate_add_balance_request, validate_change_password_request};
use ac_api_contract::*;
use reqwest::{Client as HttpClient, Method, Response};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};
use url::Url;

use crate::auth::AuthConfig;
use crate::error::{RestClientError, RestClientResult};

/// Endpoint serving the sectioned system settings document
pub const SYSTEM_SETTINGS_PATH: &str = "admin/settings/system";
const PROFILE_PATH: &str = "admin/settings/profile";
const PASSWORD_PATH: &str = "admin/settings/password";
const USERS_PATH: &str = "admin/users";

/// REST API client for the admin backend
#[derive(Debug, Clone)]
pub struct RestClient {
    http_client: HttpClient,
    base_url: Url,
    auth: AuthConfig,
}

impl RestClient {
    /// Create a new REST client
    pub fn new(base_url: Url, auth: AuthConfig) -> RestClientResult<Self> {
        Self::with_timeout(base_url, auth, None)
    }

    /// Create a client with a per-request timeout
    pub fn with_timeout(
        mut base_url: Url,
        auth: AuthConfig,
        timeout: Option<Duration>,
    ) -> RestClientResult<Self> {
        if base_url.cannot_be_a_base() {
            return Err(RestClientError::InvalidBaseUrl(base_url.to_string()));
        }
        // Endpoint paths are relative; keep the base path when joining
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut builder = HttpClient::builder().user_agent("admin-console/1.0");
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http_client: builder.build()?,
            base_url,
            auth,
        })
    }

    /// Create a client from a base URL string
    pub fn from_url(base_url: &str, auth: AuthConfig) -> RestClientResult<Self> {
        let base_url = Url::parse(base_url)?;
        Self::new(base_url, auth)
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Get the authentication config
    pub fn auth(&self) -> &AuthConfig {
        &self.auth
    }

    /// Fetch a settings document of any shape from `path`
    pub async fn get_settings<D: DeserializeOwned>(&self, path: &str) -> RestClientResult<D> {
        let url = self.endpoint(path, &[])?;
        self.request_json(Method::GET, url, None::<&()>).await
    }

    /// Submit a settings payload to `path`
    pub async fn put_settings<P: Serialize>(&self, path: &str, payload: &P) -> RestClientResult<()> {
        let url = self.endpoint(path, &[])?;
        self.request_unit(Method::PUT, url, Some(payload)).await
    }

    /// Get the sectioned system settings
    pub async fn get_system_settings(&self) -> RestClientResult<SectionedSettings> {
        self.get_settings(SYSTEM_SETTINGS_PATH).await
    }

    /// Replace the system settings with a flattened key/value payload
    pub async fn update_system_settings(&self, payload: &FlatSettings) -> RestClientResult<()> {
        self.put_settings(SYSTEM_SETTINGS_PATH, payload).await
    }

    /// List one page of users
    pub async fn list_users(&self, page: u32) -> RestClientResult<UserPage> {
        let mut url = self.endpoint(USERS_PATH, &[])?;
        url.query_pairs_mut().append_pair("page", &page.to_string());
        self.request_json(Method::GET, url, None::<&()>).await
    }

    /// Change a user's status
    pub async fn update_user_status(
        &self,
        user_id: &str,
        status: UserStatus,
    ) -> RestClientResult<()> {
        let url = self.endpoint(USERS_PATH, &[user_id, "status"])?;
        self.request_unit(Method::PATCH, url, Some(&UpdateUserStatusRequest { status }))
            .await
    }

    /// Credit a user's balance
    pub async fn add_user_balance(
        &self,
        user_id: &str,
        request: &AddBalanceRequest,
    ) -> RestClientResult<()> {
        validate_add_balance_request(request)?;
        let url = self.endpoint(USERS_PATH, &[user_id, "balance"])?;
        self.request_unit(Method::POST, url, Some(request)).await
    }

    /// Get the signed-in admin's profile
    pub async fn get_profile(&self) -> RestClientResult<AdminProfile> {
        let url = self.endpoint(PROFILE_PATH, &[])?;
        self.request_json(Method::GET, url, None::<&()>).await
    }

    /// Update the signed-in admin's profile
    pub async fn update_profile(&self, request: &UpdateProfileRequest) -> RestClientResult<()> {
        let url = self.endpoint(PROFILE_PATH, &[])?;
        self.request_unit(Method::PUT, url, Some(request)).await
    }

    /// Change the signed-in admin's password
    pub async fn change_password(&self, request: &ChangePasswordRequest) -> RestClientResult<()> {
        validate_change_password_request(request)?;
        let url = self.endpoint(PASSWORD_PATH, &[])?;
        self.request_unit(Method::PUT, url, Some(request)).await
    }

    // Private helper methods

    /// Resolve `path` against the base URL, appending escaped `segments`
    fn endpoint(&self, path: &str, segments: &[&str]) -> RestClientResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut parts = url
                .path_segments_mut()
                .map_err(|_| RestClientError::InvalidBaseUrl(self.base_url.to_string()))?;
            parts.pop_if_empty();
            parts.extend(path.split('/').filter(|s| !s.is_empty()));
            parts.extend(segments);
        }
        Ok(url)
    }

    async fn request_json<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> RestClientResult<T> {
        let response = self.execute(method, url, body).await?;
        let text = response.text().await?;
        let value: serde_json::Value = if text.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&text)?
        };
        Ok(decode_enveloped(value)?)
    }

    async fn request_unit<B: Serialize>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> RestClientResult<()> {
        self.execute(method, url, body).await?;
        Ok(())
    }

    async fn execute<B: Serialize>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> RestClientResult<Response> {
        debug!(method = %method, url = %url, "Sending admin API request");

        let mut request = self.http_client.request(method.clone(), url.clone());

        // Add authentication headers
        let auth_headers = self.auth.headers().map_err(|e| RestClientError::Auth(e.to_string()))?;
        request = request.headers(auth_headers);

        // Add body if provided
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.inspect_err(|e| {
            warn!(method = %method, url = %url, error = %e, "Admin API request failed");
        })?;
        self.check_status(response).await
    }

    async fn check_status(&self, response: Response) -> RestClientResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await?;
        warn!(status = %status, "Admin API returned an error status");
        match serde_json::from_str::<ProblemDetails>(&text) {
            Ok(problem) => Err(RestClientError::ServerError {
                status,
                details: problem,
            }),
            Err(_) => Err(RestClientError::UnexpectedResponse { status, body: text }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation_normalizes_base_path() {
        let client = RestClient::from_url("http://localhost:3001/api", AuthConfig::default())
            .unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:3001/api/");

        let client =
            RestClient::from_url("http://localhost:3001", AuthConfig::default()).unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:3001/");
    }

    #[test]
    fn test_endpoint_escapes_segments() {
        let client = RestClient::from_url("http://localhost:3001/api/", AuthConfig::default())
            .unwrap();
        let url = client.endpoint(USERS_PATH, &["a b/c", "status"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:3001/api/admin/users/a%20b%2Fc/status"
        );
        let url = client.endpoint("/admin/settings/system/", &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3001/api/admin/settings/system");
    }

    #[test]
    fn test_rejects_non_base_url() {
        assert!(matches!(
            RestClient::from_url("mailto:admin@example.com", AuthConfig::default()),
            Err(RestClientError::InvalidBaseUrl(_))
        ));
    }
}
