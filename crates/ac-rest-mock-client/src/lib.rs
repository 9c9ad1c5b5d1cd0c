// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! In-memory admin API for testing
//!
//! This crate provides mock implementations of the `AdminApi` and
//! `SettingsRemote` traits that keep all state in memory. They support
//! configurable delays and failure injection so the view-state components
//! can be exercised against slow, failing and out-of-order backends without
//! a network.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use ac_api_contract::validation::validate_add_balance_request;
use ac_api_contract::{
    AddBalanceRequest, AdminProfile, ChangePasswordRequest, SectionedSettings, Setting,
    SettingsDocument, UpdateProfileRequest, User, UserPage, UserStatus,
};
use ac_client_api::{AdminApi, ClientApiError, ClientApiResult, SettingsRemote};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tracing::debug;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn simulated_outage() -> ClientApiError {
    ClientApiError::Transport("simulated network failure".to_string())
}

fn not_found(what: &str) -> ClientApiError {
    ClientApiError::Server {
        status: 404,
        message: format!("{} not found", what),
    }
}

/// A scripted response and how long to wait before delivering it
type Scripted<T> = (ClientApiResult<T>, Duration);

/// Mock settings endpoint holding one authoritative document
///
/// Without a script, `fetch` returns the stored document and `store`
/// records the payload. Scripted responses are consumed first, in order,
/// each after its own delay.
pub struct MockSettingsRemote<D: SettingsDocument> {
    document: Mutex<Option<D>>,
    fetch_script: Mutex<VecDeque<Scripted<D>>>,
    store_script: Mutex<VecDeque<Scripted<()>>>,
    stored: Mutex<Vec<D::Payload>>,
    fail_fetch: AtomicBool,
    fail_store: AtomicBool,
    fetches: AtomicUsize,
}

impl<D: SettingsDocument> MockSettingsRemote<D>
where
    D::Payload: Clone,
{
    pub fn new(document: D) -> Self {
        Self::with_document(Some(document))
    }

    /// A remote with no document; fetches answer 404
    pub fn empty() -> Self {
        Self::with_document(None)
    }

    fn with_document(document: Option<D>) -> Self {
        Self {
            document: Mutex::new(document),
            fetch_script: Mutex::new(VecDeque::new()),
            store_script: Mutex::new(VecDeque::new()),
            stored: Mutex::new(Vec::new()),
            fail_fetch: AtomicBool::new(false),
            fail_store: AtomicBool::new(false),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Queue a one-off fetch response delivered after `delay`
    pub fn push_fetch(&self, response: ClientApiResult<D>, delay: Duration) {
        lock(&self.fetch_script).push_back((response, delay));
    }

    /// Queue a one-off store response delivered after `delay`
    pub fn push_store(&self, response: ClientApiResult<()>, delay: Duration) {
        lock(&self.store_script).push_back((response, delay));
    }

    pub fn set_fetch_failing(&self, failing: bool) {
        self.fail_fetch.store(failing, Ordering::SeqCst);
    }

    pub fn set_store_failing(&self, failing: bool) {
        self.fail_store.store(failing, Ordering::SeqCst);
    }

    /// Replace the authoritative document
    pub fn set_document(&self, document: D) {
        *lock(&self.document) = Some(document);
    }

    /// Payloads accepted by `store`, oldest first
    pub fn stored_payloads(&self) -> Vec<D::Payload> {
        lock(&self.stored).clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<D: SettingsDocument> SettingsRemote<D> for MockSettingsRemote<D>
where
    D::Payload: Clone,
{
    async fn fetch(&self) -> ClientApiResult<D> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let scripted = lock(&self.fetch_script).pop_front();
        if let Some((response, delay)) = scripted {
            tokio::time::sleep(delay).await;
            return response;
        }
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(simulated_outage());
        }
        let document = lock(&self.document).clone();
        document.ok_or_else(|| not_found("settings document"))
    }

    async fn store(&self, payload: &D::Payload) -> ClientApiResult<()> {
        let scripted = lock(&self.store_script).pop_front();
        if let Some((response, delay)) = scripted {
            tokio::time::sleep(delay).await;
            if response.is_ok() {
                lock(&self.stored).push(payload.clone());
            }
            return response;
        }
        if self.fail_store.load(Ordering::SeqCst) {
            return Err(simulated_outage());
        }
        lock(&self.stored).push(payload.clone());
        Ok(())
    }
}

/// Mock admin backend implementing [`AdminApi`]
#[derive(Debug, Clone)]
pub struct MockAdminClient {
    users: Arc<Mutex<Vec<User>>>,
    profile: Arc<Mutex<AdminProfile>>,
    password: Arc<Mutex<String>>,
    page_size: usize,
    /// Configurable delay for operations (in milliseconds)
    delay_ms: u64,
    /// Whether to simulate failures
    simulate_failures: Arc<AtomicBool>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl Default for MockAdminClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAdminClient {
    /// Create an empty mock backend
    pub fn new() -> Self {
        Self {
            users: Arc::new(Mutex::new(Vec::new())),
            profile: Arc::new(Mutex::new(AdminProfile::default())),
            password: Arc::new(Mutex::new(String::new())),
            page_size: 10,
            delay_ms: 0,
            simulate_failures: Arc::new(AtomicBool::new(false)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock backend populated with sample users and a profile
    pub fn with_mock_data() -> Self {
        let client = Self::new().with_password("hunter2");
        *lock(&client.users) = sample_users();
        *lock(&client.profile) = AdminProfile {
            name: Some("Root Admin".to_string()),
            email: Some("root@example.com".to_string()),
        };
        client
    }

    pub fn with_users(self, users: Vec<User>) -> Self {
        *lock(&self.users) = users;
        self
    }

    pub fn with_profile(self, profile: AdminProfile) -> Self {
        *lock(&self.profile) = profile;
        self
    }

    pub fn with_password(self, password: &str) -> Self {
        *lock(&self.password) = password.to_string();
        self
    }

    pub fn with_page_size(self, page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            ..self
        }
    }

    /// Create a mock client with custom delay
    pub fn with_delay(self, delay_ms: u64) -> Self {
        Self { delay_ms, ..self }
    }

    /// Toggle failure simulation for every subsequent call
    pub fn set_failing(&self, failing: bool) {
        self.simulate_failures.store(failing, Ordering::SeqCst);
    }

    /// Current server-side users
    pub fn users(&self) -> Vec<User> {
        lock(&self.users).clone()
    }

    pub fn profile(&self) -> AdminProfile {
        lock(&self.profile).clone()
    }

    pub fn password(&self) -> String {
        lock(&self.password).clone()
    }

    /// Names of the API calls received, oldest first
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    async fn enter(&self, call: &str) -> ClientApiResult<()> {
        debug!(call, "Mock admin API call");
        lock(&self.calls).push(call.to_string());
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
        if self.simulate_failures.load(Ordering::SeqCst) {
            return Err(simulated_outage());
        }
        Ok(())
    }
}

#[async_trait]
impl AdminApi for MockAdminClient {
    async fn list_users(&self, page: u32) -> ClientApiResult<UserPage> {
        self.enter("list_users").await?;
        let users = lock(&self.users);
        let total_pages = users.len().div_ceil(self.page_size).max(1) as u32;
        let page = page.max(1);
        let start = (page as usize - 1).saturating_mul(self.page_size);
        let slice = users.iter().skip(start).take(self.page_size).cloned().collect();
        Ok(UserPage {
            users: slice,
            total_pages,
            current_page: page,
        })
    }

    async fn update_user_status(&self, user_id: &str, status: UserStatus) -> ClientApiResult<()> {
        self.enter("update_user_status").await?;
        let mut users = lock(&self.users);
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| not_found(&format!("user {}", user_id)))?;
        user.status = status;
        Ok(())
    }

    async fn add_user_balance(
        &self,
        user_id: &str,
        request: &AddBalanceRequest,
    ) -> ClientApiResult<()> {
        self.enter("add_user_balance").await?;
        validate_add_balance_request(request)
            .map_err(|e| ClientApiError::Validation(e.to_string()))?;
        let mut users = lock(&self.users);
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| not_found(&format!("user {}", user_id)))?;
        user.balance += request.amount;
        Ok(())
    }

    async fn get_profile(&self) -> ClientApiResult<AdminProfile> {
        self.enter("get_profile").await?;
        Ok(self.profile())
    }

    async fn update_profile(&self, request: &UpdateProfileRequest) -> ClientApiResult<()> {
        self.enter("update_profile").await?;
        *lock(&self.profile) = AdminProfile {
            name: Some(request.name.clone()),
            email: Some(request.email.clone()),
        };
        Ok(())
    }

    async fn change_password(&self, request: &ChangePasswordRequest) -> ClientApiResult<()> {
        self.enter("change_password").await?;
        let mut password = lock(&self.password);
        if *password != request.current_password {
            return Err(ClientApiError::Server {
                status: 400,
                message: "Current password is incorrect".to_string(),
            });
        }
        *password = request.new_password.clone();
        Ok(())
    }
}

/// Sample users spanning every status
pub fn sample_users() -> Vec<User> {
    let user = |id: &str, name: &str, status: UserStatus, balance: f64, day: u32| User {
        id: id.to_string(),
        username: name.to_string(),
        email: format!("{}@example.com", name),
        current_level: "bronze".to_string(),
        is_verified: status == UserStatus::Active,
        balance,
        status,
        created_at: Utc
            .with_ymd_and_hms(2025, 1, day, 12, 0, 0)
            .single()
            .unwrap_or_default(),
    };
    vec![
        user("u1", "alice", UserStatus::Active, 120.0, 3),
        user("u2", "bob", UserStatus::Pending, 0.0, 9),
        user("u3", "carol", UserStatus::Disabled, 42.5, 17),
    ]
}

/// Sample sectioned system settings
pub fn sample_system_settings() -> SectionedSettings {
    SectionedSettings::new()
        .with_section(
            "email",
            vec![
                Setting::new("email_notifications", true, "Send transactional emails"),
                Setting::new("smtpHost", "smtp.example.com", "Outgoing mail server"),
            ],
        )
        .with_section(
            "system",
            vec![
                Setting::new("maintenance", false, "Put the platform in maintenance mode"),
                Setting::new("maxUsers", 100, "Maximum number of registered users"),
                Setting::new("backupFrequency", "daily", "How often backups run"),
            ],
        )
}
