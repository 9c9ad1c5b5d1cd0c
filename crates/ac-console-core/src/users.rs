// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Paginated user directory with status and balance actions

use ac_api_contract::{AddBalanceRequest, User, UserStatus};
use ac_client_api::AdminApi;
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::error::ConsoleError;

/// One page of platform users plus the edits applied to it
///
/// Successful mutations are applied to the local copy so the page does not
/// need to be refetched. Failed ones leave it untouched.
pub struct UserDirectory<A> {
    api: A,
    users: Vec<User>,
    current_page: u32,
    total_pages: u32,
}

impl<A: AdminApi> UserDirectory<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            users: Vec::new(),
            current_page: 1,
            total_pages: 1,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn user(&self, user_id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == user_id)
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Pagination controls are only shown when there is more than one page
    pub fn is_paginated(&self) -> bool {
        self.total_pages > 1
    }

    /// Replace the local page with page `page` (1-based) from the backend
    pub async fn fetch_page(&mut self, page: u32) -> Result<(), ConsoleError> {
        let page = page.max(1);
        debug!(page, "Fetching users");
        let listing = self.api.list_users(page).await.map_err(|e| {
            warn!(page, error = %e, "Failed to fetch users");
            ConsoleError::FetchUsers(e)
        })?;
        self.users = listing.users;
        self.current_page = listing.current_page.max(1);
        self.total_pages = listing.total_pages.max(1);
        info!(
            page = self.current_page,
            total_pages = self.total_pages,
            count = self.users.len(),
            "Users fetched"
        );
        Ok(())
    }

    /// Set a user's status
    pub async fn set_status(&mut self, user_id: &str, status: UserStatus) -> Result<(), ConsoleError> {
        self.api
            .update_user_status(user_id, status)
            .await
            .map_err(|e| {
                warn!(user_id, %status, error = %e, "Failed to update user status");
                ConsoleError::UpdateStatus(e)
            })?;
        if let Some(user) = self.users.iter_mut().find(|u| u.id == user_id) {
            user.status = status;
        }
        info!(user_id, %status, "User status updated");
        Ok(())
    }

    /// Flip a listed user between active and disabled
    ///
    /// Pending users become active. Returns the new status.
    pub async fn toggle_status(&mut self, user_id: &str) -> Result<UserStatus, ConsoleError> {
        let current = self
            .user(user_id)
            .map(|u| u.status)
            .ok_or_else(|| ConsoleError::UnknownUser(user_id.to_string()))?;
        let next = current.toggled();
        self.set_status(user_id, next).await?;
        Ok(next)
    }

    /// Credit `amount` to a user's balance
    ///
    /// The amount must be a finite number greater than zero; anything else
    /// is rejected without a network call.
    pub async fn add_balance(&mut self, user_id: &str, amount: f64) -> Result<(), ConsoleError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(ConsoleError::InvalidAmount);
        }
        self.api
            .add_user_balance(user_id, &AddBalanceRequest { amount })
            .await
            .map_err(|e| {
                warn!(user_id, amount, error = %e, "Failed to add amount");
                ConsoleError::AddBalance(e)
            })?;
        if let Some(user) = self.users.iter_mut().find(|u| u.id == user_id) {
            user.balance += amount;
        }
        info!(user_id, amount, "Balance added");
        Ok(())
    }
}

/// Render a balance the way the user table shows it, e.g. "$ 12.50"
pub fn format_balance(amount: f64) -> String {
    format!("$ {:.2}", amount)
}

/// Relative join date such as "3 days ago"
pub fn joined_label(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(created_at);
    let distance = distance_in_words(delta.num_seconds().unsigned_abs());
    if delta.num_seconds() < 0 {
        format!("in {}", distance)
    } else {
        format!("{} ago", distance)
    }
}

fn plural(count: u64, unit: &str) -> String {
    if count == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", count, unit)
    }
}

fn distance_in_words(seconds: u64) -> String {
    const MINUTE: u64 = 60;
    const HOUR: u64 = 60 * MINUTE;
    const DAY: u64 = 24 * HOUR;
    const MONTH: u64 = 30 * DAY;
    const YEAR: u64 = 365 * DAY;

    let rounded = |unit: u64| (seconds + unit / 2) / unit;
    match seconds {
        s if s < 30 => "less than a minute".to_string(),
        s if s < 90 => "1 minute".to_string(),
        s if s < 45 * MINUTE => plural(rounded(MINUTE), "minute"),
        s if s < 90 * MINUTE => "about 1 hour".to_string(),
        s if s < DAY => format!("about {}", plural(rounded(HOUR), "hour")),
        s if s < 42 * HOUR => "1 day".to_string(),
        s if s < 30 * DAY => plural(rounded(DAY), "day"),
        s if s < 45 * DAY => "about 1 month".to_string(),
        s if s < 60 * DAY => "about 2 months".to_string(),
        s if s < YEAR => plural(rounded(MONTH).min(11), "month"),
        s => format!("about {}", plural(s / YEAR, "year")),
    }
}
