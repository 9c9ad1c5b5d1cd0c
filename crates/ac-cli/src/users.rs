// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use std::io::Write;

use ac_api_contract::{User, UserStatus};
use ac_client_api::AdminApi;
use ac_console_core::{UserDirectory, format_balance, joined_label};
use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Subcommand;

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum UsersCommands {
    /// List one page of users
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Set a user's status
    Status {
        user_id: String,
        /// pending, active or disabled
        status: UserStatus,
    },
    /// Enable a disabled or pending user, disable an active one
    Toggle {
        user_id: String,
        /// Page the user is listed on
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Credit an amount to a user's balance
    AddBalance {
        user_id: String,
        #[arg(allow_negative_numbers = true)]
        amount: f64,
        /// Page the user is listed on
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
}

impl UsersCommands {
    pub async fn run<A, W>(self, api: A, out: &mut W) -> Result<()>
    where
        A: AdminApi,
        W: Write,
    {
        let mut directory = UserDirectory::new(api);
        let now = Utc::now();
        match self {
            UsersCommands::List { page } => {
                directory.fetch_page(page).await?;
                for user in directory.users() {
                    writeln!(out, "{}", render_user(user, now))?;
                }
                if directory.is_paginated() {
                    writeln!(
                        out,
                        "Page {} of {}",
                        directory.current_page(),
                        directory.total_pages()
                    )?;
                }
            }
            UsersCommands::Status { user_id, status } => {
                directory.set_status(&user_id, status).await?;
                writeln!(out, "User {} is now {}", user_id, status)?;
            }
            UsersCommands::Toggle { user_id, page } => {
                directory.fetch_page(page).await?;
                let status = directory.toggle_status(&user_id).await?;
                writeln!(out, "User {} is now {}", user_id, status)?;
            }
            UsersCommands::AddBalance {
                user_id,
                amount,
                page,
            } => {
                directory.fetch_page(page).await?;
                directory.add_balance(&user_id, amount).await?;
                match directory.user(&user_id) {
                    Some(user) => writeln!(
                        out,
                        "Amount added successfully. New balance: {}",
                        format_balance(user.balance)
                    )?,
                    None => writeln!(out, "Amount added successfully")?,
                }
            }
        }
        Ok(())
    }
}

/// One line of the user table
pub fn render_user(user: &User, now: DateTime<Utc>) -> String {
    format!(
        "{}  {}  {}  {}  {}  {}  joined {}",
        user.id,
        user.username,
        user.email,
        user.status,
        if user.is_verified { "verified" } else { "unverified" },
        format_balance(user.balance),
        joined_label(user.created_at, now)
    )
}
