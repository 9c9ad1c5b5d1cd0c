// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use std::io::Write;

use ac_client_api::AdminApi;
use ac_console_core::{AdminIdentity, ProfileForm};
use anyhow::Result;
use clap::Subcommand;

#[derive(Subcommand, Debug, Clone)]
pub enum ProfileCommands {
    /// Show the stored profile
    Show,
    /// Change the profile name and/or email
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Change the admin password
    ChangePassword {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
        #[arg(long)]
        confirm: String,
    },
}

impl ProfileCommands {
    pub async fn run<A, W>(self, api: A, admin: Option<AdminIdentity>, out: &mut W) -> Result<()>
    where
        A: AdminApi,
        W: Write,
    {
        let mut form = ProfileForm::new(api, admin);
        match self {
            ProfileCommands::Show => {
                form.load().await?;
                writeln!(out, "Name:  {}", form.name())?;
                writeln!(out, "Email: {}", form.email())?;
            }
            ProfileCommands::Update { name, email } => {
                form.load().await?;
                if let Some(name) = name {
                    form.set_name(name);
                }
                if let Some(email) = email {
                    form.set_email(email);
                }
                form.save().await?;
                writeln!(out, "Profile updated successfully")?;
            }
            ProfileCommands::ChangePassword {
                current,
                new,
                confirm,
            } => {
                form.set_current_password(current);
                form.set_new_password(new);
                form.set_confirm_password(confirm);
                form.change_password().await?;
                writeln!(out, "Password changed successfully")?;
            }
        }
        Ok(())
    }
}
