// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use std::io::Write;

use ac_api_contract::{SectionedSettings, SettingValue};
use ac_client_api::SettingsRemote;
use ac_console_core::{SettingsSync, format_label, section_title};
use anyhow::{Result, bail};
use clap::Subcommand;

#[derive(Subcommand, Debug, Clone)]
pub enum SettingsCommands {
    /// Show every system setting, grouped by section
    Show,
    /// Change one setting and save the whole document
    Set {
        /// Section the setting belongs to, e.g. `email`
        section: String,
        /// Setting key, e.g. `maxUsers`
        key: String,
        /// New value; converted to the setting's declared type
        value: String,
    },
    /// Discard local state and reload the settings from the server
    Reset,
}

impl SettingsCommands {
    pub async fn run<R, W>(self, remote: R, out: &mut W) -> Result<()>
    where
        R: SettingsRemote<SectionedSettings>,
        W: Write,
    {
        let sync = SettingsSync::new(remote);
        match self {
            SettingsCommands::Show => {
                sync.load().await?;
                let text =
                    sync.with_snapshot(|settings| settings.map(render_settings).unwrap_or_default());
                write!(out, "{}", text)?;
            }
            SettingsCommands::Set {
                section,
                key,
                value,
            } => {
                sync.load().await?;
                if !sync.set_field(Some(&section), &key, SettingValue::from(value))? {
                    bail!("Settings are not loaded");
                }
                sync.save().await?;
                writeln!(out, "Settings updated successfully")?;
            }
            SettingsCommands::Reset => {
                let settings = sync.reset().await?;
                write!(out, "{}", render_settings(&settings))?;
            }
        }
        Ok(())
    }
}

/// Text rendering of a sectioned settings document
pub fn render_settings(settings: &SectionedSettings) -> String {
    let mut text = String::new();
    for (name, entries) in settings.sections() {
        text.push_str(&section_title(name));
        text.push('\n');
        for setting in entries {
            text.push_str(&format!(
                "  {}: {} ({})\n",
                format_label(setting.key()),
                setting.value(),
                setting.setting_type()
            ));
            if !setting.description().is_empty() {
                text.push_str(&format!("      {}\n", setting.description()));
            }
        }
    }
    text
}
