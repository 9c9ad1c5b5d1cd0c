// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! View-state components of the admin console
//!
//! - [`SettingsSync`] keeps an editable snapshot of a settings document in
//!   step with its remote authority.
//! - [`UserDirectory`] pages through platform users and applies status and
//!   balance changes.
//! - [`ProfileForm`] edits the admin profile and changes the password.
//!
//! Components talk to the backend only through the `ac-client-api` traits,
//! so they run unchanged against the REST client and the in-memory mock.

pub mod error;
pub mod label;
pub mod profile;
pub mod settings_sync;
pub mod users;

pub use error::{ConsoleError, SyncError};
pub use label::{format_label, section_title};
pub use profile::{AdminIdentity, ProfileForm};
pub use settings_sync::SettingsSync;
pub use users::{UserDirectory, format_balance, joined_label};
