// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Admin console REST API contract types and validation
//!
//! This crate defines the wire types shared between the REST client, the
//! in-memory mock client and the view-state components: typed settings
//! documents (sectioned and flat), user records, the admin profile and the
//! request bodies for every mutating endpoint.

pub mod envelope;
pub mod error;
pub mod settings;
pub mod types;
pub mod validation;

pub use envelope::*;
pub use error::*;
pub use settings::*;
pub use types::*;
