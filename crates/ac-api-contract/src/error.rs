// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Error types for API contract validation and settings mutation

use thiserror::Error;

use crate::settings::SettingType;

/// Errors that can occur during API contract validation and parsing
#[derive(Debug, Error)]
pub enum ApiContractError {
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid amount: {0}")]
    InvalidAmount(f64),
}

/// Errors raised when a single settings field cannot be updated
///
/// None of these touch the document: a failed update leaves every entry as
/// it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("Setting '{key}' must be addressed through its section")]
    SectionRequired { key: String },

    #[error("Unknown settings section: {0}")]
    UnknownSection(String),

    #[error("Unknown setting: {key}")]
    UnknownKey { key: String },

    #[error("Setting '{key}' expects a {expected} value, got {found}")]
    TypeMismatch {
        key: String,
        expected: SettingType,
        found: SettingType,
    },
}

/// Problem+JSON error response format as per RFC 7807
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProblemDetails {
    #[serde(rename = "type", default)]
    pub problem_type: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default)]
    pub detail: String,
    #[serde(skip_serializing_if = "std::collections::HashMap::is_empty", default)]
    pub errors: std::collections::HashMap<String, Vec<String>>,
}

impl std::fmt::Display for ProblemDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.detail.is_empty() {
            write!(f, "{}", self.title)
        } else {
            write!(f, "{}: {}", self.title, self.detail)
        }
    }
}
