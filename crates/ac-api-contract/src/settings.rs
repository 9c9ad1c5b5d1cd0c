// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Typed settings documents
//!
//! Two document shapes are exchanged with the backend:
//!
//! - [`SectionedSettings`]: section name to an ordered list of [`Setting`]s,
//!   each carrying its declared [`SettingType`] and a description.
//! - [`FlatSettings`]: an ordered key to value record with statically known
//!   keys. This is also the flattened projection of a sectioned document.
//!
//! Both implement [`SettingsDocument`], which is all the synchronization
//! layer needs to edit and submit them.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::error::FieldError;

/// Declared kind of a setting value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingType {
    Boolean,
    Number,
    String,
}

impl fmt::Display for SettingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingType::Boolean => write!(f, "boolean"),
            SettingType::Number => write!(f, "number"),
            SettingType::String => write!(f, "string"),
        }
    }
}

/// A setting value as it appears on the wire
///
/// Numbers keep their integer/float distinction so a document read from the
/// server serializes back byte-for-byte.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Boolean(bool),
    Number(Number),
    String(String),
}

impl SettingValue {
    /// Runtime kind of this value
    pub fn kind(&self) -> SettingType {
        match self {
            SettingValue::Boolean(_) => SettingType::Boolean,
            SettingValue::Number(_) => SettingType::Number,
            SettingValue::String(_) => SettingType::String,
        }
    }

    /// Build a number value from a float; `None` for NaN and infinities
    pub fn float(value: f64) -> Option<Self> {
        Number::from_f64(value).map(SettingValue::Number)
    }

    /// Convert this value to `target`, the way a form input is read back
    ///
    /// Strings parse into numbers and booleans, numbers and booleans render
    /// into strings. Returns `None` when no sensible conversion exists.
    pub fn coerce_to(self, target: SettingType) -> Option<Self> {
        match (self, target) {
            (value, target) if value.kind() == target => Some(value),
            (SettingValue::String(s), SettingType::Number) => parse_number(s.trim()),
            (SettingValue::String(s), SettingType::Boolean) => {
                let s = s.trim();
                if s.eq_ignore_ascii_case("true") {
                    Some(SettingValue::Boolean(true))
                } else if s.eq_ignore_ascii_case("false") {
                    Some(SettingValue::Boolean(false))
                } else {
                    None
                }
            }
            (SettingValue::Number(n), SettingType::String) => {
                Some(SettingValue::String(n.to_string()))
            }
            (SettingValue::Boolean(b), SettingType::String) => {
                Some(SettingValue::String(b.to_string()))
            }
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SettingValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingValue::String(s) => Some(s),
            _ => None,
        }
    }
}

fn parse_number(s: &str) -> Option<SettingValue> {
    if let Ok(i) = s.parse::<i64>() {
        return Some(SettingValue::Number(i.into()));
    }
    if let Ok(u) = s.parse::<u64>() {
        return Some(SettingValue::Number(u.into()));
    }
    s.parse::<f64>().ok().and_then(SettingValue::float)
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Boolean(b) => write!(f, "{}", b),
            SettingValue::Number(n) => write!(f, "{}", n),
            SettingValue::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        SettingValue::Boolean(value)
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        SettingValue::Number(value.into())
    }
}

impl From<i32> for SettingValue {
    fn from(value: i32) -> Self {
        SettingValue::Number(value.into())
    }
}

impl From<u64> for SettingValue {
    fn from(value: u64) -> Self {
        SettingValue::Number(value.into())
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        SettingValue::String(value.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        SettingValue::String(value)
    }
}

/// A single named, typed setting
///
/// The declared type and the runtime kind of the value always agree: values
/// are coerced on decode and on every update, and the type never changes
/// after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSetting")]
pub struct Setting {
    key: String,
    value: SettingValue,
    #[serde(rename = "type")]
    setting_type: SettingType,
    description: String,
}

#[derive(Deserialize)]
struct RawSetting {
    key: String,
    value: SettingValue,
    #[serde(rename = "type")]
    setting_type: SettingType,
    #[serde(default)]
    description: String,
}

impl TryFrom<RawSetting> for Setting {
    type Error = FieldError;

    fn try_from(raw: RawSetting) -> Result<Self, Self::Error> {
        Setting::typed(raw.key, raw.setting_type, raw.value, raw.description)
    }
}

impl Setting {
    /// Create a setting whose type is the kind of `value`
    pub fn new(
        key: impl Into<String>,
        value: impl Into<SettingValue>,
        description: impl Into<String>,
    ) -> Self {
        let value = value.into();
        Self {
            key: key.into(),
            setting_type: value.kind(),
            value,
            description: description.into(),
        }
    }

    /// Create a setting with an explicit type, coercing `value` to it
    pub fn typed(
        key: impl Into<String>,
        setting_type: SettingType,
        value: SettingValue,
        description: impl Into<String>,
    ) -> Result<Self, FieldError> {
        let key = key.into();
        let found = value.kind();
        let value = value.coerce_to(setting_type).ok_or_else(|| FieldError::TypeMismatch {
            key: key.clone(),
            expected: setting_type,
            found,
        })?;
        Ok(Self {
            key,
            value,
            setting_type,
            description: description.into(),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &SettingValue {
        &self.value
    }

    pub fn setting_type(&self) -> SettingType {
        self.setting_type
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Replace the value, coercing it to the declared type
    pub fn set_value(&mut self, value: SettingValue) -> Result<(), FieldError> {
        let found = value.kind();
        self.value = value.coerce_to(self.setting_type).ok_or_else(|| FieldError::TypeMismatch {
            key: self.key.clone(),
            expected: self.setting_type,
            found,
        })?;
        Ok(())
    }
}

/// A document that can be edited field by field and submitted back
pub trait SettingsDocument: Clone + fmt::Debug + Send + Sync + 'static {
    /// Body sent to the backend on save
    type Payload: Serialize + Send + Sync;

    /// Replace the value of one existing entry
    ///
    /// `section` addresses the group for sectioned documents and must be
    /// `None` for flat ones. Every other entry is left untouched, and on
    /// error the document is unchanged.
    fn set_field(
        &mut self,
        section: Option<&str>,
        key: &str,
        value: SettingValue,
    ) -> Result<(), FieldError>;

    /// Project the document into its submission body
    fn payload(&self) -> Self::Payload;
}

/// Section name to ordered list of typed settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionedSettings(IndexMap<String, Vec<Setting>>);

impl SectionedSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper to append a section
    pub fn with_section(mut self, name: impl Into<String>, settings: Vec<Setting>) -> Self {
        self.0.insert(name.into(), settings);
        self
    }

    pub fn section(&self, name: &str) -> Option<&[Setting]> {
        self.0.get(name).map(Vec::as_slice)
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&Setting> {
        self.section(section)?.iter().find(|s| s.key == key)
    }

    /// Sections in server order
    pub fn sections(&self) -> impl Iterator<Item = (&str, &[Setting])> {
        self.0.iter().map(|(name, settings)| (name.as_str(), settings.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Flatten into a single key to value record, dropping the grouping
    ///
    /// A key present in several sections ends up with the value from the
    /// last one.
    pub fn flatten(&self) -> FlatSettings {
        self.0
            .values()
            .flatten()
            .map(|setting| (setting.key.clone(), setting.value.clone()))
            .collect()
    }
}

impl SettingsDocument for SectionedSettings {
    type Payload = FlatSettings;

    fn set_field(
        &mut self,
        section: Option<&str>,
        key: &str,
        value: SettingValue,
    ) -> Result<(), FieldError> {
        let section = section.ok_or_else(|| FieldError::SectionRequired {
            key: key.to_string(),
        })?;
        let settings = self
            .0
            .get_mut(section)
            .ok_or_else(|| FieldError::UnknownSection(section.to_string()))?;
        let setting = settings.iter_mut().find(|s| s.key == key).ok_or_else(|| {
            FieldError::UnknownKey {
                key: key.to_string(),
            }
        })?;
        setting.set_value(value)
    }

    fn payload(&self) -> FlatSettings {
        self.flatten()
    }
}

/// Ordered key to value record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlatSettings(IndexMap<String, SettingValue>);

impl FlatSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<SettingValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SettingValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<SettingValue>> FromIterator<(K, V)> for FlatSettings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl SettingsDocument for FlatSettings {
    type Payload = FlatSettings;

    fn set_field(
        &mut self,
        section: Option<&str>,
        key: &str,
        value: SettingValue,
    ) -> Result<(), FieldError> {
        if let Some(section) = section {
            return Err(FieldError::UnknownSection(section.to_string()));
        }
        let current = self.0.get_mut(key).ok_or_else(|| FieldError::UnknownKey {
            key: key.to_string(),
        })?;
        let expected = current.kind();
        let found = value.kind();
        *current = value.coerce_to(expected).ok_or_else(|| FieldError::TypeMismatch {
            key: key.to_string(),
            expected,
            found,
        })?;
        Ok(())
    }

    fn payload(&self) -> FlatSettings {
        self.clone()
    }
}
