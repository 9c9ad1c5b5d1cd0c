// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Settings synchronization
//!
//! [`SettingsSync`] owns the editable snapshot of one settings document and
//! reconciles it with the remote authority:
//!
//! - `load` replaces the snapshot with the remote document (unsaved edits
//!   are dropped); a failed load leaves the snapshot as it was.
//! - `set_field` edits one entry locally, without a network call.
//! - `save` submits the document's payload; the snapshot is kept whether
//!   the submission succeeds or fails.
//! - `reset` drops the snapshot first and then loads, so a failed reload
//!   leaves nothing behind.
//!
//! Every operation takes `&self`, so loads and saves may overlap. Each one
//! takes a generation number when it starts. A load whose generation is no
//! longer the newest when its response arrives is discarded, and only the
//! newest load/save clears its in-flight indicator. The indicator is also
//! cleared when that operation's future is dropped before completing.

use std::sync::{Mutex, MutexGuard, PoisonError};

use ac_api_contract::{FieldError, SettingValue, SettingsDocument};
use ac_client_api::SettingsRemote;
use tracing::{debug, info, warn};

use crate::error::SyncError;

struct SyncState<D> {
    snapshot: Option<D>,
    loading: bool,
    saving: bool,
    load_generation: u64,
    save_generation: u64,
}

#[derive(Debug, Clone, Copy)]
enum Flight {
    Load,
    Save,
}

/// Clears the in-flight indicator of one load or save when dropped,
/// provided no newer operation of the same kind has started
struct InFlight<'a, D> {
    state: &'a Mutex<SyncState<D>>,
    flight: Flight,
    generation: u64,
}

impl<D> Drop for InFlight<'_, D> {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        match self.flight {
            Flight::Load if state.load_generation == self.generation => state.loading = false,
            Flight::Save if state.save_generation == self.generation => state.saving = false,
            _ => {}
        }
    }
}

/// Editable snapshot of a settings document synchronized with a remote
pub struct SettingsSync<D: SettingsDocument, R> {
    remote: R,
    state: Mutex<SyncState<D>>,
}

impl<D, R> SettingsSync<D, R>
where
    D: SettingsDocument,
    R: SettingsRemote<D>,
{
    /// Create a sync with no snapshot; call [`Self::load`] before editing
    pub fn new(remote: R) -> Self {
        Self {
            remote,
            state: Mutex::new(SyncState {
                snapshot: None,
                loading: false,
                saving: false,
                load_generation: 0,
                save_generation: 0,
            }),
        }
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Copy of the current snapshot, `None` before the first successful load
    pub fn snapshot(&self) -> Option<D> {
        self.lock().snapshot.clone()
    }

    /// Read the snapshot in place
    pub fn with_snapshot<T>(&self, f: impl FnOnce(Option<&D>) -> T) -> T {
        f(self.lock().snapshot.as_ref())
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    pub fn is_saving(&self) -> bool {
        self.lock().saving
    }

    /// Fetch the remote document and make it the snapshot
    pub async fn load(&self) -> Result<D, SyncError> {
        let flight = self.start(Flight::Load);
        let generation = flight.generation;
        debug!(generation, "Loading settings");

        let result = self.remote.fetch().await;

        // Declared after `flight`, so the lock is released before the guard runs
        let mut state = self.lock();
        if state.load_generation != generation {
            debug!(generation, "Discarding superseded settings load");
            return Err(SyncError::Superseded);
        }
        match result {
            Ok(document) => {
                state.snapshot = Some(document.clone());
                info!(generation, "Settings loaded");
                Ok(document)
            }
            Err(e) => {
                warn!(generation, error = %e, "Failed to load system settings");
                Err(SyncError::Load(e))
            }
        }
    }

    /// Replace the value of one entry in the snapshot
    ///
    /// Returns `Ok(false)` without doing anything when no snapshot is
    /// loaded. On error the snapshot is unchanged.
    pub fn set_field(
        &self,
        section: Option<&str>,
        key: &str,
        value: SettingValue,
    ) -> Result<bool, FieldError> {
        let mut state = self.lock();
        let Some(snapshot) = state.snapshot.as_mut() else {
            debug!(key, "Ignoring settings edit before load");
            return Ok(false);
        };
        snapshot.set_field(section, key, value)?;
        Ok(true)
    }

    /// Submit the snapshot's payload to the remote
    pub async fn save(&self) -> Result<(), SyncError> {
        let Some(payload) = self.lock().snapshot.as_ref().map(SettingsDocument::payload) else {
            return Err(SyncError::NotLoaded);
        };
        let flight = self.start(Flight::Save);
        let generation = flight.generation;
        debug!(generation, "Saving settings");

        let result = self.remote.store(&payload).await;
        drop(flight);

        match result {
            Ok(()) => {
                info!(generation, "Settings saved");
                Ok(())
            }
            Err(e) => {
                warn!(generation, error = %e, "Failed to update system settings");
                Err(SyncError::Save(e))
            }
        }
    }

    /// Drop the snapshot and load it again from the remote
    pub async fn reset(&self) -> Result<D, SyncError> {
        self.lock().snapshot = None;
        debug!("Settings snapshot discarded");
        self.load().await
    }

    /// Take the next generation for `flight` and raise its indicator
    fn start(&self, flight: Flight) -> InFlight<'_, D> {
        let mut state = self.lock();
        let generation = match flight {
            Flight::Load => {
                state.load_generation += 1;
                state.loading = true;
                state.load_generation
            }
            Flight::Save => {
                state.save_generation += 1;
                state.saving = true;
                state.save_generation
            }
        };
        InFlight {
            state: &self.state,
            flight,
            generation,
        }
    }

    fn lock(&self) -> MutexGuard<'_, SyncState<D>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use ac_api_contract::{FlatSettings, SectionedSettings};
    use ac_client_api::ClientApiError;
    use ac_rest_mock_client::{MockSettingsRemote, sample_system_settings};
    use serde_json::json;

    fn flat(value: serde_json::Value) -> FlatSettings {
        serde_json::from_value(value).unwrap()
    }

    fn outage() -> ClientApiError {
        ClientApiError::Transport("connection refused".to_string())
    }

    #[tokio::test]
    async fn test_load_yields_remote_document() {
        let sync = SettingsSync::new(MockSettingsRemote::new(sample_system_settings()));
        assert!(sync.snapshot().is_none());

        let loaded = sync.load().await.unwrap();
        assert_eq!(loaded, sample_system_settings());
        assert_eq!(sync.snapshot(), Some(sample_system_settings()));
        assert!(!sync.is_loading());
    }

    #[tokio::test]
    async fn test_failed_first_load_leaves_snapshot_absent() {
        let remote = MockSettingsRemote::<SectionedSettings>::new(sample_system_settings());
        remote.set_fetch_failing(true);
        let sync = SettingsSync::new(remote);

        assert!(matches!(sync.load().await, Err(SyncError::Load(_))));
        assert!(sync.snapshot().is_none());
        assert!(!sync.is_loading());
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_existing_snapshot() {
        let sync = SettingsSync::new(MockSettingsRemote::new(sample_system_settings()));
        sync.load().await.unwrap();
        sync.set_field(Some("system"), "maxUsers", 7.into()).unwrap();
        let edited = sync.snapshot();

        sync.remote().set_fetch_failing(true);
        assert!(sync.load().await.is_err());
        assert_eq!(sync.snapshot(), edited);
    }

    #[tokio::test]
    async fn test_load_discards_unsaved_edits() {
        let sync = SettingsSync::new(MockSettingsRemote::new(sample_system_settings()));
        sync.load().await.unwrap();
        sync.set_field(Some("system"), "maintenance", true.into()).unwrap();

        sync.load().await.unwrap();
        assert_eq!(sync.snapshot(), Some(sample_system_settings()));
    }

    #[tokio::test]
    async fn test_set_field_scenario() {
        let sync = SettingsSync::new(MockSettingsRemote::new(flat(
            json!({ "maintenance": false, "maxUsers": 100 }),
        )));
        sync.load().await.unwrap();

        assert_eq!(sync.set_field(None, "maxUsers", 250.into()), Ok(true));
        assert_eq!(
            sync.snapshot(),
            Some(flat(json!({ "maintenance": false, "maxUsers": 250 })))
        );
    }

    #[test]
    fn test_set_field_before_load_is_noop() {
        let sync = SettingsSync::new(MockSettingsRemote::new(sample_system_settings()));
        assert_eq!(sync.set_field(Some("system"), "maxUsers", 1.into()), Ok(false));
        assert!(sync.snapshot().is_none());
    }

    #[tokio::test]
    async fn test_rejected_edit_leaves_snapshot_unchanged() {
        let sync = SettingsSync::new(MockSettingsRemote::new(sample_system_settings()));
        sync.load().await.unwrap();

        let err = sync
            .set_field(Some("system"), "maintenance", "sometimes".into())
            .unwrap_err();
        assert!(matches!(err, FieldError::TypeMismatch { .. }));
        assert_eq!(sync.snapshot(), Some(sample_system_settings()));
    }

    #[tokio::test]
    async fn test_save_submits_flattened_payload_and_keeps_snapshot() {
        let sync = SettingsSync::new(MockSettingsRemote::new(sample_system_settings()));
        sync.load().await.unwrap();
        sync.set_field(Some("email"), "smtpHost", "mx.example.com".into()).unwrap();
        let edited = sync.snapshot();

        sync.save().await.unwrap();

        assert_eq!(sync.snapshot(), edited);
        assert!(!sync.is_saving());
        // No re-fetch after a successful save
        assert_eq!(sync.remote().fetch_count(), 1);
        let stored = sync.remote().stored_payloads();
        assert_eq!(stored.len(), 1);
        assert_eq!(
            serde_json::to_value(&stored[0]).unwrap(),
            json!({
                "email_notifications": true,
                "smtpHost": "mx.example.com",
                "maintenance": false,
                "maxUsers": 100,
                "backupFrequency": "daily"
            })
        );
    }

    #[tokio::test]
    async fn test_rejected_save_keeps_snapshot_and_clears_indicator() {
        let sync = SettingsSync::new(MockSettingsRemote::new(sample_system_settings()));
        sync.load().await.unwrap();
        sync.set_field(Some("system"), "maxUsers", 500.into()).unwrap();
        let edited = sync.snapshot();

        sync.remote().set_store_failing(true);
        let err = sync.save().await.unwrap_err();

        assert!(matches!(err, SyncError::Save(ClientApiError::Transport(_))));
        assert_eq!(sync.snapshot(), edited);
        assert!(!sync.is_saving());
    }

    #[tokio::test]
    async fn test_save_before_load() {
        let sync = SettingsSync::new(MockSettingsRemote::new(sample_system_settings()));
        assert_eq!(sync.save().await, Err(SyncError::NotLoaded));
        assert!(sync.remote().stored_payloads().is_empty());
    }

    #[tokio::test]
    async fn test_reset_then_failed_load_leaves_snapshot_absent() {
        let sync = SettingsSync::new(MockSettingsRemote::new(sample_system_settings()));
        sync.load().await.unwrap();
        sync.set_field(Some("system"), "maxUsers", 1.into()).unwrap();

        sync.remote().set_fetch_failing(true);
        assert!(matches!(sync.reset().await, Err(SyncError::Load(_))));
        assert!(sync.snapshot().is_none());
    }

    #[tokio::test]
    async fn test_reset_refetches_authoritative_state() {
        let sync = SettingsSync::new(MockSettingsRemote::new(sample_system_settings()));
        sync.load().await.unwrap();
        sync.set_field(Some("system"), "maxUsers", 1.into()).unwrap();

        let server_side = sample_system_settings().with_section("billing", Vec::new());
        sync.remote().set_document(server_side.clone());

        let reloaded = sync.reset().await.unwrap();
        assert_eq!(reloaded, server_side);
        assert_eq!(sync.snapshot(), Some(server_side));
        assert_eq!(sync.remote().fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_saving_indicator_while_store_in_flight() {
        let sync = Arc::new(SettingsSync::new(MockSettingsRemote::new(sample_system_settings())));
        sync.load().await.unwrap();
        sync.remote().push_store(Ok(()), Duration::from_millis(150));

        let pending = tokio::spawn({
            let sync = sync.clone();
            async move { sync.save().await }
        });
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(sync.is_saving());
        assert!(!sync.is_loading());

        assert_eq!(pending.await.unwrap(), Ok(()));
        assert!(!sync.is_saving());
    }

    #[tokio::test]
    async fn test_cancelled_load_clears_indicator() {
        let remote = MockSettingsRemote::new(sample_system_settings());
        remote.push_fetch(Ok(SectionedSettings::new()), Duration::from_millis(200));
        let sync = SettingsSync::new(remote);

        let timed_out = tokio::time::timeout(Duration::from_millis(20), sync.load()).await;
        assert!(timed_out.is_err());
        assert!(!sync.is_loading());
        assert!(sync.snapshot().is_none());
    }

    #[tokio::test]
    async fn test_cancelled_save_clears_indicator() {
        let sync = SettingsSync::new(MockSettingsRemote::new(sample_system_settings()));
        sync.load().await.unwrap();
        sync.remote().push_store(Ok(()), Duration::from_millis(200));

        let timed_out = tokio::time::timeout(Duration::from_millis(20), sync.save()).await;
        assert!(timed_out.is_err());
        assert!(!sync.is_saving());
        assert_eq!(sync.snapshot(), Some(sample_system_settings()));
    }

    #[tokio::test]
    async fn test_cancelled_older_load_keeps_newer_indicator() {
        let remote = MockSettingsRemote::new(sample_system_settings());
        remote.push_fetch(Ok(SectionedSettings::new()), Duration::from_millis(200));
        remote.push_fetch(Ok(sample_system_settings()), Duration::from_millis(150));
        let sync = Arc::new(SettingsSync::new(remote));

        let older = tokio::spawn({
            let sync = sync.clone();
            async move { sync.load().await }
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        let newer = tokio::spawn({
            let sync = sync.clone();
            async move { sync.load().await }
        });
        tokio::time::sleep(Duration::from_millis(20)).await;

        older.abort();
        assert!(older.await.unwrap_err().is_cancelled());
        assert!(sync.is_loading());

        assert_eq!(newer.await.unwrap(), Ok(sample_system_settings()));
        assert!(!sync.is_loading());
    }

    #[tokio::test]
    async fn test_stale_load_does_not_overwrite_newer_snapshot() {
        let stale = flat(json!({ "maxUsers": 1 }));
        let fresh = flat(json!({ "maxUsers": 2 }));
        let remote = MockSettingsRemote::new(fresh.clone());
        remote.push_fetch(Ok(stale), Duration::from_millis(150));
        remote.push_fetch(Ok(fresh.clone()), Duration::ZERO);
        let sync = Arc::new(SettingsSync::new(remote));

        let slow = tokio::spawn({
            let sync = sync.clone();
            async move { sync.load().await }
        });
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(sync.is_loading());
        let newer = sync.load().await;

        assert_eq!(newer, Ok(fresh.clone()));
        assert_eq!(slow.await.unwrap(), Err(SyncError::Superseded));
        assert_eq!(sync.snapshot(), Some(fresh));
        assert!(!sync.is_loading());
    }

    #[tokio::test]
    async fn test_reset_supersedes_in_flight_load() {
        let remote = MockSettingsRemote::new(sample_system_settings());
        remote.push_fetch(Ok(SectionedSettings::new()), Duration::from_millis(150));
        remote.push_fetch(Err(outage()), Duration::ZERO);
        let sync = Arc::new(SettingsSync::new(remote));

        let slow = tokio::spawn({
            let sync = sync.clone();
            async move { sync.load().await }
        });
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(sync.reset().await.is_err());

        assert_eq!(slow.await.unwrap(), Err(SyncError::Superseded));
        assert!(sync.snapshot().is_none());
    }

    #[tokio::test]
    async fn test_overlapping_saves_are_tolerated() {
        let sync = Arc::new(SettingsSync::new(MockSettingsRemote::new(flat(
            json!({ "maintenance": false }),
        ))));
        sync.load().await.unwrap();
        sync.remote().push_store(Err(outage()), Duration::from_millis(150));
        sync.remote().push_store(Ok(()), Duration::ZERO);

        let first = tokio::spawn({
            let sync = sync.clone();
            async move { sync.save().await }
        });
        tokio::time::sleep(Duration::from_millis(30)).await;
        sync.set_field(None, "maintenance", true.into()).unwrap();
        assert!(sync.save().await.is_ok());
        // The older save is still in flight but the newest one finished
        assert!(!sync.is_saving());

        assert!(matches!(first.await.unwrap(), Err(SyncError::Save(_))));
        assert!(!sync.is_saving());
        assert_eq!(
            sync.snapshot(),
            Some(flat(json!({ "maintenance": true })))
        );
        assert_eq!(sync.remote().stored_payloads().len(), 1);
    }
}
