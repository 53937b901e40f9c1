//! Device repository: identity assignment and CRUD over the record store.

use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard};

use medinv_core::ServiceError;
use tracing::info;

use crate::model::{DeviceRecord, DistinctField};
use crate::store::RecordStore;

/// DeviceRepository owns the device collection.
///
/// Every mutation is a full load-modify-save cycle. Writers inside this
/// process are serialized by `write_lock`, so no update is lost to an
/// interleaved writer. Readers don't take the lock.
pub struct DeviceRepository {
    store: RecordStore,
    write_lock: Mutex<()>,
}

impl DeviceRepository {
    pub fn new(store: RecordStore) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>, ServiceError> {
        self.write_lock
            .lock()
            .map_err(|e| ServiceError::Internal(e.to_string()))
    }

    /// All records in stored order.
    pub fn list_all(&self) -> Result<Vec<DeviceRecord>, ServiceError> {
        self.store.load()
    }

    pub fn get(&self, id: u64) -> Result<DeviceRecord, ServiceError> {
        self.store
            .load()?
            .into_iter()
            .find(|r| r.identity() == Some(id))
            .ok_or_else(|| not_found(id))
    }

    /// Append a new record.
    ///
    /// Required fields must be non-blank. When the record carries no
    /// identity it gets one more than the largest present (1 for an empty
    /// collection); a supplied identity that is already taken is a conflict.
    pub fn insert(&self, mut record: DeviceRecord) -> Result<DeviceRecord, ServiceError> {
        let missing = record.missing_required();
        if !missing.is_empty() {
            return Err(ServiceError::Validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )));
        }

        let _guard = self.lock()?;
        let mut records = self.store.load()?;

        let id = match record.identity() {
            Some(id) => {
                if records.iter().any(|r| r.identity() == Some(id)) {
                    return Err(ServiceError::Conflict(format!(
                        "device {} already exists",
                        id
                    )));
                }
                id
            }
            None => next_identity(&records).ok_or_else(|| {
                ServiceError::Conflict("no SequenceNumber left to assign".to_string())
            })?,
        };
        record.sequence_number = Some(id);

        records.push(record.clone());
        self.store.save(&records)?;
        info!("device {} added: {}", id, record.device_name);
        Ok(record)
    }

    /// Replace the stored record with the same identity, keeping its position.
    pub fn replace(&self, record: DeviceRecord) -> Result<DeviceRecord, ServiceError> {
        let id = record.identity().ok_or_else(|| {
            ServiceError::Validation("record has no SequenceNumber".to_string())
        })?;
        self.modify(id, move |_| record)
    }

    /// Replace the record `id` with `f(current)` under the write lock.
    ///
    /// The result always keeps identity `id`.
    pub fn modify<F>(&self, id: u64, f: F) -> Result<DeviceRecord, ServiceError>
    where
        F: FnOnce(&DeviceRecord) -> DeviceRecord,
    {
        let _guard = self.lock()?;
        let mut records = self.store.load()?;

        let slot = records
            .iter_mut()
            .find(|r| r.identity() == Some(id))
            .ok_or_else(|| not_found(id))?;
        let mut updated = f(slot);
        updated.sequence_number = Some(id);
        *slot = updated.clone();

        self.store.save(&records)?;
        info!("device {} updated", id);
        Ok(updated)
    }

    pub fn remove(&self, id: u64) -> Result<(), ServiceError> {
        let _guard = self.lock()?;
        let mut records = self.store.load()?;

        let before = records.len();
        records.retain(|r| r.identity() != Some(id));
        if records.len() == before {
            return Err(not_found(id));
        }

        self.store.save(&records)?;
        info!("device {} deleted", id);
        Ok(())
    }

    /// Sorted, de-duplicated non-empty values of `field`.
    pub fn distinct_values(&self, field: DistinctField) -> Result<Vec<String>, ServiceError> {
        Ok(distinct_in(&self.store.load()?, field))
    }
}

/// One more than the largest identity present, or 1. None once the
/// largest identity is `u64::MAX`.
pub fn next_identity(records: &[DeviceRecord]) -> Option<u64> {
    match records.iter().filter_map(DeviceRecord::identity).max() {
        Some(max) => max.checked_add(1),
        None => Some(1),
    }
}

/// Sorted, de-duplicated non-empty values of `field` across `records`.
pub fn distinct_in(records: &[DeviceRecord], field: DistinctField) -> Vec<String> {
    records
        .iter()
        .filter_map(|r| field.value_of(r))
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn not_found(id: u64) -> ServiceError {
    ServiceError::NotFound(format!("device {} not found", id))
}
