use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use ride_dispatch_core::contract::RideRecord;

use super::ride_store::{RideRecordStore, StoreError};

/// In-process ride store for tests and local runs.
///
/// Every call to `persist` is counted, including failed ones. A store built
/// with [`InMemoryRideStore::failing`] rejects every write with the given error.
#[derive(Debug, Default)]
pub struct InMemoryRideStore {
    records: Mutex<Vec<RideRecord>>,
    persist_calls: AtomicUsize,
    failure: Option<StoreError>,
}

impl InMemoryRideStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(error: StoreError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    pub fn records(&self) -> Vec<RideRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn persist_calls(&self) -> usize {
        self.persist_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RideRecordStore for InMemoryRideStore {
    async fn persist(&self, record: RideRecord) -> Result<(), StoreError> {
        self.persist_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }

        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        match records
            .iter_mut()
            .find(|existing| existing.ride_id == record.ride_id)
        {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
        Ok(())
    }
}
