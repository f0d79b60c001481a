use std::time::Duration;

use async_trait::async_trait;
use ride_dispatch_core::contract::RideRecord;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("failed to persist ride record: {0}")]
    Backend(String),
    #[error("ride record write did not complete within {0:?}")]
    Timeout(Duration),
}

/// Durable sink for ride records.
///
/// `persist` is a single unconditional upsert keyed by the ride id. It does not
/// retry; a failed write is reported to the caller as-is.
#[async_trait]
pub trait RideRecordStore: Send + Sync {
    async fn persist(&self, record: RideRecord) -> Result<(), StoreError>;
}

/// Runs `persist` under a deadline. An elapsed deadline is reported as
/// [`StoreError::Timeout`]; the write may still land in the backing store.
pub async fn persist_within(
    store: &dyn RideRecordStore,
    record: RideRecord,
    timeout: Duration,
) -> Result<(), StoreError> {
    match tokio::time::timeout(timeout, store.persist(record)).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout(timeout)),
    }
}

#[cfg(test)]
mod tests {
    use ride_dispatch_core::contract::Vehicle;
    use ride_dispatch_core::identifiers::ride_id_from_random_bytes;

    use super::*;
    use crate::adapters::memory::InMemoryRideStore;

    struct StalledStore;

    #[async_trait]
    impl RideRecordStore for StalledStore {
        async fn persist(&self, _record: RideRecord) -> Result<(), StoreError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(())
        }
    }

    fn sample_record() -> RideRecord {
        RideRecord::new(
            ride_id_from_random_bytes([7u8; 16]),
            "alice",
            Vehicle::new("Rocinante", "Yellow", "Female"),
            "2026-02-14T00:00:00Z",
        )
    }

    #[tokio::test]
    async fn stalled_write_is_reported_as_timeout() {
        let timeout = Duration::from_millis(20);
        let error = persist_within(&StalledStore, sample_record(), timeout)
            .await
            .expect_err("stalled write should time out");

        assert_eq!(error, StoreError::Timeout(timeout));
    }

    #[tokio::test]
    async fn completed_write_passes_through() {
        let store = InMemoryRideStore::new();
        persist_within(&store, sample_record(), Duration::from_secs(1))
            .await
            .expect("write should succeed");

        assert_eq!(store.records(), vec![sample_record()]);
    }

    #[tokio::test]
    async fn backend_error_passes_through_unchanged() {
        let store = InMemoryRideStore::failing(StoreError::Backend("throttled".to_string()));
        let error = persist_within(&store, sample_record(), Duration::from_secs(1))
            .await
            .expect_err("write should fail");

        assert_eq!(error, StoreError::Backend("throttled".to_string()));
        assert!(store.records().is_empty());
    }
}
