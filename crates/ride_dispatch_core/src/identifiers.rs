//! Ride identifiers.
//!
//! Identifiers are random UUIDs (version 4, RFC 4122 variant) drawn from the
//! operating system's secure random source. Generation fails rather than
//! returning a weakened identifier when that source is unavailable.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

const RIDE_ID_BYTES: usize = 16;

/// Identifier of a single ride. Serializes as the canonical lowercase
/// hyphenated UUID string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RideId(Uuid);

impl RideId {
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for RideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to read {requested} bytes from secure random source: {reason}")]
pub struct GenerationError {
    pub requested: usize,
    pub reason: String,
}

pub trait RideIdGenerator: Send + Sync {
    fn generate(&self) -> Result<RideId, GenerationError>;
}

/// Stateless generator backed by the OS CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct SecureRideIdGenerator;

impl RideIdGenerator for SecureRideIdGenerator {
    fn generate(&self) -> Result<RideId, GenerationError> {
        let mut bytes = [0u8; RIDE_ID_BYTES];
        getrandom::fill(&mut bytes).map_err(|error| GenerationError {
            requested: RIDE_ID_BYTES,
            reason: error.to_string(),
        })?;
        Ok(ride_id_from_random_bytes(bytes))
    }
}

/// Stamps version 4 into byte 6 and the `10` variant into byte 8.
pub fn ride_id_from_random_bytes(bytes: [u8; RIDE_ID_BYTES]) -> RideId {
    RideId(uuid::Builder::from_random_bytes(bytes).into_uuid())
}
