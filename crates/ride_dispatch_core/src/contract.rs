use serde::{Deserialize, Serialize};

use crate::identifiers::RideId;

/// Pickup coordinates in degrees. Values are not range-checked.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct PickupLocation {
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct RideRequest {
    #[serde(rename = "PickupLocation")]
    pub pickup_location: PickupLocation,
}

/// A vehicle available for assignment. The gender tag is opaque roster data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Vehicle {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Color")]
    pub color: String,
    #[serde(rename = "Gender")]
    pub gender: String,
}

impl Vehicle {
    pub fn new(
        name: impl Into<String>,
        color: impl Into<String>,
        gender: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            gender: gender.into(),
        }
    }
}

/// Durable record of one assignment, keyed by `RideId` in the rides table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RideRecord {
    #[serde(rename = "RideId")]
    pub ride_id: RideId,
    #[serde(rename = "User")]
    pub user: String,
    #[serde(rename = "Unicorn")]
    pub unicorn: Vehicle,
    #[serde(rename = "UnicornName")]
    pub unicorn_name: String,
    /// RFC 3339 timestamp of the assignment.
    #[serde(rename = "RequestTime")]
    pub request_time: String,
}

impl RideRecord {
    pub fn new(
        ride_id: RideId,
        user: impl Into<String>,
        unicorn: Vehicle,
        request_time: impl Into<String>,
    ) -> Self {
        let unicorn_name = unicorn.name.clone();
        Self {
            ride_id,
            user: user.into(),
            unicorn,
            unicorn_name,
            request_time: request_time.into(),
        }
    }
}

/// Response body returned to the rider once the ride has been recorded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RideConfirmation {
    #[serde(rename = "RideId")]
    pub ride_id: RideId,
    #[serde(rename = "Unicorn")]
    pub unicorn: Vehicle,
    #[serde(rename = "UnicornName")]
    pub unicorn_name: String,
    #[serde(rename = "Eta")]
    pub eta: String,
    #[serde(rename = "Rider")]
    pub rider: String,
}

impl RideConfirmation {
    pub fn new(
        ride_id: RideId,
        unicorn: Vehicle,
        eta: impl Into<String>,
        rider: impl Into<String>,
    ) -> Self {
        let unicorn_name = unicorn.name.clone();
        Self {
            ride_id,
            unicorn,
            unicorn_name,
            eta: eta.into(),
            rider: rider.into(),
        }
    }
}
