use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use ride_dispatch_core::contract::{RideRecord, Vehicle};

use super::ride_store::{RideRecordStore, StoreError};

/// Ride store backed by a DynamoDB table keyed on `RideId`.
///
/// The client is built once per process and cloned cheaply; writes are plain
/// `PutItem` calls with no condition expression.
#[derive(Debug, Clone)]
pub struct DynamoDbRideStore {
    client: aws_sdk_dynamodb::Client,
    table_name: String,
}

impl DynamoDbRideStore {
    pub fn new(client: aws_sdk_dynamodb::Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

#[async_trait]
impl RideRecordStore for DynamoDbRideStore {
    async fn persist(&self, record: RideRecord) -> Result<(), StoreError> {
        let ride_id = record.ride_id.to_string();
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(ride_record_item(&record)))
            .send()
            .await
            .map_err(|error| {
                StoreError::Backend(format!(
                    "failed to put ride {ride_id} into table {}: {}",
                    self.table_name,
                    DisplayErrorContext(&error)
                ))
            })?;

        tracing::info!(
            component = "ride_store",
            event = "ride_persisted",
            ride_id = %ride_id,
            table = %self.table_name,
        );
        Ok(())
    }
}

/// Item layout: `RideId`, `User`, `Unicorn` (map), `UnicornName`, `RequestTime`.
pub fn ride_record_item(record: &RideRecord) -> HashMap<String, AttributeValue> {
    HashMap::from([
        (
            "RideId".to_string(),
            AttributeValue::S(record.ride_id.to_string()),
        ),
        ("User".to_string(), AttributeValue::S(record.user.clone())),
        (
            "Unicorn".to_string(),
            AttributeValue::M(vehicle_attributes(&record.unicorn)),
        ),
        (
            "UnicornName".to_string(),
            AttributeValue::S(record.unicorn_name.clone()),
        ),
        (
            "RequestTime".to_string(),
            AttributeValue::S(record.request_time.clone()),
        ),
    ])
}

fn vehicle_attributes(vehicle: &Vehicle) -> HashMap<String, AttributeValue> {
    HashMap::from([
        ("Name".to_string(), AttributeValue::S(vehicle.name.clone())),
        ("Color".to_string(), AttributeValue::S(vehicle.color.clone())),
        ("Gender".to_string(), AttributeValue::S(vehicle.gender.clone())),
    ])
}
