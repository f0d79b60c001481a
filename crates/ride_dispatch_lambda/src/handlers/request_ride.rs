use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{SecondsFormat, Utc};
use ride_dispatch_core::contract::{RideConfirmation, RideRecord};
use ride_dispatch_core::fleet::VehicleSelector;
use ride_dispatch_core::identifiers::{GenerationError, RideIdGenerator};
use serde_json::Value;

use crate::adapters::ride_store::{persist_within, RideRecordStore, StoreError};
use crate::handlers::api_gateway::{
    decode_ride_request, error_response, success_response, ApiGatewayResponse, DecodeError,
    DecodePolicy,
};
use crate::handlers::identity::{extract_rider_identity, IdentityError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchSettings {
    pub eta_text: String,
    pub store_timeout: Duration,
    pub decode_policy: DecodePolicy,
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DispatchError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Decode(_) => 400,
            Self::Identity(_) => 401,
            Self::Generation(_) => 500,
            Self::Store(StoreError::Backend(_)) => 500,
            Self::Store(StoreError::Timeout(_)) => 504,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Decode(_) => "validation_error",
            Self::Identity(_) => "unauthorized",
            Self::Generation(_) => "id_generation_failed",
            Self::Store(StoreError::Backend(_)) => "store_failed",
            Self::Store(StoreError::Timeout(_)) => "store_timeout",
        }
    }
}

/// Serves "request a ride": decode, identify the rider, assign a vehicle,
/// record the ride, confirm.
///
/// The handler is shared across invocations; only the roster and the
/// selector's PRNG are shared state. A confirmation is returned only after the
/// ride record has been written. Identical requests are not deduplicated: each
/// call creates a new ride.
pub struct DispatchHandler {
    store: Arc<dyn RideRecordStore>,
    id_generator: Arc<dyn RideIdGenerator>,
    selector: Arc<dyn VehicleSelector>,
    settings: DispatchSettings,
}

impl DispatchHandler {
    pub fn new(
        store: Arc<dyn RideRecordStore>,
        id_generator: Arc<dyn RideIdGenerator>,
        selector: Arc<dyn VehicleSelector>,
        settings: DispatchSettings,
    ) -> Self {
        Self {
            store,
            id_generator,
            selector,
            settings,
        }
    }

    pub fn settings(&self) -> &DispatchSettings {
        &self.settings
    }

    /// Runs the full request lifecycle and maps the outcome to an API Gateway
    /// response. `time_budget` is the remaining invocation time, if known; the
    /// store write is bounded by whichever of it and the configured timeout is
    /// shorter.
    pub async fn handle_event(
        &self,
        event: &Value,
        time_budget: Option<Duration>,
    ) -> ApiGatewayResponse {
        match self.request_ride(event, time_budget).await {
            Ok(confirmation) => success_response(200, confirmation),
            Err(error) => error_response(error.status_code(), error.error_code(), &error.to_string()),
        }
    }

    pub async fn request_ride(
        &self,
        event: &Value,
        time_budget: Option<Duration>,
    ) -> Result<RideConfirmation, DispatchError> {
        let started_at = Instant::now();
        let result = self.run_pipeline(event, time_budget).await;

        match &result {
            Ok(confirmation) => tracing::info!(
                component = "dispatch_handler",
                event = "ride_confirmed",
                ride_id = %confirmation.ride_id,
                rider = %confirmation.rider,
                unicorn = %confirmation.unicorn_name,
                duration_ms = started_at.elapsed().as_millis() as u64,
            ),
            Err(error) => tracing::error!(
                component = "dispatch_handler",
                event = "ride_failed",
                status_code = error.status_code(),
                error_code = error.error_code(),
                error = %error,
                duration_ms = started_at.elapsed().as_millis() as u64,
            ),
        }

        result
    }

    async fn run_pipeline(
        &self,
        event: &Value,
        time_budget: Option<Duration>,
    ) -> Result<RideConfirmation, DispatchError> {
        let request = decode_ride_request(event, self.settings.decode_policy)?;
        let rider = extract_rider_identity(event)?;

        let ride_id = self.id_generator.generate()?;
        let pickup = request.pickup_location;
        let unicorn = self.selector.select(&pickup);
        tracing::info!(
            component = "dispatch_handler",
            event = "ride_assigned",
            ride_id = %ride_id,
            rider = %rider,
            latitude = pickup.latitude,
            longitude = pickup.longitude,
            unicorn = %unicorn.name,
        );

        let requested_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let record = RideRecord::new(ride_id, rider.clone(), unicorn.clone(), requested_at);
        persist_within(self.store.as_ref(), record, self.store_timeout(time_budget)).await?;

        Ok(RideConfirmation::new(
            ride_id,
            unicorn,
            self.settings.eta_text.clone(),
            rider,
        ))
    }

    fn store_timeout(&self, time_budget: Option<Duration>) -> Duration {
        match time_budget {
            Some(budget) => budget.min(self.settings.store_timeout),
            None => self.settings.store_timeout,
        }
    }
}
