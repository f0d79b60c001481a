use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use lambda_runtime::{service_fn, Error, LambdaEvent};
use ride_dispatch_core::fleet::RandomFleetSelector;
use ride_dispatch_core::identifiers::SecureRideIdGenerator;
use ride_dispatch_lambda::adapters::dynamodb::DynamoDbRideStore;
use ride_dispatch_lambda::config::DispatchConfig;
use ride_dispatch_lambda::handlers::api_gateway::ApiGatewayResponse;
use ride_dispatch_lambda::handlers::request_ride::DispatchHandler;
use ride_dispatch_lambda::logging;
use serde_json::Value;

/// Headroom kept between the store deadline and the invocation deadline so an
/// error response can still be returned.
const DEADLINE_HEADROOM: Duration = Duration::from_millis(250);

async fn handle_request(
    handler: &DispatchHandler,
    event: LambdaEvent<Value>,
) -> Result<ApiGatewayResponse, Error> {
    let time_budget = remaining_time(event.context.deadline, SystemTime::now());
    Ok(handler.handle_event(&event.payload, time_budget).await)
}

fn remaining_time(deadline_ms: u64, now: SystemTime) -> Option<Duration> {
    if deadline_ms == 0 {
        return None;
    }
    let now_ms = now.duration_since(UNIX_EPOCH).ok()?.as_millis();
    let remaining_ms = u128::from(deadline_ms).saturating_sub(now_ms);
    let remaining = Duration::from_millis(u64::try_from(remaining_ms).unwrap_or(u64::MAX));
    Some(remaining.saturating_sub(DEADLINE_HEADROOM))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logging::init();

    let config = DispatchConfig::load()?;
    let roster = config.roster()?;

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let store = DynamoDbRideStore::new(
        aws_sdk_dynamodb::Client::new(&aws_config),
        config.table_name.clone(),
    );

    tracing::info!(
        component = "request_ride",
        event = "handler_initialized",
        table = %store.table_name(),
        fleet_size = roster.len(),
        decode_policy = ?config.decode_policy,
        store_timeout_ms = config.store_timeout_ms,
    );

    let handler = Arc::new(DispatchHandler::new(
        Arc::new(store),
        Arc::new(SecureRideIdGenerator),
        Arc::new(RandomFleetSelector::new(roster)),
        config.settings(),
    ));

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let handler = Arc::clone(&handler);
        async move { handle_request(&handler, event).await }
    }))
    .await
}
