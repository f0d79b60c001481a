use ride_dispatch_core::contract::RideRequest;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiGatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: Value,
    pub body: String,
    #[serde(rename = "isBase64Encoded")]
    pub is_base64_encoded: bool,
}

/// How a body that cannot be decoded into a ride request is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodePolicy {
    /// Reject the request with a validation error.
    #[default]
    Strict,
    /// Dispatch anyway with zero-valued pickup coordinates.
    Lenient,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("request payload must be a JSON object")]
    NotAnObject,
    #[error("request body is missing")]
    MissingBody,
    #[error("request body must be a JSON object or string")]
    UnsupportedBody,
    #[error("malformed JSON body: {0}")]
    MalformedJson(String),
    #[error("malformed ride request: {0}")]
    InvalidRequest(String),
}

/// Decodes the ride request under `policy`.
///
/// Under [`DecodePolicy::Lenient`] every decode failure yields a request with
/// pickup `(0, 0)`; under [`DecodePolicy::Strict`] it is returned as an error.
pub fn decode_ride_request(event: &Value, policy: DecodePolicy) -> Result<RideRequest, DecodeError> {
    match parse_ride_request(event) {
        Ok(request) => Ok(request),
        Err(error) => match policy {
            DecodePolicy::Strict => Err(error),
            DecodePolicy::Lenient => {
                tracing::warn!(
                    component = "dispatch_handler",
                    event = "decode_defaulted",
                    error = %error,
                    "dispatching with zero-valued pickup location"
                );
                Ok(RideRequest::default())
            }
        },
    }
}

fn parse_ride_request(event: &Value) -> Result<RideRequest, DecodeError> {
    let body = extract_body(event)?;
    serde_json::from_value(body).map_err(|error| DecodeError::InvalidRequest(error.to_string()))
}

fn extract_body(event: &Value) -> Result<Value, DecodeError> {
    let Some(object) = event.as_object() else {
        return Err(DecodeError::NotAnObject);
    };

    match object.get("body") {
        None | Some(Value::Null) => Err(DecodeError::MissingBody),
        Some(body @ Value::Object(_)) => Ok(body.clone()),
        Some(Value::String(text)) => {
            serde_json::from_str(text).map_err(|error| DecodeError::MalformedJson(error.to_string()))
        }
        Some(_) => Err(DecodeError::UnsupportedBody),
    }
}

pub fn success_response(status_code: u16, payload: impl Serialize) -> ApiGatewayResponse {
    match serde_json::to_string(&payload) {
        Ok(body) => ApiGatewayResponse {
            status_code,
            headers: response_headers(),
            body,
            is_base64_encoded: false,
        },
        Err(error) => error_response(500, "serialization_error", &error.to_string()),
    }
}

pub fn error_response(status_code: u16, error: &str, message: &str) -> ApiGatewayResponse {
    ApiGatewayResponse {
        status_code,
        headers: response_headers(),
        body: json!({
            "error": error,
            "message": message,
        })
        .to_string(),
        is_base64_encoded: false,
    }
}

fn response_headers() -> Value {
    json!({
        "Access-Control-Allow-Origin": "*",
        "Content-Type": "application/json",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_string_body() {
        let event = json!({
            "body": "{\"PickupLocation\":{\"Latitude\":47.6,\"Longitude\":-122.3}}"
        });

        let request = decode_ride_request(&event, DecodePolicy::Strict).expect("body should decode");
        assert_eq!(request.pickup_location.latitude, 47.6);
        assert_eq!(request.pickup_location.longitude, -122.3);
    }

    #[test]
    fn decodes_inline_object_body() {
        let event = json!({
            "body": {"PickupLocation": {"Latitude": 1.5, "Longitude": 2.5}}
        });

        let request = decode_ride_request(&event, DecodePolicy::Strict).expect("body should decode");
        assert_eq!(request.pickup_location.longitude, 2.5);
    }

    #[test]
    fn strict_policy_rejects_malformed_json() {
        let event = json!({"body": "{not json"});
        let error = decode_ride_request(&event, DecodePolicy::Strict).expect_err("should fail");
        assert!(matches!(error, DecodeError::MalformedJson(_)));
    }

    #[test]
    fn strict_policy_rejects_missing_body() {
        let error = decode_ride_request(&json!({"body": null}), DecodePolicy::Strict)
            .expect_err("should fail");
        assert_eq!(error, DecodeError::MissingBody);

        let error = decode_ride_request(&json!({}), DecodePolicy::Strict).expect_err("should fail");
        assert_eq!(error, DecodeError::MissingBody);
    }

    #[test]
    fn strict_policy_rejects_wrong_shape() {
        let event = json!({"body": "{\"PickupLocation\":{\"Latitude\":\"north\"}}"});
        let error = decode_ride_request(&event, DecodePolicy::Strict).expect_err("should fail");
        assert!(matches!(error, DecodeError::InvalidRequest(_)));
    }

    #[test]
    fn lenient_policy_defaults_to_zero_coordinates() {
        for event in [json!({"body": "{not json"}), json!({}), json!("scalar")] {
            let request =
                decode_ride_request(&event, DecodePolicy::Lenient).expect("lenient never fails");
            assert_eq!(request, RideRequest::default());
        }
    }

    #[test]
    fn responses_always_allow_any_origin() {
        let ok = success_response(200, json!({"ok": true}));
        let failed = error_response(502, "store_failed", "boom");

        for response in [ok, failed] {
            assert_eq!(response.headers["Access-Control-Allow-Origin"], "*");
            assert!(!response.is_base64_encoded);
        }
    }

    #[test]
    fn response_serializes_with_gateway_field_names() {
        let value = serde_json::to_value(error_response(400, "validation_error", "bad"))
            .expect("response should serialize");
        assert_eq!(value["statusCode"], 400);
        assert_eq!(value["isBase64Encoded"], false);
        assert!(value["body"].as_str().is_some());
    }
}
