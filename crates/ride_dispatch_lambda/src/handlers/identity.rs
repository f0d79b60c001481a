use serde_json::Value;

/// Claim carrying the rider's user name, set by the Cognito authorizer.
pub const RIDER_CLAIM: &str = "cognito:username";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    #[error("authorizer claims do not include '{0}'")]
    ClaimsMissing(&'static str),
    #[error("authorizer claim '{claim}' is malformed: {reason}")]
    ClaimsMalformed { claim: &'static str, reason: String },
}

/// Reads the rider identity from the authorizer claims of an API Gateway
/// event.
///
/// REST APIs place claims at `requestContext.authorizer.claims`; HTTP APIs with
/// a JWT authorizer use `requestContext.authorizer.jwt.claims`. Both are
/// accepted. The identity itself is opaque and only checked to be a non-empty
/// string.
pub fn extract_rider_identity(event: &Value) -> Result<String, IdentityError> {
    let claims = authorizer_claims(event).ok_or(IdentityError::ClaimsMissing(RIDER_CLAIM))?;

    let Some(claims) = claims.as_object() else {
        return Err(IdentityError::ClaimsMalformed {
            claim: RIDER_CLAIM,
            reason: "claims must be a JSON object".to_string(),
        });
    };

    match claims.get(RIDER_CLAIM) {
        None | Some(Value::Null) => Err(IdentityError::ClaimsMissing(RIDER_CLAIM)),
        Some(Value::String(username)) if !username.trim().is_empty() => Ok(username.clone()),
        Some(Value::String(_)) => Err(IdentityError::ClaimsMalformed {
            claim: RIDER_CLAIM,
            reason: "value is empty".to_string(),
        }),
        Some(other) => Err(IdentityError::ClaimsMalformed {
            claim: RIDER_CLAIM,
            reason: format!("expected a string, found {}", json_kind(other)),
        }),
    }
}

fn authorizer_claims(event: &Value) -> Option<&Value> {
    let authorizer = event.get("requestContext")?.get("authorizer")?;
    authorizer
        .get("claims")
        .or_else(|| authorizer.get("jwt").and_then(|jwt| jwt.get("claims")))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn reads_rest_api_cognito_claim() {
        let event = json!({
            "requestContext": {"authorizer": {"claims": {"cognito:username": "alice"}}}
        });
        assert_eq!(extract_rider_identity(&event), Ok("alice".to_string()));
    }

    #[test]
    fn reads_http_api_jwt_claim() {
        let event = json!({
            "requestContext": {"authorizer": {"jwt": {"claims": {"cognito:username": "bob"}}}}
        });
        assert_eq!(extract_rider_identity(&event), Ok("bob".to_string()));
    }

    #[test]
    fn missing_request_context_is_claims_missing() {
        assert_eq!(
            extract_rider_identity(&json!({"body": "{}"})),
            Err(IdentityError::ClaimsMissing(RIDER_CLAIM))
        );
    }

    #[test]
    fn missing_username_key_is_claims_missing() {
        let event = json!({
            "requestContext": {"authorizer": {"claims": {"email": "alice@example.com"}}}
        });
        assert_eq!(
            extract_rider_identity(&event),
            Err(IdentityError::ClaimsMissing(RIDER_CLAIM))
        );
    }

    #[test]
    fn non_string_username_is_malformed() {
        let event = json!({
            "requestContext": {"authorizer": {"claims": {"cognito:username": 42}}}
        });
        let error = extract_rider_identity(&event).expect_err("should fail");
        assert!(matches!(error, IdentityError::ClaimsMalformed { .. }));
        assert!(error.to_string().contains("a number"));
    }

    #[test]
    fn blank_username_is_malformed() {
        let event = json!({
            "requestContext": {"authorizer": {"claims": {"cognito:username": "  "}}}
        });
        assert!(matches!(
            extract_rider_identity(&event),
            Err(IdentityError::ClaimsMalformed { .. })
        ));
    }

    #[test]
    fn claims_that_are_not_an_object_are_malformed() {
        let event = json!({
            "requestContext": {"authorizer": {"claims": "cognito:username=alice"}}
        });
        assert!(matches!(
            extract_rider_identity(&event),
            Err(IdentityError::ClaimsMalformed { .. })
        ));
    }
}
