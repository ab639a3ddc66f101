use crate::error::ClientError;
use shared::{AuthResponse, ErrorBody, ProcessingResponse, ProcessingResult, SessionUser};

/// Longest body prefix quoted back to the user.
pub const BODY_PREFIX_LIMIT: usize = 200;

pub fn is_json(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| ct.to_ascii_lowercase())
        .is_some_and(|ct| ct.contains("application/json") || ct.contains("+json"))
}

pub fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

pub fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

/// Message for a non-2xx response: the JSON `error`/`message` field when there
/// is one, otherwise a prefix of the body tagged with the status code.
pub fn decode_error_message(status: u16, content_type: Option<&str>, body: &str) -> String {
    if is_json(content_type) {
        if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
            return parsed
                .text()
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {}", status));
        }
    }

    let prefix = truncate_chars(body, BODY_PREFIX_LIMIT);
    if prefix.trim().is_empty() {
        format!("HTTP {}", status)
    } else {
        format!("{} (HTTP {})", prefix, status)
    }
}

/// Sorts a `/api/process` response into success or one of the error kinds.
/// Transport failures never reach this point.
pub fn classify_processing_response(
    status: u16,
    content_type: Option<&str>,
    body: &str,
) -> Result<ProcessingResult, ClientError> {
    if !is_success(status) {
        let message = decode_error_message(status, content_type, body);
        return Err(ClientError::Http { status, message });
    }
    if !is_json(content_type) {
        return Err(ClientError::MalformedResponse(truncate_chars(body, BODY_PREFIX_LIMIT)));
    }

    let response: ProcessingResponse = serde_json::from_str(body)
        .map_err(|e| ClientError::MalformedResponse(format!("invalid JSON ({})", e)))?;

    if let Some(message) = response.error_text() {
        return Err(ClientError::Application(message));
    }
    Ok(response.normalize())
}

/// Login and register share one response contract.
pub fn classify_auth_response(
    status: u16,
    content_type: Option<&str>,
    body: &str,
) -> Result<SessionUser, ClientError> {
    if !is_success(status) {
        let message = decode_error_message(status, content_type, body);
        return Err(ClientError::Http { status, message });
    }

    let response: AuthResponse = serde_json::from_str(body)
        .map_err(|_| ClientError::MalformedResponse(truncate_chars(body, BODY_PREFIX_LIMIT)))?;

    response.user.ok_or_else(|| {
        ClientError::MalformedResponse("response did not include a user".to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const JSON: Option<&str> = Some("application/json; charset=utf-8");
    const TEXT: Option<&str> = Some("text/plain");

    #[test]
    fn json_server_error_uses_error_field() {
        let err = classify_processing_response(500, JSON, r#"{"error":"boom"}"#).unwrap_err();
        assert_eq!(err, ClientError::Http { status: 500, message: "boom".into() });
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn long_text_error_is_truncated_with_status() {
        let body = "x".repeat(260);
        let err = classify_processing_response(502, TEXT, &body).unwrap_err();
        let expected = format!("{} (HTTP 502)", "x".repeat(200));
        assert_eq!(err.to_string(), expected);
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let body = "é".repeat(201);
        assert_eq!(truncate_chars(&body, BODY_PREFIX_LIMIT).chars().count(), 200);
    }

    #[test]
    fn json_error_without_message_falls_back_to_status() {
        let err = classify_processing_response(503, JSON, r#"{"detail":"x"}"#).unwrap_err();
        assert_eq!(err.to_string(), "HTTP 503");

        let err = classify_processing_response(504, TEXT, "").unwrap_err();
        assert_eq!(err.to_string(), "HTTP 504");
    }

    #[test]
    fn json_error_that_is_not_a_string() {
        let body = r#"{"error":{"code":7},"message":"Quota exceeded"}"#;
        let err = classify_processing_response(429, JSON, body).unwrap_err();
        assert_eq!(err, ClientError::Http { status: 429, message: "Quota exceeded".into() });

        let err = classify_processing_response(500, JSON, r#"{"error":["a","b"]}"#).unwrap_err();
        assert_eq!(err.to_string(), "HTTP 500");
    }

    #[test]
    fn success_survives_unexpected_llm_concepts() {
        let body = json!({
            "text": "notes",
            "keyphrases": [{ "phrase": "cell", "score": 0.9 }],
            "llm": { "concepts": [["cell", 0.9]] },
            "mindmap": { "nodes": [{ "id": "cell" }], "edges": [] }
        })
        .to_string();
        let result = classify_processing_response(200, JSON, &body).unwrap();
        assert_eq!(result.text, "notes");
        assert_eq!(result.concepts.len(), 1);
        assert!(result.mindmap.is_some());
    }

    #[test]
    fn unparseable_json_error_reads_as_text() {
        let err = classify_processing_response(500, JSON, "<html>oops</html>").unwrap_err();
        assert_eq!(err.to_string(), "<html>oops</html> (HTTP 500)");
    }

    #[test]
    fn success_without_json_is_malformed() {
        let err =
            classify_processing_response(200, Some("text/html"), "<!doctype html>").unwrap_err();
        assert_eq!(err, ClientError::MalformedResponse("<!doctype html>".into()));

        let err = classify_processing_response(200, None, "plain").unwrap_err();
        assert!(matches!(err, ClientError::MalformedResponse(_)));
    }

    #[test]
    fn success_with_error_field_is_application_error() {
        let body = json!({ "error": "No text detected. Try clearer scans." }).to_string();
        let err = classify_processing_response(200, JSON, &body).unwrap_err();
        assert_eq!(err, ClientError::Application("No text detected. Try clearer scans.".into()));
    }

    #[test]
    fn success_is_normalized() {
        let body = json!({
            "text": "notes",
            "keyphrases": [{ "phrase": "cell", "score": 0.9 }],
            "mindmap": { "nodes": [{ "id": "cell" }], "edges": [] },
            "flowchart": { "nodes": [], "edges": [] },
            "meta": { "images_processed": 2, "ocr_engine": "gcv" }
        })
        .to_string();
        let result = classify_processing_response(200, JSON, &body).unwrap();
        assert_eq!(result.text, "notes");
        assert_eq!(result.concepts[0].phrase, "cell");
        assert!(result.mindmap.is_some());
        assert!(result.flowchart.is_some());
        assert_eq!(result.meta.images_processed, Some(2));
    }

    #[test]
    fn auth_failure_surfaces_server_message() {
        let err = classify_auth_response(401, JSON, r#"{"ok":false,"error":"Invalid credentials"}"#)
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials");

        let err = classify_auth_response(400, JSON, r#"{"message":"Username is already taken"}"#)
            .unwrap_err();
        assert_eq!(err.to_string(), "Username is already taken");
    }

    #[test]
    fn auth_success_yields_user() {
        let body = json!({
            "ok": true,
            "user": { "id": 3, "username": "lin", "email": "lin@example.com", "is_admin": false },
            "message": "Login successful"
        })
        .to_string();
        let user = classify_auth_response(200, JSON, &body).unwrap();
        assert_eq!(user.username, "lin");

        let err = classify_auth_response(200, JSON, r#"{"ok":true}"#).unwrap_err();
        assert!(matches!(err, ClientError::MalformedResponse(_)));
    }
}
