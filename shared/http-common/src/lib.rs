//! Shared HTTP utilities for the employee directory workspace.
//!
//! Framework-agnostic JSON error bodies, so every surface reports failures
//! with the same envelope.

// ============================================================================
// JSON Response Helpers (framework-agnostic)
// ============================================================================

/// Error code for request bodies that are not a well-formed employee.
pub const MALFORMED_REQUEST: &str = "malformed_request";
/// Error code for requests to routes that do not exist.
pub const NOT_FOUND: &str = "not_found";
/// Error code for storage and other server-side failures.
pub const INTERNAL: &str = "internal";

/// Create a structured error JSON with a default message based on the code.
///
/// Returns: `{"error": {"code": "<code>", "message": "<default message>"}}`
pub fn json_err(code: &str) -> serde_json::Value {
    let message = match code {
        MALFORMED_REQUEST => "Request body must be a JSON object",
        NOT_FOUND => "Resource not found",
        "error" | INTERNAL => "Internal server error",
        _ => code, // Fallback to code as message for unknown codes
    };
    serde_json::json!({"error": {"code": code, "message": message}})
}

/// Create a structured error JSON with a custom message.
///
/// Returns: `{"error": {"code": "<code>", "message": "<message>"}}`
pub fn json_error_with_message(code: &str, message: &str) -> serde_json::Value {
    serde_json::json!({"error": {"code": code, "message": message}})
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_err() {
        let err = json_err(INTERNAL);
        assert_eq!(
            err,
            serde_json::json!({"error": {"code": "internal", "message": "Internal server error"}})
        );

        let err = json_err(NOT_FOUND);
        assert_eq!(
            err,
            serde_json::json!({"error": {"code": "not_found", "message": "Resource not found"}})
        );

        let err = json_err(MALFORMED_REQUEST);
        assert_eq!(err["error"]["code"], "malformed_request");

        // Unknown code falls back to code as message
        let err = json_err("custom_error");
        assert_eq!(err, serde_json::json!({"error": {"code": "custom_error", "message": "custom_error"}}));
    }

    #[test]
    fn test_json_error_with_message() {
        let err = json_error_with_message(MALFORMED_REQUEST, "expected a JSON object, got an array");
        assert_eq!(
            err,
            serde_json::json!({"error": {"code": "malformed_request", "message": "expected a JSON object, got an array"}})
        );
    }
}
