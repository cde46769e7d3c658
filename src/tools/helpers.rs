//! Shared helper functions for MCP tool implementations.

/// Build a structured error JSON string that LLMs can parse.
///
/// Carries `success: false` alongside the machine-readable code so agents
/// can branch on either field.
pub fn error_json(error_code: &str, message: &str) -> String {
    serde_json::json!({
        "success": false,
        "error": error_code,
        "message": message,
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_json_shape() {
        let parsed: serde_json::Value =
            serde_json::from_str(&error_json("timeout", "Request timed out")).unwrap();
        assert_eq!(parsed["success"], false);
        assert_eq!(parsed["error"], "timeout");
        assert_eq!(parsed["message"], "Request timed out");
    }
}
