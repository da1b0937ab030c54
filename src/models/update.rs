use serde::{Deserialize, Serialize};

/// Odpověď `POST /update`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateResult {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UpdateResult {
    pub fn succeeded(details: String) -> Self {
        Self {
            success: true,
            message: "System updated successfully".to_string(),
            details: Some(details),
            error: None,
        }
    }

    pub fn failed(message: &str, error: String) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            details: None,
            error: Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_shape() {
        let json = serde_json::to_value(UpdateResult::succeeded("ok\n".into())).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "success": true,
                "message": "System updated successfully",
                "details": "ok\n"
            })
        );
    }

    #[test]
    fn test_failure_shape() {
        let json = serde_json::to_value(UpdateResult::failed("Update failed", "boom".into())).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "boom");
        assert!(json.get("details").is_none());
    }
}
