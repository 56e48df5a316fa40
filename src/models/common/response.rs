use serde::{Deserialize, Serialize};

use crate::models::ErrorCode;

// 统一的API响应结构
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_envelope_omits_data() {
        let body = serde_json::to_value(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Assignment not found",
        ))
        .expect("serializable");
        assert_eq!(body["code"], ErrorCode::NotFound as i32);
        assert_eq!(body["message"], "Assignment not found");
        assert!(body.get("data").is_none());
        assert!(body.get("timestamp").is_some());
    }

    #[test]
    fn test_success_envelope_has_zero_code() {
        let body = serde_json::to_value(ApiResponse::success(vec![1, 2], "ok")).expect("ok");
        assert_eq!(body["code"], 0);
        assert_eq!(body["data"], serde_json::json!([1, 2]));
    }
}
