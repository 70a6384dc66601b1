//! API response types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Success envelope: `{ statusCode, data, message, success }`.
///
/// Failures are rendered by [`chirp_common::AppError`] in the matching shape.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub status_code: u16,
    pub data: T,
    pub message: String,
    pub success: bool,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a 200 response.
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            status_code: StatusCode::OK.as_u16(),
            data,
            message: message.into(),
            success: true,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_shape() {
        let body = serde_json::to_value(ApiResponse::ok(json!({"id": "t1"}), "tweet fetched successfully"))
            .unwrap_or_default();

        assert_eq!(
            body,
            json!({
                "statusCode": 200,
                "data": {"id": "t1"},
                "message": "tweet fetched successfully",
                "success": true,
            })
        );
    }

    #[test]
    fn test_unit_data_serializes_as_null() {
        let body = serde_json::to_value(ApiResponse::ok((), "tweet deleted successfully"))
            .unwrap_or_default();
        assert!(body["data"].is_null());
    }

    #[test]
    fn test_status_mirrors_status_code() {
        let response = ApiResponse::ok((), "ok").into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
