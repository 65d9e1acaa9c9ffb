//! Shared response envelope.
//!
//! Every response body is `{success, data?, message?, error?}`. Handlers
//! return [`ApiResponse`]; [`AppError`](crate::error::AppError) renders
//! [`ErrorBody`].

use serde::Serialize;

/// Successful `{success: true, message?, data?}` envelope.
///
/// ```ignore
/// Ok(Json(ApiResponse::ok(items)))
/// ```
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// Envelope with a message and no data.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }
}

/// Failure envelope: `{success: false, message, error}`, where `error` is a
/// machine-readable code such as `NOT_FOUND`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    pub error: &'static str,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>, error: &'static str) -> Self {
        Self {
            success: false,
            message: message.into(),
            error,
        }
    }
}
