//! Request/response types for the auth endpoints.
//!
//! Wire field names are camelCase; that is the contract the frontend was
//! built against.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::ErrorCode;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginRequest {
    pub password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    /// Session expiry, epoch milliseconds.
    pub expires_at: u64,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatusResponse {
    pub is_authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<u64>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AdminSessionStatusResponse {
    pub is_authenticated: bool,
    pub is_admin: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<u64>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LogoutResponse {
    pub success: bool,
    pub message: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_attempts: Option<u32>,
    /// End of the rate-limit window, epoch milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_time: Option<u64>,
}

impl ErrorResponse {
    #[must_use]
    pub fn from_code(code: ErrorCode) -> Self {
        Self {
            error: code.code.to_string(),
            message: code.message.to_string(),
            remaining_attempts: None,
            reset_time: None,
        }
    }

    #[must_use]
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            error: code.code.to_string(),
            message: message.into(),
            remaining_attempts: None,
            reset_time: None,
        }
    }
}
