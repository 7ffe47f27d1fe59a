//! Shared success envelope for API handlers.
//!
//! Every successful response is `{ "success": true, "data": ... }`; failures
//! are rendered by [`AppError`](crate::error::AppError) with
//! `success: false`. Use [`ApiResponse`] instead of ad-hoc `json!` bodies.

use serde::Serialize;

/// Standard `{ "success": true, "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(ApiResponse::ok(snapshot)))
/// ```
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}
