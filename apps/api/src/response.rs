use axum::Json;
use serde::Serialize;

/// Success envelope shared by every API route: `{"status": "success", "data": ...}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: &'static str,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Json<Self> {
        Json(ApiResponse {
            status: "success",
            data,
        })
    }
}
