use axum::Json;
use shared::HelloResponse;

/// Liveness probe, also handy for checking CORS from the frontend.
pub async fn hello() -> Json<HelloResponse> {
    Json(HelloResponse {
        message: "Hello Google".to_string(),
    })
}
