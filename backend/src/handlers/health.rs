use axum::Json;

use crate::models::MessageResponse;

pub async fn health() -> Json<MessageResponse> {
    Json(MessageResponse::new("OK"))
}
