use crate::models::{ErrorResponse, MessageResponse};
use crate::services::categories::CategoryRegistry;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{catch, get, Request};

#[get("/")]
pub fn index() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Welcome to CPG Trends API".to_string(),
    })
}

#[get("/categories")]
pub fn categories() -> Json<CategoryRegistry> {
    Json(CategoryRegistry)
}

#[catch(default)]
pub fn default_catcher(status: Status, request: &Request<'_>) -> Json<ErrorResponse> {
    Json(ErrorResponse {
        error: status.reason_lossy().to_lowercase().replace(' ', "_"),
        detail: format!("{} {}: {}", request.method(), request.uri().path(), status.reason_lossy()),
    })
}
