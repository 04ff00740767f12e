use actix_web::{get, HttpResponse, Responder};
use shared_types::HealthResponse;

pub const SERVICE_NAME: &str = "Catat API";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[get("/")]
pub async fn root() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Welcome to Catat API",
        "version": VERSION,
    }))
}

#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: VERSION.to_string(),
        service: SERVICE_NAME.to_string(),
    })
}
