pub mod config;
pub mod handlers;
pub mod middleware;

use actix_web::{error, web, HttpResponse};
use shared_types::ErrorResponse;

pub use config::ApiConfig;
pub use handlers::generate::GenerateAppState;

/// Register every route of the service
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        error::InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(ErrorResponse { error: message }),
        )
        .into()
    }))
    .service(handlers::service::root)
    .service(handlers::service::health)
    .route(
        "/api/generate-letter",
        web::post().to(handlers::generate::generate_letter),
    )
    .route(
        "/api/normalize-letter",
        web::post().to(handlers::normalize::normalize_letter),
    );
}
