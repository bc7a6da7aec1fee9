//! API endpoint modules.

pub mod conversation;
pub mod epics;
pub mod health;
pub mod openapi;
pub mod prds;

use actix_web::web;

use crate::error::AppError;

pub use conversation::configure_routes as configure_conversation_routes;
pub use epics::configure_routes as configure_epic_routes;
pub use health::configure_health_routes;
pub use openapi::{ApiDoc, configure_openapi_routes};
pub use prds::configure_routes as configure_prd_routes;

/// Largest accepted JSON body (PATCH with a full PRD content is the biggest).
const MAX_JSON_BODY: usize = 2 * 1024 * 1024;

/// Register every `/api` route plus the JSON and path extractor error handlers.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .configure(configure_health_routes)
        .configure(configure_openapi_routes)
        .configure(configure_prd_routes)
        .configure(configure_epic_routes)
        .configure(configure_conversation_routes);
}

/// Malformed JSON bodies become `INVALID_INPUT` errors.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(MAX_JSON_BODY)
        .error_handler(|err, _req| {
            AppError::InvalidInput(format!("Invalid JSON body: {}", err)).into()
        })
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        AppError::InvalidInput(format!("Invalid path parameter: {}", err)).into()
    })
}
