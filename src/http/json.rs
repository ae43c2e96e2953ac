use actix_web::{web, HttpResponse};

use crate::http::{Error, ErrorKind};

/// JSON extractor configuration that reports malformed bodies through the
/// same structured error shape as every other failure.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|error, _req| {
        Error::new(ErrorKind::InvalidInput(format!("Invalid JSON body: {error}"))).into()
    })
}

/// Fallback for routes nothing else matched.
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "message": "Route not found",
    }))
}
