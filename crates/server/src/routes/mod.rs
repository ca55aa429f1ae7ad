use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use hiersum_common::HierSumError;

use crate::types::ErrorResponse;

pub mod index;
pub mod summarize;
pub mod system;

/// Largest accepted request body
pub const MAX_PAYLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Register every route and extractor limit
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PayloadConfig::default().limit(MAX_PAYLOAD_BYTES))
        .app_data(web::FormConfig::default().limit(MAX_PAYLOAD_BYTES))
        .app_data(web::JsonConfig::default().limit(MAX_PAYLOAD_BYTES))
        .service(index::index)
        .service(summarize::summarize)
        .service(system::health);
}

/// Map a pipeline error to its HTTP response, trace included
pub fn error_response(err: &HierSumError) -> HttpResponse {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    HttpResponse::build(status).json(ErrorResponse {
        error: err.to_string(),
        trace: Some(format!("{:?}", err)),
    })
}

/// Answer a body that could not be extracted with the extractor's own status
pub fn extract_error_response(err: &actix_web::Error) -> HttpResponse {
    HttpResponse::build(err.as_response_error().status_code())
        .json(ErrorResponse::new(err.to_string()))
}
