use actix_web::{get, web, HttpResponse};
use std::sync::Arc;
use tracing::warn;

use crate::state::AppState;
use crate::types::HealthResponse;

/// GET /health - Service status and backend reachability
#[get("/health")]
pub async fn health(state: web::Data<Arc<AppState>>) -> HttpResponse {
    let backend_reachable = match state.client.test_connection().await {
        Ok(reachable) => reachable,
        Err(e) => {
            warn!("Backend health check failed: {}", e);
            false
        }
    };

    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        model: state.config.llm_model.clone(),
        backend_url: state.config.ollama_base_url.clone(),
        backend_reachable,
    })
}
