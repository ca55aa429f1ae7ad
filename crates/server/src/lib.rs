//! hiersum HTTP server
//!
//! Actix-web front end for the hierarchical summarizer

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use hiersum_common::{AppConfig, Result};
use std::sync::Arc;
use tracing::info;
use tracing_actix_web::TracingLogger;

pub mod routes;
pub mod state;
pub mod types;

pub use state::AppState;

/// Start the HTTP server and run until shutdown
pub async fn start_server(config: AppConfig) -> Result<()> {
    let bind_addr = config.server_bind_address();
    let state = Arc::new(AppState::new(config)?);

    info!(
        "Serving on http://{} - backend {}, model {}, max chunk {} chars",
        bind_addr,
        state.config.ollama_base_url,
        state.config.llm_model,
        state.config.max_chunk_chars
    );

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(Cors::permissive())
            .app_data(web::Data::new(state.clone()))
            .configure(routes::configure)
    })
    .bind(&bind_addr)?
    .run()
    .await?;

    info!("Server stopped");
    Ok(())
}
