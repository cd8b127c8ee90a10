//! HTTP request layer
//!
//! | Method | Path | Body | Response |
//! |--------|------|------|----------|
//! | GET | `/` | | `{"status": "working"}` |
//! | POST | `/review` | review request | stored or fresh review |
//!
//! All handlers share one [`Reviewer`] and therefore one cache store
//! connection.

pub mod error;

pub use error::{ApiError, ErrorBody};

use crate::config::Config;
use crate::error::{CriticError, CriticResult};
use crate::review::{RepoReview, ReviewRequest, Reviewer};
use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::Request;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{info, Level};
use uuid::Uuid;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub reviewer: Arc<Reviewer>,
}

/// Build the router with request tracing
pub fn router(reviewer: Reviewer) -> Router {
    let state = AppState {
        reviewer: Arc::new(reviewer),
    };

    Router::new()
        .route("/", get(health))
        .route("/review", post(review))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    tracing::info_span!(
                        "request",
                        id = %Uuid::new_v4(),
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                })
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

/// Serve until Ctrl-C, then close the cache store
pub async fn serve(config: &Config, reviewer: Reviewer) -> CriticResult<()> {
    let store = reviewer.store().clone();
    let bind = config.server.bind.as_str();

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|e| CriticError::io(format!("binding {}", bind), e))?;
    info!(
        "Listening on {} ({} content, {} assessments)",
        bind,
        reviewer.source_name(),
        reviewer.engine_name()
    );

    axum::serve(listener, router(reviewer))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| CriticError::io("serving HTTP", e))?;

    info!("Shutting down, closing {} store", store.backend_name());
    store.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "working" }))
}

async fn review(
    State(state): State<AppState>,
    body: Result<Json<ReviewRequest>, JsonRejection>,
) -> Result<Json<RepoReview>, ApiError> {
    let Json(request) = body?;
    info!(
        "Review requested for {} ({})",
        request.git_hub_url, request.developer_level
    );
    let review = state.reviewer.review(&request).await?;
    Ok(Json(review))
}
