//! HTTP surface
//!
//! Thin axum layer over the planner. Mutating endpoints return JSON
//! mirroring the merge outcome; error paths return `{"error": "..."}` with
//! 400 for validation problems, 502 for oracle failures, 500 otherwise.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use eyre::{Context, Result};
use handlebars::Handlebars;
use tracing::info;

mod handlers;

use crate::planner::Planner;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub planner: Arc<Planner>,
    pub default_user: String,
    hbs: Arc<Handlebars<'static>>,
}

impl AppState {
    pub fn new(planner: Arc<Planner>, default_user: impl Into<String>) -> Result<Self> {
        let mut hbs = Handlebars::new();
        hbs.register_template_string("index", include_str!("../../templates/index.hbs"))
            .context("Failed to register index template")?;
        Ok(Self {
            planner,
            default_user: default_user.into(),
            hbs: Arc::new(hbs),
        })
    }

    pub(crate) fn render_index(&self, context: &handlers::PageContext) -> Result<String> {
        self.hbs.render("index", context).context("Failed to render index page")
    }
}

/// Build the service router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/", get(handlers::home))
        .route("/ui/action", post(handlers::ui_action))
        .route("/api/extract", post(handlers::api_extract))
        .route("/api/weekly/get", get(handlers::api_weekly_get))
        .route("/api/weekly/add_text", post(handlers::api_weekly_add_text))
        .with_state(state)
}

/// Bind and serve until the process is stopped
pub async fn serve(state: AppState, listen_addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(listen_addr)
        .await
        .context(format!("Failed to bind {}", listen_addr))?;
    info!(%listen_addr, "serving");
    axum::serve(listener, router(state)).await.context("Server error")?;
    Ok(())
}
