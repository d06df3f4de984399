use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::State,
    response::{Html, IntoResponse, Json},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::dashboard::Dashboard;
use crate::error::DashboardError;
use crate::layout::PageLayout;
use crate::models::{DisplayTable, RecordKey, SkillSummary};
use crate::signal::Patch;
use crate::summary;

static INDEX_HTML: &str = include_str!("../assets/index.html");

pub type AppState = Arc<Dashboard>;

/// `seq` is a per-signal counter chosen by the page and echoed back, so a
/// reply that arrives after a newer one can be dropped.
#[derive(Debug, Deserialize, Serialize)]
pub struct ColumnRequest {
    #[serde(default)]
    pub seq: u64,
    pub column: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SelectionRequest {
    #[serde(default)]
    pub seq: u64,
    #[serde(default)]
    pub keys: Vec<RecordKey>,
    /// Keys of the rows the filtered table shows; absent means all rows.
    #[serde(default)]
    pub visible: Option<Vec<RecordKey>>,
}

#[derive(Debug, Serialize)]
pub struct SignalReply {
    pub seq: u64,
    pub patches: Vec<Patch>,
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub members: usize,
    pub dropped_rows: usize,
    pub source: String,
    pub loaded_at: DateTime<Utc>,
}

pub fn create_app(dashboard: Dashboard) -> Router {
    let state: AppState = Arc::new(dashboard);

    Router::new()
        .route("/", get(index))
        .route("/api/health", get(health))
        .route("/api/layout", get(layout))
        .route("/api/table", get(table))
        .route("/api/summary", get(skill_summary))
        .route("/api/initial", get(initial))
        .route("/api/column", post(choose_column))
        .route("/api/selection", post(select_members))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(dashboard: Dashboard, bind: &str) -> anyhow::Result<()> {
    let app = create_app(dashboard);
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    let addr = listener.local_addr()?;
    tracing::info!("dashboard running at http://{addr}");
    axum::serve(listener, app).await.context("server stopped")?;
    Ok(())
}

async fn index() -> impl IntoResponse {
    Html(INDEX_HTML)
}

async fn health(State(state): State<AppState>) -> Json<Health> {
    let dataset = state.dataset();
    Json(Health {
        status: "ok",
        members: dataset.len(),
        dropped_rows: dataset.dropped_rows,
        source: dataset.source.clone(),
        loaded_at: dataset.loaded_at,
    })
}

async fn layout(State(state): State<AppState>) -> Json<PageLayout> {
    Json(state.layout())
}

async fn table(State(state): State<AppState>) -> Json<DisplayTable> {
    Json(state.dataset().table().clone())
}

async fn skill_summary(State(state): State<AppState>) -> Json<Vec<SkillSummary>> {
    Json(summary::summarize_skills(state.dataset()))
}

async fn initial(State(state): State<AppState>) -> Json<Vec<Patch>> {
    Json(state.initial_patches())
}

async fn choose_column(
    State(state): State<AppState>,
    Json(request): Json<ColumnRequest>,
) -> Result<Json<SignalReply>, DashboardError> {
    let patches = state.choose_column(&request.column)?;
    Ok(Json(SignalReply {
        seq: request.seq,
        patches,
    }))
}

async fn select_members(
    State(state): State<AppState>,
    Json(request): Json<SelectionRequest>,
) -> Result<Json<SignalReply>, DashboardError> {
    let patches = state.select(&request.keys, request.visible.as_deref())?;
    Ok(Json(SignalReply {
        seq: request.seq,
        patches,
    }))
}
