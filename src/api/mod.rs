//! HTTP 接口：查询任务状态、触发流水线、下载渲染结果。

use crate::pipeline::Orchestrator;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::{info, warn};

#[derive(Clone)]
pub struct ApiState {
    orchestrator: Arc<Orchestrator>,
}

impl ApiState {
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self { orchestrator }
    }
}

/// `/output` 直接映射到引擎输出目录，前端跨域访问
pub fn create_router(state: ApiState) -> Router {
    let output_dir = state.orchestrator.config().output_dir();

    Router::new()
        .route("/health", get(health_check))
        .route("/api/scenes/status", get(get_status))
        .route("/api/scenes/render", post(trigger_render))
        .nest_service("/output", ServeDir::new(output_dir))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

/// 当前任务状态（只读）
async fn get_status(State(state): State<ApiState>) -> Response {
    (StatusCode::OK, Json(state.orchestrator.status())).into_response()
}

/// 触发一次运行，立即返回
async fn trigger_render(State(state): State<ApiState>) -> Response {
    match state.orchestrator.trigger() {
        Ok(ticket) => {
            info!("Render accepted");
            (
                StatusCode::ACCEPTED,
                Json(json!({
                    "accepted": true,
                    "startedAt": ticket.started_at.timestamp_millis(),
                })),
            )
                .into_response()
        }
        Err(e) => {
            warn!("Render rejected: {}", e);
            (
                StatusCode::CONFLICT,
                Json(json!({
                    "accepted": false,
                    "error": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}
