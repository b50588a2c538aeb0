//! # API Router — HTTP エンドポイント定義
//!
//! 合成・評価・予測・学習ビュー・ヘルスを REST で公開する。
//! ドメインエラーは HTTP ステータスへ写像して JSON で返す。

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use foundry_core::contracts::{FeedbackRequest, GenerationRequest, OutputKind};
use foundry_core::error::FoundryError;
use foundry_core::traits::IntelligenceStore;
use serde::Deserialize;
use shared::health::HealthMonitor;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tracing::error;

use crate::feedback::FeedbackLearner;
use crate::synthesizer::PromptSynthesizer;

/// 学習ビューで返すパターンの上限
const INTELLIGENCE_VIEW_LIMIT: i64 = 50;

pub struct AppState {
    pub synthesizer: Arc<PromptSynthesizer>,
    pub learner: Arc<FeedbackLearner>,
    pub intelligence: Arc<dyn IntelligenceStore>,
    pub health: Arc<Mutex<HealthMonitor>>,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/generate", post(generate_handler))
        .route("/api/feedback", post(feedback_handler))
        .route("/api/predict", get(predict_handler))
        .route("/api/intelligence/:brand_id", get(intelligence_handler))
        .route("/api/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// === ハンドラー ===

async fn generate_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<GenerationRequest>,
) -> impl IntoResponse {
    match state.synthesizer.synthesize(payload).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn feedback_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<FeedbackRequest>,
) -> impl IntoResponse {
    match state.learner.record(payload).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => error_response(e),
    }
}

#[derive(Debug, Deserialize)]
struct PredictQuery {
    description: String,
    platform: Option<String>,
    output: Option<OutputKind>,
    duration: Option<u32>,
    shot: Option<String>,
}

async fn predict_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PredictQuery>,
) -> impl IntoResponse {
    let result = state.synthesizer.predict(
        &query.description,
        query.platform.as_deref(),
        query.output.unwrap_or_default(),
        query.duration,
        query.shot.as_deref(),
    );
    match result {
        Ok(prediction) => (StatusCode::OK, Json(prediction)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn intelligence_handler(
    State(state): State<Arc<AppState>>,
    Path(brand_id): Path<String>,
) -> impl IntoResponse {
    match state
        .intelligence
        .fetch_patterns(&brand_id, 0.0, INTELLIGENCE_VIEW_LIMIT)
        .await
    {
        Ok(patterns) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "brand_id": brand_id,
                "patterns": patterns,
            })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut monitor = state.health.lock().await;
    Json(monitor.check())
}

// === エラー写像 ===

fn error_response(e: FoundryError) -> Response {
    let status = match &e {
        FoundryError::Validation { .. } | FoundryError::UnsupportedPlatform { .. } => {
            StatusCode::BAD_REQUEST
        }
        FoundryError::NotFound { .. } => StatusCode::NOT_FOUND,
        FoundryError::AccessDenied { .. } => StatusCode::FORBIDDEN,
        FoundryError::CompletionTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error!("❌ API error: {}", e);
    (status, Json(serde_json::json!({ "error": e.to_string() }))).into_response()
}
