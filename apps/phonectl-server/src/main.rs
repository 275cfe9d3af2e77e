mod config;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use clap::Parser;
use serde::Serialize;

use phonectl_api::{
    AgentApi, AgentApiBuilder, ApiService, PairDeviceRequest, PlanCommandRequest,
    PullActionsRequest, RecordStatusRequest,
};
use phonectl_core::store::{CommandStore, PairingStore, StatusStore};
use phonectl_stores::{RedisCommandStore, RedisPairingStore, RedisStatusStore};

use crate::config::{load_config, ServerConfig};

#[derive(Debug, Parser)]
#[command(name = "phonectl-server")]
struct Args {
    /// Path to the YAML config; in-memory defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value = "127.0.0.1:8080")]
    listen: SocketAddr,
}

#[derive(Clone)]
struct AppState {
    api: Arc<AgentApi>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("load config {} failed", path.display()))?,
        None => ServerConfig::default(),
    };

    let api = Arc::new(build_api(&config)?);
    let state = AppState { api };

    let app = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/pair", post(pair_device))
        .route("/pairs", get(list_pairings))
        .route("/plan", post(plan_command))
        .route("/pull", post(pull_actions))
        .route("/status", post(record_status))
        .route("/status/{device_id}", get(device_status))
        .route("/history", get(history))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(args.listen)
        .await
        .context("bind server listener failed")?;
    tracing::info!(listen = %args.listen, backend = %config.store.backend, "phonectl-server listening");
    axum::serve(listener, app)
        .await
        .context("server terminated with error")
}

fn build_api(config: &ServerConfig) -> anyhow::Result<AgentApi> {
    let mut builder = AgentApiBuilder::new().with_default_pull_limit(config.default_pull_limit);

    if config.store.backend == "redis" {
        let url = config
            .store
            .connection_url
            .as_deref()
            .context("redis backend requires store.connection_url")?;
        let prefix = config.store.key_prefix.as_str();
        let commands: Arc<dyn CommandStore> =
            Arc::new(RedisCommandStore::new(url, prefix).context("open redis command store")?);
        let pairings: Arc<dyn PairingStore> =
            Arc::new(RedisPairingStore::new(url, prefix).context("open redis pairing store")?);
        let statuses: Arc<dyn StatusStore> =
            Arc::new(RedisStatusStore::new(url, prefix).context("open redis status store")?);
        builder = builder
            .with_command_store(commands)
            .with_pairing_store(pairings)
            .with_status_store(statuses);
    }

    Ok(builder.build())
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({"message": "phone control agent backend running"}))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

async fn pair_device(
    State(state): State<AppState>,
    Json(payload): Json<PairDeviceRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorBody>)> {
    let ack = state.api.pair_device(payload).await.map_err(map_api_error)?;
    Ok(Json(ack))
}

async fn list_pairings(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorBody>)> {
    let pairings = state.api.list_pairings().await.map_err(map_api_error)?;
    Ok(Json(pairings))
}

async fn plan_command(
    State(state): State<AppState>,
    Json(payload): Json<PlanCommandRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorBody>)> {
    let command = state.api.plan_command(payload).await.map_err(map_api_error)?;
    Ok(Json(command))
}

async fn pull_actions(
    State(state): State<AppState>,
    Json(payload): Json<PullActionsRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorBody>)> {
    let actions = state.api.pull_actions(payload).await.map_err(map_api_error)?;
    Ok(Json(serde_json::json!({ "actions": actions })))
}

async fn record_status(
    State(state): State<AppState>,
    Json(payload): Json<RecordStatusRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorBody>)> {
    let ack = state.api.record_status(payload).await.map_err(map_api_error)?;
    Ok(Json(ack))
}

async fn device_status(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorBody>)> {
    let events = state
        .api
        .device_status(&device_id)
        .await
        .map_err(map_api_error)?;
    Ok(Json(serde_json::json!({ "events": events })))
}

async fn history(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorBody>)> {
    let commands = state.api.history().await.map_err(map_api_error)?;
    Ok(Json(commands))
}

fn map_api_error(err: phonectl_api::ApiError) -> (StatusCode, Json<ErrorBody>) {
    let (status, code) = match err.code() {
        phonectl_api::ErrorCode::NotFound => (StatusCode::NOT_FOUND, "not_found"),
        phonectl_api::ErrorCode::Conflict => (StatusCode::CONFLICT, "conflict"),
        phonectl_api::ErrorCode::InvalidArgument => (StatusCode::BAD_REQUEST, "invalid_argument"),
        phonectl_api::ErrorCode::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
    };
    (
        status,
        Json(ErrorBody {
            code: code.to_string(),
            message: err.to_string(),
        }),
    )
}
