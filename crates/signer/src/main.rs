use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use futures::future::join_all;
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{sign_batch_route, SignBatchRequest, SignBatchResponse, SignedUrlResult},
};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{info, warn};

mod config;
mod storage_api;

use config::load_settings;
use storage_api::{HttpObjectStore, ObjectStore};

/// A batch is only a list of object paths, so anything large is abuse.
const MAX_BODY_BYTES: usize = 64 * 1024;

struct AppState {
    store: Arc<dyn ObjectStore>,
    default_bucket: String,
    default_expiry_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings();
    let store = HttpObjectStore::new(&settings.storage_url, settings.service_key.clone())?;
    let state = AppState {
        store: Arc::new(store),
        default_bucket: settings.default_bucket.clone(),
        default_expiry_secs: settings.default_expiry_secs,
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.bind.parse()?;
    info!(%addr, storage_url = %settings.storage_url, "signer listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(sign_batch_route(), post(sign_batch))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

/// Signs every requested path, reporting per-path failures inline.
///
/// The response is 200 even when some (or all) paths fail; only an empty
/// batch is a client error. Paths are signed concurrently and results come
/// back in request order.
async fn sign_batch(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignBatchRequest>,
) -> Result<Json<SignBatchResponse>, (StatusCode, Json<ApiError>)> {
    if req.paths.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiError::new(
                ErrorCode::Validation,
                "paths must not be empty",
            )),
        ));
    }
    let bucket = req.bucket.unwrap_or_else(|| state.default_bucket.clone());
    let expires_in = req.expires_in.unwrap_or(state.default_expiry_secs);

    let results = join_all(req.paths.into_iter().map(|path| {
        let state = state.clone();
        let bucket = bucket.clone();
        async move {
            match state
                .store
                .create_signed_url(&bucket, &path, expires_in)
                .await
            {
                Ok(url) => SignedUrlResult::signed(path, url),
                Err(err) => {
                    warn!(%bucket, %path, error = %err, "signer: signing failed");
                    SignedUrlResult::failed(path, err.to_string())
                }
            }
        }
    }))
    .await;

    Ok(Json(SignBatchResponse { results }))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
