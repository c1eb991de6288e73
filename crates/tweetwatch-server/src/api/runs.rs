use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use tweetwatch_core::CrawlMode;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct RunRequest {
    pub account_name: String,
    pub lang: String,
    #[serde(default)]
    pub mode: CrawlMode,
}

#[derive(Debug, Serialize)]
pub(super) struct RunAccepted {
    pub account_name: String,
    pub lang: String,
    pub mode: CrawlMode,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub(super) struct SweepAccepted {
    pub status: &'static str,
}

/// POST /api/v1/runs: crawl and classify one account now.
pub(super) async fn trigger_run(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<RunRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RunAccepted>>), ApiError> {
    let account_name = body.account_name.trim().to_owned();
    let lang = body.lang.trim().to_owned();
    if account_name.is_empty() || lang.is_empty() {
        return Err(ApiError::new(
            &req_id.0,
            "validation_error",
            "account_name and lang must not be empty",
        ));
    }

    tracing::info!(
        account = %account_name,
        lang = %lang,
        mode = %body.mode,
        "api: pipeline run requested"
    );
    state
        .observer
        .run_now(account_name.clone(), lang.clone(), body.mode);

    Ok((
        StatusCode::ACCEPTED,
        Json(ApiResponse::new(
            RunAccepted {
                account_name,
                lang,
                mode: body.mode,
                status: "accepted",
            },
            req_id.0,
        )),
    ))
}

/// POST /api/v1/sweeps: reconcile unclassified tweets now.
pub(super) async fn trigger_sweep(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> (StatusCode, Json<ApiResponse<SweepAccepted>>) {
    tracing::info!("api: reconciliation sweep requested");
    state.observer.sweep_now();
    (
        StatusCode::ACCEPTED,
        Json(ApiResponse::new(
            SweepAccepted { status: "accepted" },
            req_id.0,
        )),
    )
}
