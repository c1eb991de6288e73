//! Watch, unwatch, and list observed accounts.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tweetwatch_core::{resolve_interval, ObservableConfig};

use crate::middleware::RequestId;
use crate::observer::WatchError;
use crate::scheduler::UpsertOutcome;

use super::{ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct WatchRequest {
    pub account_name: String,
    pub interval: String,
    pub lang: String,
}

#[derive(Debug, Serialize)]
pub(super) struct ObservableItem {
    pub account_name: String,
    pub interval: String,
    pub lang: String,
    /// Cron expression the interval resolves to.
    pub schedule: String,
}

impl From<ObservableConfig> for ObservableItem {
    fn from(config: ObservableConfig) -> Self {
        Self {
            schedule: resolve_interval(&config.interval),
            account_name: config.account_name,
            interval: config.interval,
            lang: config.lang,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct WatchResponse {
    pub outcome: &'static str,
    pub observable: ObservableItem,
}

#[derive(Debug, Serialize)]
pub(super) struct UnwatchResponse {
    pub account_name: String,
    pub removed: bool,
}

fn map_watch_error(req_id: &str, error: &WatchError) -> ApiError {
    match error {
        WatchError::InvalidConfig(e) => ApiError::new(req_id, "validation_error", e.to_string()),
        WatchError::AccountNotFound(account) => ApiError::new(
            req_id,
            "not_found",
            format!("account {account} does not exist"),
        ),
        WatchError::AccountCheckUnavailable { account, .. } => ApiError::new(
            req_id,
            "upstream_unavailable",
            format!("could not confirm that account {account} exists"),
        ),
        WatchError::Schedule(e) => {
            tracing::error!(error = %e, "scheduler operation failed");
            ApiError::new(req_id, "internal_error", "scheduler operation failed")
        }
    }
}

/// GET /api/v1/observables
pub(super) async fn list_observables(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<ObservableItem>>> {
    let data = state
        .observer
        .observables()
        .await
        .into_iter()
        .map(ObservableItem::from)
        .collect();
    Json(ApiResponse::new(data, req_id.0))
}

/// GET /api/v1/observables/{account_name}
pub(super) async fn get_observable(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(account_name): Path<String>,
) -> Result<Json<ApiResponse<ObservableItem>>, ApiError> {
    let job = state
        .observer
        .observable(&account_name)
        .await
        .ok_or_else(|| {
            ApiError::new(
                &req_id.0,
                "not_found",
                format!("account {account_name} is not observed"),
            )
        })?;

    let item = ObservableItem {
        account_name: job.config.account_name,
        interval: job.config.interval,
        lang: job.config.lang,
        schedule: job.expression,
    };
    Ok(Json(ApiResponse::new(item, req_id.0)))
}

/// POST /api/v1/observables: watch an account, or change how it is watched.
pub(super) async fn watch_observable(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<WatchRequest>,
) -> Result<(StatusCode, Json<ApiResponse<WatchResponse>>), ApiError> {
    let config = ObservableConfig::new(
        body.account_name.trim(),
        body.interval.trim(),
        body.lang.trim(),
    );
    if config.lang.is_empty() {
        return Err(ApiError::new(
            &req_id.0,
            "validation_error",
            "lang must not be empty",
        ));
    }

    let outcome = state
        .observer
        .watch(config.clone())
        .await
        .map_err(|e| map_watch_error(&req_id.0, &e))?;

    let status = match outcome {
        UpsertOutcome::Created => StatusCode::CREATED,
        UpsertOutcome::Updated | UpsertOutcome::Unchanged => StatusCode::OK,
    };
    Ok((
        status,
        Json(ApiResponse::new(
            WatchResponse {
                outcome: outcome.as_str(),
                observable: config.into(),
            },
            req_id.0,
        )),
    ))
}

/// DELETE /api/v1/observables/{account_name}
pub(super) async fn unwatch_observable(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(account_name): Path<String>,
) -> Result<Json<ApiResponse<UnwatchResponse>>, ApiError> {
    let removed = state
        .observer
        .unwatch(&account_name)
        .await
        .map_err(|e| map_watch_error(&req_id.0, &e))?;

    if !removed {
        return Err(ApiError::new(
            &req_id.0,
            "not_found",
            format!("account {account_name} is not observed"),
        ));
    }

    Ok(Json(ApiResponse::new(
        UnwatchResponse {
            account_name,
            removed,
        },
        req_id.0,
    )))
}
