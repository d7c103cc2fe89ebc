use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use chrono::NaiveDateTime;
use serde::Deserialize;

use super::error::ApiError;
use crate::application::ports::LlmClient;
use crate::domain::{CallDetailQuery, CallDirection};
use crate::presentation::state::{AppState, CdrDefaults};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YeastarCallsParams {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub direction: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[tracing::instrument(skip(state, params))]
pub async fn yeastar_calls_handler<L>(
    State(state): State<AppState<L>>,
    params: Result<Query<YeastarCallsParams>, QueryRejection>,
) -> Result<Json<serde_json::Value>, ApiError>
where
    L: LlmClient + 'static,
{
    let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let (start, end) = resolve_window(&params, &state.cdr_defaults)?;
    let direction = params
        .direction
        .as_deref()
        .map(str::parse::<CallDirection>)
        .transpose()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
        .unwrap_or_default();

    let listing = state
        .cdr_query_service
        .list_calls(
            start,
            end,
            direction,
            params.limit.unwrap_or(state.cdr_defaults.limit),
            params.offset.unwrap_or(0),
        )
        .await?;

    Ok(Json(listing))
}

/// Missing `endTime` means now; missing `startTime` means one default window
/// before the end.
fn resolve_window(
    params: &YeastarCallsParams,
    defaults: &CdrDefaults,
) -> Result<(NaiveDateTime, NaiveDateTime), ApiError> {
    let parse = |value: &str| {
        CallDetailQuery::parse_timestamp(value).map_err(|e| ApiError::BadRequest(e.to_string()))
    };

    let end = match params.end_time.as_deref() {
        Some(value) => parse(value)?,
        None => chrono::Local::now().naive_local(),
    };
    let start = match params.start_time.as_deref() {
        Some(value) => parse(value)?,
        None => end - defaults.window,
    };

    Ok((start, end))
}
