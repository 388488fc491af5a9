// rest/routes/logs.rs — login/logout time bookkeeping and the admin
// visualization view built on top of it.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Local;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::error::ApiError;
use crate::AppContext;

#[derive(Deserialize)]
pub struct LogRequest {
    #[serde(default)]
    pub username: String,
}

fn now_strings() -> (String, String) {
    let now = Local::now();
    (
        now.format("%Y-%m-%d").to_string(),
        now.format("%H:%M:%S").to_string(),
    )
}

/// Record a login; only the earliest login of the day is kept.
pub async fn log_login(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<LogRequest>,
) -> Result<Json<Value>, ApiError> {
    if body.username.is_empty() {
        return Err(ApiError::InvalidInput("username is required".into()));
    }
    let (date, time) = now_strings();
    ctx.storage.record_login(&body.username, &date, &time).await?;
    Ok(Json(json!({ "success": true })))
}

/// Record a logout; only the latest logout of the day is kept.
pub async fn log_logout(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<LogRequest>,
) -> Result<Json<Value>, ApiError> {
    if body.username.is_empty() {
        return Err(ApiError::InvalidInput("username is required".into()));
    }
    let (date, time) = now_strings();
    ctx.storage
        .record_logout(&body.username, &date, &time)
        .await?;
    Ok(Json(json!({ "success": true })))
}

/// Attendance × assignment join for the admin dashboard.
pub async fn visualization(
    State(ctx): State<Arc<AppContext>>,
    Path(email): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let rows = ctx.storage.visualization(&email).await?;
    Ok(Json(json!(rows)))
}
