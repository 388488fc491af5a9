// rest/routes/records.rs — saved plan records (the user's plan history).
//
// Field names on the wire ("assignwork", "missingskill", …) match what the
// frontend already sends.

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::error::ApiError;
use crate::AppContext;

#[derive(Deserialize)]
pub struct SavePlanRecordRequest {
    #[serde(default)]
    pub user_email: String,
    #[serde(default)]
    pub ps: String,
    #[serde(default)]
    pub skills_tech: String,
    #[serde(default)]
    pub assignwork: String,
    #[serde(default)]
    pub missingskill: String,
    #[serde(default)]
    pub approachmissingskill: String,
    #[serde(default)]
    pub milestone: String,
    #[serde(default)]
    pub duration: String,
}

pub async fn save_plan_record(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<SavePlanRecordRequest>,
) -> Result<Json<Value>, ApiError> {
    if body.user_email.is_empty()
        || body.ps.is_empty()
        || body.skills_tech.is_empty()
        || body.assignwork.is_empty()
    {
        return Err(ApiError::InvalidInput("missing required fields".into()));
    }

    let plan_id = ctx
        .storage
        .save_plan_record(
            &body.user_email,
            &body.ps,
            &body.skills_tech,
            &body.assignwork,
            &body.missingskill,
            &body.approachmissingskill,
            &body.milestone,
            &body.duration,
        )
        .await?;
    Ok(Json(json!({
        "success": true,
        "message": "Plan saved successfully",
        "plan_id": plan_id,
    })))
}

#[derive(Deserialize)]
pub struct UserEmailRequest {
    pub user_email: Option<String>,
}

pub async fn get_plan_records(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<UserEmailRequest>,
) -> Result<Json<Value>, ApiError> {
    let user_email = body
        .user_email
        .as_deref()
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ApiError::InvalidInput("user_email required".into()))?;
    let plans = ctx.storage.list_plan_records(user_email).await?;
    Ok(Json(json!({ "success": true, "plans": plans })))
}

#[derive(Deserialize)]
pub struct DeletePlanRecordRequest {
    pub plan_id: Option<i64>,
    pub user_email: Option<String>,
}

pub async fn delete_plan_record(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<DeletePlanRecordRequest>,
) -> Result<Json<Value>, ApiError> {
    let (plan_id, user_email) = match (body.plan_id, body.user_email.as_deref()) {
        (Some(id), Some(email)) if !email.is_empty() => (id, email),
        _ => {
            return Err(ApiError::InvalidInput(
                "plan_id and user_email required".into(),
            ))
        }
    };
    if !ctx.storage.delete_plan_record(plan_id, user_email).await? {
        return Err(ApiError::NotFound("plan not found".into()));
    }
    Ok(Json(json!({
        "success": true,
        "message": "Plan deleted successfully",
    })))
}
