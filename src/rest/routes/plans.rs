// rest/routes/plans.rs — plan generation and the per-employee plan views.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::error::ApiError;
use crate::planner::{self, TeamRoster};
use crate::AppContext;

#[derive(Deserialize)]
pub struct GeneratePlanRequest {
    #[serde(default)]
    pub problem_statement: String,
    #[serde(default)]
    pub team_members: TeamRoster,
    /// Months. Accepts a JSON number or a numeric string.
    #[serde(default)]
    pub duration: Option<Value>,
    #[serde(default)]
    pub email: String,
}

fn duration_months(raw: &Option<Value>) -> Result<f64, ApiError> {
    let value = raw
        .as_ref()
        .ok_or_else(|| ApiError::InvalidInput("duration is required".into()))?;
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| ApiError::InvalidInput("duration is not a valid number".into())),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| ApiError::InvalidInput(format!("duration {s:?} is not a number"))),
        _ => Err(ApiError::InvalidInput("duration must be a number".into())),
    }
}

pub async fn generate_plan(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<GeneratePlanRequest>,
) -> Result<Json<Value>, ApiError> {
    let duration = duration_months(&body.duration)?;
    let generated = planner::generate_plan(
        &ctx.storage,
        ctx.llm.as_ref(),
        &body.problem_statement,
        &body.team_members,
        duration,
        &body.email,
    )
    .await?;

    Ok(Json(json!({
        "plan_id": generated.plan_id,
        "project_plan": generated.raw_text,
        "budget": generated.budget,
        "assigned_tasks": generated.assignments,
    })))
}

#[derive(Deserialize)]
pub struct NameQuery {
    pub name: Option<String>,
}

fn require_name(q: &NameQuery) -> Result<&str, ApiError> {
    q.name
        .as_deref()
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::InvalidInput("name parameter is required".into()))
}

/// All stored assign-work blocks for one employee.
pub async fn get_assign_work(
    State(ctx): State<Arc<AppContext>>,
    Query(q): Query<NameQuery>,
) -> Result<Json<Value>, ApiError> {
    let name = require_name(&q)?;
    let work = ctx.storage.list_assign_work(name).await?;
    Ok(Json(json!({ "assignwork": work })))
}

/// (problem statement, status) pairs for one employee.
pub async fn get_status(
    State(ctx): State<Arc<AppContext>>,
    Query(q): Query<NameQuery>,
) -> Result<Json<Value>, ApiError> {
    let name = require_name(&q)?;
    let rows = ctx.storage.list_status(name).await?;
    Ok(Json(json!({ "assignwork": rows })))
}

/// Full plan rows for every plan the employee appears on.
pub async fn get_assign_plan(
    State(ctx): State<Arc<AppContext>>,
    Query(q): Query<NameQuery>,
) -> Result<Json<Value>, ApiError> {
    let name = require_name(&q)?;
    let plans = ctx.storage.plans_for_employee(name).await?;
    Ok(Json(json!({ "assignwork": plans })))
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    #[serde(default)]
    pub name: String,
    /// The plan's problem statement — status rows are keyed (employee, ps).
    #[serde(default)]
    pub task: String,
    #[serde(default)]
    pub status: String,
}

pub async fn update_status(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<Value>, ApiError> {
    if body.name.is_empty() || body.status.is_empty() {
        return Err(ApiError::InvalidInput("missing parameters".into()));
    }
    if !ctx
        .storage
        .update_team_status(&body.name, &body.task, &body.status)
        .await?
    {
        return Err(ApiError::NotFound("no matching assignment".into()));
    }
    Ok(Json(json!({ "success": true })))
}
