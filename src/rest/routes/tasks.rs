// rest/routes/tasks.rs — manual task assignment CRUD.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::error::ApiError;
use crate::planner::TaskAssignment;
use crate::AppContext;

#[derive(Deserialize)]
pub struct AssignWorkRequest {
    #[serde(default)]
    pub assigned_tasks: Vec<TaskAssignment>,
}

pub async fn assign_work(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<AssignWorkRequest>,
) -> Result<Json<Value>, ApiError> {
    if body.assigned_tasks.is_empty() {
        return Err(ApiError::InvalidInput("no tasks to assign".into()));
    }
    for assignment in &body.assigned_tasks {
        ctx.storage
            .insert_task(&assignment.employee, &assignment.task)
            .await?;
    }
    Ok(Json(json!({
        "success": true,
        "message": "Tasks assigned successfully!",
    })))
}

/// Team rows for one admin account, shaped for the task board.
pub async fn get_assigned_tasks(
    State(ctx): State<Arc<AppContext>>,
    Path(email): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let rows = ctx.storage.list_team_for_email(&email).await?;
    let list: Vec<Value> = rows
        .iter()
        .map(|t| {
            json!({
                "id": t.id,
                "employee_name": t.emp_name,
                "task": t.assign_work,
            })
        })
        .collect();
    Ok(Json(json!(list)))
}

pub async fn delete_task(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    if !ctx.storage.delete_team_row(id).await? {
        return Err(ApiError::NotFound("task not found".into()));
    }
    Ok(Json(json!({
        "success": true,
        "message": "Task deleted successfully!",
    })))
}
