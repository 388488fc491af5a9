// rest/routes/employees.rs — employee CRUD.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::error::ApiError;
use crate::AppContext;

#[derive(Deserialize)]
pub struct AddEmployeeRequest {
    #[serde(default)]
    pub user_email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

pub async fn add_employee(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<AddEmployeeRequest>,
) -> Result<Json<Value>, ApiError> {
    if body.user_email.is_empty()
        || body.name.is_empty()
        || body.username.is_empty()
        || body.password.is_empty()
    {
        return Err(ApiError::InvalidInput("all fields are required".into()));
    }

    // Pre-check for a friendly message; the UNIQUE constraint still backstops
    // races with a constraint error.
    if ctx
        .storage
        .get_employee_by_username(&body.username)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict("username already exists".into()));
    }

    ctx.storage
        .create_employee(&body.user_email, &body.name, &body.username, &body.password)
        .await?;
    Ok(Json(json!({
        "success": true,
        "message": "Employee added successfully!",
    })))
}

/// All employees registered under one admin account.
pub async fn get_employees(
    State(ctx): State<Arc<AppContext>>,
    Path(user_email): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let employees = ctx.storage.list_employees(&user_email).await?;
    if employees.is_empty() {
        return Err(ApiError::NotFound("user not found".into()));
    }
    let list: Vec<Value> = employees
        .iter()
        .map(|e| json!({ "id": e.id, "name": e.name, "username": e.username }))
        .collect();
    Ok(Json(json!(list)))
}

pub async fn delete_employee(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    if !ctx.storage.delete_employee(id).await? {
        return Err(ApiError::NotFound("employee not found".into()));
    }
    Ok(Json(json!({
        "success": true,
        "message": "Employee deleted successfully!",
    })))
}
