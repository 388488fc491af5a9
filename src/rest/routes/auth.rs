// rest/routes/auth.rs — registration and the two login flavours.

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::auth::{self, LoginIdentity};
use crate::error::ApiError;
use crate::AppContext;

#[derive(Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

pub async fn register(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<CredentialsRequest>,
) -> Result<Json<Value>, ApiError> {
    auth::register(&ctx.storage, &body.email, &body.password).await?;
    Ok(Json(json!({
        "success": true,
        "message": "User registered successfully",
    })))
}

/// Admin login against the `users` table only.
pub async fn login(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<CredentialsRequest>,
) -> Result<Json<Value>, ApiError> {
    let user = auth::login(&ctx.storage, &body.email, &body.password).await?;
    Ok(Json(json!({
        "success": true,
        "user": { "id": user.id, "email": user.email },
    })))
}

/// Combined login: the same form serves admins (by email) and employees
/// (by username). The response carries the matched role.
pub async fn combined_login(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<CredentialsRequest>,
) -> Result<Json<Value>, ApiError> {
    match auth::combined_login(&ctx.storage, &body.email, &body.password).await? {
        LoginIdentity::Admin(user) => Ok(Json(json!({
            "success": true,
            "role": "admin",
            "user": { "id": user.id, "email": user.email },
        }))),
        LoginIdentity::Employee(employee) => Ok(Json(json!({
            "success": true,
            "role": "employee",
            "employee": {
                "id": employee.id,
                "username": employee.username,
                "name": employee.name,
            },
        }))),
    }
}

pub async fn get_current_user(
    State(ctx): State<Arc<AppContext>>,
) -> Result<Json<Value>, ApiError> {
    let email = ctx
        .storage
        .first_user_email()
        .await?
        .ok_or_else(|| ApiError::NotFound("no users found".into()))?;
    Ok(Json(json!({
        "success": true,
        "user": { "email": email },
    })))
}
