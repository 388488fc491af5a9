// rest/mod.rs — public HTTP API server.
//
// Axum server on port 5001 by default, CORS open for the SPA frontend.
// Paths mirror what the frontend already calls:
//
//   POST   /auth/register           POST   /auth/login
//   POST   /login                   GET    /health
//   POST   /generate-plan
//   POST   /employees               GET    /employees/{user_email}
//   DELETE /employees/{id}
//   POST   /assign-work             GET    /assign-work/{email}
//   DELETE /delete-task/{id}
//   GET    /get-assignwork?name=    GET    /get-status?name=
//   GET    /get-assignPlan/?name=   POST   /update-status
//   POST   /log-login               POST   /log-logout
//   GET    /visualization/{email}   GET    /get-current-user
//   POST   /save-plan-record        POST   /get-plan-records
//   POST   /delete-plan-record

pub mod routes;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::AppContext;

pub async fn serve(ctx: Arc<AppContext>) -> Result<()> {
    let bind = format!("{}:{}", ctx.config.bind_address, ctx.config.port);
    let addr: SocketAddr = bind.parse()?;

    let router = build_router(ctx);

    info!("HTTP API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

pub fn build_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/health", get(routes::health::health))
        // Accounts
        .route("/auth/register", post(routes::auth::register))
        .route("/auth/login", post(routes::auth::login))
        .route("/login", post(routes::auth::combined_login))
        .route("/get-current-user", get(routes::auth::get_current_user))
        // Plan generation and per-employee plan views
        .route("/generate-plan", post(routes::plans::generate_plan))
        .route("/get-assignwork", get(routes::plans::get_assign_work))
        .route("/get-status", get(routes::plans::get_status))
        .route("/get-assignPlan/", get(routes::plans::get_assign_plan))
        .route("/update-status", post(routes::plans::update_status))
        // Employees
        .route("/employees", post(routes::employees::add_employee))
        .route(
            "/employees/{key}",
            get(routes::employees::get_employees).delete(routes::employees::delete_employee),
        )
        // Task assignments
        .route("/assign-work", post(routes::tasks::assign_work))
        .route("/assign-work/{email}", get(routes::tasks::get_assigned_tasks))
        .route("/delete-task/{id}", axum::routing::delete(routes::tasks::delete_task))
        // Login/logout bookkeeping
        .route("/log-login", post(routes::logs::log_login))
        .route("/log-logout", post(routes::logs::log_logout))
        .route("/visualization/{email}", get(routes::logs::visualization))
        // Saved plan records
        .route("/save-plan-record", post(routes::records::save_plan_record))
        .route("/get-plan-records", post(routes::records::get_plan_records))
        .route(
            "/delete-plan-record",
            post(routes::records::delete_plan_record),
        )
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}
