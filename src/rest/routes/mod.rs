pub mod auth;
pub mod employees;
pub mod health;
pub mod logs;
pub mod plans;
pub mod records;
pub mod tasks;
