use chrono::Utc;
use sqlx::{sqlite::SqliteConnectOptions, ConnectOptions, SqlitePool};
use std::{path::Path, str::FromStr};

use crate::planner::{PlanDocument, TaskAssignment, TeamRoster, SYSTEM_ASSIGNEE};

/// Queries slower than this are logged at WARN level.
const SLOW_QUERY: std::time::Duration = std::time::Duration::from_millis(100);

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    /// Salted hash, `sha256$<salt>$<digest>` — see `auth::hash_password`.
    pub password: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EmployeeRow {
    pub id: i64,
    pub user_email: String,
    pub name: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LoginLogRow {
    pub id: i64,
    pub username: String,
    pub login_time: Option<String>,
    pub logout_time: Option<String>,
    pub date: String,
}

/// Serialized field names match what the frontend expects from the
/// original wire format ("assignwork", "missingskill", …).
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct PlanRow {
    pub id: i64,
    pub ps: String,
    pub skills_tech: String,
    #[serde(rename = "assignwork")]
    pub assign_work: String,
    #[serde(rename = "missingskill")]
    pub missing_skills: String,
    #[serde(rename = "approachmissingskill")]
    pub approach_missing_skills: String,
    #[serde(rename = "milestone")]
    pub milestones: String,
    pub duration: String,
    pub created_at: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TeamRow {
    pub id: i64,
    pub emp_name: String,
    pub plan_id: i64,
    pub assign_work: Option<String>,
    pub email: Option<String>,
    pub status: Option<String>,
    pub ps: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct StatusRow {
    pub ps: Option<String>,
    pub status: Option<String>,
}

/// Team ⋈ login_logs join row for the visualization endpoint.
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct VisualizationRow {
    pub emp_name: String,
    pub date: String,
    pub login_time: Option<String>,
    pub logout_time: Option<String>,
    pub ps: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct PlanRecordSummaryRow {
    pub id: i64,
    pub ps: String,
    pub skills_tech: String,
    #[serde(rename = "assignwork")]
    pub assign_work: String,
    pub created_at: String,
}

#[derive(Clone)]
pub struct Storage {
    pool: SqlitePool,
}

impl Storage {
    pub async fn new(data_dir: &Path) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(data_dir).await?;
        let db_path = data_dir.join("pland.db");
        let opts =
            SqliteConnectOptions::from_str(&format!("sqlite://{}?mode=rwc", db_path.display()))?
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
                .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
                .create_if_missing(true)
                .log_slow_statements(log::LevelFilter::Warn, SLOW_QUERY);

        let pool = SqlitePool::connect_with(opts).await?;
        sqlx::migrate!("src/storage/migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    /// Return a clone of the connection pool (cheap — Arc-backed).
    pub fn pool(&self) -> SqlitePool {
        self.pool.clone()
    }

    // ─── Users ──────────────────────────────────────────────────────────────

    pub async fn create_user(&self, email: &str, password_hash: &str) -> sqlx::Result<UserRow> {
        sqlx::query("INSERT INTO users (email, password) VALUES (?, ?)")
            .bind(email)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;
        sqlx::query_as("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await
    }

    pub async fn get_user_by_email(&self, email: &str) -> sqlx::Result<Option<UserRow>> {
        sqlx::query_as("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn first_user_email(&self) -> sqlx::Result<Option<String>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT email FROM users ORDER BY id LIMIT 1")
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(email,)| email))
    }

    // ─── Employees ──────────────────────────────────────────────────────────

    pub async fn create_employee(
        &self,
        user_email: &str,
        name: &str,
        username: &str,
        password: &str,
    ) -> sqlx::Result<EmployeeRow> {
        sqlx::query(
            "INSERT INTO employees (user_email, name, username, password) VALUES (?, ?, ?, ?)",
        )
        .bind(user_email)
        .bind(name)
        .bind(username)
        .bind(password)
        .execute(&self.pool)
        .await?;
        sqlx::query_as("SELECT * FROM employees WHERE username = ?")
            .bind(username)
            .fetch_one(&self.pool)
            .await
    }

    pub async fn get_employee_by_username(
        &self,
        username: &str,
    ) -> sqlx::Result<Option<EmployeeRow>> {
        sqlx::query_as("SELECT * FROM employees WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn list_employees(&self, user_email: &str) -> sqlx::Result<Vec<EmployeeRow>> {
        sqlx::query_as("SELECT * FROM employees WHERE user_email = ? ORDER BY id")
            .bind(user_email)
            .fetch_all(&self.pool)
            .await
    }

    /// Returns `false` when no employee had that id.
    pub async fn delete_employee(&self, id: i64) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM employees WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ─── Task assignments ───────────────────────────────────────────────────

    pub async fn insert_task(&self, employee_name: &str, task: &str) -> sqlx::Result<()> {
        let now = Utc::now().to_rfc3339();
        sqlx::query("INSERT INTO tasks (employee_name, task, created_at) VALUES (?, ?, ?)")
            .bind(employee_name)
            .bind(task)
            .bind(&now)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn list_team_for_email(&self, email: &str) -> sqlx::Result<Vec<TeamRow>> {
        sqlx::query_as("SELECT * FROM team WHERE email = ? ORDER BY id")
            .bind(email)
            .fetch_all(&self.pool)
            .await
    }

    pub async fn delete_team_row(&self, id: i64) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM team WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_assign_work(&self, emp_name: &str) -> sqlx::Result<Vec<String>> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT COALESCE(assign_work, '') FROM team WHERE emp_name = ?")
                .bind(emp_name)
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(|(work,)| work).collect())
    }

    pub async fn list_status(&self, emp_name: &str) -> sqlx::Result<Vec<StatusRow>> {
        sqlx::query_as("SELECT ps, status FROM team WHERE emp_name = ?")
            .bind(emp_name)
            .fetch_all(&self.pool)
            .await
    }

    /// All plans an employee appears on, newest first.
    pub async fn plans_for_employee(&self, emp_name: &str) -> sqlx::Result<Vec<PlanRow>> {
        sqlx::query_as(
            "SELECT DISTINCT p.* FROM plans p
             JOIN team t ON t.plan_id = p.id
             WHERE t.emp_name = ?
             ORDER BY p.id DESC",
        )
        .bind(emp_name)
        .fetch_all(&self.pool)
        .await
    }

    /// Status update is keyed by (employee, problem statement) — the same
    /// employee can sit on several plans.
    pub async fn update_team_status(
        &self,
        emp_name: &str,
        ps: &str,
        status: &str,
    ) -> sqlx::Result<bool> {
        let result = sqlx::query("UPDATE team SET status = ? WHERE emp_name = ? AND ps = ?")
            .bind(status)
            .bind(emp_name)
            .bind(ps)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ─── Generated plans ────────────────────────────────────────────────────

    /// Persist one generation result atomically: the plan row, one team row
    /// per roster member, and one task row per assignment (including the
    /// synthetic SYSTEM assignment). Returns the new plan id.
    pub async fn save_generated_plan(
        &self,
        doc: &PlanDocument,
        roster: &TeamRoster,
        requester_email: &str,
        assignments: &[TaskAssignment],
    ) -> sqlx::Result<i64> {
        let now = Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await?;

        let plan_id = sqlx::query(
            "INSERT INTO plans (ps, skills_tech, assign_work, missing_skills,
                                approach_missing_skills, milestones, duration, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&doc.problem_statement)
        .bind(&doc.skills_and_tech)
        .bind(&doc.assigned_work)
        .bind(&doc.missing_skills)
        .bind(&doc.approach_for_missing_skills)
        .bind(&doc.milestones)
        .bind(&doc.duration)
        .bind(&now)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        for name in roster.keys() {
            sqlx::query(
                "INSERT INTO team (emp_name, plan_id, assign_work, email, ps)
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(name)
            .bind(plan_id)
            .bind(&doc.assigned_work)
            .bind(requester_email)
            .bind(&doc.problem_statement)
            .execute(&mut *tx)
            .await?;
        }

        for assignment in assignments {
            sqlx::query("INSERT INTO tasks (employee_name, task, created_at) VALUES (?, ?, ?)")
                .bind(&assignment.employee)
                .bind(&assignment.task)
                .bind(&now)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(plan_id)
    }

    /// Count of task rows excluding the synthetic SYSTEM entries.
    pub async fn count_employee_tasks(&self) -> sqlx::Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE employee_name != ?")
            .bind(SYSTEM_ASSIGNEE)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }

    // ─── Login / logout log ─────────────────────────────────────────────────

    /// Record a login for (username, date), keeping the EARLIEST login of the
    /// day. `time` is "HH:MM:SS", so lexicographic comparison is also
    /// chronological.
    pub async fn record_login(&self, username: &str, date: &str, time: &str) -> sqlx::Result<()> {
        sqlx::query(
            "INSERT INTO login_logs (username, date, login_time) VALUES (?, ?, ?)
             ON CONFLICT (username, date) DO UPDATE SET
               login_time = CASE
                 WHEN login_logs.login_time IS NULL
                   OR excluded.login_time < login_logs.login_time
                 THEN excluded.login_time
                 ELSE login_logs.login_time
               END",
        )
        .bind(username)
        .bind(date)
        .bind(time)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Record a logout for (username, date), keeping the LATEST logout of the
    /// day. A logout without a prior login still creates the day's row.
    pub async fn record_logout(&self, username: &str, date: &str, time: &str) -> sqlx::Result<()> {
        sqlx::query(
            "INSERT INTO login_logs (username, date, logout_time) VALUES (?, ?, ?)
             ON CONFLICT (username, date) DO UPDATE SET
               logout_time = CASE
                 WHEN login_logs.logout_time IS NULL
                   OR excluded.logout_time > login_logs.logout_time
                 THEN excluded.logout_time
                 ELSE login_logs.logout_time
               END",
        )
        .bind(username)
        .bind(date)
        .bind(time)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get_login_log(
        &self,
        username: &str,
        date: &str,
    ) -> sqlx::Result<Option<LoginLogRow>> {
        sqlx::query_as("SELECT * FROM login_logs WHERE username = ? AND date = ?")
            .bind(username)
            .bind(date)
            .fetch_optional(&self.pool)
            .await
    }

    /// Team rows joined with that employee's login records, for the
    /// visualization view. Only days with a login are included.
    pub async fn visualization(&self, email: &str) -> sqlx::Result<Vec<VisualizationRow>> {
        sqlx::query_as(
            "SELECT t.emp_name, l.date, l.login_time, l.logout_time, t.ps, t.status
             FROM team t
             JOIN login_logs l ON t.emp_name = l.username
             WHERE t.email = ? AND l.login_time IS NOT NULL
             ORDER BY l.date DESC, t.emp_name",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await
    }

    // ─── Saved plan records ─────────────────────────────────────────────────

    #[allow(clippy::too_many_arguments)]
    pub async fn save_plan_record(
        &self,
        user_email: &str,
        ps: &str,
        skills_tech: &str,
        assign_work: &str,
        missing_skills: &str,
        approach_missing_skills: &str,
        milestones: &str,
        duration: &str,
    ) -> sqlx::Result<i64> {
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query(
            "INSERT INTO plan_records (user_email, ps, skills_tech, assign_work,
                                       missing_skills, approach_missing_skills,
                                       milestones, duration, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(user_email)
        .bind(ps)
        .bind(skills_tech)
        .bind(assign_work)
        .bind(missing_skills)
        .bind(approach_missing_skills)
        .bind(milestones)
        .bind(duration)
        .bind(&now)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    pub async fn list_plan_records(
        &self,
        user_email: &str,
    ) -> sqlx::Result<Vec<PlanRecordSummaryRow>> {
        sqlx::query_as(
            "SELECT id, ps, skills_tech, assign_work, created_at
             FROM plan_records
             WHERE user_email = ?
             ORDER BY created_at DESC",
        )
        .bind(user_email)
        .fetch_all(&self.pool)
        .await
    }

    /// Delete a saved record, scoped to its owner. Returns `false` when no
    /// row matched (wrong id or wrong owner).
    pub async fn delete_plan_record(&self, id: i64, user_email: &str) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM plan_records WHERE id = ? AND user_email = ?")
            .bind(id)
            .bind(user_email)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
