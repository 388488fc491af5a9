//! Storage-layer tests against a real SQLite database in a temp directory.

use pland::planner::{PlanDocument, TaskAssignment, TeamRoster, SYSTEM_ASSIGNEE};
use pland::storage::Storage;
use tempfile::TempDir;

async fn make_storage(dir: &TempDir) -> Storage {
    Storage::new(dir.path()).await.unwrap()
}

#[tokio::test]
async fn employee_crud() {
    let dir = TempDir::new().unwrap();
    let storage = make_storage(&dir).await;

    let emp = storage
        .create_employee("admin@corp.com", "Alice", "alice01", "pw")
        .await
        .unwrap();
    assert_eq!(emp.name, "Alice");
    assert_eq!(emp.user_email, "admin@corp.com");

    let listed = storage.list_employees("admin@corp.com").await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].username, "alice01");

    let found = storage
        .get_employee_by_username("alice01")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, emp.id);

    assert!(storage.delete_employee(emp.id).await.unwrap());
    assert!(!storage.delete_employee(emp.id).await.unwrap());
    assert!(storage
        .get_employee_by_username("alice01")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let dir = TempDir::new().unwrap();
    let storage = make_storage(&dir).await;

    storage
        .create_employee("admin@corp.com", "Alice", "alice01", "pw")
        .await
        .unwrap();
    let err = storage
        .create_employee("other@corp.com", "Alicia", "alice01", "pw2")
        .await
        .unwrap_err();
    match err {
        sqlx::Error::Database(db) => assert!(db.is_unique_violation()),
        other => panic!("expected unique violation, got {other:?}"),
    }
}

#[tokio::test]
async fn login_keeps_earliest_of_the_day() {
    let dir = TempDir::new().unwrap();
    let storage = make_storage(&dir).await;

    storage
        .record_login("alice01", "2026-08-30", "09:15:00")
        .await
        .unwrap();
    storage
        .record_login("alice01", "2026-08-30", "08:02:00")
        .await
        .unwrap();
    storage
        .record_login("alice01", "2026-08-30", "13:40:00")
        .await
        .unwrap();

    let row = storage
        .get_login_log("alice01", "2026-08-30")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.login_time.as_deref(), Some("08:02:00"));
    assert_eq!(row.logout_time, None);
}

#[tokio::test]
async fn logout_keeps_latest_even_without_login() {
    let dir = TempDir::new().unwrap();
    let storage = make_storage(&dir).await;

    // Logout with no prior login still creates the day's row.
    storage
        .record_logout("bob02", "2026-08-30", "12:00:00")
        .await
        .unwrap();
    storage
        .record_logout("bob02", "2026-08-30", "17:30:00")
        .await
        .unwrap();
    storage
        .record_logout("bob02", "2026-08-30", "16:00:00")
        .await
        .unwrap();

    let row = storage
        .get_login_log("bob02", "2026-08-30")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.login_time, None);
    assert_eq!(row.logout_time.as_deref(), Some("17:30:00"));

    // A later login fills in the missing side of the same row.
    storage
        .record_login("bob02", "2026-08-30", "08:45:00")
        .await
        .unwrap();
    let row = storage
        .get_login_log("bob02", "2026-08-30")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.login_time.as_deref(), Some("08:45:00"));
    assert_eq!(row.logout_time.as_deref(), Some("17:30:00"));
}

fn sample_doc() -> PlanDocument {
    PlanDocument {
        problem_statement: "Build a CRM".to_string(),
        skills_and_tech: "Rust, SQLite".to_string(),
        assigned_work: "Alice: backend".to_string(),
        missing_skills: "None".to_string(),
        approach_for_missing_skills: "N/A".to_string(),
        milestones: "Month 1: MVP".to_string(),
        duration: "3 months".to_string(),
    }
}

#[tokio::test]
async fn save_generated_plan_writes_all_three_tables() {
    let dir = TempDir::new().unwrap();
    let storage = make_storage(&dir).await;

    let roster = TeamRoster::from([
        ("Alice".to_string(), vec!["Python".to_string()]),
        ("Bob".to_string(), vec!["Cloud Computing".to_string()]),
    ]);
    let assignments = vec![
        TaskAssignment {
            employee: "Alice".to_string(),
            task: "Work on Build a CRM using Python".to_string(),
        },
        TaskAssignment {
            employee: SYSTEM_ASSIGNEE.to_string(),
            task: "assign work".to_string(),
        },
    ];

    let plan_id = storage
        .save_generated_plan(&sample_doc(), &roster, "admin@corp.com", &assignments)
        .await
        .unwrap();
    assert!(plan_id > 0);

    let team = storage.list_team_for_email("admin@corp.com").await.unwrap();
    assert_eq!(team.len(), 2);
    assert!(team.iter().all(|t| t.plan_id == plan_id));
    assert!(team.iter().any(|t| t.emp_name == "Alice"));
    assert!(team.iter().any(|t| t.emp_name == "Bob"));

    // SYSTEM rows are excluded from the per-employee task count.
    assert_eq!(storage.count_employee_tasks().await.unwrap(), 1);

    let plans = storage.plans_for_employee("Alice").await.unwrap();
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0].ps, "Build a CRM");
}

#[tokio::test]
async fn status_update_is_scoped_to_employee_and_plan() {
    let dir = TempDir::new().unwrap();
    let storage = make_storage(&dir).await;

    let roster = TeamRoster::from([
        ("Alice".to_string(), vec!["Python".to_string()]),
        ("Bob".to_string(), vec!["Python".to_string()]),
    ]);
    storage
        .save_generated_plan(&sample_doc(), &roster, "admin@corp.com", &[])
        .await
        .unwrap();

    assert!(storage
        .update_team_status("Alice", "Build a CRM", "In Progress")
        .await
        .unwrap());

    let alice = storage.list_status("Alice").await.unwrap();
    assert_eq!(alice[0].status.as_deref(), Some("In Progress"));
    let bob = storage.list_status("Bob").await.unwrap();
    assert_eq!(bob[0].status, None);

    assert!(!storage
        .update_team_status("Carol", "Build a CRM", "Done")
        .await
        .unwrap());
}

#[tokio::test]
async fn plan_records_are_owner_scoped() {
    let dir = TempDir::new().unwrap();
    let storage = make_storage(&dir).await;

    let id = storage
        .save_plan_record(
            "admin@corp.com",
            "Build a CRM",
            "Rust",
            "Alice: backend",
            "",
            "",
            "",
            "3 months",
        )
        .await
        .unwrap();

    let mine = storage.list_plan_records("admin@corp.com").await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].ps, "Build a CRM");
    assert!(storage
        .list_plan_records("other@corp.com")
        .await
        .unwrap()
        .is_empty());

    // Wrong owner cannot delete.
    assert!(!storage
        .delete_plan_record(id, "other@corp.com")
        .await
        .unwrap());
    assert!(storage
        .delete_plan_record(id, "admin@corp.com")
        .await
        .unwrap());
    assert!(storage
        .list_plan_records("admin@corp.com")
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn visualization_joins_team_and_logins() {
    let dir = TempDir::new().unwrap();
    let storage = make_storage(&dir).await;

    let roster = TeamRoster::from([("Alice".to_string(), vec!["Python".to_string()])]);
    storage
        .save_generated_plan(&sample_doc(), &roster, "admin@corp.com", &[])
        .await
        .unwrap();

    storage
        .record_login("Alice", "2026-08-30", "09:00:00")
        .await
        .unwrap();
    // A logout-only day has no login and must not show up.
    storage
        .record_logout("Alice", "2026-08-29", "18:00:00")
        .await
        .unwrap();

    let rows = storage.visualization("admin@corp.com").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].date, "2026-08-30");
    assert_eq!(rows[0].login_time.as_deref(), Some("09:00:00"));
    assert_eq!(rows[0].ps.as_deref(), Some("Build a CRM"));
}
