//! Plan generation pipeline: budget estimate, prompt, completion call,
//! section parse, and the persistence of the result.

pub mod budget;
pub mod parse;
pub mod prompt;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

use crate::error::ApiError;
use crate::llm::Completion;
use crate::storage::Storage;

pub use parse::PlanDocument;

/// Team roster for one planning request: display name → skill list.
/// Transient input; never persisted as its own entity.
pub type TeamRoster = BTreeMap<String, Vec<String>>;

/// Employee name used for the synthetic assignment row that records the
/// assignment-prompt text itself.
pub const SYSTEM_ASSIGNEE: &str = "SYSTEM";

/// Text stored under the SYSTEM assignment.
pub const ASSIGN_WORK_PROMPT: &str =
    "**Assign Work to Team Members** (Based on their existing skills).";

/// One (employee, task) pair derived from a generated plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskAssignment {
    pub employee: String,
    pub task: String,
}

/// Result of one successful generation call.
#[derive(Debug, Serialize)]
pub struct GeneratedPlan {
    pub plan_id: i64,
    pub plan: PlanDocument,
    /// The raw completion text, returned to the caller unmodified.
    pub raw_text: String,
    pub budget: f64,
    pub assignments: Vec<TaskAssignment>,
}

/// One task per roster member, plus the synthetic SYSTEM entry.
fn derive_assignments(problem_statement: &str, roster: &TeamRoster) -> Vec<TaskAssignment> {
    let mut assignments: Vec<TaskAssignment> = roster
        .iter()
        .map(|(name, skills)| TaskAssignment {
            employee: name.clone(),
            task: format!("Work on {} using {}", problem_statement, skills.join(", ")),
        })
        .collect();
    assignments.push(TaskAssignment {
        employee: SYSTEM_ASSIGNEE.to_string(),
        task: ASSIGN_WORK_PROMPT.to_string(),
    });
    assignments
}

/// Run the whole pipeline for one request.
///
/// Failure at any step aborts the call; persistence happens last and in a
/// single transaction, so a failed generation leaves no partial rows.
pub async fn generate_plan(
    storage: &Storage,
    llm: &dyn Completion,
    problem_statement: &str,
    roster: &TeamRoster,
    duration_months: f64,
    requester_email: &str,
) -> Result<GeneratedPlan, ApiError> {
    if problem_statement.trim().is_empty() {
        return Err(ApiError::InvalidInput("problem_statement is required".into()));
    }
    if roster.is_empty() {
        return Err(ApiError::InvalidInput("team_members is required".into()));
    }

    // Budget is independent of the model call — compute it first.
    let budget = budget::estimate(roster, duration_months)?;

    let deadline = format!("{duration_months} months");
    let user_prompt = prompt::build_prompt(problem_statement, roster, &deadline);
    let raw_text = llm.complete(prompt::SYSTEM_MESSAGE, &user_prompt).await?;
    let plan = parse::parse_plan(&raw_text)?;

    let assignments = derive_assignments(problem_statement, roster);
    let plan_id = storage
        .save_generated_plan(&plan, roster, requester_email, &assignments)
        .await?;

    info!(
        plan_id,
        team_size = roster.len(),
        budget,
        "plan generated and stored"
    );

    Ok(GeneratedPlan {
        plan_id,
        plan,
        raw_text,
        budget,
        assignments,
    })
}
