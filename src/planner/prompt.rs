// Prompt construction for the plan-generation call.
//
// The model is asked to label every output section with the two-character
// marker followed by a canonical title. The parser in `parse.rs` splits on
// the same marker and matches the same titles — keep the two in sync.

use crate::planner::TeamRoster;

/// Token the model must prefix every section with.
pub const SECTION_MARKER: &str = "##";

pub const TITLE_PROBLEM_STATEMENT: &str = "Rephrased Problem Statement";
pub const TITLE_SKILLS_AND_TECH: &str = "Skills and Technologies Required";
pub const TITLE_ASSIGN_WORK: &str = "Assign Work to Team Members";
pub const TITLE_MILESTONES: &str = "Milestones";
pub const TITLE_DURATION: &str = "Duration";
pub const TITLE_MISSING_SKILLS: &str = "Missing Skills";
pub const TITLE_APPROACH_MISSING_SKILLS: &str = "Approach to Address Missing Skills";
pub const TITLE_ADJUSTED_MILESTONES: &str = "Adjusted Milestones";
pub const TITLE_ADJUSTED_DURATION: &str = "Adjusted Duration";

/// System message for the completion call.
pub const SYSTEM_MESSAGE: &str = "You are an AI project consultant.";

/// One "Name: skill, skill" line per roster member.
fn format_roster(roster: &TeamRoster) -> String {
    roster
        .iter()
        .map(|(name, skills)| format!("- {}: {}", name, skills.join(", ")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the plan-generation prompt.
///
/// The instruction text spells out the conditional branch — {milestones,
/// duration} when the team covers every required skill, or {missing skills,
/// approach, adjusted milestones, adjusted duration} otherwise — so the
/// model self-selects the branch. The builder never evaluates skill
/// coverage itself.
pub fn build_prompt(problem_statement: &str, roster: &TeamRoster, deadline: &str) -> String {
    format!(
        "Analyze the project details and generate the following in order. \
Label each section with `{SECTION_MARKER}` followed by the section name.\n\
\n\
{SECTION_MARKER}{TITLE_PROBLEM_STATEMENT}\n\
1. Rephrase the Problem Statement (concisely and clearly).\n\
\n\
{SECTION_MARKER}{TITLE_SKILLS_AND_TECH}\n\
2. Skills and Technologies Required for the project.\n\
\n\
{SECTION_MARKER}{TITLE_ASSIGN_WORK}\n\
3. Assign Work to Team Members (based on their existing skills).\n\
\n\
If all required skills are available in the team:\n\
\n\
{SECTION_MARKER}{TITLE_MILESTONES}\n\
4. Week-wise Milestones (break the project down into weekly tasks).\n\
\n\
{SECTION_MARKER}{TITLE_DURATION}\n\
5. Total Duration of the Project (based on the milestones and deadline).\n\
\n\
If some required skills are missing in the team:\n\
\n\
{SECTION_MARKER}{TITLE_MISSING_SKILLS}\n\
4. Identify Missing Skills (compare required vs. team skills).\n\
\n\
{SECTION_MARKER}{TITLE_APPROACH_MISSING_SKILLS}\n\
5. Approach to Address Missing Skills: train (if learnable within the \
timeline), hire (if critical expertise is missing), or use alternative \
technology (if possible).\n\
\n\
{SECTION_MARKER}{TITLE_ADJUSTED_MILESTONES}\n\
6. Week-wise Milestones (adjusted for skill gaps and training/hiring).\n\
\n\
{SECTION_MARKER}{TITLE_ADJUSTED_DURATION}\n\
7. Total Duration of the Project (including adjustments for training/hiring).\n\
\n\
Project Details:\n\
- Problem Statement: {problem_statement}\n\
- Team Members & Skills:\n{roster}\n\
- Deadline: {deadline}\n",
        roster = format_roster(roster),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> TeamRoster {
        TeamRoster::from([
            ("Alice".to_string(), vec!["Python".to_string()]),
            (
                "Bob".to_string(),
                vec!["Cloud Computing".to_string(), "Data Science".to_string()],
            ),
        ])
    }

    #[test]
    fn contains_every_section_title() {
        let prompt = build_prompt("Build a CRM", &roster(), "3 months");
        for title in [
            TITLE_PROBLEM_STATEMENT,
            TITLE_SKILLS_AND_TECH,
            TITLE_ASSIGN_WORK,
            TITLE_MILESTONES,
            TITLE_DURATION,
            TITLE_MISSING_SKILLS,
            TITLE_APPROACH_MISSING_SKILLS,
            TITLE_ADJUSTED_MILESTONES,
            TITLE_ADJUSTED_DURATION,
        ] {
            assert!(
                prompt.contains(&format!("{SECTION_MARKER}{title}")),
                "prompt missing marked section {title:?}"
            );
        }
    }

    #[test]
    fn states_the_branch_conditions() {
        let prompt = build_prompt("Build a CRM", &roster(), "3 months");
        assert!(prompt.contains("If all required skills are available"));
        assert!(prompt.contains("If some required skills are missing"));
    }

    #[test]
    fn includes_project_details() {
        let prompt = build_prompt("Build a CRM", &roster(), "3 months");
        assert!(prompt.contains("Build a CRM"));
        assert!(prompt.contains("- Alice: Python"));
        assert!(prompt.contains("- Bob: Cloud Computing, Data Science"));
        assert!(prompt.contains("Deadline: 3 months"));
    }
}
