// Section parsing of the model's plan text.
//
// The original contract was positional: split on the marker and trust the
// model to emit exactly the requested section count and order. That breaks
// the moment the model drops or reorders a section, so the scanner below
// matches section TITLES by name instead. Sections the model omitted come
// back as empty strings; a response with no recognizable sections at all is
// a malformed response, never an index panic.

use serde::Serialize;

use crate::error::ApiError;
use crate::planner::prompt::{
    SECTION_MARKER, TITLE_ADJUSTED_DURATION, TITLE_ADJUSTED_MILESTONES,
    TITLE_APPROACH_MISSING_SKILLS, TITLE_ASSIGN_WORK, TITLE_DURATION, TITLE_MILESTONES,
    TITLE_MISSING_SKILLS, TITLE_PROBLEM_STATEMENT, TITLE_SKILLS_AND_TECH,
};

/// Parsed result of one generation call. Every field is a free-text block;
/// sections the model omitted are empty strings, never absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlanDocument {
    pub problem_statement: String,
    pub skills_and_tech: String,
    pub assigned_work: String,
    pub missing_skills: String,
    pub approach_for_missing_skills: String,
    pub milestones: String,
    pub duration: String,
}

/// Strip decoration the model tends to add around a section title:
/// whitespace, markdown emphasis, a trailing colon, and leading numbering
/// ("4." / "4)").
fn normalize_title(line: &str) -> String {
    let t = line.trim().trim_matches('*').trim();
    let t = t.trim_start_matches(|c: char| c.is_ascii_digit());
    let t = t.trim_start_matches(['.', ')']).trim();
    t.trim_end_matches(':').trim().to_string()
}

fn set_if_empty(slot: &mut String, body: &str) {
    if slot.is_empty() {
        *slot = body.trim().to_string();
    }
}

/// Split `raw` on the section marker and map each chunk to a `PlanDocument`
/// field by its title line. The adjusted variants land in the same
/// milestones/duration fields as the plain ones.
///
/// Fails with `MalformedResponse` when the text contains no marker at all,
/// or when none of the marked chunks carries a known title.
pub fn parse_plan(raw: &str) -> Result<PlanDocument, ApiError> {
    let mut chunks = raw.split(SECTION_MARKER);
    // Chunk 0 is preamble before the first marker — discarded.
    chunks.next();

    let mut doc = PlanDocument::default();
    let mut matched = false;

    for chunk in chunks {
        let (title_line, body) = match chunk.split_once('\n') {
            Some((title, body)) => (title, body),
            // A trailing marker with no newline after the title.
            None => (chunk, ""),
        };
        let title = normalize_title(title_line);

        let slot = if title.eq_ignore_ascii_case(TITLE_PROBLEM_STATEMENT) {
            &mut doc.problem_statement
        } else if title.eq_ignore_ascii_case(TITLE_SKILLS_AND_TECH) {
            &mut doc.skills_and_tech
        } else if title.eq_ignore_ascii_case(TITLE_ASSIGN_WORK) {
            &mut doc.assigned_work
        } else if title.eq_ignore_ascii_case(TITLE_MISSING_SKILLS) {
            &mut doc.missing_skills
        } else if title.eq_ignore_ascii_case(TITLE_APPROACH_MISSING_SKILLS) {
            &mut doc.approach_for_missing_skills
        } else if title.eq_ignore_ascii_case(TITLE_MILESTONES)
            || title.eq_ignore_ascii_case(TITLE_ADJUSTED_MILESTONES)
        {
            &mut doc.milestones
        } else if title.eq_ignore_ascii_case(TITLE_DURATION)
            || title.eq_ignore_ascii_case(TITLE_ADJUSTED_DURATION)
        {
            &mut doc.duration
        } else {
            continue;
        };
        matched = true;
        set_if_empty(slot, body);
    }

    if !matched {
        return Err(ApiError::MalformedResponse(format!(
            "completion text contains no {SECTION_MARKER}-marked sections with known titles"
        )));
    }
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(title: &str, body: &str) -> String {
        format!("{SECTION_MARKER}{title}\n{body}\n\n")
    }

    #[test]
    fn seven_section_response_round_trips() {
        let raw = [
            "Here is your plan.\n".to_string(),
            section(TITLE_PROBLEM_STATEMENT, "Build a CRM for small teams."),
            section(TITLE_SKILLS_AND_TECH, "Python, Cloud Computing."),
            section(TITLE_ASSIGN_WORK, "Bob: backend."),
            section(TITLE_MISSING_SKILLS, "Frontend development."),
            section(TITLE_APPROACH_MISSING_SKILLS, "Train Bob on React."),
            section(TITLE_ADJUSTED_MILESTONES, "Week 1: setup. Week 2: API."),
            section(TITLE_ADJUSTED_DURATION, "8 weeks."),
        ]
        .concat();

        let doc = parse_plan(&raw).unwrap();
        assert_eq!(doc.problem_statement, "Build a CRM for small teams.");
        assert_eq!(doc.skills_and_tech, "Python, Cloud Computing.");
        assert_eq!(doc.assigned_work, "Bob: backend.");
        assert_eq!(doc.missing_skills, "Frontend development.");
        assert_eq!(doc.approach_for_missing_skills, "Train Bob on React.");
        assert_eq!(doc.milestones, "Week 1: setup. Week 2: API.");
        assert_eq!(doc.duration, "8 weeks.");
    }

    #[test]
    fn no_skill_gap_branch_leaves_gap_fields_empty() {
        let raw = [
            section(TITLE_PROBLEM_STATEMENT, "Build a CRM."),
            section(TITLE_SKILLS_AND_TECH, "Python."),
            section(TITLE_ASSIGN_WORK, "Alice: everything."),
            section(TITLE_MILESTONES, "Week 1: MVP."),
            section(TITLE_DURATION, "4 weeks."),
        ]
        .concat();

        let doc = parse_plan(&raw).unwrap();
        assert_eq!(doc.missing_skills, "");
        assert_eq!(doc.approach_for_missing_skills, "");
        assert_eq!(doc.milestones, "Week 1: MVP.");
        assert_eq!(doc.duration, "4 weeks.");
    }

    #[test]
    fn no_markers_is_malformed() {
        let err = parse_plan("The model rambled with no structure at all.").unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse(_)));
    }

    #[test]
    fn markers_without_known_titles_is_malformed() {
        let raw = "## Sorry\nI cannot help with that.\n";
        assert!(matches!(
            parse_plan(raw),
            Err(ApiError::MalformedResponse(_))
        ));
    }

    #[test]
    fn tolerates_reordered_and_decorated_titles() {
        let raw = [
            section("**Duration:**", "6 weeks."),
            section("4. Milestones", "Week 1: kickoff."),
            section(TITLE_PROBLEM_STATEMENT, "Ship the thing."),
        ]
        .concat();

        let doc = parse_plan(&raw).unwrap();
        assert_eq!(doc.duration, "6 weeks.");
        assert_eq!(doc.milestones, "Week 1: kickoff.");
        assert_eq!(doc.problem_statement, "Ship the thing.");
    }

    #[test]
    fn first_occurrence_of_a_section_wins() {
        let raw = [
            section(TITLE_PROBLEM_STATEMENT, "First."),
            section(TITLE_PROBLEM_STATEMENT, "Second."),
        ]
        .concat();
        assert_eq!(parse_plan(&raw).unwrap().problem_statement, "First.");
    }

    #[test]
    fn marker_at_end_of_text_does_not_panic() {
        let raw = format!("{}{}", section(TITLE_PROBLEM_STATEMENT, "Plan."), "##Duration");
        let doc = parse_plan(&raw).unwrap();
        assert_eq!(doc.problem_statement, "Plan.");
        assert_eq!(doc.duration, "");
    }
}
