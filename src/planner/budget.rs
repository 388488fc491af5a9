// Budget estimation — pure arithmetic over the fixed skill rate table.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::error::ApiError;
use crate::planner::TeamRoster;

/// Billable hours assumed per member per month.
pub const HOURS_PER_MONTH: f64 = 160.0;
/// Flat cloud infrastructure cost per project month.
const CLOUD_COST_PER_MONTH: f64 = 200.0;
/// Software license cost per seat.
const LICENSE_COST_PER_SEAT: f64 = 100.0;
/// Flat miscellaneous surcharge per estimate.
const MISC_COSTS: f64 = 500.0;
/// Hourly rate for skills not in the table.
const DEFAULT_RATE: f64 = 30.0;

static SKILL_RATES: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    HashMap::from([
        ("Python", 40.0),
        ("Machine Learning", 50.0),
        ("Data Science", 55.0),
        ("Cloud Computing", 60.0),
        ("Project Management", 45.0),
        ("Software Development", 50.0),
    ])
});

/// Hourly rate for one skill; unknown skills fall back to the default rate.
pub fn hourly_rate(skill: &str) -> f64 {
    SKILL_RATES.get(skill).copied().unwrap_or(DEFAULT_RATE)
}

/// Total monetary estimate for a roster over `duration_months`:
/// Σ over members of (mean skill rate × 160 × months), plus cloud cost per
/// month, license cost per seat, and the flat miscellaneous surcharge.
///
/// Fails with `InvalidInput` for an empty roster, a member with no skills,
/// or a non-positive duration.
pub fn estimate(roster: &TeamRoster, duration_months: f64) -> Result<f64, ApiError> {
    if roster.is_empty() {
        return Err(ApiError::InvalidInput("team roster is empty".into()));
    }
    if !(duration_months > 0.0) {
        return Err(ApiError::InvalidInput(format!(
            "duration must be a positive number of months, got {duration_months}"
        )));
    }

    let mut total_salary = 0.0;
    for (name, skills) in roster {
        if skills.is_empty() {
            return Err(ApiError::InvalidInput(format!(
                "team member {name:?} has no skills listed"
            )));
        }
        let avg_rate =
            skills.iter().map(|s| hourly_rate(s)).sum::<f64>() / skills.len() as f64;
        total_salary += avg_rate * HOURS_PER_MONTH * duration_months;
    }

    Ok(total_salary
        + CLOUD_COST_PER_MONTH * duration_months
        + LICENSE_COST_PER_SEAT * roster.len() as f64
        + MISC_COSTS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(members: &[(&str, &[&str])]) -> TeamRoster {
        members
            .iter()
            .map(|(name, skills)| {
                (
                    name.to_string(),
                    skills.iter().map(|s| s.to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn single_member_single_skill() {
        let r = roster(&[("Alice", &["Python"])]);
        // 40*160*1 + 200*1 + 100*1 + 500
        assert_eq!(estimate(&r, 1.0).unwrap(), 7200.0);
    }

    #[test]
    fn averages_skill_rates() {
        let r = roster(&[("Alice", &["Python", "Machine Learning"])]);
        // avg 45 → 45*160*2 + 200*2 + 100*1 + 500
        assert_eq!(estimate(&r, 2.0).unwrap(), 15400.0);
    }

    #[test]
    fn unknown_skill_uses_default_rate() {
        let r = roster(&[("Bob", &["Underwater Basket Weaving"])]);
        // 30*160*1 + 200 + 100 + 500
        assert_eq!(estimate(&r, 1.0).unwrap(), 5600.0);
    }

    #[test]
    fn monotonic_in_duration_and_team_size() {
        let small = roster(&[("Alice", &["Python"])]);
        let large = roster(&[("Alice", &["Python"]), ("Bob", &["Data Science"])]);
        let one = estimate(&small, 1.0).unwrap();
        let three = estimate(&small, 3.0).unwrap();
        assert!(three > one);
        assert!(estimate(&large, 1.0).unwrap() > one);
    }

    #[test]
    fn empty_skill_list_is_invalid() {
        let r = roster(&[("Alice", &[])]);
        assert!(matches!(
            estimate(&r, 1.0),
            Err(ApiError::InvalidInput(_))
        ));
    }

    #[test]
    fn non_positive_duration_is_invalid() {
        let r = roster(&[("Alice", &["Python"])]);
        assert!(matches!(estimate(&r, 0.0), Err(ApiError::InvalidInput(_))));
        assert!(matches!(estimate(&r, -2.0), Err(ApiError::InvalidInput(_))));
    }

    #[test]
    fn empty_roster_is_invalid() {
        assert!(matches!(
            estimate(&TeamRoster::new(), 1.0),
            Err(ApiError::InvalidInput(_))
        ));
    }
}
