//! Local filter engine. Pure and synchronous; never touches the network.
//!
//! Each active constraint becomes an independent `CandidatePredicate`. A
//! candidate is kept when every predicate in the list accepts it, so a new
//! filter is a new predicate type plus one line in `FilterState::predicates`.

use crate::models::Candidate;

/// Role choices offered by the filter panel. "All" means no constraint.
pub const ROLE_PRESETS: [&str; 3] = ["All", "Developer", "Designer"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RoleFilter {
    #[default]
    Any,
    Role(String),
}

impl RoleFilter {
    pub fn parse(label: &str) -> Self {
        let label = label.trim();
        if label.is_empty() || label.eq_ignore_ascii_case("all") {
            RoleFilter::Any
        } else {
            RoleFilter::Role(label.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            RoleFilter::Any => ROLE_PRESETS[0],
            RoleFilter::Role(role) => role,
        }
    }
}

/// User-owned filter configuration. Survives new search results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub verified_only: bool,
    pub role: RoleFilter,
}

impl FilterState {
    pub fn toggle_verified(&mut self) {
        self.verified_only = !self.verified_only;
    }

    pub fn select_role(&mut self, role: RoleFilter) {
        self.role = role;
    }

    /// Active predicates, in evaluation order.
    pub fn predicates(&self) -> Vec<Box<dyn CandidatePredicate + '_>> {
        let mut predicates: Vec<Box<dyn CandidatePredicate + '_>> = Vec::new();
        if self.verified_only {
            predicates.push(Box::new(VerifiedOnly));
        }
        if let RoleFilter::Role(role) = &self.role {
            predicates.push(Box::new(RoleContains(role)));
        }
        predicates
    }
}

pub trait CandidatePredicate {
    fn matches(&self, candidate: &Candidate) -> bool;
}

pub struct VerifiedOnly;

impl CandidatePredicate for VerifiedOnly {
    fn matches(&self, candidate: &Candidate) -> bool {
        candidate.verified
    }
}

/// Category match: "Developer" accepts "Senior React Developer".
pub struct RoleContains<'a>(pub &'a str);

impl CandidatePredicate for RoleContains<'_> {
    fn matches(&self, candidate: &Candidate) -> bool {
        candidate.role.contains(self.0)
    }
}

/// Keeps the candidates every active predicate accepts, preserving order.
pub fn apply(candidates: &[Candidate], filter: &FilterState) -> Vec<Candidate> {
    let predicates = filter.predicates();
    candidates
        .iter()
        .filter(|c| predicates.iter().all(|p| p.matches(c)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{candidate, react_results};

    fn mixed() -> Vec<Candidate> {
        vec![
            candidate(1, "Sarah Chen", "Senior React Developer", true),
            candidate(2, "Marcus Johnson", "Full Stack Engineer", true),
            candidate(3, "Emma Wilson", "UI/UX Designer", true),
            candidate(4, "Alex Rodriguez", "Backend Engineer", false),
            candidate(5, "Kai Mori", "Frontend Developer", false),
        ]
    }

    fn names(list: &[Candidate]) -> Vec<&str> {
        list.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_no_constraint_keeps_everything() {
        let all = react_results();
        assert_eq!(apply(&all, &FilterState::default()), all);
    }

    #[test]
    fn test_verified_only_keeps_one_of_three() {
        let filter = FilterState {
            verified_only: true,
            role: RoleFilter::Any,
        };
        let kept = apply(&react_results(), &filter);
        assert_eq!(names(&kept), vec!["Sarah Chen"]);
    }

    #[test]
    fn test_role_is_substring_match() {
        let filter = FilterState {
            verified_only: false,
            role: RoleFilter::parse("Developer"),
        };
        assert_eq!(
            names(&apply(&mixed(), &filter)),
            vec!["Sarah Chen", "Kai Mori"]
        );
    }

    #[test]
    fn test_role_match_is_case_sensitive() {
        let filter = FilterState {
            verified_only: false,
            role: RoleFilter::parse("developer"),
        };
        assert!(apply(&mixed(), &filter).is_empty());
    }

    #[test]
    fn test_predicates_compose_with_and() {
        let filter = FilterState {
            verified_only: true,
            role: RoleFilter::parse("Developer"),
        };
        assert_eq!(filter.predicates().len(), 2);
        assert_eq!(names(&apply(&mixed(), &filter)), vec!["Sarah Chen"]);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let filter = FilterState {
            verified_only: true,
            role: RoleFilter::parse("Engineer"),
        };
        let once = apply(&mixed(), &filter);
        assert_eq!(apply(&mixed(), &filter), once);
        assert_eq!(apply(&once, &filter), once);
    }

    #[test]
    fn test_parse_all_is_no_constraint() {
        assert_eq!(RoleFilter::parse("All"), RoleFilter::Any);
        assert_eq!(RoleFilter::parse(" all "), RoleFilter::Any);
        assert_eq!(RoleFilter::parse(""), RoleFilter::Any);
        assert_eq!(RoleFilter::parse("Designer").label(), "Designer");
        assert_eq!(RoleFilter::Any.label(), "All");
    }

    #[test]
    fn test_toggle_verified_flips() {
        let mut state = FilterState::default();
        state.toggle_verified();
        assert!(state.verified_only);
        state.toggle_verified();
        assert!(!state.verified_only);
    }
}
