//! Result presenter. Stateless: the same inputs always render the same page.

use std::fmt;

use crate::models::{Candidate, CandidateId};
use crate::search::filter::FilterState;

pub const LOADING_MESSAGE: &str = "Searching...";
pub const EMPTY_MESSAGE: &str = "No matches found. Try \"React\" or \"Python\".";

/// Display unit for one candidate. Carries the candidate fields as received.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateCard {
    pub id: CandidateId,
    pub name: String,
    pub role: String,
    pub experience: Option<String>,
    pub skills: Vec<String>,
    pub verified: bool,
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub image: Option<String>,
}

impl From<Candidate> for CandidateCard {
    fn from(c: Candidate) -> Self {
        Self {
            id: c.id,
            name: c.name,
            role: c.role,
            experience: c.experience,
            skills: c.skills,
            verified: c.verified,
            github: c.github,
            linkedin: c.linkedin,
            image: c.image,
        }
    }
}

impl fmt::Display for CandidateCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.verified { "[verified] " } else { "" };
        writeln!(f, "  {mark}{} (#{})", self.name, self.id)?;
        match &self.experience {
            Some(exp) => writeln!(f, "    {} | {exp}", self.role)?,
            None => writeln!(f, "    {}", self.role)?,
        }
        if !self.skills.is_empty() {
            writeln!(f, "    skills: {}", self.skills.join(", "))?;
        }
        for (label, link) in [
            ("avatar", &self.image),
            ("github", &self.github),
            ("linkedin", &self.linkedin),
        ] {
            if let Some(link) = link {
                writeln!(f, "    {label}: {link}")?;
            }
        }
        Ok(())
    }
}

/// Exactly one of the three result-area states.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchView {
    Loading,
    Empty,
    Results(Vec<CandidateCard>),
}

pub fn render(loading: bool, filtered: Vec<Candidate>) -> SearchView {
    if loading {
        SearchView::Loading
    } else if filtered.is_empty() {
        SearchView::Empty
    } else {
        SearchView::Results(filtered.into_iter().map(CandidateCard::from).collect())
    }
}

impl fmt::Display for SearchView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchView::Loading => writeln!(f, "  {LOADING_MESSAGE}"),
            SearchView::Empty => writeln!(f, "  {EMPTY_MESSAGE}"),
            SearchView::Results(cards) => {
                for card in cards {
                    write!(f, "{card}")?;
                }
                Ok(())
            }
        }
    }
}

/// Whole page: query line, filter line, optional notice, result area.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub query: String,
    pub filter: FilterState,
    pub notice: Option<String>,
    pub body: SearchView,
}

impl fmt::Display for PageView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "search: {:?}", self.query)?;
        writeln!(
            f,
            "filters: verified only={} role={}",
            if self.filter.verified_only { "on" } else { "off" },
            self.filter.role.label()
        )?;
        if let Some(notice) = &self.notice {
            writeln!(f, "! {notice}")?;
        }
        write!(f, "{}", self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::react_results;

    #[test]
    fn test_loading_wins_over_results() {
        assert_eq!(render(true, react_results()), SearchView::Loading);
        assert_eq!(render(true, Vec::new()), SearchView::Loading);
    }

    #[test]
    fn test_empty_when_nothing_survives() {
        let view = render(false, Vec::new());
        assert_eq!(view, SearchView::Empty);
        assert!(view.to_string().contains("No matches found"));
    }

    #[test]
    fn test_cards_keep_order_and_fields() {
        let source = react_results();
        let SearchView::Results(cards) = render(false, source.clone()) else {
            panic!("expected results");
        };
        assert_eq!(cards.len(), 3);
        for (card, c) in cards.iter().zip(&source) {
            assert_eq!(card.id, c.id);
            assert_eq!(card.name, c.name);
            assert_eq!(card.role, c.role);
            assert_eq!(card.skills, c.skills);
            assert_eq!(card.verified, c.verified);
            assert_eq!(card.github, c.github);
        }
    }

    #[test]
    fn test_render_is_deterministic() {
        assert_eq!(render(false, react_results()), render(false, react_results()));
    }

    #[test]
    fn test_page_shows_notice_and_filters() {
        let page = PageView {
            query: "Rust".into(),
            filter: FilterState {
                verified_only: true,
                ..Default::default()
            },
            notice: Some("Searching temporarily unavailable".into()),
            body: render(false, react_results()),
        };
        let text = page.to_string();
        assert!(text.starts_with("search: \"Rust\"\n"));
        assert!(text.contains("verified only=on role=All"));
        assert!(text.contains("! Searching temporarily unavailable"));
        assert!(text.contains("  [verified] Sarah Chen (#1)"));
        assert!(text.contains("    Senior React Developer | 1 years"));
    }
}
