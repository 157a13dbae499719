use std::fmt;

use serde::Deserialize;

/// Directory identifiers arrive as integers for curated records and may be
/// strings for records sourced elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(untagged)]
pub enum CandidateId {
    Number(i64),
    Text(String),
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidateId::Number(n) => write!(f, "{n}"),
            CandidateId::Text(s) => f.write_str(s),
        }
    }
}

/// Read-only projection of a directory record. Never mutated after decoding.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "CandidateWire")]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub role: String,
    pub experience: Option<String>,
    pub skills: Vec<String>,
    pub verified: bool,
    pub github: Option<String>,
    pub linkedin: Option<String>,
    /// Avatar reference.
    pub image: Option<String>,
}

/// Trust badge attached to enriched records.
#[derive(Debug, Clone, Deserialize)]
struct VerifiedBadge {
    #[serde(default)]
    verified: bool,
}

/// Union of the curated and enriched record shapes the directory returns.
#[derive(Debug, Deserialize)]
struct CandidateWire {
    id: CandidateId,
    name: String,
    #[serde(default)]
    role: String,
    #[serde(default)]
    experience: Option<String>,
    #[serde(default)]
    skills: Vec<String>,
    #[serde(default)]
    verified: bool,
    #[serde(default)]
    verified_badge: Option<VerifiedBadge>,
    #[serde(default)]
    github: Option<String>,
    #[serde(default)]
    linkedin: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    avatar: Option<String>,
}

impl From<CandidateWire> for Candidate {
    fn from(wire: CandidateWire) -> Self {
        let badge_verified = wire.verified_badge.map(|b| b.verified).unwrap_or(false);
        Self {
            id: wire.id,
            name: wire.name,
            role: wire.role,
            experience: wire.experience,
            skills: wire.skills,
            verified: wire.verified || badge_verified,
            github: wire.github,
            linkedin: wire.linkedin,
            image: wire.image.or(wire.avatar),
        }
    }
}
