pub mod candidate;
pub mod user;

pub use candidate::{Candidate, CandidateId};
