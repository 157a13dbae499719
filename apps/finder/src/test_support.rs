//! Shared fixtures for in-crate tests.

use async_trait::async_trait;
use axum::Router;

use crate::directory::{Directory, DirectoryError};
use crate::models::{Candidate, CandidateId};

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn_stub(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

pub fn candidate(id: i64, name: &str, role: &str, verified: bool) -> Candidate {
    Candidate {
        id: CandidateId::Number(id),
        name: name.to_string(),
        role: role.to_string(),
        experience: Some(format!("{id} years")),
        skills: vec!["React".to_string(), "TypeScript".to_string()],
        verified,
        github: Some(format!("https://github.com/search?q={id}")),
        linkedin: None,
        image: None,
    }
}

/// Three React matches, one of them verified.
pub fn react_results() -> Vec<Candidate> {
    vec![
        candidate(1, "Sarah Chen", "Senior React Developer", true),
        candidate(2, "Marcus Johnson", "Full Stack Engineer", false),
        candidate(3, "Priya Natarajan", "React Native Developer", false),
    ]
}

/// Answers every query immediately with the same candidates.
pub struct StaticDirectory(pub Vec<Candidate>);

#[async_trait]
impl Directory for StaticDirectory {
    async fn search(&self, _query: &str) -> Result<Vec<Candidate>, DirectoryError> {
        Ok(self.0.clone())
    }
}

/// Fails every query the way an unreachable directory would.
pub struct FailingDirectory;

#[async_trait]
impl Directory for FailingDirectory {
    async fn search(&self, _query: &str) -> Result<Vec<Candidate>, DirectoryError> {
        Err(DirectoryError::Status {
            status: 503,
            body: "upstream unavailable".to_string(),
        })
    }
}
