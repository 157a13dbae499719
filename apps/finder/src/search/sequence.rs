use std::sync::Arc;

use crate::directory::{Directory, DirectoryError};
use crate::models::Candidate;

/// One effective query, tagged with its issue order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub seq: u64,
    pub query: String,
}

/// Candidates produced by the request with sequence number `seq`.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub seq: u64,
    pub query: String,
    pub candidates: Vec<Candidate>,
}

/// A transport failure, tagged so it can be checked for staleness like a result.
#[derive(Debug)]
pub struct SearchFailure {
    pub seq: u64,
    pub error: DirectoryError,
}

pub type Settlement = Result<SearchResult, SearchFailure>;

/// Owns the session's sequence counter. Numbers start at 1 and strictly increase.
#[derive(Debug, Default)]
pub struct Sequencer {
    latest: u64,
    latest_query: Option<String>,
}

impl Sequencer {
    pub fn issue(&mut self, query: impl Into<String>) -> SearchRequest {
        self.latest += 1;
        let query = query.into();
        self.latest_query = Some(query.clone());
        SearchRequest {
            seq: self.latest,
            query,
        }
    }

    pub fn latest(&self) -> u64 {
        self.latest
    }

    pub fn latest_query(&self) -> Option<&str> {
        self.latest_query.as_deref()
    }

    /// Only the most recently issued request is current.
    pub fn is_current(&self, seq: u64) -> bool {
        self.latest != 0 && seq == self.latest
    }
}

/// Runs `request` against `directory`, tagging the outcome with its sequence number.
pub async fn dispatch(directory: Arc<dyn Directory>, request: SearchRequest) -> Settlement {
    match directory.search(&request.query).await {
        Ok(candidates) => Ok(SearchResult {
            seq: request.seq,
            query: request.query,
            candidates,
        }),
        Err(error) => Err(SearchFailure {
            seq: request.seq,
            error,
        }),
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::test_support::react_results;

    #[test]
    fn test_sequence_strictly_increases() {
        let mut seq = Sequencer::default();
        assert!(!seq.is_current(0));
        let a = seq.issue("R");
        let b = seq.issue("Re");
        let c = seq.issue("Re");
        assert_eq!((a.seq, b.seq, c.seq), (1, 2, 3));
        assert_eq!(seq.latest(), 3);
        assert_eq!(seq.latest_query(), Some("Re"));
    }

    #[test]
    fn test_only_latest_is_current() {
        let mut seq = Sequencer::default();
        for q in ["a", "b", "c", "d"] {
            seq.issue(q);
        }
        let go = seq.issue("Go");
        assert_eq!(go.seq, 5);
        assert!(seq.is_current(5));
        let rust = seq.issue("Rust");
        assert_eq!(rust.seq, 6);
        assert!(!seq.is_current(go.seq));
        assert!(seq.is_current(rust.seq));
    }

    struct Fixed(Option<Vec<Candidate>>);

    #[async_trait]
    impl Directory for Fixed {
        async fn search(&self, _query: &str) -> Result<Vec<Candidate>, DirectoryError> {
            self.0.clone().ok_or(DirectoryError::Status {
                status: 502,
                body: String::new(),
            })
        }
    }

    #[tokio::test]
    async fn test_dispatch_tags_success_and_failure() {
        let request = SearchRequest {
            seq: 7,
            query: "React".into(),
        };
        let ok = dispatch(Arc::new(Fixed(Some(react_results()))), request.clone())
            .await
            .unwrap();
        assert_eq!(ok.seq, 7);
        assert_eq!(ok.candidates.len(), 3);

        let failure = dispatch(Arc::new(Fixed(None)), request).await.unwrap_err();
        assert_eq!(failure.seq, 7);
        assert!(matches!(
            failure.error,
            DirectoryError::Status { status: 502, .. }
        ));
    }
}
