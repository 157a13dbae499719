//! Search pipeline controller.
//!
//! One task owns every piece of mutable search state: the debouncer, the
//! sequence counter, the last accepted result and the filter state. Input
//! events, debounce expiry and request settlements are all handled by that
//! task one at a time, so the "is this reply current?" check and the state
//! write that follows it can never interleave with anything else.
//!
//! Requests run on their own tasks and report back over a channel. Dropping
//! the handle stops the controller; late replies then find a closed channel
//! and are discarded.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::directory::Directory;
use crate::errors::AppError;
use crate::models::Candidate;
use crate::search::debounce::{Debouncer, DEFAULT_QUIET_PERIOD};
use crate::search::filter::{self, FilterState, RoleFilter};
use crate::search::presenter::{self, PageView, SearchView};
use crate::search::sequence::{dispatch, SearchResult, Sequencer, Settlement};

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub quiet_period: Duration,
    /// Debounce an empty query as soon as the pipeline starts, so the page
    /// opens on the directory's default candidate set.
    pub search_on_mount: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            quiet_period: DEFAULT_QUIET_PERIOD,
            search_on_mount: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum PipelineEvent {
    QueryChanged(String),
    ToggleVerified,
    SelectRole(RoleFilter),
    DismissNotice,
}

/// Everything the page renders from. The visible candidate list is derived
/// on demand and never stored.
#[derive(Debug, Clone, Default)]
pub struct SearchSnapshot {
    pub query: String,
    pub loading: bool,
    pub filter: FilterState,
    pub accepted: Option<Arc<SearchResult>>,
    pub notice: Option<String>,
}

impl SearchSnapshot {
    pub fn visible(&self) -> Vec<Candidate> {
        self.accepted
            .as_ref()
            .map(|r| filter::apply(&r.candidates, &self.filter))
            .unwrap_or_default()
    }

    pub fn view(&self) -> SearchView {
        presenter::render(self.loading, self.visible())
    }

    pub fn page(&self) -> PageView {
        PageView {
            query: self.query.clone(),
            filter: self.filter.clone(),
            notice: self.notice.clone(),
            body: self.view(),
        }
    }

    #[cfg(test)]
    pub fn accepted_seq(&self) -> Option<u64> {
        self.accepted.as_ref().map(|r| r.seq)
    }
}

/// Handle to a running pipeline. Dropping it unmounts the pipeline.
pub struct PipelineHandle {
    events: mpsc::UnboundedSender<PipelineEvent>,
    state: watch::Receiver<SearchSnapshot>,
    task: JoinHandle<()>,
}

impl PipelineHandle {
    fn send(&self, event: PipelineEvent) -> Result<(), AppError> {
        self.events
            .send(event)
            .map_err(|_| AppError::PipelineClosed)
    }

    pub fn set_query(&self, text: impl Into<String>) -> Result<(), AppError> {
        self.send(PipelineEvent::QueryChanged(text.into()))
    }

    pub fn toggle_verified(&self) -> Result<(), AppError> {
        self.send(PipelineEvent::ToggleVerified)
    }

    pub fn select_role(&self, role: RoleFilter) -> Result<(), AppError> {
        self.send(PipelineEvent::SelectRole(role))
    }

    pub fn dismiss_notice(&self) -> Result<(), AppError> {
        self.send(PipelineEvent::DismissNotice)
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot> {
        self.state.clone()
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> SearchSnapshot {
        self.state.borrow().clone()
    }

    /// Stops the controller and waits for it to exit. In-flight requests are
    /// left to finish on their own; their replies are ignored.
    pub async fn unmount(self) {
        let PipelineHandle { events, task, .. } = self;
        drop(events);
        if let Err(e) = task.await {
            debug!("Search pipeline task ended abnormally: {e}");
        }
    }
}

/// Starts a pipeline on the current tokio runtime.
pub fn spawn(directory: Arc<dyn Directory>, config: PipelineConfig) -> PipelineHandle {
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let (replies_tx, replies_rx) = mpsc::unbounded_channel();
    let (state_tx, state_rx) = watch::channel(SearchSnapshot::default());

    let mut debouncer = Debouncer::new(config.quiet_period);
    if config.search_on_mount {
        debouncer.submit("");
    }

    let controller = Controller {
        directory,
        debouncer,
        sequencer: Sequencer::default(),
        latest_failed: false,
        replies: replies_tx,
        state: state_tx,
    };
    let task = tokio::spawn(controller.run(events_rx, replies_rx));

    PipelineHandle {
        events: events_tx,
        state: state_rx,
        task,
    }
}

struct Controller {
    directory: Arc<dyn Directory>,
    debouncer: Debouncer,
    sequencer: Sequencer,
    /// Whether the most recently issued request ended in a transport failure.
    latest_failed: bool,
    replies: mpsc::UnboundedSender<Settlement>,
    state: watch::Sender<SearchSnapshot>,
}

impl Controller {
    async fn run(
        mut self,
        mut events: mpsc::UnboundedReceiver<PipelineEvent>,
        mut replies: mpsc::UnboundedReceiver<Settlement>,
    ) {
        loop {
            tokio::select! {
                biased;
                event = events.recv() => match event {
                    Some(event) => self.on_event(event),
                    None => break,
                },
                Some(settlement) = replies.recv() => self.on_settled(settlement),
                query = self.debouncer.effective() => self.on_effective(query),
            }
        }
        info!(
            "Search pipeline unmounted after {} requests",
            self.sequencer.latest()
        );
    }

    fn on_event(&mut self, event: PipelineEvent) {
        match event {
            PipelineEvent::QueryChanged(text) => {
                self.debouncer.submit(text.clone());
                self.state.send_modify(|s| s.query = text);
            }
            PipelineEvent::ToggleVerified => {
                self.state.send_modify(|s| s.filter.toggle_verified());
            }
            PipelineEvent::SelectRole(role) => {
                self.state.send_modify(|s| s.filter.select_role(role));
            }
            PipelineEvent::DismissNotice => {
                self.state.send_if_modified(|s| s.notice.take().is_some());
            }
        }
    }

    fn on_effective(&mut self, query: String) {
        if self.sequencer.latest_query() == Some(query.as_str()) && !self.latest_failed {
            debug!("Skipping duplicate query {:?}", query);
            return;
        }

        let request = self.sequencer.issue(query);
        self.latest_failed = false;
        debug!("Issuing search #{} for {:?}", request.seq, request.query);
        self.state.send_modify(|s| s.loading = true);

        let directory = Arc::clone(&self.directory);
        let replies = self.replies.clone();
        tokio::spawn(async move {
            let settlement = dispatch(directory, request).await;
            // Closed after unmount; the reply has nowhere to go.
            let _ = replies.send(settlement);
        });
    }

    fn on_settled(&mut self, settlement: Settlement) {
        let seq = match &settlement {
            Ok(result) => result.seq,
            Err(failure) => failure.seq,
        };
        if !self.sequencer.is_current(seq) {
            debug!(
                "Dropping stale reply #{} (latest is #{})",
                seq,
                self.sequencer.latest()
            );
            return;
        }

        match settlement {
            Ok(result) => {
                debug!(
                    "Accepted search #{} with {} candidates",
                    result.seq,
                    result.candidates.len()
                );
                let result = Arc::new(result);
                self.state.send_modify(|s| {
                    s.accepted = Some(result);
                    s.notice = None;
                    s.loading = false;
                });
            }
            Err(failure) => {
                self.latest_failed = true;
                let message =
                    AppError::from(failure.error).report(&format!("Search #{seq} failed"));
                self.state.send_modify(|s| {
                    s.notice = Some(message);
                    s.loading = false;
                });
            }
        }
    }
}
