// Query dispatcher - owns the session state and drives every network request
//
// Requests run on spawned tasks and report back as `SessionEvent`s over a
// channel. Only `handle_event` applies their results, so all state changes
// happen on the task that owns the dispatcher.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::api::Backend;

use super::events::{FetchKind, SessionEvent};
use super::state::{QueryCompletion, SessionState, Submission};
use super::tabs::{OpenStep, RefreshTicket};
use super::upload::UploadBridge;

pub struct QueryDispatcher {
    state: SessionState,
    backend: Arc<dyn Backend>,
    uploads: UploadBridge,

    event_tx: mpsc::UnboundedSender<SessionEvent>,
    event_rx: mpsc::UnboundedReceiver<SessionEvent>,

    /// Spawned requests whose event has not been handled yet
    in_flight: usize,
}

impl QueryDispatcher {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self {
            state: SessionState::new(),
            uploads: UploadBridge::new(Arc::clone(&backend)),
            backend,
            event_tx,
            event_rx,
            in_flight: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Whether an operator-visible request (command, upload, table open) is outstanding.
    ///
    /// Background refreshes and catalog loads do not count.
    pub fn is_busy(&self) -> bool {
        self.state.pending().is_some()
            || self.state.is_upload_pending()
            || self.state.tabs().has_pending_opens()
    }

    fn spawn<F>(&mut self, request: F)
    where
        F: Future<Output = SessionEvent> + Send + 'static,
    {
        self.in_flight += 1;
        let event_tx = self.event_tx.clone();
        tokio::spawn(async move {
            let event = request.await;
            // Receiver only goes away with the dispatcher itself
            let _ = event_tx.send(event);
        });
    }

    // ── Operations ───────────────────────────────────────────────────────────

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.state.set_input(text);
    }

    /// Send the input buffer to the service.
    pub fn submit(&mut self) -> Submission {
        let submission = self.state.begin_submit();
        match &submission {
            Submission::Ignored => {}
            Submission::Rejected { pending } => {
                tracing::warn!("Command rejected: {} is still running", pending);
            }
            Submission::Dispatched { id, command } => {
                tracing::debug!("Dispatching command {}: {:?}", id, command);
                let backend = Arc::clone(&self.backend);
                let (id, command) = (*id, command.clone());
                self.spawn(async move {
                    let outcome = backend.execute(&command).await;
                    SessionEvent::QueryFinished { id, outcome }
                });
            }
        }
        submission
    }

    /// Replace the input buffer with `text` and submit it.
    pub fn submit_text(&mut self, text: impl Into<String>) -> Submission {
        self.state.set_input(text);
        self.submit()
    }

    /// Reload the table catalog from the service.
    pub fn load_catalog(&mut self) {
        let generation = self.state.begin_catalog_load();
        let backend = Arc::clone(&self.backend);
        self.spawn(async move {
            let outcome = backend.list_tables().await;
            SessionEvent::CatalogLoaded {
                generation,
                outcome,
            }
        });
    }

    /// Open a table in a tab, fetching its rows only if it is not open yet.
    pub fn open_table(&mut self, name: &str) -> OpenStep {
        let step = self.state.open_table(name);
        if let OpenStep::Fetch(generation) = step {
            self.spawn_fetch(name.to_string(), generation, FetchKind::Open);
        }
        step
    }

    pub fn select_tab(&mut self, name: &str) -> bool {
        self.state.select_tab(name)
    }

    pub fn close_tab(&mut self, name: &str) -> bool {
        self.state.close_tab(name)
    }

    /// Refetch the active tab's rows. False when no tab is active.
    pub fn refresh_active(&mut self) -> bool {
        match self.state.refresh_active() {
            Some(ticket) => {
                self.spawn_refresh(ticket);
                true
            }
            None => false,
        }
    }

    /// Upload the selected file. `None` (nothing selected) does nothing.
    pub fn upload(&mut self, file: Option<&Path>) -> bool {
        let Some(path) = file else {
            return false;
        };
        if !self.state.begin_upload() {
            tracing::warn!("Upload of {} ignored: another upload is running", path.display());
            return false;
        }

        let bridge = self.uploads.clone();
        let path = path.to_path_buf();
        self.spawn(async move {
            let outcome = bridge.transmit(&path).await;
            SessionEvent::UploadFinished {
                file_name: UploadBridge::file_name(&path),
                outcome,
            }
        });
        true
    }

    fn spawn_fetch(&mut self, name: String, generation: u64, kind: FetchKind) {
        let backend = Arc::clone(&self.backend);
        self.spawn(async move {
            let outcome = backend.table_detail(&name).await;
            SessionEvent::TableFetched {
                name,
                generation,
                kind,
                outcome,
            }
        });
    }

    fn spawn_refresh(&mut self, ticket: RefreshTicket) {
        self.spawn_fetch(ticket.name, ticket.generation, FetchKind::Refresh);
    }

    // ── Events ───────────────────────────────────────────────────────────────

    /// Wait for the next finished request.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.event_rx.recv().await
    }

    /// Apply a finished request to the session state.
    pub fn handle_event(&mut self, event: SessionEvent) {
        self.in_flight = self.in_flight.saturating_sub(1);
        tracing::debug!("Handling {}", event.name());

        match event {
            SessionEvent::QueryFinished { id, outcome } => {
                if let Some(QueryCompletion::Completed { refresh }) =
                    self.state.receive_response(id, outcome)
                {
                    self.load_catalog();
                    if let Some(ticket) = refresh {
                        self.spawn_refresh(ticket);
                    }
                }
            }
            SessionEvent::CatalogLoaded {
                generation,
                outcome,
            } => {
                self.state.receive_catalog(generation, outcome);
            }
            SessionEvent::TableFetched {
                name,
                generation,
                kind: FetchKind::Open,
                outcome,
            } => {
                self.state.receive_table(&name, generation, outcome);
            }
            SessionEvent::TableFetched {
                name,
                generation,
                kind: FetchKind::Refresh,
                outcome,
            } => {
                self.state.receive_refresh(&name, generation, outcome);
            }
            SessionEvent::UploadFinished { file_name, outcome } => {
                tracing::debug!("Upload of {} finished", file_name);
                if self.state.receive_upload(outcome) {
                    self.load_catalog();
                }
            }
        }
    }

    /// Handle events until no spawned request is left, including follow-ups.
    pub async fn run_until_idle(&mut self) {
        while self.in_flight > 0 {
            match self.event_rx.recv().await {
                Some(event) => self.handle_event(event),
                None => break,
            }
        }
    }
}
