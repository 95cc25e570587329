// Session state - everything the console knows, changed only by named transitions
//
// Nothing here performs I/O. The dispatcher starts requests, and feeds their
// results back through the `receive_*` transitions.

use uuid::Uuid;

use crate::api::{ApiError, QueryResponse, RowGrid, TableName, UploadResponse};

use super::catalog::TableCatalog;
use super::classifier::outcome_entries;
use super::tabs::{OpenStep, RefreshTicket, SessionTabs};
use super::terminal_log::{LogEntry, TerminalLog};
use super::upload::upload_entry;

/// Log text for a command that got no usable response
pub const QUERY_FAILURE: &str = "❌ Error executing query";

/// The command currently awaiting a response
#[derive(Debug, Clone)]
pub struct PendingCommand {
    pub id: Uuid,
    pub command: String,
}

/// Result of asking to submit the input buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Input was blank; nothing happened
    Ignored,
    /// Another command is still pending; nothing was sent
    Rejected { pending: Uuid },
    /// The command was sent under this request id
    Dispatched { id: Uuid, command: String },
}

/// What the dispatcher must do after a command's response was applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryCompletion {
    /// Outcome logged; reload the catalog and run the refresh if any
    Completed { refresh: Option<RefreshTicket> },
    /// Transport failure logged; nothing else to do
    Failed,
}

#[derive(Debug, Default)]
pub struct SessionState {
    catalog: TableCatalog,
    tabs: SessionTabs,
    log: TerminalLog,
    pending: Option<PendingCommand>,
    upload_pending: bool,
    input: String,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn catalog(&self) -> &TableCatalog {
        &self.catalog
    }

    pub fn tabs(&self) -> &SessionTabs {
        &self.tabs
    }

    pub fn log(&self) -> &TerminalLog {
        &self.log
    }

    pub fn pending(&self) -> Option<&PendingCommand> {
        self.pending.as_ref()
    }

    pub fn is_upload_pending(&self) -> bool {
        self.upload_pending
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    // ── Input ────────────────────────────────────────────────────────────────

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    // ── Commands ─────────────────────────────────────────────────────────────

    /// Try to send the input buffer as a command.
    pub fn begin_submit(&mut self) -> Submission {
        if self.input.trim().is_empty() {
            return Submission::Ignored;
        }
        if let Some(pending) = &self.pending {
            return Submission::Rejected {
                pending: pending.id,
            };
        }

        let id = Uuid::new_v4();
        let command = self.input.clone();
        self.pending = Some(PendingCommand {
            id,
            command: command.clone(),
        });
        Submission::Dispatched { id, command }
    }

    /// Apply the response for command `id`.
    ///
    /// Returns `None` if `id` is not the pending command.
    pub fn receive_response(
        &mut self,
        id: Uuid,
        outcome: Result<QueryResponse, ApiError>,
    ) -> Option<QueryCompletion> {
        if self.pending.as_ref().map(|p| p.id) != Some(id) {
            tracing::warn!("Ignoring response for unknown command {}", id);
            return None;
        }
        let pending = self.pending.take()?;

        match outcome {
            Ok(reply) => {
                let result = reply.result_text();
                self.log
                    .append_all(outcome_entries(&pending.command, result.as_deref()));
                self.input.clear();
                let refresh = self.tabs.refresh_active();
                Some(QueryCompletion::Completed { refresh })
            }
            Err(err) => {
                tracing::warn!("Command {:?} failed: {}", pending.command, err);
                self.log.append(LogEntry::error(QUERY_FAILURE));
                Some(QueryCompletion::Failed)
            }
        }
    }

    // ── Catalog ──────────────────────────────────────────────────────────────

    pub fn begin_catalog_load(&mut self) -> u64 {
        self.catalog.begin_load()
    }

    pub fn receive_catalog(
        &mut self,
        generation: u64,
        outcome: Result<Vec<TableName>, ApiError>,
    ) -> bool {
        match outcome {
            Ok(names) => self.catalog.replace(generation, names),
            Err(err) => {
                tracing::warn!("Failed to load table list: {}", err);
                false
            }
        }
    }

    // ── Tabs ─────────────────────────────────────────────────────────────────

    pub fn open_table(&mut self, name: &str) -> OpenStep {
        self.tabs.open(name)
    }

    /// Apply the first fetch for a table being opened.
    pub fn receive_table(
        &mut self,
        name: &str,
        generation: u64,
        outcome: Result<RowGrid, ApiError>,
    ) -> bool {
        match outcome {
            Ok(rows) => self.tabs.complete_open(name, generation, rows),
            Err(err) => {
                tracing::warn!("Failed to open table {}: {}", name, err);
                if self.tabs.abandon_open(name, generation) {
                    self.log
                        .append(LogEntry::error(format!("❌ Error opening table {}", name)));
                }
                false
            }
        }
    }

    pub fn select_tab(&mut self, name: &str) -> bool {
        self.tabs.select(name)
    }

    pub fn close_tab(&mut self, name: &str) -> bool {
        self.tabs.close(name)
    }

    pub fn refresh_active(&mut self) -> Option<RefreshTicket> {
        self.tabs.refresh_active()
    }

    /// Apply refreshed rows; stale or orphaned results are dropped.
    pub fn receive_refresh(
        &mut self,
        name: &str,
        generation: u64,
        outcome: Result<RowGrid, ApiError>,
    ) -> bool {
        match outcome {
            Ok(rows) => {
                let applied = self.tabs.complete_refresh(name, generation, rows);
                if !applied {
                    tracing::debug!("Discarded stale rows for {} (generation {})", name, generation);
                }
                applied
            }
            Err(err) => {
                tracing::warn!("Failed to refresh table {}: {}", name, err);
                false
            }
        }
    }

    // ── Uploads ──────────────────────────────────────────────────────────────

    /// Mark an upload as started. False if one is already running.
    pub fn begin_upload(&mut self) -> bool {
        if self.upload_pending {
            return false;
        }
        self.upload_pending = true;
        true
    }

    /// Log an upload's outcome. Returns true when the catalog should reload.
    pub fn receive_upload(&mut self, outcome: Result<UploadResponse, ApiError>) -> bool {
        self.upload_pending = false;
        self.log.append(upload_entry(&outcome));
        outcome.is_ok()
    }
}
