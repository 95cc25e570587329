// Integration tests for the query dispatcher against an in-memory backend

use async_trait::async_trait;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use minidb_console::api::{ApiError, Backend, QueryResponse, RowGrid, TableName, UploadResponse};
use minidb_console::session::{
    LogEntry, LogKind, OpenStep, QueryDispatcher, Submission, QUERY_FAILURE, UPLOAD_FAILURE,
};

/// Backend that counts calls, replays scripted command results, and can
/// delay individual detail fetches.
#[derive(Default)]
struct FakeBackend {
    tables: Mutex<Vec<TableName>>,
    results: Mutex<VecDeque<Result<QueryResponse, ApiError>>>,
    detail_delays: Mutex<VecDeque<Duration>>,
    upload_reply: Mutex<Option<Result<UploadResponse, ApiError>>>,

    list_calls: AtomicUsize,
    detail_calls: AtomicUsize,
    execute_calls: AtomicUsize,
    upload_calls: AtomicUsize,
}

impl FakeBackend {
    fn with_tables(names: &[&str]) -> Arc<Self> {
        let backend = Self::default();
        *backend.tables.lock().unwrap() = names.iter().map(|s| s.to_string()).collect();
        Arc::new(backend)
    }

    fn script_result(&self, result: Result<QueryResponse, ApiError>) {
        self.results.lock().unwrap().push_back(result);
    }

    fn delay_next_detail(&self, delay: Duration) {
        self.detail_delays.lock().unwrap().push_back(delay);
    }

    fn reply_to_upload(&self, reply: Result<UploadResponse, ApiError>) {
        *self.upload_reply.lock().unwrap() = Some(reply);
    }

    fn lists(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn details(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }

    fn executes(&self) -> usize {
        self.execute_calls.load(Ordering::SeqCst)
    }
}

/// Rows tagged with the number of the detail call that produced them
fn tagged_grid(call: usize) -> RowGrid {
    vec![vec![json!("call")], vec![json!(call)]]
}

#[async_trait]
impl Backend for FakeBackend {
    async fn list_tables(&self) -> Result<Vec<TableName>, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.tables.lock().unwrap().clone())
    }

    async fn table_detail(&self, _name: &str) -> Result<RowGrid, ApiError> {
        let call = self.detail_calls.fetch_add(1, Ordering::SeqCst) + 1;
        let delay = self.detail_delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(tagged_grid(call))
    }

    async fn execute(&self, _query: &str) -> Result<QueryResponse, ApiError> {
        self.execute_calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self.results.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| Ok(QueryResponse::with_text("ok")))
    }

    async fn upload(&self, _file_name: &str, _payload: Vec<u8>) -> Result<UploadResponse, ApiError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        self.upload_reply.lock().unwrap().take().unwrap_or_else(|| {
            Ok(UploadResponse {
                message: "CSV uploaded successfully".to_string(),
            })
        })
    }
}

fn dispatcher_for(backend: &Arc<FakeBackend>) -> QueryDispatcher {
    QueryDispatcher::new(Arc::clone(backend) as Arc<dyn Backend>)
}

async fn open(dispatcher: &mut QueryDispatcher, name: &str) {
    dispatcher.open_table(name);
    dispatcher.run_until_idle().await;
    assert!(dispatcher.state().tabs().is_open(name));
}

// ── Submission ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_blank_command_does_nothing() {
    let backend = FakeBackend::with_tables(&[]);
    let mut dispatcher = dispatcher_for(&backend);

    for text in ["", "   ", "\t\n"] {
        assert_eq!(dispatcher.submit_text(text), Submission::Ignored);
    }
    dispatcher.run_until_idle().await;

    assert_eq!(backend.executes(), 0);
    assert_eq!(backend.lists(), 0);
    assert!(dispatcher.state().log().is_empty());
    assert!(dispatcher.state().pending().is_none());
}

#[tokio::test]
async fn test_make_logs_pair_and_reloads_catalog_once() {
    let backend = FakeBackend::with_tables(&["Foo"]);
    let mut dispatcher = dispatcher_for(&backend);

    dispatcher.submit_text("MAKE Foo");
    dispatcher.run_until_idle().await;

    assert_eq!(
        dispatcher.state().log().entries(),
        &[
            LogEntry::query("DB> MAKE Foo"),
            LogEntry::success("✔ Table created successfully"),
        ]
    );
    assert_eq!(backend.lists(), 1);
    assert_eq!(dispatcher.state().catalog().names(), &["Foo".to_string()]);
    assert!(dispatcher.state().input().is_empty());
    // No active tab, so nothing to refresh
    assert_eq!(backend.details(), 0);
}

#[tokio::test]
async fn test_error_result_is_shown_verbatim() {
    let backend = FakeBackend::with_tables(&[]);
    backend.script_result(Ok(QueryResponse::with_text("Error: duplicate column")));
    let mut dispatcher = dispatcher_for(&backend);

    dispatcher.submit_text("ADD users VALUES (1, 2)");
    dispatcher.run_until_idle().await;

    let log = dispatcher.state().log().entries();
    assert_eq!(log.len(), 2);
    assert_eq!(log[1], LogEntry::error("Error: duplicate column"));
    // A well-formed failure still counts as a completed command
    assert_eq!(backend.lists(), 1);
}

#[tokio::test]
async fn test_transport_failure_logs_single_entry() {
    let backend = FakeBackend::with_tables(&["users"]);
    backend.script_result(Err(ApiError::Decode("not json".to_string())));
    let mut dispatcher = dispatcher_for(&backend);
    open(&mut dispatcher, "users").await;
    let details_before = backend.details();

    dispatcher.submit_text("SHOW users");
    dispatcher.run_until_idle().await;

    assert_eq!(dispatcher.state().log().entries(), &[LogEntry::error(QUERY_FAILURE)]);
    assert_eq!(backend.lists(), 0);
    assert_eq!(backend.details(), details_before);
    assert!(dispatcher.state().pending().is_none());
    // Input survives so the operator can retry
    assert_eq!(dispatcher.state().input(), "SHOW users");
}

#[tokio::test]
async fn test_overlapping_submission_is_rejected() {
    let backend = FakeBackend::with_tables(&[]);
    let mut dispatcher = dispatcher_for(&backend);

    let first = dispatcher.submit_text("SHOW a");
    let Submission::Dispatched { id, .. } = first else {
        panic!("expected dispatch, got {first:?}");
    };
    assert!(dispatcher.is_busy());
    assert_eq!(
        dispatcher.submit_text("SHOW b"),
        Submission::Rejected { pending: id }
    );

    dispatcher.run_until_idle().await;
    assert_eq!(backend.executes(), 1);
    assert_eq!(dispatcher.state().log().len(), 2);
    assert_eq!(dispatcher.state().log().entries()[0].text, "DB> SHOW a");
    assert!(!dispatcher.is_busy());
}

#[tokio::test]
async fn test_completed_command_refreshes_active_tab_once() {
    let backend = FakeBackend::with_tables(&["users"]);
    let mut dispatcher = dispatcher_for(&backend);
    open(&mut dispatcher, "users").await;
    assert_eq!(backend.details(), 1);

    dispatcher.submit_text("ADD users VALUES (3)");
    dispatcher.run_until_idle().await;

    assert_eq!(backend.details(), 2);
    let tab = dispatcher.state().tabs().get("users").unwrap();
    assert_eq!(tab.data(), &tagged_grid(2));
}

#[tokio::test(start_paused = true)]
async fn test_stale_refresh_never_overwrites_fresher_rows() {
    let backend = FakeBackend::with_tables(&["users"]);
    let mut dispatcher = dispatcher_for(&backend);
    open(&mut dispatcher, "users").await;

    // Refresh triggered by the first command is slow
    backend.delay_next_detail(Duration::from_millis(100));
    dispatcher.submit_text("ADD users VALUES (1)");
    let event = dispatcher.next_event().await.unwrap();
    assert_eq!(event.name(), "QueryFinished");
    dispatcher.handle_event(event);

    // Second command is issued before that refresh resolves
    assert!(matches!(
        dispatcher.submit_text("ADD users VALUES (2)"),
        Submission::Dispatched { .. }
    ));
    dispatcher.run_until_idle().await;

    // Open fetch (1), slow refresh (2), fast refresh (3)
    assert_eq!(backend.details(), 3);
    let tab = dispatcher.state().tabs().get("users").unwrap();
    assert_eq!(tab.data(), &tagged_grid(3));
}

// ── Tabs ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_open_fetches_once_then_only_selects() {
    let backend = FakeBackend::with_tables(&["Users", "Orders"]);
    let mut dispatcher = dispatcher_for(&backend);

    assert!(matches!(dispatcher.open_table("Users"), OpenStep::Fetch(_)));
    dispatcher.run_until_idle().await;
    assert_eq!(backend.details(), 1);
    assert_eq!(dispatcher.state().tabs().len(), 1);

    open(&mut dispatcher, "Orders").await;
    assert_eq!(dispatcher.state().tabs().active(), Some("Orders"));

    assert_eq!(dispatcher.open_table("Users"), OpenStep::Selected);
    dispatcher.run_until_idle().await;
    assert_eq!(backend.details(), 2);
    assert_eq!(dispatcher.state().tabs().len(), 2);
    assert_eq!(dispatcher.state().tabs().active(), Some("Users"));
}

#[tokio::test]
async fn test_open_twice_before_fetch_returns_fetches_once() {
    let backend = FakeBackend::with_tables(&["Users"]);
    let mut dispatcher = dispatcher_for(&backend);

    dispatcher.open_table("Users");
    assert_eq!(dispatcher.open_table("Users"), OpenStep::AlreadyFetching);
    assert!(dispatcher.is_busy());
    dispatcher.run_until_idle().await;

    assert_eq!(backend.details(), 1);
    assert_eq!(dispatcher.state().tabs().len(), 1);
}

#[tokio::test]
async fn test_closing_active_tab_falls_back_to_first() {
    let backend = FakeBackend::with_tables(&["A", "active", "B"]);
    let mut dispatcher = dispatcher_for(&backend);
    for name in ["A", "active", "B"] {
        open(&mut dispatcher, name).await;
    }
    assert!(dispatcher.select_tab("active"));

    assert!(dispatcher.close_tab("active"));
    assert_eq!(dispatcher.state().tabs().active(), Some("A"));
    let names: Vec<_> = dispatcher
        .state()
        .tabs()
        .tabs()
        .iter()
        .map(|t| t.name().to_string())
        .collect();
    assert_eq!(names, vec!["A", "B"]);
}

#[tokio::test]
async fn test_no_tabs_close_and_refresh_are_noops() {
    let backend = FakeBackend::with_tables(&[]);
    let mut dispatcher = dispatcher_for(&backend);

    assert!(!dispatcher.close_tab("A"));
    assert!(!dispatcher.refresh_active());
    dispatcher.run_until_idle().await;

    assert!(dispatcher.state().tabs().active().is_none());
    assert_eq!(backend.details(), 0);
}

#[tokio::test]
async fn test_refresh_active_replaces_rows_in_place() {
    let backend = FakeBackend::with_tables(&["A", "B"]);
    let mut dispatcher = dispatcher_for(&backend);
    open(&mut dispatcher, "A").await;
    open(&mut dispatcher, "B").await;
    dispatcher.select_tab("A");

    assert!(dispatcher.refresh_active());
    dispatcher.run_until_idle().await;

    let tabs = dispatcher.state().tabs();
    assert_eq!(tabs.get("A").unwrap().data(), &tagged_grid(3));
    assert_eq!(tabs.get("B").unwrap().data(), &tagged_grid(2));
    assert_eq!(tabs.tabs()[0].name(), "A");
}

// ── Catalog ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_catalog_load_replaces_snapshot() {
    let backend = FakeBackend::with_tables(&["a", "b"]);
    let mut dispatcher = dispatcher_for(&backend);

    dispatcher.load_catalog();
    dispatcher.run_until_idle().await;
    assert_eq!(dispatcher.state().catalog().len(), 2);

    *backend.tables.lock().unwrap() = vec!["c".to_string()];
    dispatcher.load_catalog();
    dispatcher.run_until_idle().await;
    assert_eq!(dispatcher.state().catalog().names(), &["c".to_string()]);
}

// ── Uploads ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_upload_success_logs_once_and_reloads_catalog() {
    let backend = FakeBackend::with_tables(&["people"]);
    let mut dispatcher = dispatcher_for(&backend);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("people.csv");
    std::fs::write(&path, "id,name\n1,ann\n").unwrap();

    assert!(dispatcher.upload(Some(&path)));
    dispatcher.run_until_idle().await;

    assert_eq!(
        dispatcher.state().log().entries(),
        &[LogEntry::success("✔ CSV uploaded successfully")]
    );
    assert_eq!(backend.lists(), 1);
}

#[tokio::test]
async fn test_upload_without_file_is_noop() {
    let backend = FakeBackend::with_tables(&[]);
    let mut dispatcher = dispatcher_for(&backend);

    assert!(!dispatcher.upload(None));
    dispatcher.run_until_idle().await;

    assert_eq!(backend.upload_calls.load(Ordering::SeqCst), 0);
    assert!(dispatcher.state().log().is_empty());
}

#[tokio::test]
async fn test_rejected_upload_logs_reason_without_reload() {
    let backend = FakeBackend::with_tables(&[]);
    backend.reply_to_upload(Err(ApiError::Rejected {
        status: reqwest::StatusCode::BAD_REQUEST,
        message: "Only CSV files allowed".to_string(),
    }));
    let mut dispatcher = dispatcher_for(&backend);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "hello").unwrap();

    dispatcher.upload(Some(&path));
    dispatcher.run_until_idle().await;

    assert_eq!(
        dispatcher.state().log().entries(),
        &[LogEntry::error("❌ Only CSV files allowed")]
    );
    assert_eq!(backend.lists(), 0);
}

#[tokio::test]
async fn test_unreadable_upload_file_logs_generic_failure() {
    let backend = FakeBackend::with_tables(&[]);
    let mut dispatcher = dispatcher_for(&backend);

    let dir = tempfile::tempdir().unwrap();
    dispatcher.upload(Some(&dir.path().join("missing.csv")));
    dispatcher.run_until_idle().await;

    let log = dispatcher.state().log().entries();
    assert_eq!(log, &[LogEntry::error(UPLOAD_FAILURE)]);
    assert_eq!(log[0].kind, LogKind::Error);
    assert_eq!(backend.upload_calls.load(Ordering::SeqCst), 0);
    assert!(!dispatcher.is_busy());
}
