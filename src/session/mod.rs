// Console session: catalog, tabs, transcript, and the dispatcher that drives them

pub mod catalog;
pub mod classifier;
pub mod dispatcher;
pub mod events;
pub mod state;
pub mod tabs;
pub mod terminal_log;
pub mod upload;

pub use catalog::TableCatalog;
pub use classifier::{classify, outcome_entries};
pub use dispatcher::QueryDispatcher;
pub use events::{FetchKind, SessionEvent};
pub use state::{PendingCommand, QueryCompletion, SessionState, Submission, QUERY_FAILURE};
pub use tabs::{OpenStep, RefreshTicket, SessionTabs, TabSession};
pub use terminal_log::{LogEntry, LogKind, TerminalLog};
pub use upload::{upload_entry, UploadBridge, UPLOAD_FAILURE};
