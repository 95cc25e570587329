// Events delivered back to the dispatcher when background requests finish

use uuid::Uuid;

use crate::api::{ApiError, QueryResponse, RowGrid, TableName, UploadResponse};

/// Why a table's rows were fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// First fetch for a tab being opened
    Open,
    /// Refresh of an already open tab
    Refresh,
}

/// Completion of one network operation started by the dispatcher
#[derive(Debug)]
pub enum SessionEvent {
    /// A submitted command got its answer (or failed to)
    QueryFinished {
        id: Uuid,
        outcome: Result<QueryResponse, ApiError>,
    },

    /// A table-list load finished
    CatalogLoaded {
        generation: u64,
        outcome: Result<Vec<TableName>, ApiError>,
    },

    /// Rows for one table arrived
    TableFetched {
        name: TableName,
        generation: u64,
        kind: FetchKind,
        outcome: Result<RowGrid, ApiError>,
    },

    /// A bulk-load file was transmitted
    UploadFinished {
        file_name: String,
        outcome: Result<UploadResponse, ApiError>,
    },
}

impl SessionEvent {
    /// Short name for tracing
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::QueryFinished { .. } => "QueryFinished",
            SessionEvent::CatalogLoaded { .. } => "CatalogLoaded",
            SessionEvent::TableFetched {
                kind: FetchKind::Open,
                ..
            } => "TableOpened",
            SessionEvent::TableFetched {
                kind: FetchKind::Refresh,
                ..
            } => "TableRefreshed",
            SessionEvent::UploadFinished { .. } => "UploadFinished",
        }
    }
}
