// MiniDB service API: the four endpoints the console talks to

pub mod client;
pub mod error;
pub mod types;

use async_trait::async_trait;

pub use client::MiniDbClient;
pub use error::ApiError;
pub use types::{QueryRequest, QueryResponse, RowGrid, TableName, UploadResponse};

/// Remote executor and storage behind the console
///
/// `MiniDbClient` is the HTTP implementation; tests substitute an
/// in-memory backend.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Current table names, in the service's order
    async fn list_tables(&self) -> Result<Vec<TableName>, ApiError>;

    /// All rows of one table
    async fn table_detail(&self, name: &str) -> Result<RowGrid, ApiError>;

    /// Run one command through the service's parser and executor
    async fn execute(&self, query: &str) -> Result<QueryResponse, ApiError>;

    /// Bulk-load a file; `file_name` is forwarded so the service can name the table
    async fn upload(&self, file_name: &str, payload: Vec<u8>) -> Result<UploadResponse, ApiError>;
}
