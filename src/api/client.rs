// HTTP client for the MiniDB service

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::error::ApiError;
use super::types::{ErrorBody, QueryRequest, QueryResponse, RowGrid, TableName, UploadResponse};
use super::Backend;

const UPLOAD_CONTENT_TYPE: &str = "text/csv";

pub struct MiniDbClient {
    client: Client,
    base_url: String,
}

impl MiniDbClient {
    /// Create a client for the service at `base_url`.
    ///
    /// `timeout` of `None` leaves requests unbounded.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(ApiError::Status {
                status,
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl Backend for MiniDbClient {
    async fn list_tables(&self) -> Result<Vec<TableName>, ApiError> {
        tracing::debug!("Fetching table list from {}", self.base_url);

        let response = self.client.get(self.url("/tables")).send().await?;
        let tables: Vec<TableName> = Self::decode(response).await?;

        tracing::debug!("Received {} table names", tables.len());
        Ok(tables)
    }

    async fn table_detail(&self, name: &str) -> Result<RowGrid, ApiError> {
        tracing::debug!("Fetching rows for table {}", name);

        let path = format!("/table/{}", urlencoding::encode(name));
        let response = self.client.get(self.url(&path)).send().await?;
        let rows: RowGrid = Self::decode(response).await?;

        tracing::debug!("Received {} rows for table {}", rows.len(), name);
        Ok(rows)
    }

    async fn execute(&self, query: &str) -> Result<QueryResponse, ApiError> {
        tracing::debug!("Sending command: {:?}", query);

        let response = self
            .client
            .post(self.url("/query"))
            .json(&QueryRequest::new(query))
            .send()
            .await?;
        let reply: QueryResponse = Self::decode(response).await?;

        tracing::debug!("Received result: {:?}", reply.result);
        Ok(reply)
    }

    async fn upload(&self, file_name: &str, payload: Vec<u8>) -> Result<UploadResponse, ApiError> {
        tracing::debug!("Uploading {} ({} bytes)", file_name, payload.len());

        let part = Part::bytes(payload)
            .file_name(file_name.to_string())
            .mime_str(UPLOAD_CONTENT_TYPE)?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.url("/upload"))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if status.is_client_error() {
            let body = response.bytes().await?;
            let reason = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.text().map(str::to_string));
            return Err(match reason {
                Some(message) => ApiError::Rejected { status, message },
                None => ApiError::Status {
                    status,
                    body: String::from_utf8_lossy(&body).into_owned(),
                },
            });
        }

        Self::decode(response).await
    }
}
