//! Google Drive v3 file store.
//!
//! Talks to the REST API directly with an already-issued OAuth access token
//! (`GOOGLE_DRIVE_TOKEN`). Obtaining or refreshing the token is the host's
//! job.

use super::{FileStore, Folder};
use crate::document::DocumentRef;
use crate::error::{ScreenError, StoreError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

const DRIVE_API: &str = "https://www.googleapis.com/drive/v3";
const FOLDER_MIME: &str = "application/vnd.google-apps.folder";
const PAGE_SIZE: &str = "100";

/// [`FileStore`] over the Drive v3 REST API.
pub struct DriveStore {
    client: Client,
    token: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveFile {
    id: String,
    name: String,
    #[serde(default)]
    mime_type: String,
}

impl DriveStore {
    /// Build a store from an access token. `timeout_secs` bounds every request.
    pub fn new(token: impl Into<String>, timeout_secs: u64) -> Result<Self, ScreenError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ScreenError::MissingCredential {
                name: "GOOGLE_DRIVE_TOKEN".into(),
                hint: "export GOOGLE_DRIVE_TOKEN=<oauth access token>".into(),
            });
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs.max(1)))
            .build()
            .map_err(|e| ScreenError::InvalidConfig(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            token,
            base_url: DRIVE_API.to_string(),
        })
    }

    /// Point the store at another API root (proxies, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Run a `files.list` query, following `nextPageToken` to the end.
    async fn list_files(&self, query: &str, fields: &str) -> Result<Vec<DriveFile>, StoreError> {
        let endpoint = format!("{}/files", self.base_url);
        let mut files = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut params = vec![
                ("q", query.to_string()),
                ("pageSize", PAGE_SIZE.to_string()),
                ("fields", format!("nextPageToken,{fields}")),
            ];
            if let Some(ref token) = page_token {
                params.push(("pageToken", token.clone()));
            }

            let resp = self
                .client
                .get(&endpoint)
                .bearer_auth(&self.token)
                .query(&params)
                .send()
                .await
                .map_err(|e| request_failed(&endpoint, e))?;

            if !resp.status().is_success() {
                return Err(StoreError::BadStatus {
                    endpoint,
                    status: resp.status().as_u16(),
                });
            }

            let page: FileList = resp.json().await.map_err(|e| request_failed(&endpoint, e))?;
            files.extend(page.files);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(files)
    }
}

#[async_trait]
impl FileStore for DriveStore {
    async fn list_folders(&self) -> Result<Vec<Folder>, StoreError> {
        let files = self.list_files(&folders_query(), "files(id,name)").await?;
        info!("Drive: {} folders", files.len());
        Ok(files
            .into_iter()
            .map(|f| Folder {
                id: f.id,
                name: f.name,
            })
            .collect())
    }

    async fn list_documents(
        &self,
        folder_id: &str,
        content_types: &[String],
    ) -> Result<Vec<DocumentRef>, StoreError> {
        let query = documents_query(folder_id, content_types);
        debug!("Drive query: {}", query);
        let files = self.list_files(&query, "files(id,name,mimeType)").await?;
        info!("Drive: {} documents in folder {}", files.len(), folder_id);
        Ok(files
            .into_iter()
            .map(|f| DocumentRef::new(f.id, f.name, f.mime_type))
            .collect())
    }

    async fn download(&self, document_id: &str) -> Result<Vec<u8>, StoreError> {
        let endpoint = format!("{}/files/{}", self.base_url, document_id);
        let resp = self
            .client
            .get(&endpoint)
            .bearer_auth(&self.token)
            .query(&[("alt", "media")])
            .send()
            .await
            .map_err(|e| request_failed(&endpoint, e))?;

        match resp.status().as_u16() {
            200..=299 => {}
            404 => {
                return Err(StoreError::NotFound {
                    id: document_id.to_string(),
                })
            }
            status => return Err(StoreError::BadStatus { endpoint, status }),
        }

        let bytes = resp.bytes().await.map_err(|e| request_failed(&endpoint, e))?;
        debug!("Drive: downloaded {} ({} bytes)", document_id, bytes.len());
        Ok(bytes.to_vec())
    }
}

fn request_failed(endpoint: &str, e: reqwest::Error) -> StoreError {
    StoreError::RequestFailed {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    }
}

/// Drive query string literals escape `\` and `'` with a backslash.
fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

fn folders_query() -> String {
    format!("mimeType={} and trashed=false", quote(FOLDER_MIME))
}

fn documents_query(folder_id: &str, content_types: &[String]) -> String {
    let types = content_types
        .iter()
        .map(|t| format!("mimeType={}", quote(t)))
        .collect::<Vec<_>>()
        .join(" or ");

    if types.is_empty() {
        format!("{} in parents and trashed=false", quote(folder_id))
    } else {
        format!("{} in parents and ({}) and trashed=false", quote(folder_id), types)
    }
}
