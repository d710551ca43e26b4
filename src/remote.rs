//! Remote workspace store client.
//!
//! The workspace is a hierarchical store addressed over REST: `list` and
//! `export` are GETs, everything else POSTs, all with JSON bodies. File
//! content crosses the wire base64-encoded. "Resource does not exist" on
//! list/delete is a legitimately absent target (first sync against a fresh
//! branch folder), so the client maps it to an empty result instead of an
//! error; every other failure aborts the run.

use crate::error::SyncError;
use async_trait::async_trait;
use base64::prelude::{Engine as _, BASE64_STANDARD};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

/// Error code the workspace returns for absent paths.
const NOT_FOUND_CODE: &str = "RESOURCE_DOES_NOT_EXIST";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Directory,
    Notebook,
    /// Anything the sync does not track (libraries, repos, ...).
    Other,
}

/// One entry from a workspace directory listing.
#[derive(Debug, Clone)]
pub struct ObjectInfo {
    pub path: String,
    pub kind: ObjectKind,
}

/// Seam between the sync engine and the workspace REST API.
#[async_trait]
pub trait WorkspaceStore: Send + Sync {
    /// List the immediate children of a directory. A missing path yields an
    /// empty listing, not an error.
    async fn list(&self, path: &str) -> Result<Vec<ObjectInfo>, SyncError>;

    /// Fetch the source content of a notebook.
    async fn export(&self, path: &str) -> Result<Vec<u8>, SyncError>;

    /// Write a notebook, replacing any existing content when `overwrite`.
    async fn import(&self, path: &str, content: &[u8], overwrite: bool) -> Result<(), SyncError>;

    /// Delete a notebook. A missing path is treated as success.
    async fn delete(&self, path: &str) -> Result<(), SyncError>;

    /// Create a directory and any missing parents.
    async fn mkdirs(&self, path: &str) -> Result<(), SyncError>;
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    objects: Vec<ObjectEntry>,
}

#[derive(Debug, Deserialize)]
struct ObjectEntry {
    path: String,
    object_type: String,
}

#[derive(Debug, Deserialize)]
struct ExportResponse {
    content: String,
}

/// Workspace language tag for imported sources.
fn language_tag(extension: &str) -> &'static str {
    match extension {
        "scala" => "SCALA",
        "sql" => "SQL",
        "r" => "R",
        _ => "PYTHON",
    }
}

/// reqwest-backed [`WorkspaceStore`] implementation.
///
/// Credentials come from the `NBSYNC_USER` / `NBSYNC_PASS` environment
/// variables when set; otherwise requests go out unauthenticated and the
/// transport's own netrc handling applies.
pub struct WorkspaceClient {
    http: Client,
    api_url: String,
    language: &'static str,
    auth: Option<(String, String)>,
}

impl WorkspaceClient {
    pub fn new(api_url: &str, notebook_extension: &str) -> Self {
        let api_url = if api_url.ends_with('/') {
            api_url.to_string()
        } else {
            format!("{}/", api_url)
        };
        let auth = std::env::var("NBSYNC_USER")
            .ok()
            .map(|user| (user, std::env::var("NBSYNC_PASS").unwrap_or_default()));
        Self {
            http: Client::new(),
            api_url,
            language: language_tag(notebook_extension),
            auth,
        }
    }

    /// Issue one API call. Returns the parsed JSON body on success, or on a
    /// failure whose `error_code` is in `ignored` (the body then lacks the
    /// success fields, which deserialize to their defaults).
    async fn call(
        &self,
        endpoint: &str,
        body: serde_json::Value,
        ignored: &[&str],
    ) -> Result<serde_json::Value, SyncError> {
        debug!(endpoint, "workspace API call");
        let url = format!("{}{}", self.api_url, endpoint);
        let request = if matches!(endpoint, "workspace/list" | "workspace/export") {
            self.http.get(&url).json(&body)
        } else {
            self.http.post(&url).json(&body)
        };
        let request = match &self.auth {
            Some((user, pass)) => request.basic_auth(user, Some(pass)),
            None => request,
        };

        let response = request.send().await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(SyncError::Unauthorized);
        }
        let status = response.status();
        let text = response.text().await?;
        let value: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| SyncError::Remote(format!("malformed response from {}: {}", endpoint, e)))?;

        if status.is_success() {
            return Ok(value);
        }
        if let Some(code) = value.get("error_code").and_then(|c| c.as_str()) {
            if ignored.contains(&code) {
                debug!(endpoint, code, "ignored workspace error");
                return Ok(value);
            }
        }
        Err(SyncError::Remote(text))
    }
}

#[async_trait]
impl WorkspaceStore for WorkspaceClient {
    async fn list(&self, path: &str) -> Result<Vec<ObjectInfo>, SyncError> {
        let value = self
            .call("workspace/list", json!({ "path": path }), &[NOT_FOUND_CODE])
            .await?;
        let parsed: ListResponse = serde_json::from_value(value)
            .map_err(|e| SyncError::Remote(format!("malformed listing: {}", e)))?;
        Ok(parsed
            .objects
            .into_iter()
            .map(|entry| ObjectInfo {
                kind: match entry.object_type.as_str() {
                    "DIRECTORY" => ObjectKind::Directory,
                    "NOTEBOOK" => ObjectKind::Notebook,
                    _ => ObjectKind::Other,
                },
                path: entry.path,
            })
            .collect())
    }

    async fn export(&self, path: &str) -> Result<Vec<u8>, SyncError> {
        let value = self
            .call(
                "workspace/export",
                json!({ "format": "SOURCE", "path": path }),
                &[],
            )
            .await?;
        let parsed: ExportResponse = serde_json::from_value(value)
            .map_err(|e| SyncError::Remote(format!("malformed export: {}", e)))?;
        BASE64_STANDARD
            .decode(parsed.content.as_bytes())
            .map_err(|e| SyncError::Remote(format!("invalid export content: {}", e)))
    }

    async fn import(&self, path: &str, content: &[u8], overwrite: bool) -> Result<(), SyncError> {
        self.call(
            "workspace/import",
            json!({
                "path": path,
                "language": self.language,
                "overwrite": overwrite,
                "content": BASE64_STANDARD.encode(content),
            }),
            &[],
        )
        .await?;
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<(), SyncError> {
        self.call("workspace/delete", json!({ "path": path }), &[NOT_FOUND_CODE])
            .await?;
        Ok(())
    }

    async fn mkdirs(&self, path: &str) -> Result<(), SyncError> {
        self.call("workspace/mkdirs", json!({ "path": path }), &[])
            .await?;
        Ok(())
    }
}
