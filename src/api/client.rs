//! HTTP client for the workspace backend's `/api` surface.
//!
//! The session cookie handed out by the backend is kept in the client's
//! cookie store so every request carries it.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{BackendError, BackendResult};
use super::types::{ChatTurn, FileRecord, MessageRequest, RepoId, Repository};
use super::Backend;

#[derive(Deserialize)]
struct CurrentRepoResponse {
    #[serde(default)]
    current_repo: Option<Repository>,
}

#[derive(Deserialize)]
struct RepoListResponse {
    #[serde(default)]
    repositories: Vec<Repository>,
}

#[derive(Deserialize)]
struct TreeResponse {
    #[serde(default)]
    file_tree: Vec<FileRecord>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    content: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<FileRecord>,
}

#[derive(Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    history: Vec<ChatTurn>,
}

#[derive(Deserialize)]
struct MessageResponse {
    response: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Serialize)]
struct CloneRequest<'a> {
    url: &'a str,
    force: bool,
}

#[derive(Serialize)]
struct SwitchRequest<'a> {
    owner: &'a str,
    repo: &'a str,
}

#[derive(Serialize)]
struct WriteRequest<'a> {
    path: &'a str,
    content: &'a str,
}

pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> BackendResult<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> BackendResult<T> {
        debug!(path, "GET");
        let response = self.client.get(self.url(path)).query(query).send().await?;
        decode(response).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> BackendResult<T> {
        debug!(path, "POST");
        let response = self.client.post(self.url(path)).json(body).send().await?;
        decode(response).await
    }

    async fn post_unit<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> BackendResult<()> {
        debug!(path, "POST");
        let response = self.client.post(self.url(path)).json(body).send().await?;
        expect_success(response).await
    }
}

/// Build the error for a non-2xx reply from its status and raw body.
fn rejection(status: StatusCode, body: &str) -> BackendError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| format!("status {}", status.as_u16()))
        });
    BackendError::rejected(status.as_u16(), message)
}

async fn expect_success(response: Response) -> BackendResult<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    Err(rejection(status, &body))
}

async fn decode<T: DeserializeOwned>(response: Response) -> BackendResult<T> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(rejection(status, &body));
    }
    serde_json::from_str(&body).map_err(|e| BackendError::Network(format!("invalid response: {e}")))
}

#[async_trait]
impl Backend for HttpBackend {
    async fn current_repository(&self) -> BackendResult<Option<Repository>> {
        let body: CurrentRepoResponse = self.get_json("/repo/current", &[]).await?;
        Ok(body.current_repo)
    }

    async fn list_repositories(&self) -> BackendResult<Vec<Repository>> {
        let body: RepoListResponse = self.get_json("/repo/list", &[]).await?;
        Ok(body.repositories)
    }

    async fn clone_repository(&self, url: &str, force: bool) -> BackendResult<Repository> {
        self.post_json("/repo/clone", &CloneRequest { url, force })
            .await
    }

    async fn switch_repository(&self, id: &RepoId) -> BackendResult<()> {
        let body = SwitchRequest {
            owner: &id.owner,
            repo: &id.name,
        };
        self.post_unit("/repo/switch", &body).await
    }

    async fn file_tree(&self, max_depth: Option<u32>) -> BackendResult<Vec<FileRecord>> {
        let query: Vec<(&str, String)> = max_depth
            .map(|d| vec![("max_depth", d.to_string())])
            .unwrap_or_default();
        let body: TreeResponse = self.get_json("/files/tree", &query).await?;
        Ok(body.file_tree)
    }

    async fn file_content(&self, path: &str) -> BackendResult<String> {
        let body: ContentResponse = self
            .get_json("/files/content", &[("path", path.to_string())])
            .await?;
        Ok(body.content)
    }

    async fn save_file(&self, path: &str, content: &str) -> BackendResult<()> {
        self.post_unit("/files/save", &WriteRequest { path, content })
            .await
    }

    async fn create_file(&self, path: &str, content: &str) -> BackendResult<()> {
        self.post_unit("/files/create", &WriteRequest { path, content })
            .await
    }

    async fn search_files(&self, query: &str) -> BackendResult<Vec<FileRecord>> {
        let params = [("q", query.to_string()), ("type", "name".to_string())];
        let body: SearchResponse = self.get_json("/files/search", &params).await?;
        Ok(body.results)
    }

    async fn chat_history(&self) -> BackendResult<Vec<ChatTurn>> {
        let body: HistoryResponse = self.get_json("/chat/history", &[]).await?;
        Ok(body.history)
    }

    async fn send_message(&self, request: &MessageRequest) -> BackendResult<String> {
        let body: MessageResponse = self.post_json("/chat/message", request).await?;
        Ok(body.response)
    }

    async fn clear_chat(&self) -> BackendResult<()> {
        debug!(path = "/chat/clear", "DELETE");
        let response = self.client.delete(self.url("/chat/clear")).send().await?;
        expect_success(response).await
    }
}
