use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::api::Backend;

use super::channel::{ApiRequest, ApiResult};

/// Runs backend calls off the reducer. Every request is executed on its own
/// task, so results may come back in any order; the reducer sorts that out
/// with generations.
pub struct ApiWorker {
    request_tx: mpsc::UnboundedSender<ApiRequest>,
    result_rx: mpsc::UnboundedReceiver<ApiResult>,
    pending: usize,
}

impl ApiWorker {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<ApiRequest>();
        let (result_tx, result_rx) = mpsc::unbounded_channel::<ApiResult>();

        tokio::spawn(async move {
            while let Some(request) = request_rx.recv().await {
                let backend = Arc::clone(&backend);
                let tx = result_tx.clone();

                tokio::spawn(async move {
                    let result = execute(backend.as_ref(), request).await;
                    let _ = tx.send(result);
                });
            }
        });

        Self {
            request_tx,
            result_rx,
            pending: 0,
        }
    }

    pub fn request(&mut self, req: ApiRequest) {
        debug!(?req, "dispatch");
        if self.request_tx.send(req).is_ok() {
            self.pending += 1;
        }
    }

    pub fn try_recv(&mut self) -> Option<ApiResult> {
        let result = self.result_rx.try_recv().ok()?;
        self.pending = self.pending.saturating_sub(1);
        Some(result)
    }

    /// Wait for the next result. Returns `None` when nothing is in flight.
    pub async fn recv(&mut self) -> Option<ApiResult> {
        if self.pending == 0 {
            return None;
        }
        let result = self.result_rx.recv().await?;
        self.pending -= 1;
        Some(result)
    }

    /// Number of requests whose results have not been received yet.
    #[cfg(test)]
    pub fn pending(&self) -> usize {
        self.pending
    }
}

async fn execute(backend: &dyn Backend, request: ApiRequest) -> ApiResult {
    match request {
        ApiRequest::CurrentRepository => {
            ApiResult::CurrentRepository(backend.current_repository().await)
        }
        ApiRequest::ListRepositories { generation } => ApiResult::Repositories {
            generation,
            repositories: backend.list_repositories().await,
        },
        ApiRequest::CloneRepository { url, force } => {
            ApiResult::Cloned(backend.clone_repository(&url, force).await)
        }
        ApiRequest::SwitchRepository {
            generation,
            repository,
        } => {
            let result = backend.switch_repository(&repository.id()).await;
            ApiResult::Switched {
                generation,
                repository,
                result,
            }
        }
        ApiRequest::FileTree {
            generation,
            max_depth,
        } => ApiResult::FileTree {
            generation,
            records: backend.file_tree(max_depth).await,
        },
        ApiRequest::FileContent(ticket) => {
            let content = backend.file_content(&ticket.path).await;
            ApiResult::FileContent { ticket, content }
        }
        ApiRequest::SaveFile(ticket) => {
            let result = backend.save_file(&ticket.path, &ticket.content).await;
            ApiResult::Saved { ticket, result }
        }
        ApiRequest::CreateFile { generation, path } => {
            let result = backend.create_file(&path, "").await;
            ApiResult::Created {
                generation,
                path,
                result,
            }
        }
        ApiRequest::SearchFiles { generation, query } => ApiResult::SearchResults {
            generation,
            results: backend.search_files(&query).await,
        },
        ApiRequest::ChatHistory => ApiResult::ChatHistory(backend.chat_history().await),
        ApiRequest::SendMessage(pending) => ApiResult::Reply {
            turn: pending.turn,
            reply: backend.send_message(&pending.request).await,
        },
        ApiRequest::ClearChat => ApiResult::ChatCleared(backend.clear_chat().await),
    }
}
