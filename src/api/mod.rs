pub mod client;
pub mod error;
#[cfg(test)]
pub mod fake;
pub mod types;

use async_trait::async_trait;

pub use client::HttpBackend;
pub use error::{BackendError, BackendResult};
pub use types::{ChatTurn, FileKind, FileRecord, MessageRequest, RepoId, Repository, Role};

/// The remote workspace service. It is the sole source of truth for
/// repositories, file contents and the stored conversation.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn current_repository(&self) -> BackendResult<Option<Repository>>;

    async fn list_repositories(&self) -> BackendResult<Vec<Repository>>;

    async fn clone_repository(&self, url: &str, force: bool) -> BackendResult<Repository>;

    async fn switch_repository(&self, id: &RepoId) -> BackendResult<()>;

    async fn file_tree(&self, max_depth: Option<u32>) -> BackendResult<Vec<FileRecord>>;

    async fn file_content(&self, path: &str) -> BackendResult<String>;

    async fn save_file(&self, path: &str, content: &str) -> BackendResult<()>;

    async fn create_file(&self, path: &str, content: &str) -> BackendResult<()>;

    async fn search_files(&self, query: &str) -> BackendResult<Vec<FileRecord>>;

    async fn chat_history(&self) -> BackendResult<Vec<ChatTurn>>;

    async fn send_message(&self, request: &MessageRequest) -> BackendResult<String>;

    async fn clear_chat(&self) -> BackendResult<()>;
}
