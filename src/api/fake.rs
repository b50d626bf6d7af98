//! In-memory backend for tests. Records every call and serves scripted data.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::error::{BackendError, BackendResult};
use super::types::{ChatTurn, FileRecord, MessageRequest, RepoId, Repository};
use super::Backend;

#[derive(Default)]
pub struct FakeBackend {
    calls: Mutex<Vec<String>>,
    pub current: Mutex<Option<Repository>>,
    pub repositories: Mutex<Vec<Repository>>,
    /// File listing per repository identity.
    pub trees: Mutex<HashMap<RepoId, Vec<FileRecord>>>,
    pub files: Mutex<HashMap<String, String>>,
    /// Artificial latency for content loads, per path.
    pub load_delays: Mutex<HashMap<String, Duration>>,
    pub save_errors: Mutex<VecDeque<BackendError>>,
    pub clone_error: Mutex<Option<BackendError>>,
    pub replies: Mutex<VecDeque<BackendResult<String>>>,
    pub history: Mutex<Vec<ChatTurn>>,
    pub sent: Mutex<Vec<MessageRequest>>,
}

pub fn repo(owner: &str, name: &str) -> Repository {
    Repository {
        owner: owner.to_string(),
        name: name.to_string(),
        local_path: format!("./repos/{owner}_{name}"),
        branch: None,
        commit_hash: None,
        last_modified: None,
    }
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repository(self, repository: Repository, tree: Vec<FileRecord>) -> Self {
        self.trees
            .lock()
            .unwrap()
            .insert(repository.id(), tree);
        self.repositories.lock().unwrap().push(repository);
        self
    }

    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_string(), content.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn current_id(&self) -> BackendResult<RepoId> {
        self.current
            .lock()
            .unwrap()
            .as_ref()
            .map(Repository::id)
            .ok_or_else(|| BackendError::rejected(400, "No repository selected"))
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn current_repository(&self) -> BackendResult<Option<Repository>> {
        self.record("current_repository".to_string());
        Ok(self.current.lock().unwrap().clone())
    }

    async fn list_repositories(&self) -> BackendResult<Vec<Repository>> {
        self.record("list_repositories".to_string());
        Ok(self.repositories.lock().unwrap().clone())
    }

    async fn clone_repository(&self, url: &str, force: bool) -> BackendResult<Repository> {
        self.record(format!("clone_repository {url} {force}"));
        if let Some(err) = self.clone_error.lock().unwrap().clone() {
            return Err(err);
        }
        let mut parts = url.trim_end_matches(".git").rsplit('/');
        let name = parts.next().unwrap_or("repo").to_string();
        let owner = parts.next().unwrap_or("unknown").to_string();
        let cloned = repo(&owner, &name);
        let mut repos = self.repositories.lock().unwrap();
        if repos.iter().any(|r| r.id() == cloned.id()) && !force {
            return Err(BackendError::rejected(400, "Repository already exists"));
        }
        repos.retain(|r| r.id() != cloned.id());
        repos.push(cloned.clone());
        *self.current.lock().unwrap() = Some(cloned.clone());
        Ok(cloned)
    }

    async fn switch_repository(&self, id: &RepoId) -> BackendResult<()> {
        self.record(format!("switch_repository {id}"));
        let found = self
            .repositories
            .lock()
            .unwrap()
            .iter()
            .find(|r| &r.id() == id)
            .cloned();
        match found {
            Some(r) => {
                *self.current.lock().unwrap() = Some(r);
                Ok(())
            }
            None => Err(BackendError::rejected(404, "Repository not found locally")),
        }
    }

    async fn file_tree(&self, max_depth: Option<u32>) -> BackendResult<Vec<FileRecord>> {
        self.record(format!("file_tree {max_depth:?}"));
        let id = self.current_id()?;
        Ok(self
            .trees
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .unwrap_or_default())
    }

    async fn file_content(&self, path: &str) -> BackendResult<String> {
        self.record(format!("file_content {path}"));
        let delay = self.load_delays.lock().unwrap().get(path).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| BackendError::rejected(400, format!("File not found: {path}")))
    }

    async fn save_file(&self, path: &str, content: &str) -> BackendResult<()> {
        self.record(format!("save_file {path}"));
        if let Some(err) = self.save_errors.lock().unwrap().pop_front() {
            return Err(err);
        }
        self.files
            .lock()
            .unwrap()
            .insert(path.to_string(), content.to_string());
        Ok(())
    }

    async fn create_file(&self, path: &str, content: &str) -> BackendResult<()> {
        self.record(format!("create_file {path}"));
        let id = self.current_id()?;
        let mut files = self.files.lock().unwrap();
        if files.contains_key(path) {
            return Err(BackendError::rejected(400, "File already exists"));
        }
        files.insert(path.to_string(), content.to_string());
        self.trees
            .lock()
            .unwrap()
            .entry(id)
            .or_default()
            .push(FileRecord::file(path, content.len() as u64));
        Ok(())
    }

    async fn search_files(&self, query: &str) -> BackendResult<Vec<FileRecord>> {
        self.record(format!("search_files {query}"));
        let id = self.current_id()?;
        let needle = query.to_lowercase();
        Ok(self
            .trees
            .lock()
            .unwrap()
            .get(&id)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| {
                        r.kind == super::FileKind::File
                            && r.path
                                .rsplit('/')
                                .next()
                                .is_some_and(|n| n.to_lowercase().contains(&needle))
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn chat_history(&self) -> BackendResult<Vec<ChatTurn>> {
        self.record("chat_history".to_string());
        Ok(self.history.lock().unwrap().clone())
    }

    async fn send_message(&self, request: &MessageRequest) -> BackendResult<String> {
        self.record(format!("send_message {}", request.message));
        self.sent.lock().unwrap().push(request.clone());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(format!("echo: {}", request.message)));
        if let Ok(ref text) = reply {
            let mut history = self.history.lock().unwrap();
            history.push(ChatTurn::user(&request.message));
            history.push(ChatTurn::assistant(text));
        }
        reply
    }

    async fn clear_chat(&self) -> BackendResult<()> {
        self.record("clear_chat".to_string());
        self.history.lock().unwrap().clear();
        Ok(())
    }
}
