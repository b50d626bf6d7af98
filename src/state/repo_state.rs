use crate::api::{BackendError, RepoId, Repository};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloneRejected {
    /// A blank URL; the form error is set.
    EmptyUrl,
    /// Another clone is still running.
    Busy,
}

/// Known repositories and which one is current.
#[derive(Debug, Default)]
pub struct RepoState {
    repositories: Vec<Repository>,
    current: Option<RepoId>,
    pub loading: bool,
    cloning: bool,
    clone_error: Option<String>,
    /// Highlighted row in the repository panel.
    pub selected: usize,
}

impl RepoState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn repositories(&self) -> &[Repository] {
        &self.repositories
    }

    pub fn current(&self) -> Option<&RepoId> {
        self.current.as_ref()
    }

    pub fn current_repository(&self) -> Option<&Repository> {
        let id = self.current.as_ref()?;
        self.find(id)
    }

    pub fn find(&self, id: &RepoId) -> Option<&Repository> {
        self.repositories.iter().find(|r| &r.id() == id)
    }

    pub fn selected_repository(&self) -> Option<&Repository> {
        self.repositories.get(self.selected)
    }

    pub fn select_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_down(&mut self) {
        if !self.repositories.is_empty() {
            self.selected = (self.selected + 1).min(self.repositories.len() - 1);
        }
    }

    pub fn is_current(&self, id: &RepoId) -> bool {
        self.current.as_ref() == Some(id)
    }

    pub fn is_cloning(&self) -> bool {
        self.cloning
    }

    pub fn clone_error(&self) -> Option<&str> {
        self.clone_error.as_deref()
    }

    /// Replace the listing. The current repository is left alone even when
    /// the listing does not mention it; only a switch changes it.
    pub fn replace_list(&mut self, repositories: Vec<Repository>) {
        self.repositories = repositories;
        self.loading = false;
        self.selected = self.selected.min(self.repositories.len().saturating_sub(1));
    }

    /// Make `repository` current, adding or refreshing its listing entry.
    /// Returns true if the identity changed.
    pub fn set_current(&mut self, repository: Repository) -> bool {
        let id = repository.id();
        match self.repositories.iter_mut().find(|r| r.id() == id) {
            Some(existing) => *existing = repository,
            None => self.repositories.push(repository),
        }
        let changed = self.current.as_ref() != Some(&id);
        self.current = Some(id);
        changed
    }

    /// Validate the clone form. On success the trimmed URL is returned and
    /// the registry is marked as cloning.
    pub fn begin_clone(&mut self, url: &str) -> Result<String, CloneRejected> {
        if self.cloning {
            return Err(CloneRejected::Busy);
        }
        let url = url.trim();
        if url.is_empty() {
            self.clone_error = Some("Please enter a repository URL".to_string());
            return Err(CloneRejected::EmptyUrl);
        }
        self.cloning = true;
        self.clone_error = None;
        Ok(url.to_string())
    }

    /// Finish a clone. A failure only records the form error; the listing
    /// and the current repository are untouched.
    pub fn finish_clone(&mut self, result: Result<Repository, BackendError>) -> Option<Repository> {
        self.cloning = false;
        match result {
            Ok(repository) => {
                self.clone_error = None;
                Some(repository)
            }
            Err(e) => {
                self.clone_error = Some(e.to_string());
                None
            }
        }
    }
}
