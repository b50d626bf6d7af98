use crate::api::RepoId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: String,
    pub size: Option<u64>,
}

impl SelectedFile {
    /// Last path segment, for display.
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// What the user is currently looking at: the repository, the file within
/// it and the text highlighted in that file.
///
/// Fields are only writable through the two handles so that each slot has a
/// single owner: the repository/explorer side sets repository and file, the
/// editor sets the text selection. Everyone else reads.
#[derive(Debug, Default)]
pub struct SelectionState {
    repository: Option<RepoId>,
    file: Option<SelectedFile>,
    text: Option<String>,
}

/// Write access for the repository registry and the file explorer.
pub struct Navigation<'a> {
    state: &'a mut SelectionState,
}

/// Write access for the editor.
pub struct Editing<'a> {
    state: &'a mut SelectionState,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn repository(&self) -> Option<&RepoId> {
        self.repository.as_ref()
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn navigation(&mut self) -> Navigation<'_> {
        Navigation { state: self }
    }

    pub fn editing(&mut self) -> Editing<'_> {
        Editing { state: self }
    }
}

impl Navigation<'_> {
    /// A different repository invalidates the file and text selection.
    pub fn set_repository(&mut self, repository: Option<RepoId>) {
        self.state.repository = repository;
        self.state.file = None;
        self.state.text = None;
    }

    /// Selecting a file (or clearing it) drops any highlighted text.
    pub fn set_file(&mut self, file: Option<SelectedFile>) {
        self.state.file = file;
        self.state.text = None;
    }
}

impl Editing<'_> {
    /// Record highlighted text. An empty selection clears it, and nothing is
    /// recorded while no file is open.
    pub fn set_text(&mut self, text: Option<String>) {
        if self.state.file.is_none() {
            self.state.text = None;
            return;
        }
        self.state.text = text.filter(|t| !t.is_empty());
    }
}
