use crate::api::{FileKind, FileRecord};

use super::file_tree::{build_tree, FileTree, TreeRow};
use super::ExpansionState;

/// What activating an explorer row did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// A file row: the caller should select it.
    File { path: String, size: Option<u64> },
    /// A directory row: its expansion was flipped.
    Toggled { path: String, expanded: bool },
}

#[derive(Debug, Default)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<FileRecord>,
    pub loading: bool,
}

impl SearchState {
    /// Results replace the tree in the explorer while a query is set.
    pub fn is_active(&self) -> bool {
        !self.query.is_empty()
    }
}

/// File explorer for the current repository.
#[derive(Debug, Default)]
pub struct NavigatorState {
    records: Vec<FileRecord>,
    tree: FileTree,
    pub expansion: ExpansionState,
    pub loading: bool,
    pub search: SearchState,
    /// Highlighted row in whichever list is showing.
    pub selected: usize,
}

impl NavigatorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything about the previous repository, including which
    /// directories were expanded.
    pub fn reset_for_repository(&mut self) {
        self.expansion.reset();
        self.records.clear();
        self.tree = FileTree::default();
        self.loading = false;
        self.search = SearchState::default();
        self.selected = 0;
    }

    /// Replace the listing with a fresh fetch. Expansion is kept.
    pub fn apply_records(&mut self, records: Vec<FileRecord>) {
        self.tree = build_tree(&records);
        self.records = records;
        self.loading = false;
        self.clamp_selection();
    }

    #[cfg(test)]
    pub fn tree(&self) -> &FileTree {
        &self.tree
    }

    pub fn has_records(&self) -> bool {
        !self.records.is_empty()
    }

    /// Every path the backend reported for the current repository.
    pub fn known_paths(&self) -> Vec<String> {
        self.records.iter().map(|r| r.path.clone()).collect()
    }

    pub fn visible_rows(&self) -> Vec<TreeRow> {
        self.tree.visible_rows(&self.expansion)
    }

    /// Rows in the list currently shown: search results or the tree.
    pub fn row_count(&self) -> usize {
        if self.search.is_active() {
            self.search.results.len()
        } else {
            self.visible_rows().len()
        }
    }

    pub fn select_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_down(&mut self) {
        let len = self.row_count();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.row_count().saturating_sub(1));
    }

    /// Activate the highlighted row of whichever list is showing.
    pub fn activate_selected(&mut self) -> Option<Activation> {
        if self.search.is_active() {
            let record = self.search.results.get(self.selected)?;
            return Some(Activation::File {
                path: record.path.clone(),
                size: record.size,
            });
        }
        self.activate(self.selected)
    }

    /// Activate the visible row at `index`: files are selected, directories
    /// toggle.
    pub fn activate(&mut self, index: usize) -> Option<Activation> {
        let row = self.visible_rows().into_iter().nth(index)?;
        Some(self.activate_row(row.path, row.kind, row.size))
    }

    /// Activate by path. Unknown paths are treated as files so that a file
    /// can be opened before the listing has arrived.
    pub fn activate_path(&mut self, path: &str) -> Activation {
        let path = path.trim_matches('/');
        match self.tree.get(path) {
            Some(node) => {
                let (kind, size) = (node.kind, node.size);
                self.activate_row(path.to_string(), kind, size)
            }
            None => Activation::File {
                path: path.to_string(),
                size: None,
            },
        }
    }

    fn activate_row(&mut self, path: String, kind: FileKind, size: Option<u64>) -> Activation {
        match kind {
            FileKind::File => Activation::File { path, size },
            FileKind::Directory => {
                let expanded = self.expansion.toggle(&path);
                self.clamp_selection();
                Activation::Toggled { path, expanded }
            }
        }
    }

    pub fn start_search(&mut self, query: &str) {
        self.search.query = query.to_string();
        self.search.results.clear();
        self.search.loading = true;
        self.selected = 0;
    }

    pub fn apply_search(&mut self, results: Vec<FileRecord>) {
        self.search.results = results;
        self.search.loading = false;
        self.clamp_selection();
    }

    pub fn clear_search(&mut self) {
        self.search = SearchState::default();
        self.clamp_selection();
    }

    /// Highlight the row showing `path`, if it is visible.
    pub fn select_path(&mut self, path: &str) {
        if self.search.is_active() {
            return;
        }
        if let Some(index) = self.visible_rows().iter().position(|r| r.path == path) {
            self.selected = index;
        }
    }
}
