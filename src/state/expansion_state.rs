use std::collections::HashSet;

/// Directory paths the user has expanded in the explorer.
///
/// Keyed by plain path so that a store built against one tree snapshot stays
/// valid for the next snapshot of the same repository. Must be reset exactly
/// once per repository switch.
#[derive(Debug, Default, Clone)]
pub struct ExpansionState {
    expanded: HashSet<String>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip a path between expanded and collapsed. Returns the new state.
    pub fn toggle(&mut self, path: &str) -> bool {
        if self.expanded.remove(path) {
            false
        } else {
            self.expanded.insert(path.to_string());
            true
        }
    }

    pub fn is_expanded(&self, path: &str) -> bool {
        self.expanded.contains(path)
    }

    /// Expand every ancestor directory of `path` so it becomes visible.
    pub fn reveal(&mut self, path: &str) {
        let mut end = 0;
        while let Some(offset) = path[end..].find('/') {
            end += offset;
            if end > 0 {
                self.expanded.insert(path[..end].to_string());
            }
            end += 1;
        }
    }

    pub fn reset(&mut self) {
        self.expanded.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }
}
