use std::cmp::Ordering;
use std::collections::HashMap;

use crate::api::{FileKind, FileRecord};

use super::ExpansionState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub name: String,
    /// Full slash-delimited path from the repository root.
    pub path: String,
    pub kind: FileKind,
    /// Byte count, files only.
    pub size: Option<u64>,
    pub children: HashMap<String, TreeNode>,
}

impl TreeNode {
    fn synthesized(name: &str, path: String) -> Self {
        Self {
            name: name.to_string(),
            path,
            kind: FileKind::Directory,
            size: None,
            children: HashMap::new(),
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == FileKind::Directory
    }
}

/// Hierarchical view of a flat file listing. Rebuilt from scratch on every
/// fetch; the same input always yields an equal tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileTree {
    roots: HashMap<String, TreeNode>,
}

/// One line of the rendered explorer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub depth: usize,
    pub name: String,
    pub path: String,
    pub kind: FileKind,
    pub size: Option<u64>,
    pub expanded: bool,
    pub has_children: bool,
}

/// Build a forest from flat records.
///
/// Every ancestor implied by a path is materialized as a directory. Synthesis
/// never touches a node that already exists; an explicit record always sets
/// its node's kind, so a path reported as both file and directory ends up with
/// whichever record came last.
pub fn build_tree(records: &[FileRecord]) -> FileTree {
    let mut roots: HashMap<String, TreeNode> = HashMap::new();

    for record in records {
        let parts: Vec<&str> = record.path.split('/').filter(|p| !p.is_empty()).collect();
        let Some((last, ancestors)) = parts.split_last() else {
            continue;
        };

        let mut level = &mut roots;
        let mut path = String::new();
        for part in ancestors {
            if !path.is_empty() {
                path.push('/');
            }
            path.push_str(part);
            let node = level
                .entry(part.to_string())
                .or_insert_with(|| TreeNode::synthesized(part, path.clone()));
            level = &mut node.children;
        }

        if !path.is_empty() {
            path.push('/');
        }
        path.push_str(last);
        let node = level
            .entry(last.to_string())
            .or_insert_with(|| TreeNode::synthesized(last, path));
        node.kind = record.kind;
        node.size = match record.kind {
            FileKind::File => record.size,
            FileKind::Directory => None,
        };
    }

    FileTree { roots }
}

/// Display order: directories before files, then by name.
pub fn directories_first(a: &TreeNode, b: &TreeNode) -> Ordering {
    match (a.is_dir(), b.is_dir()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a.name.cmp(&b.name),
    }
}

impl FileTree {
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    #[cfg(test)]
    pub fn roots(&self) -> &HashMap<String, TreeNode> {
        &self.roots
    }

    /// Look a node up by its full path.
    pub fn get(&self, path: &str) -> Option<&TreeNode> {
        let mut parts = path.split('/').filter(|p| !p.is_empty());
        let mut node = self.roots.get(parts.next()?)?;
        for part in parts {
            node = node.children.get(part)?;
        }
        Some(node)
    }

    pub fn visible_rows(&self, expansion: &ExpansionState) -> Vec<TreeRow> {
        self.visible_rows_by(expansion, directories_first)
    }

    /// Flatten the expanded part of the tree under an arbitrary sort rule.
    pub fn visible_rows_by(
        &self,
        expansion: &ExpansionState,
        order: fn(&TreeNode, &TreeNode) -> Ordering,
    ) -> Vec<TreeRow> {
        let mut rows = Vec::new();
        push_rows(&self.roots, 0, expansion, order, &mut rows);
        rows
    }
}

fn sorted(level: &HashMap<String, TreeNode>, order: fn(&TreeNode, &TreeNode) -> Ordering) -> Vec<&TreeNode> {
    let mut nodes: Vec<&TreeNode> = level.values().collect();
    nodes.sort_by(|a, b| order(a, b));
    nodes
}

fn push_rows(
    level: &HashMap<String, TreeNode>,
    depth: usize,
    expansion: &ExpansionState,
    order: fn(&TreeNode, &TreeNode) -> Ordering,
    rows: &mut Vec<TreeRow>,
) {
    for node in sorted(level, order) {
        let expanded = node.is_dir() && expansion.is_expanded(&node.path);
        rows.push(TreeRow {
            depth,
            name: node.name.clone(),
            path: node.path.clone(),
            kind: node.kind,
            size: node.size,
            expanded,
            has_children: !node.children.is_empty(),
        });
        if expanded {
            push_rows(&node.children, depth + 1, expansion, order, rows);
        }
    }
}
