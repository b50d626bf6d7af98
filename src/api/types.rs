use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    File,
    Directory,
}

/// One flat entry of the backend's file listing for the current repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: FileKind,
    #[serde(default)]
    pub size: Option<u64>,
}

impl FileRecord {
    pub fn file(path: &str, size: u64) -> Self {
        Self {
            path: path.to_string(),
            kind: FileKind::File,
            size: Some(size),
        }
    }

    pub fn directory(path: &str) -> Self {
        Self {
            path: path.to_string(),
            kind: FileKind::Directory,
            size: None,
        }
    }
}

/// Identity of a cloned repository: `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoId {
    pub owner: String,
    pub name: String,
}

impl RepoId {
    pub fn new(owner: &str, name: &str) -> Self {
        Self {
            owner: owner.to_string(),
            name: name.to_string(),
        }
    }

    /// Parse `owner/name`. Both halves must be non-empty.
    pub fn parse(s: &str) -> Option<Self> {
        let (owner, name) = s.trim().split_once('/')?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return None;
        }
        Some(Self::new(owner, name))
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub owner: String,
    #[serde(rename = "repo")]
    pub name: String,
    #[serde(rename = "path", default)]
    pub local_path: String,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(rename = "commit", default)]
    pub commit_hash: Option<String>,
    /// Seconds since the epoch, as reported by the backend.
    #[serde(default)]
    pub last_modified: Option<f64>,
}

impl Repository {
    pub fn id(&self) -> RepoId {
        RepoId::new(&self.owner, &self.name)
    }

    pub fn branch_label(&self) -> &str {
        self.branch.as_deref().unwrap_or("main")
    }

    pub fn commit_label(&self) -> &str {
        self.commit_hash.as_deref().unwrap_or("unknown")
    }

    pub fn last_modified_at(&self) -> Option<DateTime<Utc>> {
        let secs = self.last_modified?;
        if !secs.is_finite() {
            return None;
        }
        let nanos = (secs.fract() * 1_000_000_000.0) as u32;
        DateTime::from_timestamp(secs.trunc() as i64, nanos)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: &str) -> Self {
        Self {
            role: Role::User,
            content: content.to_string(),
        }
    }

    pub fn assistant(content: &str) -> Self {
        Self {
            role: Role::Assistant,
            content: content.to_string(),
        }
    }
}

/// Payload of `POST /api/chat/message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_tree: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_from_listing_json() {
        let json = r#"{
            "owner": "octo",
            "repo": "hello",
            "path": "./repos/octo_hello",
            "branch": "dev",
            "commit": "1a2b3c4d",
            "last_modified": 1700000000.5
        }"#;
        let repo: Repository = serde_json::from_str(json).unwrap();
        assert_eq!(repo.id(), RepoId::new("octo", "hello"));
        assert_eq!(repo.branch_label(), "dev");
        assert_eq!(repo.commit_label(), "1a2b3c4d");
        let at = repo.last_modified_at().unwrap();
        assert_eq!(at.timestamp(), 1_700_000_000);
        assert_eq!(at.timestamp_subsec_millis(), 500);
    }

    #[test]
    fn test_repository_from_clone_response() {
        let json = r#"{"success": true, "owner": "octo", "repo": "hello", "path": "/tmp/x"}"#;
        let repo: Repository = serde_json::from_str(json).unwrap();
        assert_eq!(repo.branch_label(), "main");
        assert_eq!(repo.commit_label(), "unknown");
        assert!(repo.last_modified_at().is_none());
    }

    #[test]
    fn test_file_record_ignores_name_and_null_size() {
        let json = r#"[
            {"name": "src", "path": "src", "type": "directory", "size": null},
            {"name": "main.rs", "path": "src/main.rs", "type": "file", "size": 42}
        ]"#;
        let records: Vec<FileRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records[0], FileRecord::directory("src"));
        assert_eq!(records[1], FileRecord::file("src/main.rs", 42));
    }

    #[test]
    fn test_repo_id_parse() {
        assert_eq!(RepoId::parse("a/b"), Some(RepoId::new("a", "b")));
        assert_eq!(RepoId::parse(" a/b "), Some(RepoId::new("a", "b")));
        assert_eq!(RepoId::parse("a"), None);
        assert_eq!(RepoId::parse("/b"), None);
        assert_eq!(RepoId::parse("a/"), None);
        assert_eq!(RepoId::parse("a/b/c"), None);
        assert_eq!(RepoId::new("a", "b").to_string(), "a/b");
    }

    #[test]
    fn test_message_request_omits_missing_context() {
        let req = MessageRequest {
            message: "hi".to_string(),
            current_file: None,
            file_content: None,
            selected_text: None,
            file_tree: None,
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value, serde_json::json!({"message": "hi"}));
    }
}
