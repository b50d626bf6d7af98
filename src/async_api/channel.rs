use crate::api::{BackendResult, ChatTurn, FileRecord, Repository};
use crate::state::{LoadTicket, PendingMessage, SaveTicket};

/// A backend call issued by the reducer. Calls whose results can go stale
/// carry the generation or ticket they were issued under.
#[derive(Debug, Clone)]
pub enum ApiRequest {
    CurrentRepository,
    ListRepositories { generation: u64 },
    CloneRepository { url: String, force: bool },
    SwitchRepository { generation: u64, repository: Repository },
    FileTree { generation: u64, max_depth: Option<u32> },
    FileContent(LoadTicket),
    SaveFile(SaveTicket),
    CreateFile { generation: u64, path: String },
    SearchFiles { generation: u64, query: String },
    ChatHistory,
    SendMessage(PendingMessage),
    ClearChat,
}

#[derive(Debug)]
pub enum ApiResult {
    CurrentRepository(BackendResult<Option<Repository>>),
    Repositories {
        generation: u64,
        repositories: BackendResult<Vec<Repository>>,
    },
    Cloned(BackendResult<Repository>),
    Switched {
        generation: u64,
        repository: Repository,
        result: BackendResult<()>,
    },
    FileTree {
        generation: u64,
        records: BackendResult<Vec<FileRecord>>,
    },
    FileContent {
        ticket: LoadTicket,
        content: BackendResult<String>,
    },
    Saved {
        ticket: SaveTicket,
        result: BackendResult<()>,
    },
    Created {
        generation: u64,
        path: String,
        result: BackendResult<()>,
    },
    SearchResults {
        generation: u64,
        results: BackendResult<Vec<FileRecord>>,
    },
    ChatHistory(BackendResult<Vec<ChatTurn>>),
    Reply {
        turn: u64,
        reply: BackendResult<String>,
    },
    ChatCleared(BackendResult<()>),
}
