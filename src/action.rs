use crate::api::RepoId;
use crate::state::{EditCommand, InputKind};

/// Central action enum — all state mutations flow through here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // Lifecycle
    Quit,
    Tick,
    Resize,
    ToggleHud,
    Paste(String),

    // Focus
    FocusNext,
    FocusPrev,

    // Prompts
    OpenInput(InputKind),
    InputChar(char),
    InputNewline,
    InputBackspace,
    InputDeleteWord,
    InputLeft,
    InputRight,
    InputHome,
    InputEnd,
    SubmitInput,
    CancelInput,

    // Repositories
    RepoUp,
    RepoDown,
    SwitchSelected,
    RefreshRepositories,
    CloneRepository { url: String, force: bool },
    SwitchRepository(RepoId),

    // Explorer
    NavigatorUp,
    NavigatorDown,
    ActivateSelected,
    ActivateRow(usize),
    OpenPath(String),
    RefreshTree,
    SearchFiles(String),
    ClearSearch,
    CreateFile(String),

    // Editor
    CursorUp,
    CursorDown,
    CursorLeft,
    CursorRight,
    CursorLineStart,
    CursorLineEnd,
    EnterInsertMode,
    ExitInsertMode,
    EditorChar(char),
    EditorNewline,
    EditorBackspace,
    EditorDelete,
    Edit(EditCommand),
    EnterVisualMode,
    ConfirmSelection,
    ExitVisualMode,
    SelectLines { start: usize, end: usize },
    ClearSelection,
    SaveFile,

    // Assistant
    SendMessage(String),
    ReloadHistory,
    ClearChat,
    ChatScrollUp,
    ChatScrollDown,
}
