use crate::api::{BackendError, ChatTurn, MessageRequest};

use super::{BufferState, NavigatorState, SelectionState};

/// Turn-taking state of the assistant panel.
///
/// There is no resting error phase: a failed send is recorded as an
/// `Error: ...` assistant turn and the phase returns to `Idle` at once.
/// A history fetch runs beside these phases and does not block sending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatPhase {
    Idle,
    /// The user turn is recorded and the request is being handed off.
    Sending,
    AwaitingReply,
    Clearing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendRejected {
    Empty,
    Busy,
}

/// Everything the assistant gets to see about the current editing session,
/// captured at the moment a message is sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextSnapshot {
    pub current_file: Option<String>,
    pub file_content: Option<String>,
    pub selected_text: Option<String>,
    pub file_tree: Option<Vec<String>>,
}

impl ContextSnapshot {
    /// Read the live editing state. The path list is only included when a
    /// repository is selected; file content is left out when the buffer
    /// holds a load-error placeholder instead of the real file.
    pub fn capture(
        selection: &SelectionState,
        buffer: &BufferState,
        navigator: &NavigatorState,
    ) -> Self {
        let current_file = selection.file().map(|f| f.path.clone());
        let file_content = match (&current_file, buffer.path()) {
            (Some(selected), Some(open)) if selected == open => {
                buffer.real_content().map(str::to_string)
            }
            _ => None,
        };
        Self {
            current_file,
            file_content,
            selected_text: selection.text().map(str::to_string),
            file_tree: selection.repository().map(|_| navigator.known_paths()),
        }
    }
}

/// A send that passed validation: the user turn is already in the log and
/// `request` is ready for the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMessage {
    pub turn: u64,
    pub request: MessageRequest,
}

#[derive(Debug)]
pub struct ChatState {
    turns: Vec<ChatTurn>,
    phase: ChatPhase,
    next_turn: u64,
    in_flight: Option<u64>,
    loading_history: bool,
    /// The conversation changed locally after the history fetch was issued.
    history_outdated: bool,
}

impl Default for ChatState {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatState {
    pub fn new() -> Self {
        Self {
            turns: Vec::new(),
            phase: ChatPhase::Idle,
            next_turn: 0,
            in_flight: None,
            loading_history: false,
            history_outdated: false,
        }
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn phase(&self) -> ChatPhase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == ChatPhase::Idle
    }

    pub fn is_loading_history(&self) -> bool {
        self.loading_history
    }

    /// Validate and record a user message. Empty input and input while a
    /// previous operation is outstanding leave the state untouched.
    pub fn send(
        &mut self,
        text: &str,
        context: ContextSnapshot,
    ) -> Result<PendingMessage, SendRejected> {
        let message = text.trim();
        if message.is_empty() {
            return Err(SendRejected::Empty);
        }
        if !self.is_idle() {
            return Err(SendRejected::Busy);
        }

        self.turns.push(ChatTurn::user(message));
        self.history_outdated |= self.loading_history;
        self.next_turn += 1;
        self.in_flight = Some(self.next_turn);
        self.phase = ChatPhase::Sending;

        Ok(PendingMessage {
            turn: self.next_turn,
            request: MessageRequest {
                message: message.to_string(),
                current_file: context.current_file,
                file_content: context.file_content,
                selected_text: context.selected_text,
                file_tree: context.file_tree,
            },
        })
    }

    /// The request has been handed to the backend.
    pub fn mark_dispatched(&mut self, turn: u64) {
        if self.in_flight == Some(turn) && self.phase == ChatPhase::Sending {
            self.phase = ChatPhase::AwaitingReply;
        }
    }

    /// Record the reply (or the failure, as an assistant turn) and return to
    /// idle. Returns false for a result that does not belong to the
    /// outstanding send.
    pub fn finish_send(&mut self, turn: u64, result: Result<String, BackendError>) -> bool {
        if self.in_flight != Some(turn) {
            return false;
        }
        let content = match result {
            Ok(reply) => reply,
            Err(e) => format!("Error: {e}"),
        };
        self.turns.push(ChatTurn::assistant(&content));
        self.in_flight = None;
        self.phase = ChatPhase::Idle;
        true
    }

    /// Refused while a send or clear is outstanding, or a fetch already is.
    pub fn begin_history_load(&mut self) -> bool {
        if !self.is_idle() || self.loading_history {
            return false;
        }
        self.loading_history = true;
        self.history_outdated = false;
        true
    }

    /// Replace the local mirror with the stored history. On failure, or when
    /// the conversation moved on locally while the fetch was out, the mirror
    /// is kept as it was.
    pub fn finish_history_load(&mut self, result: Result<Vec<ChatTurn>, BackendError>) -> bool {
        if !self.loading_history {
            return false;
        }
        self.loading_history = false;
        if std::mem::take(&mut self.history_outdated) {
            return false;
        }
        match result {
            Ok(turns) => {
                self.turns = turns;
                true
            }
            Err(_) => false,
        }
    }

    pub fn begin_clear(&mut self) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.history_outdated |= self.loading_history;
        self.phase = ChatPhase::Clearing;
        true
    }

    /// The local mirror is only emptied once the backend confirms. Always
    /// ends idle.
    pub fn finish_clear(&mut self, result: Result<(), BackendError>) -> bool {
        if self.phase != ChatPhase::Clearing {
            return false;
        }
        self.phase = ChatPhase::Idle;
        match result {
            Ok(()) => {
                self.turns.clear();
                true
            }
            Err(_) => false,
        }
    }
}

/// Short description of what the assistant will see.
pub fn context_lines(selection: &SelectionState) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(repo) = selection.repository() {
        lines.push(format!("Repository: {repo}"));
    }
    if let Some(file) = selection.file() {
        lines.push(format!("File: {}", file.name()));
    }
    if let Some(text) = selection.text() {
        lines.push(format!("Selected: {} characters", text.chars().count()));
    }
    if lines.is_empty() {
        lines.push("No context available".to_string());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{FileRecord, RepoId, Role};
    use crate::state::SelectedFile;

    fn open_file(
        selection: &mut SelectionState,
        buffer: &mut BufferState,
        path: &str,
        result: Result<String, BackendError>,
    ) {
        selection.navigation().set_file(Some(SelectedFile {
            path: path.to_string(),
            size: None,
        }));
        let ticket = buffer.select_file(path, None);
        buffer.finish_load(&ticket, result);
    }

    #[test]
    fn test_send_appends_user_turn_synchronously() {
        let mut chat = ChatState::new();
        let pending = chat.send("hi", ContextSnapshot::default()).unwrap();
        assert_eq!(chat.turns(), &[ChatTurn::user("hi")]);
        assert_eq!(chat.phase(), ChatPhase::Sending);
        assert_eq!(pending.request.message, "hi");

        chat.mark_dispatched(pending.turn);
        assert_eq!(chat.phase(), ChatPhase::AwaitingReply);

        assert!(chat.finish_send(pending.turn, Ok("hello".to_string())));
        assert_eq!(chat.turns().len(), 2);
        assert_eq!(chat.turns().last().map(|t| t.role), Some(Role::Assistant));
        assert!(chat.is_idle());
    }

    #[test]
    fn test_failure_becomes_assistant_turn() {
        let mut chat = ChatState::new();
        let pending = chat.send("hi", ContextSnapshot::default()).unwrap();
        chat.mark_dispatched(pending.turn);
        chat.finish_send(
            pending.turn,
            Err(BackendError::rejected(500, "model unavailable")),
        );
        assert_eq!(
            chat.turns(),
            &[
                ChatTurn::user("hi"),
                ChatTurn::assistant("Error: model unavailable")
            ]
        );
        assert!(chat.is_idle());
    }

    #[test]
    fn test_empty_input_rejected_without_change() {
        let mut chat = ChatState::new();
        assert_eq!(
            chat.send("", ContextSnapshot::default()),
            Err(SendRejected::Empty)
        );
        assert_eq!(
            chat.send("   \n\t", ContextSnapshot::default()),
            Err(SendRejected::Empty)
        );
        assert!(chat.turns().is_empty());
        assert!(chat.is_idle());
    }

    #[test]
    fn test_send_while_busy_rejected() {
        let mut chat = ChatState::new();
        let first = chat.send("one", ContextSnapshot::default()).unwrap();
        assert_eq!(
            chat.send("two", ContextSnapshot::default()),
            Err(SendRejected::Busy)
        );
        assert_eq!(chat.turns().len(), 1);
        chat.finish_send(first.turn, Ok("r".to_string()));
        assert!(chat.send("two", ContextSnapshot::default()).is_ok());
    }

    #[test]
    fn test_message_is_trimmed() {
        let mut chat = ChatState::new();
        let pending = chat.send("  explain this  ", ContextSnapshot::default()).unwrap();
        assert_eq!(pending.request.message, "explain this");
        assert_eq!(chat.turns()[0].content, "explain this");
    }

    #[test]
    fn test_unknown_turn_result_ignored() {
        let mut chat = ChatState::new();
        let pending = chat.send("hi", ContextSnapshot::default()).unwrap();
        assert!(!chat.finish_send(pending.turn + 1, Ok("stray".to_string())));
        assert_eq!(chat.turns().len(), 1);
        assert!(chat.finish_send(pending.turn, Ok("ok".to_string())));
        assert!(!chat.finish_send(pending.turn, Ok("dup".to_string())));
        assert_eq!(chat.turns().len(), 2);
    }

    #[test]
    fn test_snapshot_uses_live_buffer_content() {
        let mut selection = SelectionState::new();
        let mut buffer = BufferState::new(3);
        let mut navigator = NavigatorState::new();
        selection
            .navigation()
            .set_repository(Some(RepoId::new("acme", "widgets")));
        navigator.apply_records(vec![
            FileRecord::file("src/main.rs", 10),
            FileRecord::file("README.md", 3),
        ]);
        open_file(&mut selection, &mut buffer, "src/main.rs", Ok("old".to_string()));
        buffer.edit("unsaved edit");
        selection.editing().set_text(Some("edit".to_string()));

        let snap = ContextSnapshot::capture(&selection, &buffer, &navigator);
        assert_eq!(snap.current_file.as_deref(), Some("src/main.rs"));
        assert_eq!(snap.file_content.as_deref(), Some("unsaved edit"));
        assert_eq!(snap.selected_text.as_deref(), Some("edit"));
        assert_eq!(
            snap.file_tree,
            Some(vec!["src/main.rs".to_string(), "README.md".to_string()])
        );
    }

    #[test]
    fn test_snapshot_without_repository_omits_tree() {
        let selection = SelectionState::new();
        let buffer = BufferState::new(3);
        let navigator = NavigatorState::new();
        let snap = ContextSnapshot::capture(&selection, &buffer, &navigator);
        assert_eq!(snap, ContextSnapshot::default());

        let mut chat = ChatState::new();
        let pending = chat.send("hello", snap).unwrap();
        assert_eq!(pending.request.file_tree, None);
        let json = serde_json::to_value(&pending.request).unwrap();
        assert!(json.get("file_tree").is_none());
    }

    #[test]
    fn test_snapshot_omits_failed_load_placeholder() {
        let mut selection = SelectionState::new();
        let mut buffer = BufferState::new(3);
        let navigator = NavigatorState::new();
        open_file(
            &mut selection,
            &mut buffer,
            "gone.rs",
            Err(BackendError::rejected(400, "File not found")),
        );
        let snap = ContextSnapshot::capture(&selection, &buffer, &navigator);
        assert_eq!(snap.current_file.as_deref(), Some("gone.rs"));
        assert_eq!(snap.file_content, None);
    }

    #[test]
    fn test_snapshot_while_loading_has_no_content() {
        let mut selection = SelectionState::new();
        let mut buffer = BufferState::new(3);
        let navigator = NavigatorState::new();
        selection.navigation().set_file(Some(SelectedFile {
            path: "a.rs".to_string(),
            size: None,
        }));
        buffer.select_file("a.rs", None);
        let snap = ContextSnapshot::capture(&selection, &buffer, &navigator);
        assert_eq!(snap.file_content, None);
    }

    #[test]
    fn test_history_load_replaces_mirror() {
        let mut chat = ChatState::new();
        let pending = chat.send("local", ContextSnapshot::default()).unwrap();
        assert!(!chat.begin_history_load());
        chat.finish_send(pending.turn, Ok("reply".to_string()));

        assert!(chat.begin_history_load());
        assert!(chat.is_loading_history());
        assert!(!chat.begin_history_load());
        assert!(chat.finish_history_load(Ok(vec![ChatTurn::user("stored")])));
        assert_eq!(chat.turns(), &[ChatTurn::user("stored")]);
        assert!(!chat.is_loading_history());
        assert!(chat.is_idle());
    }

    #[test]
    fn test_send_while_history_loads() {
        let mut chat = ChatState::new();
        assert!(chat.begin_history_load());

        let pending = chat.send("early", ContextSnapshot::default()).unwrap();
        assert_eq!(chat.phase(), ChatPhase::Sending);

        // History taken before the send would erase the new turn
        assert!(!chat.finish_history_load(Ok(vec![ChatTurn::user("stored")])));
        assert!(!chat.is_loading_history());
        assert_eq!(chat.turns(), &[ChatTurn::user("early")]);

        assert!(chat.finish_send(pending.turn, Ok("reply".to_string())));
        assert_eq!(chat.turns().len(), 2);

        // The next fetch applies normally
        assert!(chat.begin_history_load());
        assert!(chat.finish_history_load(Ok(vec![ChatTurn::user("stored")])));
        assert_eq!(chat.turns(), &[ChatTurn::user("stored")]);
    }

    #[test]
    fn test_history_load_failure_keeps_mirror() {
        let mut chat = ChatState::new();
        let pending = chat.send("local", ContextSnapshot::default()).unwrap();
        chat.finish_send(pending.turn, Ok("reply".to_string()));
        chat.begin_history_load();
        assert!(!chat.finish_history_load(Err(BackendError::Network("down".into()))));
        assert_eq!(chat.turns().len(), 2);
        assert!(chat.is_idle());
    }

    #[test]
    fn test_clear_is_idempotent_and_ends_idle() {
        let mut chat = ChatState::new();
        let pending = chat.send("hi", ContextSnapshot::default()).unwrap();
        chat.finish_send(pending.turn, Ok("yo".to_string()));

        assert!(chat.begin_clear());
        assert!(chat.finish_clear(Ok(())));
        assert!(chat.turns().is_empty());
        assert!(chat.is_idle());

        assert!(chat.begin_clear());
        assert!(chat.finish_clear(Ok(())));
        assert!(chat.turns().is_empty());
        assert!(chat.is_idle());
    }

    #[test]
    fn test_failed_clear_keeps_turns() {
        let mut chat = ChatState::new();
        let pending = chat.send("hi", ContextSnapshot::default()).unwrap();
        chat.finish_send(pending.turn, Ok("yo".to_string()));
        chat.begin_clear();
        assert!(!chat.finish_clear(Err(BackendError::Network("down".into()))));
        assert_eq!(chat.turns().len(), 2);
        assert!(chat.is_idle());
    }

    #[test]
    fn test_context_lines() {
        let mut selection = SelectionState::new();
        assert_eq!(context_lines(&selection), vec!["No context available"]);

        selection
            .navigation()
            .set_repository(Some(RepoId::new("acme", "widgets")));
        selection.navigation().set_file(Some(SelectedFile {
            path: "src/lib.rs".to_string(),
            size: None,
        }));
        selection.editing().set_text(Some("héllo".to_string()));
        assert_eq!(
            context_lines(&selection),
            vec![
                "Repository: acme/widgets",
                "File: lib.rs",
                "Selected: 5 characters"
            ]
        );
    }
}
