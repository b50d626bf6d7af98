use crate::theme::Theme;

use super::{
    BufferState, ChatState, EditorState, InputState, NavigatorState, RepoState, SelectionState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPanel {
    Repositories,
    Explorer,
    Editor,
    Chat,
}

impl FocusPanel {
    pub fn next(self) -> Self {
        match self {
            FocusPanel::Repositories => FocusPanel::Explorer,
            FocusPanel::Explorer => FocusPanel::Editor,
            FocusPanel::Editor => FocusPanel::Chat,
            FocusPanel::Chat => FocusPanel::Repositories,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FocusPanel::Repositories => FocusPanel::Chat,
            FocusPanel::Explorer => FocusPanel::Repositories,
            FocusPanel::Editor => FocusPanel::Explorer,
            FocusPanel::Chat => FocusPanel::Editor,
        }
    }
}

pub struct AppState {
    pub focus: FocusPanel,
    pub repos: RepoState,
    pub selection: SelectionState,
    pub navigator: NavigatorState,
    pub buffer: BufferState,
    pub editor: EditorState,
    pub chat: ChatState,
    /// Scroll back from the newest line of the conversation.
    pub chat_scroll: usize,
    pub input: Option<InputState>,
    pub theme: Theme,
    pub hud_expanded: bool,
    pub should_quit: bool,
    pub status_message: Option<(String, bool)>, // (message, is_error)
}

impl AppState {
    pub fn new(saved_window: u32) -> Self {
        Self {
            focus: FocusPanel::Repositories,
            repos: RepoState::new(),
            selection: SelectionState::new(),
            navigator: NavigatorState::new(),
            buffer: BufferState::new(saved_window),
            editor: EditorState::new(),
            chat: ChatState::new(),
            chat_scroll: 0,
            input: None,
            theme: Theme::default(),
            hud_expanded: false,
            should_quit: false,
            status_message: None,
        }
    }
}
