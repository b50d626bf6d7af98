pub mod app_state;
pub mod buffer_state;
pub mod chat_state;
pub mod editor_state;
pub mod expansion_state;
pub mod file_tree;
pub mod input_state;
pub mod navigator_state;
pub mod repo_state;
pub mod selection_state;
pub mod text_buffer;

pub use app_state::{AppState, FocusPanel};
pub use buffer_state::{
    BufferState, BufferStatus, EditCommand, LoadTicket, SaveIndicator, SaveTicket,
};
pub use chat_state::{ChatPhase, ChatState, ContextSnapshot, PendingMessage, SendRejected};
pub use editor_state::{EditorMode, EditorState};
pub use expansion_state::ExpansionState;
pub use file_tree::{FileTree, TreeRow};
pub use input_state::{InputKind, InputState};
pub use navigator_state::{Activation, NavigatorState};
pub use repo_state::{CloneRejected, RepoState};
pub use selection_state::{SelectedFile, SelectionState};
pub use text_buffer::TextBuffer;
