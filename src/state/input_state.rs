use super::TextBuffer;

/// What a modal prompt is collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Command,
    CloneUrl,
    Search,
    NewFile,
    Message,
}

impl InputKind {
    pub fn title(self) -> &'static str {
        match self {
            InputKind::Command => " Command ",
            InputKind::CloneUrl => " Clone Repository ",
            InputKind::Search => " Search Files ",
            InputKind::NewFile => " New File ",
            InputKind::Message => " Ask the Assistant ",
        }
    }

    /// Whether Shift-Enter inserts a newline instead of submitting.
    pub fn multiline(self) -> bool {
        self == InputKind::Message
    }
}

#[derive(Debug)]
pub struct InputState {
    pub kind: InputKind,
    pub text: TextBuffer,
}

impl InputState {
    pub fn new(kind: InputKind) -> Self {
        Self {
            kind,
            text: TextBuffer::new(),
        }
    }

    pub fn with_text(kind: InputKind, text: &str) -> Self {
        Self {
            kind,
            text: TextBuffer::from(text),
        }
    }
}
