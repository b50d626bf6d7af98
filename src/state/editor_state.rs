use super::TextBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Normal,
    Insert,
    /// Line selection anchored at the given zero-based line.
    Visual { anchor: usize },
}

/// Cursor, mode and scroll of the editor panel. The draft mirrors the
/// buffer's live content; it is only committed through the buffer.
#[derive(Debug)]
pub struct EditorState {
    pub draft: TextBuffer,
    pub mode: EditorMode,
    pub scroll: usize,
    pub viewport_height: usize,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorState {
    pub fn new() -> Self {
        Self {
            draft: TextBuffer::new(),
            mode: EditorMode::Normal,
            scroll: 0,
            viewport_height: 20,
        }
    }

    /// A freshly loaded file: cursor to the top, back to normal mode.
    pub fn load(&mut self, content: &str) {
        self.draft.load(content);
        self.mode = EditorMode::Normal;
        self.scroll = 0;
    }

    /// Content changed outside the cursor (line commands, failed edit).
    pub fn resync(&mut self, content: &str) {
        if self.draft.text() != content {
            self.draft.replace_keep_cursor(content);
        }
        self.ensure_visible();
    }

    pub fn cursor_line(&self) -> usize {
        self.draft.cursor_line_col().0
    }

    /// Selected line range (inclusive, zero-based) while in visual mode.
    pub fn visual_range(&self) -> Option<(usize, usize)> {
        match self.mode {
            EditorMode::Visual { anchor } => {
                let cursor = self.cursor_line();
                Some((anchor.min(cursor), anchor.max(cursor)))
            }
            _ => None,
        }
    }

    pub fn ensure_visible(&mut self) {
        let line = self.cursor_line();
        let height = self.viewport_height.max(1);
        if line < self.scroll {
            self.scroll = line;
        } else if line >= self.scroll + height {
            self.scroll = line + 1 - height;
        }
    }
}
