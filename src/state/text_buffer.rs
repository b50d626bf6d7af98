/// Editable text with a cursor. Used both for single-line prompts and as
/// the editor's draft of the open file.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    text: String,
    /// Byte offset into `text`, always on a char boundary.
    cursor: usize,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            cursor: 0,
        }
    }

    /// Create a TextBuffer pre-filled with `s`, cursor at end.
    pub fn from(s: &str) -> Self {
        let len = s.len();
        Self {
            text: s.to_string(),
            cursor: len,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Replace entire text, cursor at start.
    pub fn load(&mut self, s: &str) {
        self.text = s.to_string();
        self.cursor = 0;
    }

    /// Replace entire text, keeping the cursor on the same line and column
    /// where possible.
    pub fn replace_keep_cursor(&mut self, s: &str) {
        let (line, col) = self.cursor_line_col();
        self.text = s.to_string();
        self.cursor = 0;
        self.move_to(line, col);
    }

    /// Char-based cursor index (for rendering).
    pub fn cursor_char_index(&self) -> usize {
        self.text[..self.cursor].chars().count()
    }

    /// Zero-based line and char column of the cursor.
    pub fn cursor_line_col(&self) -> (usize, usize) {
        let before = &self.text[..self.cursor];
        let line = before.matches('\n').count();
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        (line, before[line_start..].chars().count())
    }

    pub fn line_count(&self) -> usize {
        self.text.split('\n').count()
    }

    /// Insert a character at the cursor position.
    pub fn insert_char(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn insert_str(&mut self, s: &str) {
        self.text.insert_str(self.cursor, s);
        self.cursor += s.len();
    }

    /// Delete one character before the cursor (backspace).
    pub fn delete_back(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let prev = self.prev_boundary();
        self.text.drain(prev..self.cursor);
        self.cursor = prev;
    }

    /// Delete the character under the cursor.
    pub fn delete_forward(&mut self) {
        if let Some(c) = self.text[self.cursor..].chars().next() {
            self.text.drain(self.cursor..self.cursor + c.len_utf8());
        }
    }

    /// Delete word before cursor (Ctrl+W shell behavior):
    /// skip trailing whitespace, then delete back to next whitespace.
    pub fn delete_word_back(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let before: &str = &self.text[..self.cursor];
        let trimmed = before.trim_end();
        let word_start = trimmed
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        self.text.drain(word_start..self.cursor);
        self.cursor = word_start;
    }

    fn prev_boundary(&self) -> usize {
        self.text[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    /// Move cursor one character left.
    pub fn move_left(&mut self) {
        self.cursor = self.prev_boundary();
    }

    /// Move cursor one character right.
    pub fn move_right(&mut self) {
        if let Some(c) = self.text[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    /// Move cursor to start of the current line (Home / Ctrl+A).
    pub fn move_home(&mut self) {
        self.cursor = self.text[..self.cursor]
            .rfind('\n')
            .map(|i| i + 1)
            .unwrap_or(0);
    }

    /// Move cursor to end of the current line (End / Ctrl+E).
    pub fn move_end(&mut self) {
        self.cursor = self.text[self.cursor..]
            .find('\n')
            .map(|i| self.cursor + i)
            .unwrap_or(self.text.len());
    }

    pub fn move_up(&mut self) {
        let (line, col) = self.cursor_line_col();
        if line > 0 {
            self.move_to(line - 1, col);
        }
    }

    pub fn move_down(&mut self) {
        let (line, col) = self.cursor_line_col();
        if line + 1 < self.line_count() {
            self.move_to(line + 1, col);
        }
    }

    /// Place the cursor at `line`, `col`, clamped to the text.
    pub fn move_to(&mut self, line: usize, col: usize) {
        let mut offset = 0;
        let last = self.line_count().saturating_sub(1);
        for (i, text) in self.text.split('\n').enumerate() {
            if i == line.min(last) {
                let within = text
                    .char_indices()
                    .nth(col)
                    .map(|(b, _)| b)
                    .unwrap_or(text.len());
                self.cursor = offset + within;
                return;
            }
            offset += text.len() + 1;
        }
        self.cursor = self.text.len();
    }
}
