use crate::api::BackendError;

/// Observable lifecycle of the editor buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferStatus {
    Empty,
    Loading,
    Clean,
    Dirty,
    Saving,
}

/// Outcome of the last save, as shown next to the file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveIndicator {
    Hidden,
    /// Cleared automatically after a short window.
    Saved,
    /// Stays until the next save attempt or file switch.
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Empty,
    Loading,
    Ready,
    Saving,
}

/// Issued when a load starts; the result is only applied if the ticket is
/// still current when it comes back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: u64,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveTicket {
    pub generation: u64,
    pub path: String,
    pub content: String,
}

/// A line-oriented edit against the live content. Lines are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    Set(String),
    Append(String),
    Insert { line: usize, text: String },
    Replace { line: usize, text: String },
    Delete(usize),
}

/// The single file currently open for editing.
///
/// `loaded` is the clean baseline: it only changes on a successful load or a
/// successful save. The buffer is dirty exactly when `live != loaded`.
#[derive(Debug)]
pub struct BufferState {
    path: Option<String>,
    size: Option<u64>,
    loaded: String,
    live: String,
    phase: Phase,
    load_failed: bool,
    indicator: SaveIndicator,
    indicator_ticks: u32,
    saved_window: u32,
    generation: u64,
}

impl BufferState {
    /// `saved_window` is how many ticks the "Saved" indicator stays up.
    pub fn new(saved_window: u32) -> Self {
        Self {
            path: None,
            size: None,
            loaded: String::new(),
            live: String::new(),
            phase: Phase::Empty,
            load_failed: false,
            indicator: SaveIndicator::Hidden,
            indicator_ticks: 0,
            saved_window,
            generation: 0,
        }
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn size(&self) -> Option<u64> {
        self.size
    }

    pub fn content(&self) -> &str {
        &self.live
    }

    #[cfg(test)]
    pub fn loaded_content(&self) -> &str {
        &self.loaded
    }

    pub fn is_dirty(&self) -> bool {
        self.live != self.loaded
    }

    pub fn load_failed(&self) -> bool {
        self.load_failed
    }

    pub fn indicator(&self) -> &SaveIndicator {
        &self.indicator
    }

    pub fn status(&self) -> BufferStatus {
        match self.phase {
            Phase::Empty => BufferStatus::Empty,
            Phase::Loading => BufferStatus::Loading,
            Phase::Saving => BufferStatus::Saving,
            Phase::Ready if self.is_dirty() => BufferStatus::Dirty,
            Phase::Ready => BufferStatus::Clean,
        }
    }

    /// Content that may be treated as the real file: `None` while nothing is
    /// loaded or when the last load failed and the buffer shows a placeholder.
    pub fn real_content(&self) -> Option<&str> {
        match self.phase {
            Phase::Ready | Phase::Saving if !self.load_failed => Some(&self.live),
            _ => None,
        }
    }

    /// Drop the current buffer without saving and start loading `path`.
    pub fn select_file(&mut self, path: &str, size: Option<u64>) -> LoadTicket {
        self.reset();
        self.path = Some(path.to_string());
        self.size = size;
        self.phase = Phase::Loading;
        LoadTicket {
            generation: self.generation,
            path: path.to_string(),
        }
    }

    /// Discard the buffer entirely (repository switch, panel closed).
    pub fn discard(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.generation += 1;
        self.path = None;
        self.size = None;
        self.loaded.clear();
        self.live.clear();
        self.phase = Phase::Empty;
        self.load_failed = false;
        self.indicator = SaveIndicator::Hidden;
        self.indicator_ticks = 0;
    }

    fn is_current(&self, generation: u64, path: &str) -> bool {
        generation == self.generation && self.path.as_deref() == Some(path)
    }

    /// Apply a finished load. Returns false if the ticket was superseded.
    pub fn finish_load(&mut self, ticket: &LoadTicket, result: Result<String, BackendError>) -> bool {
        if !self.is_current(ticket.generation, &ticket.path) || self.phase != Phase::Loading {
            return false;
        }
        match result {
            Ok(content) => {
                self.loaded = content.clone();
                self.live = content;
                self.load_failed = false;
            }
            Err(e) => {
                let placeholder = format!("// Error loading file: {e}");
                self.loaded = placeholder.clone();
                self.live = placeholder;
                self.load_failed = true;
            }
        }
        self.phase = Phase::Ready;
        true
    }

    /// Replace the live content. Refused while loading, saving or empty.
    pub fn edit(&mut self, text: &str) -> bool {
        if self.phase != Phase::Ready {
            return false;
        }
        self.live = text.to_string();
        true
    }

    pub fn apply_edit(&mut self, command: &EditCommand) -> bool {
        if self.phase != Phase::Ready {
            return false;
        }
        match apply_line_edit(&self.live, command) {
            Some(text) => self.edit(&text),
            None => false,
        }
    }

    /// Lines `start..=end` (1-based) of the live content.
    pub fn line_range(&self, start: usize, end: usize) -> Option<String> {
        if self.phase == Phase::Empty || self.phase == Phase::Loading {
            return None;
        }
        let lines = split_lines(&self.live);
        if start == 0 || start > end || end > lines.len() {
            return None;
        }
        Some(lines[start - 1..end].join("\n"))
    }

    pub fn can_save(&self) -> bool {
        self.phase == Phase::Ready && self.is_dirty() && !self.load_failed
    }

    /// Start a save of the live content. Returns `None` when saving is not
    /// allowed: nothing to save, a save already in flight, or the buffer
    /// holds a load-error placeholder.
    pub fn begin_save(&mut self) -> Option<SaveTicket> {
        if !self.can_save() {
            return None;
        }
        let path = self.path.clone()?;
        self.phase = Phase::Saving;
        self.indicator = SaveIndicator::Hidden;
        self.indicator_ticks = 0;
        Some(SaveTicket {
            generation: self.generation,
            path,
            content: self.live.clone(),
        })
    }

    /// Apply a finished save. Returns false if the ticket was superseded.
    /// A failed save never touches the live content.
    pub fn finish_save(&mut self, ticket: &SaveTicket, result: Result<(), BackendError>) -> bool {
        if !self.is_current(ticket.generation, &ticket.path) || self.phase != Phase::Saving {
            return false;
        }
        self.phase = Phase::Ready;
        match result {
            Ok(()) => {
                self.loaded = ticket.content.clone();
                self.size = Some(ticket.content.len() as u64);
                self.indicator = SaveIndicator::Saved;
                self.indicator_ticks = self.saved_window;
            }
            Err(e) => {
                self.indicator = SaveIndicator::Failed(e.to_string());
            }
        }
        true
    }

    /// Advance the "Saved" indicator countdown.
    pub fn tick(&mut self) {
        if self.indicator != SaveIndicator::Saved {
            return;
        }
        if self.indicator_ticks > 0 {
            self.indicator_ticks -= 1;
        }
        if self.indicator_ticks == 0 {
            self.indicator = SaveIndicator::Hidden;
        }
    }
}

fn split_lines(text: &str) -> Vec<&str> {
    let body = text.strip_suffix('\n').unwrap_or(text);
    if text.is_empty() {
        Vec::new()
    } else {
        body.split('\n').collect()
    }
}

/// Compute the text resulting from `command`, or `None` if a line number is
/// out of range. A trailing newline is kept (and added to new content).
pub fn apply_line_edit(text: &str, command: &EditCommand) -> Option<String> {
    let trailing = text.is_empty() || text.ends_with('\n');
    let mut lines: Vec<String> = split_lines(text).into_iter().map(str::to_string).collect();

    match command {
        EditCommand::Set(new_text) => return Some(new_text.clone()),
        EditCommand::Append(line) => lines.push(line.clone()),
        EditCommand::Insert { line, text } => {
            if *line == 0 || *line > lines.len() + 1 {
                return None;
            }
            lines.insert(line - 1, text.clone());
        }
        EditCommand::Replace { line, text } => {
            let slot = lines.get_mut(line.checked_sub(1)?)?;
            *slot = text.clone();
        }
        EditCommand::Delete(line) => {
            if *line == 0 || *line > lines.len() {
                return None;
            }
            lines.remove(line - 1);
        }
    }

    let mut out = lines.join("\n");
    if trailing && !lines.is_empty() {
        out.push('\n');
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(path: &str, content: &str) -> BufferState {
        let mut buf = BufferState::new(3);
        let ticket = buf.select_file(path, Some(content.len() as u64));
        assert!(buf.finish_load(&ticket, Ok(content.to_string())));
        buf
    }

    fn dirty_invariant(buf: &BufferState) {
        assert_eq!(buf.is_dirty(), buf.content() != buf.loaded_content());
        if buf.status() == BufferStatus::Clean {
            assert!(!buf.is_dirty());
        }
        if buf.status() == BufferStatus::Dirty {
            assert!(buf.is_dirty());
        }
    }

    #[test]
    fn test_new_is_empty() {
        let buf = BufferState::new(3);
        assert_eq!(buf.status(), BufferStatus::Empty);
        assert_eq!(buf.path(), None);
        assert!(!buf.can_save());
        assert_eq!(buf.real_content(), None);
    }

    #[test]
    fn test_load_success() {
        let mut buf = BufferState::new(3);
        let ticket = buf.select_file("a.rs", None);
        assert_eq!(buf.status(), BufferStatus::Loading);
        assert!(!buf.edit("nope"));
        assert!(buf.finish_load(&ticket, Ok("fn main() {}\n".to_string())));
        assert_eq!(buf.status(), BufferStatus::Clean);
        assert_eq!(buf.content(), "fn main() {}\n");
        assert_eq!(buf.loaded_content(), "fn main() {}\n");
        assert_eq!(buf.real_content(), Some("fn main() {}\n"));
    }

    #[test]
    fn test_load_failure_shows_placeholder_and_blocks_save() {
        let mut buf = BufferState::new(3);
        let ticket = buf.select_file("gone.rs", None);
        assert!(buf.finish_load(&ticket, Err(BackendError::rejected(400, "File not found"))));
        assert_eq!(buf.status(), BufferStatus::Clean);
        assert_eq!(buf.content(), "// Error loading file: File not found");
        assert!(buf.load_failed());
        assert_eq!(buf.real_content(), None);

        assert!(buf.edit("typed over the placeholder"));
        assert!(buf.is_dirty());
        assert!(!buf.can_save());
        assert_eq!(buf.begin_save(), None);
    }

    #[test]
    fn test_dirty_tracks_content_difference() {
        let mut buf = loaded("a.txt", "one");
        for text in ["two", "one", "", "one", "three"] {
            assert!(buf.edit(text));
            dirty_invariant(&buf);
        }
        assert!(buf.edit("one"));
        assert_eq!(buf.status(), BufferStatus::Clean);
    }

    #[test]
    fn test_save_success_updates_baseline() {
        let mut buf = loaded("a.txt", "one");
        buf.edit("two");
        let ticket = buf.begin_save().unwrap();
        assert_eq!(ticket.content, "two");
        assert_eq!(buf.status(), BufferStatus::Saving);
        assert!(buf.finish_save(&ticket, Ok(())));
        assert_eq!(buf.status(), BufferStatus::Clean);
        assert_eq!(buf.loaded_content(), "two");
        assert!(!buf.is_dirty());
        assert_eq!(buf.indicator(), &SaveIndicator::Saved);
        dirty_invariant(&buf);
    }

    #[test]
    fn test_failed_save_keeps_edits() {
        let mut buf = loaded("a.txt", "one");
        buf.edit("precious edits");
        let before = buf.content().to_string();
        let ticket = buf.begin_save().unwrap();
        assert!(buf.finish_save(&ticket, Err(BackendError::Network("connection reset".into()))));
        assert_eq!(buf.content(), before);
        assert_eq!(buf.loaded_content(), "one");
        assert_eq!(buf.status(), BufferStatus::Dirty);
        assert_eq!(
            buf.indicator(),
            &SaveIndicator::Failed("connection reset".to_string())
        );
        dirty_invariant(&buf);

        // Failure indicator persists across ticks and clears on retry.
        for _ in 0..10 {
            buf.tick();
        }
        assert!(matches!(buf.indicator(), SaveIndicator::Failed(_)));
        buf.begin_save().unwrap();
        assert_eq!(buf.indicator(), &SaveIndicator::Hidden);
    }

    #[test]
    fn test_save_requires_dirty() {
        let mut buf = loaded("a.txt", "one");
        assert_eq!(buf.begin_save(), None);
        assert_eq!(buf.status(), BufferStatus::Clean);
    }

    #[test]
    fn test_second_save_while_saving_is_rejected() {
        let mut buf = loaded("a.txt", "one");
        buf.edit("two");
        let first = buf.begin_save().unwrap();
        assert_eq!(buf.begin_save(), None);
        assert!(!buf.edit("three"));
        assert!(buf.finish_save(&first, Ok(())));
        assert!(!buf.finish_save(&first, Ok(())));
    }

    #[test]
    fn test_saved_indicator_clears_after_window() {
        let mut buf = loaded("a.txt", "one");
        buf.edit("two");
        let ticket = buf.begin_save().unwrap();
        buf.finish_save(&ticket, Ok(()));
        buf.tick();
        buf.tick();
        assert_eq!(buf.indicator(), &SaveIndicator::Saved);
        buf.tick();
        assert_eq!(buf.indicator(), &SaveIndicator::Hidden);
    }

    #[test]
    fn test_stale_load_is_dropped() {
        let mut buf = BufferState::new(3);
        let x = buf.select_file("x.txt", None);
        let y = buf.select_file("y.txt", None);
        assert!(buf.finish_load(&y, Ok("y content".to_string())));
        assert!(!buf.finish_load(&x, Ok("x content".to_string())));
        assert_eq!(buf.path(), Some("y.txt"));
        assert_eq!(buf.content(), "y content");
    }

    #[test]
    fn test_reselecting_same_path_supersedes_earlier_load() {
        let mut buf = BufferState::new(3);
        let first = buf.select_file("x.txt", None);
        let second = buf.select_file("x.txt", None);
        assert!(!buf.finish_load(&first, Ok("old".to_string())));
        assert_eq!(buf.status(), BufferStatus::Loading);
        assert!(buf.finish_load(&second, Ok("new".to_string())));
        assert_eq!(buf.content(), "new");
    }

    #[test]
    fn test_switching_file_discards_unsaved_edits() {
        let mut buf = loaded("a.txt", "one");
        buf.edit("unsaved");
        let ticket = buf.select_file("b.txt", None);
        assert!(!buf.is_dirty());
        assert_eq!(buf.content(), "");
        buf.finish_load(&ticket, Ok("bee".to_string()));

        // Coming back to a.txt loads the stored content, not the lost edit.
        let ticket = buf.select_file("a.txt", None);
        buf.finish_load(&ticket, Ok("one".to_string()));
        assert_eq!(buf.content(), "one");
    }

    #[test]
    fn test_save_result_after_switch_is_dropped() {
        let mut buf = loaded("a.txt", "one");
        buf.edit("two");
        let ticket = buf.begin_save().unwrap();
        let load = buf.select_file("b.txt", None);
        assert!(!buf.finish_save(&ticket, Ok(())));
        assert_eq!(buf.status(), BufferStatus::Loading);
        assert!(buf.finish_load(&load, Ok("b".to_string())));
        assert_eq!(buf.indicator(), &SaveIndicator::Hidden);
    }

    #[test]
    fn test_discard() {
        let mut buf = loaded("a.txt", "one");
        buf.edit("two");
        buf.discard();
        assert_eq!(buf.status(), BufferStatus::Empty);
        assert_eq!(buf.path(), None);
        assert!(!buf.edit("x"));
    }

    #[test]
    fn test_line_range() {
        let buf = loaded("a.txt", "l1\nl2\nl3\n");
        assert_eq!(buf.line_range(2, 3), Some("l2\nl3".to_string()));
        assert_eq!(buf.line_range(1, 1), Some("l1".to_string()));
        assert_eq!(buf.line_range(0, 1), None);
        assert_eq!(buf.line_range(3, 2), None);
        assert_eq!(buf.line_range(1, 4), None);
    }

    #[test]
    fn test_line_edits() {
        let text = "a\nb\nc\n";
        assert_eq!(
            apply_line_edit(text, &EditCommand::Append("d".into())).unwrap(),
            "a\nb\nc\nd\n"
        );
        assert_eq!(
            apply_line_edit(text, &EditCommand::Insert { line: 1, text: "z".into() }).unwrap(),
            "z\na\nb\nc\n"
        );
        assert_eq!(
            apply_line_edit(text, &EditCommand::Insert { line: 4, text: "z".into() }).unwrap(),
            "a\nb\nc\nz\n"
        );
        assert_eq!(
            apply_line_edit(text, &EditCommand::Replace { line: 2, text: "B".into() }).unwrap(),
            "a\nB\nc\n"
        );
        assert_eq!(apply_line_edit(text, &EditCommand::Delete(3)).unwrap(), "a\nb\n");
        assert_eq!(apply_line_edit("a\nb", &EditCommand::Delete(1)).unwrap(), "b");
        assert_eq!(apply_line_edit("", &EditCommand::Append("x".into())).unwrap(), "x\n");
        assert_eq!(apply_line_edit("only\n", &EditCommand::Delete(1)).unwrap(), "");
    }

    #[test]
    fn test_line_edits_out_of_range() {
        let text = "a\nb\n";
        assert_eq!(apply_line_edit(text, &EditCommand::Delete(0)), None);
        assert_eq!(apply_line_edit(text, &EditCommand::Delete(3)), None);
        assert_eq!(
            apply_line_edit(text, &EditCommand::Replace { line: 0, text: "x".into() }),
            None
        );
        assert_eq!(
            apply_line_edit(text, &EditCommand::Insert { line: 4, text: "x".into() }),
            None
        );
    }

    #[test]
    fn test_apply_edit_goes_through_edit_rules() {
        let mut buf = loaded("a.txt", "a\n");
        assert!(buf.apply_edit(&EditCommand::Append("b".into())));
        assert_eq!(buf.content(), "a\nb\n");
        assert!(buf.is_dirty());
        assert!(!buf.apply_edit(&EditCommand::Delete(9)));
        assert_eq!(buf.content(), "a\nb\n");

        let mut empty = BufferState::new(3);
        assert!(!empty.apply_edit(&EditCommand::Set("x".into())));
    }
}
