use crossterm::event::{Event as CrosstermEvent, EventStream, KeyCode, KeyEvent, KeyModifiers};
use futures::StreamExt;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::action::Action;
use crate::api::RepoId;
use crate::state::{EditCommand, EditorMode, FocusPanel, InputKind};

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Paste(String),
    Resize,
    Tick,
}

pub struct EventReader {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventReader {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let event_tx = tx.clone();
        tokio::spawn(async move {
            let mut reader = EventStream::new();
            loop {
                match reader.next().await {
                    Some(Ok(CrosstermEvent::Key(key))) => {
                        if event_tx.send(Event::Key(key)).is_err() {
                            break;
                        }
                    }
                    Some(Ok(CrosstermEvent::Paste(text))) => {
                        if event_tx.send(Event::Paste(text)).is_err() {
                            break;
                        }
                    }
                    Some(Ok(CrosstermEvent::Resize(_, _))) => {
                        if event_tx.send(Event::Resize).is_err() {
                            break;
                        }
                    }
                    Some(Err(_)) | None => break,
                    _ => {}
                }
            }
        });

        let tick_tx = tx;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick_rate);
            loop {
                interval.tick().await;
                if tick_tx.send(Event::Tick).is_err() {
                    break;
                }
            }
        });

        Self { rx }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Non-blocking: returns a pending event if one is available, or None.
    pub fn try_next(&mut self) -> Option<Event> {
        self.rx.try_recv().ok()
    }
}

/// All context needed to map a key event to an action.
pub struct KeyContext {
    pub focus: FocusPanel,
    pub input: Option<InputKind>,
    pub editor_mode: EditorMode,
    pub search_active: bool,
}

/// Map a key event to an action based on current app context.
pub fn map_key_to_action(key: KeyEvent, ctx: &KeyContext) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Priority 0: Ctrl-C / Ctrl-D always quit, Ctrl-S always saves
    if ctrl {
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('d') => return Some(Action::Quit),
            KeyCode::Char('s') => return Some(Action::SaveFile),
            _ => {}
        }
    }

    // Priority 1: An open prompt takes every key
    if let Some(kind) = ctx.input {
        return match key.code {
            KeyCode::Esc => Some(Action::CancelInput),
            KeyCode::Enter if kind.multiline() && key.modifiers.contains(KeyModifiers::SHIFT) => {
                Some(Action::InputNewline)
            }
            KeyCode::Enter => Some(Action::SubmitInput),
            KeyCode::Backspace => Some(Action::InputBackspace),
            KeyCode::Char('w') if ctrl => Some(Action::InputDeleteWord),
            KeyCode::Left => Some(Action::InputLeft),
            KeyCode::Right => Some(Action::InputRight),
            KeyCode::Home => Some(Action::InputHome),
            KeyCode::End => Some(Action::InputEnd),
            KeyCode::Char(c) if !ctrl => Some(Action::InputChar(c)),
            _ => None,
        };
    }

    // Priority 2: Insert mode in the editor
    if ctx.focus == FocusPanel::Editor && ctx.editor_mode == EditorMode::Insert {
        return match key.code {
            KeyCode::Esc => Some(Action::ExitInsertMode),
            KeyCode::Enter => Some(Action::EditorNewline),
            KeyCode::Backspace => Some(Action::EditorBackspace),
            KeyCode::Delete => Some(Action::EditorDelete),
            KeyCode::Up => Some(Action::CursorUp),
            KeyCode::Down => Some(Action::CursorDown),
            KeyCode::Left => Some(Action::CursorLeft),
            KeyCode::Right => Some(Action::CursorRight),
            KeyCode::Home => Some(Action::CursorLineStart),
            KeyCode::End => Some(Action::CursorLineEnd),
            KeyCode::Tab => Some(Action::EditorChar('\t')),
            KeyCode::Char(c) if !ctrl => Some(Action::EditorChar(c)),
            _ => None,
        };
    }

    // Priority 3: Global bindings
    match key.code {
        KeyCode::Char('q') => return Some(Action::Quit),
        KeyCode::Tab => return Some(Action::FocusNext),
        KeyCode::BackTab => return Some(Action::FocusPrev),
        KeyCode::Char(':') => return Some(Action::OpenInput(InputKind::Command)),
        KeyCode::Char('?') => return Some(Action::ToggleHud),
        _ => {}
    }

    // Priority 4: Focus-dependent bindings
    match ctx.focus {
        FocusPanel::Repositories => match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(Action::RepoUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::RepoDown),
            KeyCode::Enter => Some(Action::SwitchSelected),
            KeyCode::Char('c') => Some(Action::OpenInput(InputKind::CloneUrl)),
            KeyCode::Char('r') => Some(Action::RefreshRepositories),
            _ => None,
        },
        FocusPanel::Explorer => match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(Action::NavigatorUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::NavigatorDown),
            KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
                Some(Action::ActivateSelected)
            }
            KeyCode::Char('r') => Some(Action::RefreshTree),
            KeyCode::Char('/') => Some(Action::OpenInput(InputKind::Search)),
            KeyCode::Char('n') => Some(Action::OpenInput(InputKind::NewFile)),
            KeyCode::Esc if ctx.search_active => Some(Action::ClearSearch),
            _ => None,
        },
        FocusPanel::Editor => match ctx.editor_mode {
            EditorMode::Visual { .. } => match key.code {
                KeyCode::Up | KeyCode::Char('k') => Some(Action::CursorUp),
                KeyCode::Down | KeyCode::Char('j') => Some(Action::CursorDown),
                KeyCode::Char('y') | KeyCode::Enter => Some(Action::ConfirmSelection),
                KeyCode::Char('v') | KeyCode::Char('V') | KeyCode::Esc => {
                    Some(Action::ExitVisualMode)
                }
                _ => None,
            },
            _ => match key.code {
                KeyCode::Up | KeyCode::Char('k') => Some(Action::CursorUp),
                KeyCode::Down | KeyCode::Char('j') => Some(Action::CursorDown),
                KeyCode::Left | KeyCode::Char('h') => Some(Action::CursorLeft),
                KeyCode::Right | KeyCode::Char('l') => Some(Action::CursorRight),
                KeyCode::Home | KeyCode::Char('0') => Some(Action::CursorLineStart),
                KeyCode::End | KeyCode::Char('$') => Some(Action::CursorLineEnd),
                KeyCode::Char('i') => Some(Action::EnterInsertMode),
                KeyCode::Char('x') => Some(Action::EditorDelete),
                KeyCode::Char('v') | KeyCode::Char('V') => Some(Action::EnterVisualMode),
                KeyCode::Esc => Some(Action::ClearSelection),
                _ => None,
            },
        },
        FocusPanel::Chat => match key.code {
            KeyCode::Enter | KeyCode::Char('i') => Some(Action::OpenInput(InputKind::Message)),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::ChatScrollUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::ChatScrollDown),
            KeyCode::Char('H') => Some(Action::ReloadHistory),
            KeyCode::Char('X') => Some(Action::ClearChat),
            _ => None,
        },
    }
}

/// Parse a `:` command line. `Ok(None)` for a blank line, `Err` with a
/// usage hint for anything malformed.
pub fn parse_command(line: &str) -> Result<Option<Action>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    if let Some(message) = line.strip_prefix('>') {
        return Ok(Some(Action::SendMessage(unescape(message.trim()))));
    }

    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((c, r)) => (c, r.trim()),
        None => (line, ""),
    };

    let action = match command {
        "help" => Action::ToggleHud,
        "quit" | "q" => Action::Quit,

        "repos" => Action::RefreshRepositories,
        "clone" => {
            let mut url = None;
            let mut force = false;
            for arg in rest.split_whitespace() {
                match arg {
                    "--force" | "-f" => force = true,
                    other if url.is_none() => url = Some(other.to_string()),
                    _ => return Err("usage: clone <url> [--force]".to_string()),
                }
            }
            Action::CloneRepository {
                url: url.unwrap_or_default(),
                force,
            }
        }
        "switch" => RepoId::parse(rest)
            .map(Action::SwitchRepository)
            .ok_or_else(|| "usage: switch <owner>/<name>".to_string())?,

        "refresh" => Action::RefreshTree,
        "open" | "o" | "e" => {
            if rest.is_empty() {
                return Err("usage: open <row|path>".to_string());
            }
            match rest.parse::<usize>() {
                Ok(0) => return Err("rows are numbered from 1".to_string()),
                Ok(row) => Action::ActivateRow(row - 1),
                Err(_) => Action::OpenPath(rest.to_string()),
            }
        }
        "find" => Action::SearchFiles(rest.to_string()),
        "new" => {
            if rest.is_empty() {
                return Err("usage: new <path>".to_string());
            }
            Action::CreateFile(rest.to_string())
        }

        "set" => Action::Edit(EditCommand::Set(unescape(rest))),
        "append" => Action::Edit(EditCommand::Append(unescape(rest))),
        "insert" | "replace" => {
            let (n, text) = rest.split_once(' ').unwrap_or((rest, ""));
            let line = parse_line_number(n, command)?;
            let text = unescape(text);
            if command == "insert" {
                Action::Edit(EditCommand::Insert { line, text })
            } else {
                Action::Edit(EditCommand::Replace { line, text })
            }
        }
        "delete" => Action::Edit(EditCommand::Delete(parse_line_number(rest, command)?)),
        "select" => {
            let mut parts = rest.split_whitespace();
            let start = parse_line_number(parts.next().unwrap_or(""), command)?;
            let end = match parts.next() {
                Some(n) => parse_line_number(n, command)?,
                None => start,
            };
            Action::SelectLines { start, end }
        }
        "unselect" => Action::ClearSelection,
        "save" | "w" => Action::SaveFile,

        "ask" => Action::SendMessage(unescape(rest)),
        "history" => Action::ReloadHistory,
        "clear-chat" => Action::ClearChat,

        other => return Err(format!("unknown command '{other}'")),
    };
    Ok(Some(action))
}

fn parse_line_number(s: &str, command: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("{command}: expected a line number starting at 1")),
    }
}

/// Expand `\n`, `\t` and `\\` so multi-line text fits on one command line.
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(focus: FocusPanel) -> KeyContext {
        KeyContext {
            focus,
            input: None,
            editor_mode: EditorMode::Normal,
            search_active: false,
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn command(line: &str) -> Action {
        parse_command(line).unwrap().unwrap()
    }

    #[test]
    fn test_ctrl_s_saves_everywhere() {
        let save = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        let mut c = ctx(FocusPanel::Editor);
        assert_eq!(map_key_to_action(save, &c), Some(Action::SaveFile));
        c.editor_mode = EditorMode::Insert;
        assert_eq!(map_key_to_action(save, &c), Some(Action::SaveFile));
    }

    #[test]
    fn test_prompt_captures_keys() {
        let mut c = ctx(FocusPanel::Repositories);
        c.input = Some(InputKind::CloneUrl);
        assert_eq!(
            map_key_to_action(key(KeyCode::Char('q')), &c),
            Some(Action::InputChar('q'))
        );
        assert_eq!(
            map_key_to_action(key(KeyCode::Enter), &c),
            Some(Action::SubmitInput)
        );
        let shift_enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::SHIFT);
        assert_eq!(map_key_to_action(shift_enter, &c), Some(Action::SubmitInput));
        c.input = Some(InputKind::Message);
        assert_eq!(map_key_to_action(shift_enter, &c), Some(Action::InputNewline));
    }

    #[test]
    fn test_insert_mode_types_characters() {
        let mut c = ctx(FocusPanel::Editor);
        c.editor_mode = EditorMode::Insert;
        assert_eq!(
            map_key_to_action(key(KeyCode::Char('q')), &c),
            Some(Action::EditorChar('q'))
        );
        assert_eq!(
            map_key_to_action(key(KeyCode::Esc), &c),
            Some(Action::ExitInsertMode)
        );
    }

    #[test]
    fn test_enter_depends_on_focus() {
        let enter = key(KeyCode::Enter);
        assert_eq!(
            map_key_to_action(enter, &ctx(FocusPanel::Repositories)),
            Some(Action::SwitchSelected)
        );
        assert_eq!(
            map_key_to_action(enter, &ctx(FocusPanel::Explorer)),
            Some(Action::ActivateSelected)
        );
        assert_eq!(
            map_key_to_action(enter, &ctx(FocusPanel::Chat)),
            Some(Action::OpenInput(InputKind::Message))
        );
    }

    #[test]
    fn test_visual_mode_keys() {
        let mut c = ctx(FocusPanel::Editor);
        c.editor_mode = EditorMode::Visual { anchor: 0 };
        assert_eq!(
            map_key_to_action(key(KeyCode::Char('y')), &c),
            Some(Action::ConfirmSelection)
        );
        assert_eq!(
            map_key_to_action(key(KeyCode::Esc), &c),
            Some(Action::ExitVisualMode)
        );
    }

    #[test]
    fn test_escape_clears_search_only_when_active() {
        let mut c = ctx(FocusPanel::Explorer);
        assert_eq!(map_key_to_action(key(KeyCode::Esc), &c), None);
        c.search_active = true;
        assert_eq!(
            map_key_to_action(key(KeyCode::Esc), &c),
            Some(Action::ClearSearch)
        );
    }

    #[test]
    fn test_blank_command_is_no_action() {
        assert_eq!(parse_command("   "), Ok(None));
    }

    #[test]
    fn test_save_commands() {
        assert_eq!(command("save"), Action::SaveFile);
        assert_eq!(command("w"), Action::SaveFile);
    }

    #[test]
    fn test_clone_flags() {
        assert_eq!(
            command("clone https://github.com/a/b --force"),
            Action::CloneRepository {
                url: "https://github.com/a/b".to_string(),
                force: true
            }
        );
        assert_eq!(
            command("clone"),
            Action::CloneRepository {
                url: String::new(),
                force: false
            }
        );
        assert!(parse_command("clone a b").is_err());
    }

    #[test]
    fn test_switch_requires_owner_and_name() {
        assert_eq!(
            command("switch acme/widgets"),
            Action::SwitchRepository(RepoId::new("acme", "widgets"))
        );
        assert!(parse_command("switch widgets").is_err());
    }

    #[test]
    fn test_open_row_or_path() {
        assert_eq!(command("open 3"), Action::ActivateRow(2));
        assert_eq!(command("o src/main.rs"), Action::OpenPath("src/main.rs".to_string()));
        assert!(parse_command("open 0").is_err());
        assert!(parse_command("open").is_err());
    }

    #[test]
    fn test_line_edit_commands() {
        assert_eq!(
            command(r"set fn main() {\n}\n"),
            Action::Edit(EditCommand::Set("fn main() {\n}\n".to_string()))
        );
        assert_eq!(
            command("insert 2 let x = 1;"),
            Action::Edit(EditCommand::Insert {
                line: 2,
                text: "let x = 1;".to_string()
            })
        );
        assert_eq!(
            command("replace 1"),
            Action::Edit(EditCommand::Replace {
                line: 1,
                text: String::new()
            })
        );
        assert_eq!(command("delete 4"), Action::Edit(EditCommand::Delete(4)));
        assert!(parse_command("delete x").is_err());
    }

    #[test]
    fn test_select_lines() {
        assert_eq!(command("select 2 5"), Action::SelectLines { start: 2, end: 5 });
        assert_eq!(command("select 3"), Action::SelectLines { start: 3, end: 3 });
        assert!(parse_command("select").is_err());
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            command("> what does this do?"),
            Action::SendMessage("what does this do?".to_string())
        );
        assert_eq!(command("ask hi"), Action::SendMessage("hi".to_string()));
        assert_eq!(command(">"), Action::SendMessage(String::new()));
    }

    #[test]
    fn test_unknown_command() {
        assert!(parse_command("frobnicate").is_err());
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r"a\nb\tc\\d\q"), "a\nb\tc\\d\\q");
    }
}
