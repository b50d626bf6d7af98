use anyhow::Result;
use ratatui::layout::{Constraint, Direction, Layout};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::action::Action;
use crate::api::{Backend, RepoId, Repository};
use crate::async_api::{ApiRequest, ApiResult, ApiWorker};
use crate::components::action_hud::ActionHud;
use crate::components::chat_panel::ChatPanel;
use crate::components::context_bar::ContextBar;
use crate::components::editor::Editor;
use crate::components::explorer::Explorer;
use crate::components::input_dialog::render_input_dialog;
use crate::components::repo_list::RepoList;
use crate::components::Component;
use crate::config::WorkbenchConfig;
use crate::event::{map_key_to_action, parse_command, Event, EventReader, KeyContext};
use crate::state::{
    Activation, AppState, BufferStatus, CloneRejected, ContextSnapshot, EditorMode, FocusPanel,
    InputKind, InputState, SelectedFile, SendRejected, TextBuffer,
};
use crate::tui::Tui;

pub struct App {
    state: AppState,
    worker: ApiWorker,
    config: WorkbenchConfig,
    /// Bumped whenever the current repository changes.
    repo_generation: u64,
    switch_generation: u64,
    tree_generation: u64,
    search_generation: u64,
    /// Only the newest listing request is applied.
    list_generation: u64,
    /// File to highlight in the explorer once the next tree arrives.
    pending_reveal: Option<String>,
    status_clear_countdown: u32,
}

impl App {
    pub fn new(config: WorkbenchConfig, backend: Arc<dyn Backend>) -> Self {
        Self {
            state: AppState::new(config.save_indicator_ticks),
            worker: ApiWorker::new(backend),
            config,
            repo_generation: 0,
            switch_generation: 0,
            tree_generation: 0,
            search_generation: 0,
            list_generation: 0,
            pending_reveal: None,
            status_clear_countdown: 0,
        }
    }

    /// Fetch the current repository, the listing and the conversation.
    pub fn start(&mut self) {
        self.worker.request(ApiRequest::CurrentRepository);
        self.request_repositories();
        if self.state.chat.begin_history_load() {
            self.worker.request(ApiRequest::ChatHistory);
        }
    }

    pub async fn run(&mut self, terminal: &mut Tui) -> Result<()> {
        self.start();

        let mut events = EventReader::new(Duration::from_millis(self.config.tick_ms));

        let context_bar = ContextBar;
        let repo_list = RepoList;
        let explorer = Explorer;
        let editor = Editor;
        let chat_panel = ChatPanel;
        let action_hud = ActionHud;

        loop {
            while let Some(result) = self.worker.try_recv() {
                self.handle_result(result);
            }

            // Editor rows: minus context bar, hud and borders
            let term_size = terminal.size()?;
            self.state.editor.viewport_height = term_size.height.saturating_sub(4) as usize;
            self.state.editor.ensure_visible();

            terminal.draw(|frame| {
                let outer = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(1),
                        Constraint::Min(3),
                        Constraint::Length(1),
                    ])
                    .split(frame.area());

                context_bar.render(frame, outer[0], &self.state);

                let main = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([
                        Constraint::Percentage(25),
                        Constraint::Percentage(45),
                        Constraint::Percentage(30),
                    ])
                    .split(outer[1]);

                let left = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
                    .split(main[0]);

                repo_list.render(frame, left[0], &self.state);
                explorer.render(frame, left[1], &self.state);
                editor.render(frame, main[1], &self.state);
                chat_panel.render(frame, main[2], &self.state);
                action_hud.render(frame, outer[2], &self.state);

                render_input_dialog(frame, &self.state);
            })?;

            // Wait for at least one event, then drain all pending events
            // to avoid input lag from buffered key events.
            let first = events.next().await;
            let mut pending = Vec::new();
            if let Some(ev) = first {
                pending.push(ev);
            }
            while let Some(ev) = events.try_next() {
                pending.push(ev);
            }

            for event in pending {
                let ctx = KeyContext {
                    focus: self.state.focus,
                    input: self.state.input.as_ref().map(|i| i.kind),
                    editor_mode: self.state.editor.mode,
                    search_active: self.state.navigator.search.is_active(),
                };
                let action = match event {
                    Event::Key(key) => map_key_to_action(key, &ctx),
                    Event::Paste(text) => Some(Action::Paste(text)),
                    Event::Resize => Some(Action::Resize),
                    Event::Tick => Some(Action::Tick),
                };
                if let Some(action) = action {
                    self.update(action);
                }
            }

            if self.state.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn update(&mut self, action: Action) {
        match action {
            Action::Quit => {
                self.state.should_quit = true;
            }
            Action::Tick => {
                if self.status_clear_countdown > 0 {
                    self.status_clear_countdown -= 1;
                    if self.status_clear_countdown == 0 {
                        self.state.status_message = None;
                    }
                }
                self.state.buffer.tick();
            }
            Action::Resize => {}
            Action::ToggleHud => {
                self.state.hud_expanded = !self.state.hud_expanded;
            }
            Action::Paste(text) => self.paste(&text),
            Action::FocusNext => self.set_focus(self.state.focus.next()),
            Action::FocusPrev => self.set_focus(self.state.focus.prev()),

            // Prompts
            Action::OpenInput(kind) => self.open_input(kind),
            Action::InputChar(c) => self.with_input(|t| t.insert_char(c)),
            Action::InputNewline => {
                if self.state.input.as_ref().is_some_and(|i| i.kind.multiline()) {
                    self.with_input(|t| t.insert_char('\n'));
                }
            }
            Action::InputBackspace => self.with_input(TextBuffer::delete_back),
            Action::InputDeleteWord => self.with_input(TextBuffer::delete_word_back),
            Action::InputLeft => self.with_input(TextBuffer::move_left),
            Action::InputRight => self.with_input(TextBuffer::move_right),
            Action::InputHome => self.with_input(TextBuffer::move_home),
            Action::InputEnd => self.with_input(TextBuffer::move_end),
            Action::CancelInput => {
                self.state.input = None;
            }
            Action::SubmitInput => self.submit_input(),

            // Repositories
            Action::RepoUp => self.state.repos.select_up(),
            Action::RepoDown => self.state.repos.select_down(),
            Action::SwitchSelected => {
                if let Some(repository) = self.state.repos.selected_repository().cloned() {
                    self.switch_to(repository);
                }
            }
            Action::RefreshRepositories => self.request_repositories(),
            Action::CloneRepository { url, force } => {
                if let Err(rejected) = self.clone_repository(&url, force) {
                    debug!(?rejected, "clone rejected before sending");
                }
            }
            Action::SwitchRepository(id) => match self.state.repos.find(&id).cloned() {
                Some(repository) => self.switch_to(repository),
                None => self.set_status(format!("Unknown repository {id}"), true),
            },

            // Explorer
            Action::NavigatorUp => self.state.navigator.select_up(),
            Action::NavigatorDown => self.state.navigator.select_down(),
            Action::ActivateSelected => {
                if let Some(activation) = self.state.navigator.activate_selected() {
                    self.handle_activation(activation);
                }
            }
            Action::ActivateRow(index) => match self.state.navigator.activate(index) {
                Some(activation) => self.handle_activation(activation),
                None => self.set_status(format!("No row {}", index + 1), true),
            },
            Action::OpenPath(path) => {
                if self.require_repository() {
                    let activation = self.state.navigator.activate_path(&path);
                    self.handle_activation(activation);
                }
            }
            Action::RefreshTree => self.request_tree(),
            Action::SearchFiles(query) => self.search_files(&query),
            Action::ClearSearch => {
                self.search_generation += 1;
                self.state.navigator.clear_search();
            }
            Action::CreateFile(path) => self.create_file(&path),

            // Editor
            Action::CursorUp => self.move_cursor(TextBuffer::move_up),
            Action::CursorDown => self.move_cursor(TextBuffer::move_down),
            Action::CursorLeft => self.move_cursor(TextBuffer::move_left),
            Action::CursorRight => self.move_cursor(TextBuffer::move_right),
            Action::CursorLineStart => self.move_cursor(TextBuffer::move_home),
            Action::CursorLineEnd => self.move_cursor(TextBuffer::move_end),
            Action::EnterInsertMode => {
                if self.editor_has_content() {
                    self.state.editor.mode = EditorMode::Insert;
                }
            }
            Action::ExitInsertMode | Action::ExitVisualMode => {
                self.state.editor.mode = EditorMode::Normal;
            }
            Action::EditorChar(c) => self.edit_draft(|d| d.insert_char(c)),
            Action::EditorNewline => self.edit_draft(|d| d.insert_char('\n')),
            Action::EditorBackspace => self.edit_draft(TextBuffer::delete_back),
            Action::EditorDelete => self.edit_draft(TextBuffer::delete_forward),
            Action::Edit(command) => {
                if self.state.buffer.apply_edit(&command) {
                    let content = self.state.buffer.content().to_string();
                    self.state.editor.resync(&content);
                    self.state.selection.editing().set_text(None);
                } else if self.state.buffer.status() == BufferStatus::Empty {
                    self.set_status("No file open".to_string(), true);
                } else {
                    self.set_status("Edit refused: line out of range or file busy".to_string(), true);
                }
            }
            Action::EnterVisualMode => {
                if self.editor_has_content() {
                    let anchor = self.state.editor.cursor_line();
                    self.state.editor.mode = EditorMode::Visual { anchor };
                }
            }
            Action::ConfirmSelection => {
                if let Some((start, end)) = self.state.editor.visual_range() {
                    self.state.editor.mode = EditorMode::Normal;
                    self.select_lines(start + 1, end + 1);
                }
            }
            Action::SelectLines { start, end } => {
                self.select_lines(start.min(end), start.max(end));
            }
            Action::ClearSelection => {
                self.state.selection.editing().set_text(None);
            }
            Action::SaveFile => self.save_file(),

            // Assistant
            Action::SendMessage(text) => self.send_message(&text),
            Action::ReloadHistory => {
                if self.state.chat.begin_history_load() {
                    self.worker.request(ApiRequest::ChatHistory);
                } else {
                    self.set_status("Assistant is busy".to_string(), true);
                }
            }
            Action::ClearChat => {
                if self.state.chat.begin_clear() {
                    self.worker.request(ApiRequest::ClearChat);
                } else {
                    self.set_status("Assistant is busy".to_string(), true);
                }
            }
            Action::ChatScrollUp => {
                let max: usize = self
                    .state
                    .chat
                    .turns()
                    .iter()
                    .map(|t| t.content.lines().count() + 2)
                    .sum();
                self.state.chat_scroll = (self.state.chat_scroll + 1).min(max);
            }
            Action::ChatScrollDown => {
                self.state.chat_scroll = self.state.chat_scroll.saturating_sub(1);
            }
        }
    }

    fn handle_result(&mut self, result: ApiResult) {
        match result {
            ApiResult::CurrentRepository(Ok(Some(repository))) => {
                // A switch issued by the user takes precedence over the startup report
                if self.state.repos.current().is_none() && self.switch_generation == 0 {
                    info!(repository = %repository.id(), "resuming current repository");
                    self.apply_repository(repository);
                }
            }
            ApiResult::CurrentRepository(Ok(None)) => {}
            ApiResult::CurrentRepository(Err(e)) => {
                warn!(error = %e, "current repository fetch failed");
                self.set_status(format!("Could not reach server: {e}"), true);
            }
            ApiResult::Repositories {
                generation,
                repositories,
            } => {
                if generation != self.list_generation {
                    debug!(generation, "dropping stale repository list");
                    return;
                }
                match repositories {
                    Ok(repositories) => self.state.repos.replace_list(repositories),
                    Err(e) => {
                        self.state.repos.loading = false;
                        warn!(error = %e, "repository list failed");
                        self.set_status(format!("Could not list repositories: {e}"), true);
                    }
                }
            }
            ApiResult::Cloned(result) => match self.state.repos.finish_clone(result) {
                Some(repository) => {
                    info!(repository = %repository.id(), "cloned");
                    self.state.input = None;
                    self.set_status(format!("Cloned {}", repository.id()), false);
                    self.request_repositories();
                    self.switch_to(repository);
                }
                None => {
                    let message = self.state.repos.clone_error().unwrap_or_default().to_string();
                    warn!(error = %message, "clone failed");
                    self.set_status(format!("Clone failed: {message}"), true);
                }
            },
            ApiResult::Switched {
                generation,
                repository,
                result,
            } => {
                if generation != self.switch_generation {
                    debug!(generation, "dropping stale switch result");
                    return;
                }
                match result {
                    Ok(()) => {
                        info!(repository = %repository.id(), "switched repository");
                        self.set_status(format!("Switched to {}", repository.id()), false);
                        self.apply_repository(repository);
                    }
                    Err(e) => {
                        warn!(repository = %repository.id(), error = %e, "switch failed");
                        self.set_status(format!("Switch failed: {e}"), true);
                    }
                }
            }
            ApiResult::FileTree {
                generation,
                records,
            } => {
                if generation != self.tree_generation {
                    debug!(generation, "dropping stale file tree");
                    return;
                }
                match records {
                    Ok(records) => {
                        debug!(count = records.len(), "file tree loaded");
                        self.state.navigator.apply_records(records);
                        if let Some(path) = self.pending_reveal.take() {
                            self.state.navigator.select_path(&path);
                        }
                    }
                    Err(e) => {
                        self.state.navigator.loading = false;
                        warn!(error = %e, "file tree fetch failed");
                        self.set_status(format!("Could not load files: {e}"), true);
                    }
                }
            }
            ApiResult::FileContent { ticket, content } => {
                if self.state.buffer.finish_load(&ticket, content) {
                    let content = self.state.buffer.content().to_string();
                    self.state.editor.load(&content);
                    if self.state.buffer.load_failed() {
                        warn!(path = %ticket.path, "file load failed");
                    }
                } else {
                    debug!(path = %ticket.path, "dropping stale file content");
                }
            }
            ApiResult::Saved { ticket, result } => {
                let outcome = result.as_ref().map_err(ToString::to_string).err();
                if !self.state.buffer.finish_save(&ticket, result) {
                    debug!(path = %ticket.path, "dropping stale save result");
                    return;
                }
                match outcome {
                    None => info!(path = %ticket.path, "saved"),
                    Some(e) => warn!(path = %ticket.path, error = %e, "save failed"),
                }
            }
            ApiResult::Created {
                generation,
                path,
                result,
            } => {
                if generation != self.repo_generation {
                    debug!(path = %path, "dropping stale create result");
                    return;
                }
                match result {
                    Ok(()) => {
                        info!(path = %path, "created file");
                        self.set_status(format!("Created {path}"), false);
                        self.pending_reveal = Some(path.clone());
                        self.request_tree();
                        self.open_file(&path, Some(0));
                    }
                    Err(e) => {
                        warn!(path = %path, error = %e, "create failed");
                        self.set_status(format!("Could not create {path}: {e}"), true);
                    }
                }
            }
            ApiResult::SearchResults {
                generation,
                results,
            } => {
                if generation != self.search_generation {
                    debug!(generation, "dropping stale search results");
                    return;
                }
                match results {
                    Ok(results) => self.state.navigator.apply_search(results),
                    Err(e) => {
                        self.state.navigator.apply_search(Vec::new());
                        self.set_status(format!("Search failed: {e}"), true);
                    }
                }
            }
            ApiResult::ChatHistory(result) => {
                if let Err(ref e) = result {
                    warn!(error = %e, "chat history fetch failed");
                    self.set_status(format!("Could not load conversation: {e}"), true);
                }
                self.state.chat.finish_history_load(result);
                self.state.chat_scroll = 0;
            }
            ApiResult::Reply { turn, reply } => {
                if let Err(ref e) = reply {
                    warn!(error = %e, "assistant request failed");
                }
                if self.state.chat.finish_send(turn, reply) {
                    self.state.chat_scroll = 0;
                } else {
                    debug!(turn, "dropping unexpected reply");
                }
            }
            ApiResult::ChatCleared(result) => {
                let error = result.as_ref().err().map(ToString::to_string);
                if self.state.chat.finish_clear(result) {
                    self.state.chat_scroll = 0;
                    self.set_status("Conversation cleared".to_string(), false);
                } else if let Some(e) = error {
                    warn!(error = %e, "clear chat failed");
                    self.set_status(format!("Could not clear conversation: {e}"), true);
                }
            }
        }
    }

    fn set_status(&mut self, msg: String, is_error: bool) {
        self.state.status_message = Some((msg, is_error));
        self.status_clear_countdown = self.config.status_ticks;
    }

    fn set_focus(&mut self, focus: FocusPanel) {
        if self.state.focus == FocusPanel::Editor && focus != FocusPanel::Editor {
            self.state.editor.mode = EditorMode::Normal;
        }
        self.state.focus = focus;
    }

    fn open_input(&mut self, kind: InputKind) {
        let input = match kind {
            InputKind::Search | InputKind::NewFile if !self.require_repository() => return,
            InputKind::Search => {
                InputState::with_text(kind, &self.state.navigator.search.query)
            }
            _ => InputState::new(kind),
        };
        self.state.input = Some(input);
    }

    fn with_input(&mut self, f: impl FnOnce(&mut TextBuffer)) {
        if let Some(input) = self.state.input.as_mut() {
            f(&mut input.text);
        }
    }

    /// Pasted text goes to the open prompt, else to the editor in insert
    /// mode. Single-line prompts get newlines folded to spaces.
    fn paste(&mut self, text: &str) {
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        if let Some(input) = self.state.input.as_mut() {
            if input.kind.multiline() {
                input.text.insert_str(&text);
            } else {
                input.text.insert_str(&text.replace('\n', " "));
            }
            return;
        }
        if self.state.focus == FocusPanel::Editor && self.state.editor.mode == EditorMode::Insert {
            self.edit_draft(|d| d.insert_str(&text));
        }
    }

    fn submit_input(&mut self) {
        let Some(input) = self.state.input.take() else {
            return;
        };
        let text = input.text.text().to_string();
        match input.kind {
            InputKind::Command => match parse_command(&text) {
                Ok(Some(action)) => self.update(action),
                Ok(None) => {}
                Err(msg) => self.set_status(msg, true),
            },
            InputKind::CloneUrl => {
                if self.clone_repository(&text, false) == Err(CloneRejected::EmptyUrl) {
                    self.state.input = Some(InputState::with_text(InputKind::CloneUrl, &text));
                }
            }
            InputKind::Search => self.update(Action::SearchFiles(text)),
            InputKind::NewFile => self.update(Action::CreateFile(text)),
            InputKind::Message => self.update(Action::SendMessage(text)),
        }
    }

    fn require_repository(&mut self) -> bool {
        if self.state.selection.repository().is_some() {
            return true;
        }
        self.set_status("No repository selected".to_string(), true);
        false
    }

    fn clone_repository(&mut self, url: &str, force: bool) -> Result<(), CloneRejected> {
        match self.state.repos.begin_clone(url) {
            Ok(url) => {
                info!(url = %url, force, "cloning");
                self.set_status(format!("Cloning {url}..."), false);
                self.worker.request(ApiRequest::CloneRepository { url, force });
                Ok(())
            }
            Err(rejected) => {
                let msg = match rejected {
                    CloneRejected::EmptyUrl => self
                        .state
                        .repos
                        .clone_error()
                        .unwrap_or_default()
                        .to_string(),
                    CloneRejected::Busy => "A clone is already in progress".to_string(),
                };
                self.set_status(msg, true);
                Err(rejected)
            }
        }
    }

    fn switch_to(&mut self, repository: Repository) {
        self.switch_generation += 1;
        debug!(repository = %repository.id(), generation = self.switch_generation, "switching");
        self.worker.request(ApiRequest::SwitchRepository {
            generation: self.switch_generation,
            repository,
        });
    }

    /// Make `repository` current and reset everything that depended on the
    /// previous one, then fetch its tree.
    fn apply_repository(&mut self, repository: Repository) {
        let id = repository.id();
        self.state.repos.set_current(repository);
        if let Some(index) = self
            .state
            .repos
            .repositories()
            .iter()
            .position(|r| r.id() == id)
        {
            self.state.repos.selected = index;
        }
        self.reset_downstream(Some(id));
        self.request_tree();
    }

    fn reset_downstream(&mut self, repository: Option<RepoId>) {
        self.repo_generation += 1;
        self.search_generation += 1;
        self.tree_generation += 1;
        self.pending_reveal = None;
        self.state.navigator.reset_for_repository();
        self.state.selection.navigation().set_repository(repository);
        self.state.buffer.discard();
        self.state.editor.load("");
    }

    fn request_repositories(&mut self) {
        self.list_generation += 1;
        self.state.repos.loading = true;
        self.worker.request(ApiRequest::ListRepositories {
            generation: self.list_generation,
        });
    }

    fn request_tree(&mut self) {
        if self.state.selection.repository().is_none() {
            return;
        }
        self.tree_generation += 1;
        self.state.navigator.loading = true;
        self.worker.request(ApiRequest::FileTree {
            generation: self.tree_generation,
            max_depth: self.config.tree_max_depth,
        });
    }

    fn handle_activation(&mut self, activation: Activation) {
        match activation {
            Activation::File { path, size } => {
                self.open_file(&path, size);
                self.state.focus = FocusPanel::Editor;
            }
            Activation::Toggled { path, expanded } => {
                debug!(path = %path, expanded, "toggled directory");
            }
        }
    }

    /// Select `path` and start loading it. Any unsaved edits to the previous
    /// file are dropped.
    fn open_file(&mut self, path: &str, size: Option<u64>) {
        if self.state.buffer.is_dirty() {
            info!(path = ?self.state.buffer.path(), "discarding unsaved edits");
        }
        self.state.selection.navigation().set_file(Some(SelectedFile {
            path: path.to_string(),
            size,
        }));
        let ticket = self.state.buffer.select_file(path, size);
        self.state.editor.load("");
        self.state.navigator.expansion.reveal(path);
        self.state.navigator.select_path(path);
        self.worker.request(ApiRequest::FileContent(ticket));
    }

    fn search_files(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            self.set_status("Enter a file name to search for".to_string(), true);
            return;
        }
        if !self.require_repository() {
            return;
        }
        self.search_generation += 1;
        self.state.navigator.start_search(query);
        self.state.focus = FocusPanel::Explorer;
        self.worker.request(ApiRequest::SearchFiles {
            generation: self.search_generation,
            query: query.to_string(),
        });
    }

    fn create_file(&mut self, path: &str) {
        let path = path.trim().trim_matches('/');
        if path.is_empty() {
            self.set_status("Enter a file path".to_string(), true);
            return;
        }
        if !self.require_repository() {
            return;
        }
        self.worker.request(ApiRequest::CreateFile {
            generation: self.repo_generation,
            path: path.to_string(),
        });
    }

    fn editor_has_content(&mut self) -> bool {
        match self.state.buffer.status() {
            BufferStatus::Clean | BufferStatus::Dirty => true,
            BufferStatus::Empty => {
                self.set_status("No file open".to_string(), true);
                false
            }
            BufferStatus::Loading | BufferStatus::Saving => false,
        }
    }

    fn move_cursor(&mut self, f: impl FnOnce(&mut TextBuffer)) {
        f(&mut self.state.editor.draft);
        self.state.editor.ensure_visible();
    }

    /// Apply a keystroke to a copy of the draft and commit it through the
    /// buffer. A refused edit leaves the draft untouched.
    fn edit_draft(&mut self, f: impl FnOnce(&mut TextBuffer)) {
        let mut draft = self.state.editor.draft.clone();
        f(&mut draft);
        if draft.text() == self.state.editor.draft.text() {
            return;
        }
        if self.state.buffer.edit(draft.text()) {
            self.state.editor.draft = draft;
            self.state.editor.ensure_visible();
            self.state.selection.editing().set_text(None);
        } else {
            debug!(status = ?self.state.buffer.status(), "edit refused");
        }
    }

    fn select_lines(&mut self, start: usize, end: usize) {
        match self.state.buffer.line_range(start, end) {
            Some(text) => {
                self.state.selection.editing().set_text(Some(text));
                if self.state.selection.text().is_some() {
                    self.set_status(format!("Lines {start}-{end} selected as context"), false);
                }
            }
            None => self.set_status(format!("Lines {start}-{end} are out of range"), true),
        }
    }

    fn save_file(&mut self) {
        match self.state.buffer.begin_save() {
            Some(ticket) => {
                debug!(path = %ticket.path, bytes = ticket.content.len(), "saving");
                self.worker.request(ApiRequest::SaveFile(ticket));
            }
            None => {
                let buffer = &self.state.buffer;
                let reason = match buffer.status() {
                    BufferStatus::Empty => "No file open",
                    BufferStatus::Loading => "File is still loading",
                    BufferStatus::Saving => "Save already in progress",
                    _ if buffer.load_failed() => "Cannot save: the file failed to load",
                    _ => "No changes to save",
                };
                self.set_status(reason.to_string(), true);
            }
        }
    }

    fn send_message(&mut self, text: &str) {
        let snapshot = ContextSnapshot::capture(
            &self.state.selection,
            &self.state.buffer,
            &self.state.navigator,
        );
        match self.state.chat.send(text, snapshot) {
            Ok(pending) => {
                let turn = pending.turn;
                self.worker.request(ApiRequest::SendMessage(pending));
                self.state.chat.mark_dispatched(turn);
                self.state.chat_scroll = 0;
            }
            Err(SendRejected::Empty) => debug!("ignoring empty message"),
            Err(SendRejected::Busy) => {
                self.set_status("Waiting for the assistant to finish".to_string(), true);
            }
        }
    }
}
