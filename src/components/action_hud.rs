use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::state::{AppState, EditorMode, FocusPanel};

use super::Component;

pub struct ActionHud;

impl Component for ActionHud {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let theme = &state.theme;

        // Show status message if present, otherwise show keybindings
        if let Some((ref msg, is_error)) = state.status_message {
            let color = if is_error { theme.error } else { theme.success };
            let bar = Paragraph::new(Line::from(vec![
                Span::raw(" "),
                Span::styled(msg.as_str(), Style::default().fg(color)),
            ]))
            .style(Style::default().bg(theme.surface));
            frame.render_widget(bar, area);
            return;
        }

        let bindings = bindings_for(state);
        let shown = if state.hud_expanded {
            bindings
        } else {
            &bindings[..bindings.len().min(6)]
        };

        let mut spans = Vec::new();
        spans.push(Span::raw(" "));
        for (i, (key, desc)) in shown.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" ", Style::default().fg(theme.text_muted)));
            }
            spans.push(Span::styled(
                format!("[{key}]"),
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(
                (*desc).to_string(),
                Style::default().fg(theme.text_muted),
            ));
        }
        if !state.hud_expanded && shown.len() < bindings.len() {
            spans.push(Span::styled(
                "  [?]more",
                Style::default().fg(theme.text_muted),
            ));
        }

        let bar = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.surface));
        frame.render_widget(bar, area);
    }
}

fn bindings_for(state: &AppState) -> &'static [(&'static str, &'static str)] {
    if state.input.is_some() {
        return &[("Enter", "submit"), ("Esc", "cancel")];
    }
    match state.focus {
        FocusPanel::Repositories => &[
            ("j/k", "nav"),
            ("Enter", "switch"),
            ("c", "clone"),
            ("r", "refresh"),
            ("Tab", "focus"),
            ("q", "quit"),
            (":", "command"),
        ],
        FocusPanel::Explorer => &[
            ("j/k", "nav"),
            ("Enter", "open"),
            ("/", "search"),
            ("n", "new file"),
            ("r", "refresh"),
            ("Tab", "focus"),
            ("Esc", "clear search"),
            (":", "command"),
            ("q", "quit"),
        ],
        FocusPanel::Editor => match state.editor.mode {
            EditorMode::Insert => &[("Esc", "normal"), ("^S", "save")],
            EditorMode::Visual { .. } => &[
                ("j/k", "extend"),
                ("y", "use as context"),
                ("v/Esc", "exit"),
            ],
            EditorMode::Normal => &[
                ("hjkl", "move"),
                ("i", "insert"),
                ("v", "select lines"),
                ("^S", "save"),
                ("Tab", "focus"),
                ("q", "quit"),
                ("x", "delete char"),
                ("Esc", "clear selection"),
                (":", "command"),
            ],
        },
        FocusPanel::Chat => &[
            ("Enter", "ask"),
            ("j/k", "scroll"),
            ("H", "reload"),
            ("X", "clear"),
            ("Tab", "focus"),
            ("q", "quit"),
            (":", "command"),
        ],
    }
}
