use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::state::AppState;

use super::Component;

pub struct ContextBar;

impl Component for ContextBar {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let theme = &state.theme;

        let mut spans = vec![
            Span::styled(
                " workbench ",
                Style::default().fg(theme.surface).bg(theme.accent),
            ),
            Span::raw("  "),
        ];

        match state.repos.current_repository() {
            Some(repo) => {
                spans.push(Span::styled(
                    format!("{}/{}", repo.owner, repo.name),
                    Style::default()
                        .fg(theme.success)
                        .add_modifier(Modifier::BOLD),
                ));
                spans.push(Span::styled(" on ", Style::default().fg(theme.text_muted)));
                spans.push(Span::styled(
                    repo.branch_label().to_string(),
                    Style::default()
                        .fg(theme.warning)
                        .add_modifier(Modifier::BOLD),
                ));
            }
            None => spans.push(Span::styled(
                "no repository",
                Style::default().fg(theme.text_muted),
            )),
        }

        if let Some(file) = state.selection.file() {
            spans.push(Span::styled(" \u{2192} ", Style::default().fg(theme.text_muted)));
            spans.push(Span::styled(
                file.path.clone(),
                Style::default().fg(theme.text),
            ));
        }

        if let Some(text) = state.selection.text() {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                format!("[{} chars selected]", text.chars().count()),
                Style::default().fg(theme.secondary),
            ));
        }

        let bar = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.surface));
        frame.render_widget(bar, area);
    }
}
