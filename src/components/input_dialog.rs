use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::text_input::render_text_input;
use crate::state::{AppState, InputKind};

pub fn render_input_dialog(frame: &mut Frame, state: &AppState) {
    let Some(input) = state.input.as_ref() else {
        return;
    };
    let theme = &state.theme;
    let area = frame.area();

    let height = if input.kind.multiline() { 12 } else { 7 };
    // Center a dialog box
    let dialog_width = 70.min(area.width.saturating_sub(4));
    let dialog_height = height.min(area.height.saturating_sub(4));

    let x = (area.width.saturating_sub(dialog_width)) / 2;
    let y = (area.height.saturating_sub(dialog_height)) / 2;

    let dialog_area = Rect::new(x, y, dialog_width, dialog_height);

    // Clear background
    frame.render_widget(Clear, dialog_area);

    let border = match input.kind {
        InputKind::Message => theme.secondary,
        InputKind::CloneUrl => theme.warning,
        _ => theme.accent,
    };
    let block = Block::default()
        .title(input.kind.title())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // text area (expands)
            Constraint::Length(1), // error or blank
            Constraint::Length(1), // hints
        ])
        .split(inner);

    render_text_input(frame, rows[0], &input.text, Style::default().fg(theme.text));

    if input.kind == InputKind::CloneUrl {
        if let Some(err) = state.repos.clone_error() {
            let error = Paragraph::new(format!(" {err}")).style(Style::default().fg(theme.error));
            frame.render_widget(error, rows[1]);
        }
    }

    let submit = match input.kind {
        InputKind::Command => "run  ",
        InputKind::CloneUrl => "clone  ",
        InputKind::Search => "search  ",
        InputKind::NewFile => "create  ",
        InputKind::Message => "send  ",
    };

    let mut hints = vec![
        Span::styled(
            " [Enter]",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(submit, Style::default().fg(theme.text_muted)),
    ];
    if input.kind.multiline() {
        hints.push(Span::styled(
            "[S-Enter]",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ));
        hints.push(Span::styled("newline  ", Style::default().fg(theme.text_muted)));
    }
    hints.push(Span::styled(
        "[Esc]",
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD),
    ));
    hints.push(Span::styled("cancel", Style::default().fg(theme.text_muted)));
    frame.render_widget(Paragraph::new(Line::from(hints)), rows[2]);
}
