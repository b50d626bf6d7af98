use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::api::Role;
use crate::state::chat_state::context_lines;
use crate::state::{AppState, ChatPhase, FocusPanel};

use super::{panel_border, Component};

pub struct ChatPanel;

impl Component for ChatPanel {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let theme = &state.theme;
        let chat = &state.chat;

        let status = match chat.phase() {
            ChatPhase::Idle if chat.is_loading_history() => " loading...",
            ChatPhase::Idle => "",
            ChatPhase::Sending | ChatPhase::AwaitingReply => " thinking...",
            ChatPhase::Clearing => " clearing...",
        };

        let block = Block::default()
            .title(Line::from(vec![
                Span::raw(" AI Assistant"),
                Span::styled(status, Style::default().fg(theme.warning)),
                Span::raw(" "),
            ]))
            .borders(Borders::ALL)
            .border_style(panel_border(state, FocusPanel::Chat))
            .title_bottom(Line::from(vec![
                Span::styled(
                    " [Enter]",
                    Style::default()
                        .fg(theme.accent)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled("ask  ", Style::default().fg(theme.text_muted)),
                Span::styled(
                    "[H]",
                    Style::default()
                        .fg(theme.accent)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled("history  ", Style::default().fg(theme.text_muted)),
                Span::styled(
                    "[X]",
                    Style::default()
                        .fg(theme.accent)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled("clear ", Style::default().fg(theme.text_muted)),
            ]));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let context = context_lines(&state.selection);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(context.len() as u16 + 1), // context header
                Constraint::Min(1),                           // conversation
            ])
            .split(inner);

        let mut header: Vec<Line> = context
            .into_iter()
            .map(|l| Line::from(Span::styled(format!(" {l}"), Style::default().fg(theme.text_muted))))
            .collect();
        header.push(Line::from(Span::styled(
            "\u{2500}".repeat(inner.width as usize),
            Style::default().fg(theme.text_muted),
        )));
        frame.render_widget(Paragraph::new(header), rows[0]);

        let width = rows[1].width as usize;
        let mut lines: Vec<Line> = Vec::new();
        if chat.turns().is_empty() {
            lines.push(Line::from(Span::styled(
                " Ask about the open file or the selected lines.",
                Style::default().fg(theme.text_muted),
            )));
        }
        for turn in chat.turns() {
            let (label, color) = match turn.role {
                Role::User => ("You", theme.user_fg),
                Role::Assistant => ("Assistant", theme.assistant_fg),
            };
            lines.push(Line::from(Span::styled(
                format!(" {label}"),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )));
            for wrapped in wrap(&turn.content, width.saturating_sub(2)) {
                lines.push(Line::from(Span::styled(
                    format!("  {wrapped}"),
                    Style::default().fg(theme.text),
                )));
            }
            lines.push(Line::default());
        }

        // Pin to the newest line; chat_scroll moves back from there
        let height = rows[1].height as usize;
        let bottom = lines.len().saturating_sub(height);
        let top = bottom.saturating_sub(state.chat_scroll);
        let visible: Vec<Line> = lines.into_iter().skip(top).take(height).collect();
        frame.render_widget(Paragraph::new(visible), rows[1]);
    }
}

/// Wrap text to `width` columns on whitespace, splitting words that are
/// longer than a line. Embedded newlines are kept.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut len = 0;
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            if len > 0 && len + 1 + word.len() > width {
                out.push(std::mem::take(&mut line));
                len = 0;
            }
            while word.len() > width {
                let rest = word.split_off(width);
                if len > 0 {
                    out.push(std::mem::take(&mut line));
                    len = 0;
                }
                out.push(word.into_iter().collect());
                word = rest;
            }
            if len > 0 {
                line.push(' ');
                len += 1;
            }
            len += word.len();
            line.extend(word);
        }
        out.push(line);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_on_words() {
        assert_eq!(wrap("the quick brown fox", 10), vec!["the quick", "brown fox"]);
    }

    #[test]
    fn test_wrap_keeps_newlines() {
        assert_eq!(wrap("a\n\nb", 10), vec!["a", "", "b"]);
    }

    #[test]
    fn test_wrap_splits_long_words() {
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap("x abcdefgh", 4), vec!["x", "abcd", "efgh"]);
    }
}
