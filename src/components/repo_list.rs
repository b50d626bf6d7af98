use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::api::Repository;
use crate::state::{AppState, FocusPanel};

use super::{panel_border, scroll_for, Component};

pub struct RepoList;

impl Component for RepoList {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let theme = &state.theme;
        let repos = &state.repos;

        let title = if repos.is_cloning() {
            " Repositories (cloning...) ".to_string()
        } else {
            format!(" Repositories ({}) ", repos.repositories().len())
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(panel_border(state, FocusPanel::Repositories));

        if repos.repositories().is_empty() {
            let msg = if repos.loading {
                " Loading repositories..."
            } else {
                " No repositories yet, press c to clone one"
            };
            let paragraph = Paragraph::new(msg)
                .style(Style::default().fg(theme.text_muted))
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        let inner_height = area.height.saturating_sub(2) as usize;
        let selected = repos.selected;
        let scroll = scroll_for(selected, inner_height);
        let is_focused = state.focus == FocusPanel::Repositories;

        let lines: Vec<Line> = repos
            .repositories()
            .iter()
            .enumerate()
            .skip(scroll)
            .take(inner_height)
            .map(|(idx, repo)| {
                let is_selected = is_focused && idx == selected;
                let is_current = repos.is_current(&repo.id());

                let row_style = if is_selected {
                    Style::default()
                        .fg(theme.accent)
                        .add_modifier(Modifier::BOLD)
                        .bg(theme.selection_bg)
                } else {
                    Style::default().fg(theme.text)
                };

                let prefix = if is_selected { "\u{25b6}" } else { " " };
                let marker = if is_current {
                    Span::styled("\u{25cf} ", Style::default().fg(theme.success))
                } else {
                    Span::styled("\u{25cb} ", Style::default().fg(theme.text_muted))
                };

                let name_style = if is_current {
                    row_style.add_modifier(Modifier::BOLD)
                } else {
                    row_style
                };

                Line::from(vec![
                    Span::styled(format!("{prefix} "), row_style),
                    marker,
                    Span::styled(format!("{}/{} ", repo.owner, repo.name), name_style),
                    Span::styled(
                        format!("{} ", repo.branch_label()),
                        Style::default().fg(theme.warning),
                    ),
                    Span::styled(details(repo), Style::default().fg(theme.text_muted)),
                ])
            })
            .collect();

        let mut footer = vec![
            Span::styled(
                " [Enter]",
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("switch  ", Style::default().fg(theme.text_muted)),
            Span::styled(
                "[c]",
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("clone  ", Style::default().fg(theme.text_muted)),
            Span::styled(
                "[r]",
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("refresh ", Style::default().fg(theme.text_muted)),
        ];
        let total = repos.repositories().len();
        if total > inner_height {
            footer.push(Span::styled(
                format!(" {}/{} ", selected + 1, total),
                Style::default().fg(theme.text_muted),
            ));
        }

        let block = block.title_bottom(Line::from(footer));
        let paragraph = Paragraph::new(lines).block(block);
        frame.render_widget(paragraph, area);
    }
}

/// Short commit hash and modification time, e.g. `a1b2c3d 2024-05-01 12:30`.
fn details(repo: &Repository) -> String {
    let commit: String = repo.commit_label().chars().take(7).collect();
    match repo.last_modified_at() {
        Some(at) => format!("{commit} {}", at.format("%Y-%m-%d %H:%M")),
        None => commit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::repo;

    #[test]
    fn test_details_shortens_commit() {
        let mut r = repo("acme", "widgets");
        r.commit_hash = Some("0123456789abcdef".to_string());
        r.last_modified = Some(0.0);
        assert_eq!(details(&r), "0123456 1970-01-01 00:00");
    }

    #[test]
    fn test_details_without_metadata() {
        let mut r = repo("acme", "widgets");
        r.commit_hash = None;
        r.last_modified = None;
        assert_eq!(details(&r), "unknown");
    }
}
