use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::api::FileKind;
use crate::state::{AppState, FocusPanel};

use super::editor::format_file_size;
use super::{panel_border, scroll_for, Component};

pub struct Explorer;

/// A row ready to draw, from either the tree or the search results.
struct Row {
    indent: usize,
    icon: &'static str,
    label: String,
    path: String,
    size: Option<u64>,
    is_dir: bool,
}

impl Component for Explorer {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let theme = &state.theme;
        let navigator = &state.navigator;
        let searching = navigator.search.is_active();

        let rows: Vec<Row> = if searching {
            navigator
                .search
                .results
                .iter()
                .map(|r| Row {
                    indent: 0,
                    icon: if r.kind == FileKind::Directory {
                        "\u{25b8} "
                    } else {
                        "  "
                    },
                    label: r.path.clone(),
                    path: r.path.clone(),
                    size: r.size,
                    is_dir: r.kind == FileKind::Directory,
                })
                .collect()
        } else {
            navigator
                .visible_rows()
                .into_iter()
                .map(|r| {
                    let is_dir = r.kind == FileKind::Directory;
                    let icon = match (is_dir, r.expanded) {
                        (true, true) => "\u{25be} ",
                        (true, false) => "\u{25b8} ",
                        (false, _) => "  ",
                    };
                    Row {
                        indent: r.depth,
                        icon,
                        label: r.name,
                        path: r.path,
                        size: r.size,
                        is_dir,
                    }
                })
                .collect()
        };

        let title = if searching {
            let suffix = if navigator.search.loading { " ..." } else { "" };
            format!(" /{}{suffix} ", navigator.search.query)
        } else {
            match state.selection.repository() {
                Some(repo) => format!(" Files: {repo} "),
                None => " Files ".to_string(),
            }
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(panel_border(state, FocusPanel::Explorer));

        if rows.is_empty() {
            let msg = if state.selection.repository().is_none() {
                " No repository selected"
            } else if navigator.loading || navigator.search.loading {
                " Loading..."
            } else if searching {
                " No matches"
            } else {
                " Repository is empty"
            };
            let paragraph = Paragraph::new(msg)
                .style(Style::default().fg(theme.text_muted))
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        let inner_height = area.height.saturating_sub(2) as usize;
        let inner_width = area.width.saturating_sub(2) as usize;
        let selected = navigator.selected;
        let scroll = scroll_for(selected, inner_height);
        let is_focused = state.focus == FocusPanel::Explorer;
        let open_path = state.selection.file().map(|f| f.path.as_str());

        let lines: Vec<Line> = rows
            .iter()
            .enumerate()
            .skip(scroll)
            .take(inner_height)
            .map(|(idx, row)| {
                let is_selected = is_focused && idx == selected;
                let is_open = open_path == Some(row.path.as_str());

                let style = if is_selected {
                    Style::default()
                        .fg(theme.accent)
                        .add_modifier(Modifier::BOLD)
                        .bg(theme.selection_bg)
                } else if is_open {
                    Style::default().fg(theme.text).bg(theme.cursor_line_bg)
                } else if row.is_dir {
                    Style::default().fg(theme.secondary)
                } else {
                    Style::default().fg(theme.text)
                };

                let prefix = if is_selected { "\u{25b6}" } else { " " };
                let size = row.size.map(format_file_size).unwrap_or_default();

                // Truncate from the left so the file name stays visible
                let used = 2 + row.indent * 2 + 2 + size.chars().count() + 1;
                let max_label = inner_width.saturating_sub(used);
                let char_count = row.label.chars().count();
                let label = if char_count > max_label && max_label > 1 {
                    let skip = char_count - (max_label - 1);
                    let truncated: String = row.label.chars().skip(skip).collect();
                    format!("\u{2026}{truncated}")
                } else {
                    row.label.clone()
                };

                Line::from(vec![
                    Span::styled(format!("{prefix} "), style),
                    Span::raw("  ".repeat(row.indent)),
                    Span::styled(row.icon, style),
                    Span::styled(label, style),
                    Span::styled(format!(" {size}"), Style::default().fg(theme.text_muted)),
                ])
            })
            .collect();

        let total = rows.len();
        let scroll_info = if total > inner_height {
            format!(" {}/{} ", selected + 1, total)
        } else {
            String::new()
        };

        let block = block.title_bottom(Line::from(scroll_info).right_aligned());
        let paragraph = Paragraph::new(lines).block(block);
        frame.render_widget(paragraph, area);
    }
}
