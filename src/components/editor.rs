use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::state::{AppState, BufferStatus, EditorMode, FocusPanel, SaveIndicator};

use super::{panel_border, Component};

pub struct Editor;

impl Component for Editor {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let theme = &state.theme;
        let buffer = &state.buffer;
        let editor = &state.editor;

        let mut title = vec![Span::raw(" ")];
        match buffer.path() {
            Some(path) => {
                title.push(Span::styled(
                    path.to_string(),
                    Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
                ));
                title.push(Span::styled(
                    format!(" [{}]", language_for(path)),
                    Style::default().fg(theme.text_muted),
                ));
                if let Some(size) = buffer.size() {
                    title.push(Span::styled(
                        format!(" {}", format_file_size(size)),
                        Style::default().fg(theme.text_muted),
                    ));
                }
            }
            None => title.push(Span::styled("Editor", Style::default().fg(theme.text))),
        }
        match buffer.status() {
            BufferStatus::Dirty => {
                title.push(Span::styled(" \u{25cf}", Style::default().fg(theme.warning)));
            }
            BufferStatus::Saving => {
                title.push(Span::styled(" saving...", Style::default().fg(theme.warning)));
            }
            _ => {}
        }
        match buffer.indicator() {
            SaveIndicator::Saved => {
                title.push(Span::styled(" \u{2713} saved", Style::default().fg(theme.success)));
            }
            SaveIndicator::Failed(msg) => {
                title.push(Span::styled(
                    format!(" save failed: {msg}"),
                    Style::default().fg(theme.error),
                ));
            }
            SaveIndicator::Hidden => {}
        }
        title.push(Span::raw(" "));

        let mode_label = match editor.mode {
            EditorMode::Normal => " NORMAL ",
            EditorMode::Insert => " INSERT ",
            EditorMode::Visual { .. } => " VISUAL ",
        };
        let (cursor_line, cursor_col) = editor.draft.cursor_line_col();

        let block = Block::default()
            .title(Line::from(title))
            .borders(Borders::ALL)
            .border_style(panel_border(state, FocusPanel::Editor));

        match buffer.status() {
            BufferStatus::Empty => {
                let paragraph = Paragraph::new(" Select a file to start editing")
                    .style(Style::default().fg(theme.text_muted))
                    .block(block);
                frame.render_widget(paragraph, area);
                return;
            }
            BufferStatus::Loading => {
                let paragraph = Paragraph::new(" Loading...")
                    .style(Style::default().fg(theme.text_muted))
                    .block(block);
                frame.render_widget(paragraph, area);
                return;
            }
            _ => {}
        }

        let block = block.title_bottom(Line::from(vec![
            Span::styled(
                mode_label,
                Style::default()
                    .fg(theme.surface)
                    .bg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" Ln {}, Col {} ", cursor_line + 1, cursor_col + 1),
                Style::default().fg(theme.text_muted),
            ),
        ]));

        let inner_height = area.height.saturating_sub(2) as usize;
        let text = editor.draft.text();
        let line_count = editor.draft.line_count();
        let gutter = line_count.to_string().len().max(3);
        let visual = editor.visual_range();
        let show_cursor = state.focus == FocusPanel::Editor && state.input.is_none();
        let text_style = if buffer.load_failed() {
            Style::default().fg(theme.error)
        } else {
            Style::default().fg(theme.text)
        };

        let lines: Vec<Line> = text
            .split('\n')
            .enumerate()
            .skip(editor.scroll)
            .take(inner_height)
            .map(|(idx, content)| {
                let in_visual = visual.is_some_and(|(s, e)| idx >= s && idx <= e);
                let line_bg = if in_visual {
                    Some(theme.visual_select_bg)
                } else if idx == cursor_line {
                    Some(theme.cursor_line_bg)
                } else {
                    None
                };
                let with_bg = |style: Style| match line_bg {
                    Some(bg) => style.bg(bg),
                    None => style,
                };

                let mut spans = vec![Span::styled(
                    format!("{:>gutter$} ", idx + 1),
                    Style::default().fg(theme.line_number_fg),
                )];

                let col = tab_adjusted_col(content, cursor_col);
                let content = content.replace('\t', "    ");
                if show_cursor && idx == cursor_line {
                    let before: String = content.chars().take(col).collect();
                    let at: String = content
                        .chars()
                        .nth(col)
                        .map(String::from)
                        .unwrap_or_else(|| " ".to_string());
                    let after: String = content.chars().skip(col + 1).collect();
                    spans.push(Span::styled(before, with_bg(text_style)));
                    spans.push(Span::styled(at, text_style.add_modifier(Modifier::REVERSED)));
                    spans.push(Span::styled(after, with_bg(text_style)));
                } else {
                    spans.push(Span::styled(content, with_bg(text_style)));
                }

                let line = Line::from(spans);
                match line_bg {
                    Some(bg) => line.style(Style::default().bg(bg)),
                    None => line,
                }
            })
            .collect();

        let paragraph = Paragraph::new(lines).block(block);
        frame.render_widget(paragraph, area);
    }
}

/// Display column of `col` once each tab before it is drawn as four spaces.
fn tab_adjusted_col(line: &str, col: usize) -> usize {
    line.chars().take(col).map(|c| if c == '\t' { 4 } else { 1 }).sum()
}

/// Human-readable size: `0 B`, `512 B`, `1.5 KB`, `2 MB`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 B".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 10.0).round() / 10.0;
    let text = format!("{rounded:.1}");
    let text = text.strip_suffix(".0").unwrap_or(&text);
    format!("{text} {}", UNITS[unit])
}

/// Editor language for a file name, by extension.
pub fn language_for(path: &str) -> &'static str {
    let name = path.rsplit('/').next().unwrap_or(path).to_lowercase();
    if name == "dockerfile" {
        return "dockerfile";
    }
    let ext = match name.rsplit_once('.') {
        Some((_, ext)) => ext,
        None => return "plaintext",
    };
    match ext {
        "js" | "jsx" => "javascript",
        "ts" | "tsx" => "typescript",
        "py" => "python",
        "html" => "html",
        "css" => "css",
        "scss" => "scss",
        "json" => "json",
        "md" => "markdown",
        "yaml" | "yml" => "yaml",
        "sh" => "shell",
        "dockerfile" => "dockerfile",
        "sql" => "sql",
        "xml" => "xml",
        "php" => "php",
        "java" => "java",
        "c" => "c",
        "cpp" => "cpp",
        "cs" => "csharp",
        "go" => "go",
        "rs" => "rust",
        "rb" => "ruby",
        "swift" => "swift",
        "kt" => "kotlin",
        _ => "plaintext",
    }
}
