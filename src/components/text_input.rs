use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::state::TextBuffer;

/// Render a text input that wraps and scrolls within the given area.
/// Supports embedded newlines. The cursor is drawn as a reversed cell.
pub fn render_text_input(frame: &mut Frame, area: Rect, buffer: &TextBuffer, style: Style) {
    if area.width < 3 || area.height == 0 {
        return;
    }

    // 1 char left padding, 1 char for the cursor at end of line
    let inner_width = (area.width as usize).saturating_sub(2);
    if inner_width == 0 {
        return;
    }

    let (lines, cursor_line, cursor_col) = layout(buffer, inner_width);
    let visible_height = area.height as usize;

    // Scroll so the cursor line is visible
    let scroll = if cursor_line >= visible_height {
        cursor_line - visible_height + 1
    } else {
        0
    };

    let display_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(scroll)
        .take(visible_height)
        .map(|(i, line_text)| {
            if i == cursor_line {
                let before: String = line_text.chars().take(cursor_col).collect();
                let at: String = line_text
                    .chars()
                    .nth(cursor_col)
                    .map(String::from)
                    .unwrap_or_else(|| " ".to_string());
                let after: String = line_text.chars().skip(cursor_col + 1).collect();
                Line::from(vec![
                    Span::styled(format!(" {before}"), style),
                    Span::styled(at, style.add_modifier(Modifier::REVERSED)),
                    Span::styled(after, style),
                ])
            } else {
                Line::from(Span::styled(format!(" {line_text}"), style))
            }
        })
        .collect();

    frame.render_widget(Paragraph::new(display_lines), area);
}

/// Wrap the buffer into display rows of at most `width` chars and locate
/// the cursor as (row, column).
fn layout(buffer: &TextBuffer, width: usize) -> (Vec<String>, usize, usize) {
    let cursor = buffer.cursor_char_index();
    let mut lines: Vec<String> = Vec::new();
    let mut cursor_pos = (0, 0);
    let mut offset = 0;

    // Split on real newlines first, then wrap each paragraph
    for paragraph in buffer.text().split('\n') {
        let chars: Vec<char> = paragraph.chars().collect();
        let mut start = 0;
        loop {
            let end = (start + width).min(chars.len());
            let row = lines.len();
            let is_last = end == chars.len();
            if cursor >= offset + start && (cursor < offset + end || (is_last && cursor <= offset + end)) {
                cursor_pos = (row, cursor - offset - start);
            }
            lines.push(chars[start..end].iter().collect());
            if is_last {
                break;
            }
            start = end;
        }
        offset += chars.len() + 1;
    }

    (lines, cursor_pos.0, cursor_pos.1)
}
