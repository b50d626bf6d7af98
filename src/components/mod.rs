pub mod action_hud;
pub mod chat_panel;
pub mod context_bar;
pub mod editor;
pub mod explorer;
pub mod input_dialog;
pub mod repo_list;
pub mod text_input;

use ratatui::{layout::Rect, style::Style, Frame};

use crate::state::{AppState, FocusPanel};

/// Trait for renderable TUI components.
pub trait Component {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState);
}

/// Border style for a panel, highlighted when it has focus.
pub fn panel_border(state: &AppState, panel: FocusPanel) -> Style {
    if state.focus == panel {
        Style::default().fg(state.theme.accent)
    } else {
        Style::default().fg(state.theme.text_muted)
    }
}

/// First row to draw so that `selected` stays inside a list of `height` rows.
pub fn scroll_for(selected: usize, height: usize) -> usize {
    if height > 0 && selected >= height {
        selected - height + 1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_keeps_selection_on_screen() {
        assert_eq!(scroll_for(0, 5), 0);
        assert_eq!(scroll_for(4, 5), 0);
        assert_eq!(scroll_for(5, 5), 1);
        assert_eq!(scroll_for(12, 5), 8);
        assert_eq!(scroll_for(3, 0), 0);
    }
}
