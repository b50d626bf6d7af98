use ratatui::style::Color;

/// Color slots used by the panels.
#[derive(Debug, Clone)]
pub struct Theme {
    pub accent: Color,
    pub secondary: Color,
    pub text: Color,
    pub text_muted: Color,
    pub surface: Color,
    pub selection_bg: Color,
    pub visual_select_bg: Color,
    pub cursor_line_bg: Color,
    pub line_number_fg: Color,
    pub user_fg: Color,
    pub assistant_fg: Color,
    pub success: Color,
    pub error: Color,
    pub warning: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Cyan,
            secondary: Color::Magenta,
            text: Color::White,
            text_muted: Color::DarkGray,
            surface: Color::Rgb(30, 30, 30),
            selection_bg: Color::Rgb(40, 40, 50),
            visual_select_bg: Color::Rgb(70, 50, 100),
            cursor_line_bg: Color::Rgb(35, 35, 45),
            line_number_fg: Color::Rgb(92, 99, 112),
            user_fg: Color::Rgb(97, 175, 239),
            assistant_fg: Color::Rgb(152, 195, 121),
            success: Color::Green,
            error: Color::Red,
            warning: Color::Yellow,
        }
    }
}
