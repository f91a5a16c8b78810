use ratatui::style::Color;

/// 색상 테마
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub border: Color,
    pub border_focused: Color,
    pub header_fg: Color,
    pub row_selected_fg: Color,
    pub row_selected_bg: Color,
    pub folder_fg: Color,
    pub muted: Color,
    pub bar_bg: Color,
    pub bar_fg: Color,
    pub accent: Color,
    pub gauge_filled: Color,
    pub gauge_unfilled: Color,
    pub warning: Color,
    pub error: Color,
    pub success: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            bg: Color::Rgb(30, 30, 30),
            fg: Color::Rgb(212, 212, 212),
            border: Color::Rgb(60, 60, 60),
            border_focused: Color::Rgb(0, 120, 212),
            header_fg: Color::Rgb(86, 156, 214),
            row_selected_fg: Color::Rgb(255, 255, 255),
            row_selected_bg: Color::Rgb(0, 120, 212),
            folder_fg: Color::Rgb(78, 201, 176),
            muted: Color::Rgb(100, 100, 100),
            bar_bg: Color::Rgb(37, 37, 38),
            bar_fg: Color::Rgb(212, 212, 212),
            accent: Color::Rgb(0, 120, 212),
            gauge_filled: Color::Rgb(0, 120, 212),
            gauge_unfilled: Color::Rgb(60, 60, 60),
            warning: Color::Rgb(255, 215, 0),
            error: Color::Rgb(244, 71, 71),
            success: Color::Rgb(106, 153, 85),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
