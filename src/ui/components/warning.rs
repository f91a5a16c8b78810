// Warning screen component - 경고 화면 컴포넌트
//
// 터미널이 너무 작을 때 표시되는 경고 화면

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::ui::layout::{MIN_HEIGHT, MIN_WIDTH};
use crate::ui::Theme;

/// 경고 화면 컴포넌트
pub struct WarningScreen {
    /// 현재 터미널 크기
    current_size: (u16, u16),
    theme: Theme,
}

impl WarningScreen {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            current_size: (width, height),
            theme: Theme::default(),
        }
    }

    pub fn theme(mut self, theme: &Theme) -> Self {
        self.theme = *theme;
        self
    }
}

impl Widget for WarningScreen {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let theme = self.theme;
        buf.set_style(area, Style::default().bg(theme.bg));

        let bold = |color| Style::default().fg(color).add_modifier(Modifier::BOLD);
        let lines = vec![
            Line::from(Span::styled("Terminal Too Small", bold(theme.warning))),
            Line::from(""),
            Line::from(vec![
                Span::styled("Current: ", Style::default().fg(theme.fg)),
                Span::styled(
                    format!("{}x{}", self.current_size.0, self.current_size.1),
                    bold(theme.error),
                ),
            ]),
            Line::from(vec![
                Span::styled("Required: ", Style::default().fg(theme.fg)),
                Span::styled(format!("{}x{}", MIN_WIDTH, MIN_HEIGHT), bold(theme.success)),
            ]),
        ];

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.warning))
            .style(Style::default().bg(theme.bg));

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false })
            .block(block)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_screen_shows_sizes() {
        let area = Rect::new(0, 0, 30, 8);
        let mut buf = Buffer::empty(area);
        WarningScreen::new(30, 8).render(area, &mut buf);

        let text: String = buf.content().iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("30x8"));
        assert!(text.contains(&format!("{}x{}", MIN_WIDTH, MIN_HEIGHT)));
    }
}
