//! 다이얼로그 위젯
//!
//! 오류/안내 메시지를 화면 가운데에 띄우고 Enter/Esc로 닫는다.

use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

/// 다이얼로그 내부 좌우 패딩 (border 안쪽 여백)
const DIALOG_H_PADDING: u16 = 2;
/// 다이얼로그 내부 상단 패딩 (border 아래 여백)
const DIALOG_V_PADDING: u16 = 1;

const OK_LABEL: &str = "OK";

/// 다이얼로그 종류
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogKind {
    /// 에러 다이얼로그
    Error { title: String, message: String },
    /// 메시지 다이얼로그 (정보 표시)
    Message { title: String, message: String },
}

impl DialogKind {
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        DialogKind::Error {
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn message(title: impl Into<String>, message: impl Into<String>) -> Self {
        DialogKind::Message {
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            DialogKind::Error { title, .. } | DialogKind::Message { title, .. } => title,
        }
    }

    pub fn body(&self) -> &str {
        match self {
            DialogKind::Error { message, .. } | DialogKind::Message { message, .. } => message,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, DialogKind::Error { .. })
    }
}

/// 다이얼로그 위젯
pub struct Dialog<'a> {
    kind: &'a DialogKind,
    bg_color: Color,
    fg_color: Color,
    border_color: Color,
    title_color: Color,
    error_color: Color,
    button_fg: Color,
    button_bg: Color,
}

impl<'a> Dialog<'a> {
    pub fn new(kind: &'a DialogKind) -> Self {
        let theme = Theme::default();
        Self {
            kind,
            bg_color: theme.bar_bg,
            fg_color: theme.fg,
            border_color: theme.border_focused,
            title_color: theme.header_fg,
            error_color: theme.error,
            button_fg: theme.row_selected_fg,
            button_bg: theme.row_selected_bg,
        }
    }

    /// 테마 적용
    pub fn theme(mut self, theme: &Theme) -> Self {
        self.bg_color = theme.bar_bg;
        self.fg_color = theme.fg;
        self.border_color = theme.border_focused;
        self.title_color = theme.header_fg;
        self.error_color = theme.error;
        self.button_fg = theme.row_selected_fg;
        self.button_bg = theme.row_selected_bg;
        self
    }

    /// 화면 가운데 다이얼로그 영역 계산
    fn calculate_area(&self, screen: Rect) -> Rect {
        let sw = screen.width;
        let sh = screen.height;

        let width = 60u16.min(sw.saturating_sub(4)).max(30);
        let text_width = width.saturating_sub(DIALOG_H_PADDING * 2).max(1) as usize;
        // 줄바꿈을 고려한 대략적인 줄 수
        let lines: usize = self
            .kind
            .body()
            .lines()
            .map(|line| line.width().div_ceil(text_width).max(1))
            .sum::<usize>()
            .max(1);
        let height = (5 + lines as u16).max(6);

        let width = width.min(sw.saturating_sub(4));
        let height = height.min(sh.saturating_sub(4));

        Rect {
            x: screen.x + (sw.saturating_sub(width)) / 2,
            y: screen.y + (sh.saturating_sub(height)) / 2,
            width,
            height,
        }
    }
}

impl Widget for Dialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = self.calculate_area(area);
        if area.width < 4 || area.height < 4 {
            return;
        }
        Clear.render(area, buf);

        let accent = if self.kind.is_error() {
            self.error_color
        } else {
            self.border_color
        };
        let title_color = if self.kind.is_error() {
            self.error_color
        } else {
            self.title_color
        };

        Block::default()
            .title(format!(" {} ", self.kind.title()))
            .title_style(
                Style::default()
                    .fg(title_color)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_style(Style::default().fg(accent))
            .style(Style::default().bg(self.bg_color))
            .render(area, buf);

        let inner = Rect {
            x: area.x + DIALOG_H_PADDING,
            y: area.y + DIALOG_V_PADDING,
            width: area.width.saturating_sub(DIALOG_H_PADDING * 2),
            height: area.height.saturating_sub(DIALOG_V_PADDING + 3),
        };
        Paragraph::new(self.kind.body())
            .style(Style::default().fg(self.fg_color))
            .wrap(Wrap { trim: true })
            .render(inner, buf);

        // OK 버튼
        let label = format!(" {} ", OK_LABEL);
        let button_width = label.width() as u16;
        let button_x = area.x + (area.width.saturating_sub(button_width)) / 2;
        let button_y = area.y + area.height - 2;
        buf.set_string(
            button_x,
            button_y,
            label,
            Style::default()
                .fg(self.button_fg)
                .bg(self.button_bg)
                .add_modifier(Modifier::BOLD),
        );
    }
}
