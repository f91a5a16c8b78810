// Command bar component - 하단 커맨드 바 컴포넌트
//
// 단축키 안내 표시

use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// 커맨드 항목
#[derive(Debug, Clone)]
pub struct CommandItem {
    /// 단축키
    pub key: String,
    /// 레이블
    pub label: String,
    /// 활성화 여부
    pub enabled: bool,
}

impl CommandItem {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            enabled: true,
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// 커맨드 바 컴포넌트
pub struct CommandBar {
    commands: Vec<CommandItem>,
    bg_color: Color,
    key_fg_color: Color,
    label_fg_color: Color,
    disabled_color: Color,
}

impl Default for CommandBar {
    fn default() -> Self {
        let theme = Theme::default();
        Self {
            commands: Self::browse_commands(false, false),
            bg_color: theme.bar_bg,
            key_fg_color: theme.accent,
            label_fg_color: theme.bar_fg,
            disabled_color: theme.muted,
        }
    }
}

impl CommandBar {
    pub fn new() -> Self {
        Self::default()
    }

    /// 목록 탐색 중 단축키
    pub fn browse_commands(has_selection: bool, has_jobs: bool) -> Vec<CommandItem> {
        vec![
            CommandItem::new("Enter", "Extract").enabled(has_selection),
            CommandItem::new("o", "Open-after"),
            CommandItem::new("/", "Search"),
            CommandItem::new("r", "Rescan"),
            CommandItem::new("c", "Cancel").enabled(has_jobs),
            CommandItem::new("q", "Quit"),
        ]
    }

    /// 검색어 입력 중 단축키
    pub fn search_commands() -> Vec<CommandItem> {
        vec![
            CommandItem::new("Enter", "Apply"),
            CommandItem::new("Esc", "Clear"),
        ]
    }

    /// 다이얼로그 표시 중 단축키
    pub fn dialog_commands() -> Vec<CommandItem> {
        vec![CommandItem::new("Enter/Esc", "Close")]
    }

    pub fn commands(mut self, commands: Vec<CommandItem>) -> Self {
        self.commands = commands;
        self
    }

    /// 테마 적용
    pub fn theme(mut self, theme: &Theme) -> Self {
        self.bg_color = theme.bar_bg;
        self.key_fg_color = theme.accent;
        self.label_fg_color = theme.bar_fg;
        self.disabled_color = theme.muted;
        self
    }
}

impl Widget for CommandBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, Style::default().bg(self.bg_color));

        let mut spans = vec![Span::raw(" ")];
        for (i, cmd) in self.commands.iter().enumerate() {
            let (key_style, label_style) = if cmd.enabled {
                (
                    Style::default()
                        .fg(self.key_fg_color)
                        .add_modifier(Modifier::BOLD),
                    Style::default().fg(self.label_fg_color),
                )
            } else {
                (
                    Style::default().fg(self.disabled_color),
                    Style::default().fg(self.disabled_color),
                )
            };

            spans.push(Span::styled(cmd.key.as_str(), key_style));
            spans.push(Span::styled(":", label_style));
            spans.push(Span::styled(cmd.label.as_str(), label_style));

            if i + 1 < self.commands.len() {
                spans.push(Span::raw("  "));
            }
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
