// Status bar component - 상태바 컴포넌트
//
// 항목 개수, 추출 후 폴더 열기 체크박스, 알림 메시지 표시

use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

/// 상태바 컴포넌트
pub struct StatusBar<'a> {
    /// 카탈로그 전체 항목 수
    total_count: usize,
    /// 검색 결과 항목 수
    visible_count: usize,
    /// 진행 중인 작업 수
    active_jobs: usize,
    /// 추출 후 폴더 열기
    open_after_extract: bool,
    /// 잠깐 보여줄 알림 메시지
    toast: Option<&'a str>,
    bg_color: Color,
    fg_color: Color,
    accent_color: Color,
    muted_color: Color,
}

impl<'a> Default for StatusBar<'a> {
    fn default() -> Self {
        let theme = Theme::default();
        Self {
            total_count: 0,
            visible_count: 0,
            active_jobs: 0,
            open_after_extract: false,
            toast: None,
            bg_color: theme.bar_bg,
            fg_color: theme.bar_fg,
            accent_color: theme.warning,
            muted_color: theme.muted,
        }
    }
}

impl<'a> StatusBar<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 전체/표시 항목 수 설정
    pub fn counts(mut self, visible: usize, total: usize) -> Self {
        self.visible_count = visible;
        self.total_count = total;
        self
    }

    pub fn active_jobs(mut self, count: usize) -> Self {
        self.active_jobs = count;
        self
    }

    pub fn open_after_extract(mut self, enabled: bool) -> Self {
        self.open_after_extract = enabled;
        self
    }

    pub fn toast(mut self, message: Option<&'a str>) -> Self {
        self.toast = message;
        self
    }

    /// 테마 적용
    pub fn theme(mut self, theme: &Theme) -> Self {
        self.bg_color = theme.bar_bg;
        self.fg_color = theme.bar_fg;
        self.accent_color = theme.warning;
        self.muted_color = theme.muted;
        self
    }

    fn left_text(&self) -> String {
        let mut text = if self.visible_count == self.total_count {
            format!(" {} archives", self.total_count)
        } else {
            format!(" {} of {} archives", self.visible_count, self.total_count)
        };
        if self.active_jobs > 0 {
            text.push_str(&format!(" | {} extracting", self.active_jobs));
        }
        text
    }

    fn checkbox_text(&self) -> String {
        let mark = if self.open_after_extract { 'x' } else { ' ' };
        format!("[{}] Open after extract ", mark)
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, Style::default().bg(self.bg_color));

        let left = self.left_text();
        let toast = self.toast.map(|t| format!(" | {}", t)).unwrap_or_default();
        let right = self.checkbox_text();

        let used = left.width() + toast.width() + right.width();
        let padding = " ".repeat((area.width as usize).saturating_sub(used));

        let line = Line::from(vec![
            Span::styled(left, Style::default().fg(self.fg_color)),
            Span::styled(toast, Style::default().fg(self.accent_color)),
            Span::raw(padding),
            Span::styled(right, Style::default().fg(self.muted_color)),
        ]);
        Paragraph::new(line).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_bar_counts() {
        let bar = StatusBar::new().counts(12, 12);
        assert_eq!(bar.left_text(), " 12 archives");

        let bar = StatusBar::new().counts(3, 12).active_jobs(2);
        assert_eq!(bar.left_text(), " 3 of 12 archives | 2 extracting");
    }

    #[test]
    fn test_checkbox_state() {
        assert_eq!(
            StatusBar::new().open_after_extract(true).checkbox_text(),
            "[x] Open after extract "
        );
        assert_eq!(
            StatusBar::new().checkbox_text(),
            "[ ] Open after extract "
        );
    }

    #[test]
    fn test_render_includes_toast() {
        let area = Rect::new(0, 0, 80, 1);
        let mut buf = Buffer::empty(area);
        StatusBar::new()
            .counts(1, 1)
            .toast(Some("Extracted putty"))
            .render(area, &mut buf);

        let text: String = buf.content().iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("Extracted putty"));
        assert!(text.contains("Open after extract"));
    }
}
