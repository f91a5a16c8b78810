// Search bar component - 검색어 입력줄

use crate::ui::Theme;
use crate::utils::text::truncate_middle;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

/// 검색어 입력줄
pub struct SearchBar<'a> {
    query: &'a str,
    editing: bool,
    root: &'a str,
    theme: Theme,
}

impl<'a> SearchBar<'a> {
    pub fn new(query: &'a str) -> Self {
        Self {
            query,
            editing: false,
            root: "",
            theme: Theme::default(),
        }
    }

    /// 입력 중 여부 (커서 표시)
    pub fn editing(mut self, editing: bool) -> Self {
        self.editing = editing;
        self
    }

    /// 오른쪽에 표시할 루트 디렉토리
    pub fn root(mut self, root: &'a str) -> Self {
        self.root = root;
        self
    }

    pub fn theme(mut self, theme: &Theme) -> Self {
        self.theme = *theme;
        self
    }

    fn query_text(&self) -> String {
        match (self.editing, self.query.is_empty()) {
            (true, _) => format!("{}_", self.query),
            (false, true) => "(press / to search)".to_string(),
            (false, false) => self.query.to_string(),
        }
    }
}

impl Widget for SearchBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, Style::default().bg(self.theme.bar_bg));

        let query_style = if self.editing {
            Style::default()
                .fg(self.theme.fg)
                .add_modifier(Modifier::BOLD)
        } else if self.query.is_empty() {
            Style::default().fg(self.theme.muted)
        } else {
            Style::default().fg(self.theme.warning)
        };

        let line = Line::from(vec![
            Span::styled(
                " Search: ",
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(self.query_text(), query_style),
        ]);
        Paragraph::new(line).render(area, buf);

        if !self.root.is_empty() {
            let root = truncate_middle(self.root, (area.width / 2) as usize);
            let width = root.width() as u16;
            let x = area.x + area.width.saturating_sub(width + 1);
            buf.set_string(x, area.y, root, Style::default().fg(self.theme.muted));
        }
    }
}
