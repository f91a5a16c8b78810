// Archive table component - 압축 파일 목록 테이블
//
// 이름 / 폴더 / OS / 설명 열, 커서 행 강조, 스크롤

use crate::models::Catalog;
use crate::ui::Theme;
use crate::utils::text::fit_width;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Widget},
};

/// 열 너비 비율 (이름, 폴더, OS). 설명은 나머지 폭을 쓴다.
const NAME_RATIO: u16 = 30;
const FOLDER_RATIO: u16 = 20;
const OS_RATIO: u16 = 10;

/// 압축 파일 테이블 컴포넌트
pub struct ArchiveTable<'a> {
    catalog: &'a Catalog,
    /// 화면에 보이는 항목 (카탈로그 인덱스)
    visible: &'a [usize],
    /// 커서 위치 (visible 인덱스)
    selected: usize,
    scroll_offset: usize,
    focused: bool,
    theme: Theme,
}

impl<'a> ArchiveTable<'a> {
    pub fn new(catalog: &'a Catalog, visible: &'a [usize]) -> Self {
        Self {
            catalog,
            visible,
            selected: 0,
            scroll_offset: 0,
            focused: true,
            theme: Theme::default(),
        }
    }

    pub fn selected(mut self, selected: usize) -> Self {
        self.selected = selected;
        self
    }

    pub fn scroll_offset(mut self, offset: usize) -> Self {
        self.scroll_offset = offset;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn theme(mut self, theme: &Theme) -> Self {
        self.theme = *theme;
        self
    }

    /// 테두리와 헤더를 뺀 데이터 행 수
    pub fn body_height(area_height: u16) -> usize {
        area_height.saturating_sub(3) as usize
    }

    fn column_widths(width: u16) -> [usize; 4] {
        let name = (width * NAME_RATIO / 100) as usize;
        let folder = (width * FOLDER_RATIO / 100) as usize;
        let os = (width * OS_RATIO / 100) as usize;
        // 열 사이 공백 3칸
        let description = (width as usize).saturating_sub(name + folder + os + 3);
        [name, folder, os, description]
    }

    fn format_row(cells: [&str; 4], widths: [usize; 4]) -> String {
        cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, width)| fit_width(cell, *width))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Widget for ArchiveTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_color = if self.focused {
            self.theme.border_focused
        } else {
            self.theme.border
        };
        let title = format!(" Archives ({}/{}) ", self.visible.len(), self.catalog.len());
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .style(Style::default().bg(self.theme.bg));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let widths = Self::column_widths(inner.width);
        let header = Self::format_row(["Name", "Folder", "OS", "Description"], widths);
        buf.set_string(
            inner.x,
            inner.y,
            header,
            Style::default()
                .fg(self.theme.header_fg)
                .add_modifier(Modifier::BOLD),
        );

        if self.visible.is_empty() {
            let message = if self.catalog.is_empty() {
                "No archives found"
            } else {
                "No archives match the filter"
            };
            if inner.height > 1 {
                buf.set_string(
                    inner.x + 1,
                    inner.y + 1,
                    message,
                    Style::default().fg(self.theme.muted),
                );
            }
            return;
        }

        let rows = inner.height.saturating_sub(1) as usize;
        for (row, (position, &catalog_index)) in self
            .visible
            .iter()
            .enumerate()
            .skip(self.scroll_offset)
            .take(rows)
            .enumerate()
        {
            let Some(record) = self.catalog.get(catalog_index) else {
                continue;
            };
            let y = inner.y + 1 + row as u16;
            let line = Self::format_row(
                [
                    &record.name,
                    &record.folder_name,
                    &record.os,
                    &record.description,
                ],
                widths,
            );
            let line = fit_width(&line, inner.width as usize);

            let style = if position == self.selected {
                Style::default()
                    .fg(self.theme.row_selected_fg)
                    .bg(self.theme.row_selected_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.fg)
            };
            buf.set_string(inner.x, y, line, style);

            if position != self.selected && widths[1] > 0 {
                let folder_x = inner.x + widths[0] as u16 + 1;
                buf.set_string(
                    folder_x,
                    y,
                    fit_width(&record.folder_name, widths[1]),
                    Style::default().fg(self.theme.folder_fg),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ArchiveRecord;
    use std::path::PathBuf;

    fn catalog() -> Catalog {
        let mut putty = ArchiveRecord::new(
            PathBuf::from("/tools/net/putty.zip"),
            "net".to_string(),
            "putty".to_string(),
        );
        putty.description = "SSH client".to_string();
        putty.os = "windows".to_string();
        let sevenzip = ArchiveRecord::new(
            PathBuf::from("/tools/archive/7zip.zip"),
            "archive".to_string(),
            "7zip".to_string(),
        );
        Catalog::new(vec![putty, sevenzip])
    }

    fn buffer_text(buf: &Buffer) -> String {
        let area = buf.area;
        let mut text = String::new();
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                text.push_str(buf[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_renders_rows_and_title() {
        let catalog = catalog();
        let visible = vec![0, 1];
        let area = Rect::new(0, 0, 80, 8);
        let mut buf = Buffer::empty(area);

        ArchiveTable::new(&catalog, &visible).render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("Archives (2/2)"));
        assert!(text.contains("Name"));
        assert!(text.contains("putty"));
        assert!(text.contains("SSH client"));
        assert!(text.contains("7zip"));
    }

    #[test]
    fn test_filtered_empty_message() {
        let catalog = catalog();
        let visible: Vec<usize> = Vec::new();
        let area = Rect::new(0, 0, 60, 6);
        let mut buf = Buffer::empty(area);

        ArchiveTable::new(&catalog, &visible).render(area, &mut buf);

        assert!(buffer_text(&buf).contains("No archives match the filter"));
    }

    #[test]
    fn test_column_widths_fill_row() {
        let widths = ArchiveTable::column_widths(100);
        assert_eq!(widths, [30, 20, 10, 37]);
        assert_eq!(widths.iter().sum::<usize>() + 3, 100);
        assert_eq!(ArchiveTable::body_height(10), 7);
    }
}
