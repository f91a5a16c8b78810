// Jobs panel component - 추출 작업 진행률 패널
//
// 작업마다 한 줄: 이름, 진행 게이지, 현재 항목

use crate::models::{ExtractionJob, JobState};
use crate::ui::layout::MAX_VISIBLE_JOBS;
use crate::ui::Theme;
use crate::utils::text::{fit_width, truncate_middle};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, Gauge, Widget},
};

const NAME_WIDTH: u16 = 18;
const GAUGE_WIDTH: u16 = 24;

/// 작업 진행률 패널
pub struct JobsPanel<'a> {
    jobs: &'a [&'a ExtractionJob],
    theme: Theme,
}

impl<'a> JobsPanel<'a> {
    pub fn new(jobs: &'a [&'a ExtractionJob]) -> Self {
        Self {
            jobs,
            theme: Theme::default(),
        }
    }

    pub fn theme(mut self, theme: &Theme) -> Self {
        self.theme = *theme;
        self
    }
}

/// 게이지 옆에 표시할 상태 문구
fn detail_text(job: &ExtractionJob) -> String {
    if job.is_cancel_requested() {
        return "cancelling...".to_string();
    }
    match job.state {
        JobState::Queued => "waiting...".to_string(),
        JobState::Running if job.current_item.is_empty() => "starting...".to_string(),
        JobState::Running => job.current_item.clone(),
    }
}

impl Widget for JobsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }

        let block = Block::default()
            .title(format!(" Extracting ({}) ", self.jobs.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border))
            .style(Style::default().bg(self.theme.bg));
        let inner = block.inner(area);
        block.render(area, buf);

        for (row, job) in self
            .jobs
            .iter()
            .take(MAX_VISIBLE_JOBS.min(inner.height as usize))
            .enumerate()
        {
            let line = Rect::new(inner.x, inner.y + row as u16, inner.width, 1);
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Length(NAME_WIDTH),
                    Constraint::Length(GAUGE_WIDTH),
                    Constraint::Min(0),
                ])
                .split(line);

            let name = format!("{} {}", job.id, job.record.name);
            buf.set_string(
                cols[0].x,
                cols[0].y,
                fit_width(&name, cols[0].width.saturating_sub(1) as usize),
                Style::default().fg(self.theme.fg),
            );

            Gauge::default()
                .ratio(job.percentage.min(100) as f64 / 100.0)
                .gauge_style(
                    Style::default()
                        .fg(self.theme.gauge_filled)
                        .bg(self.theme.gauge_unfilled),
                )
                .label(format!("{}%", job.percentage))
                .render(cols[1], buf);

            let width = cols[2].width.saturating_sub(1) as usize;
            buf.set_string(
                cols[2].x + 1,
                cols[2].y,
                truncate_middle(&detail_text(job), width),
                Style::default().fg(self.theme.muted),
            );
        }
    }
}
