// Layout system - 화면 영역 계산
//
// 검색줄 | 압축 파일 테이블 | 작업 패널 | 상태바 | 커맨드바
// 터미널이 최소 크기보다 작으면 경고 화면만 표시

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// 최소 터미널 크기 상수
pub const MIN_WIDTH: u16 = 40;
pub const MIN_HEIGHT: u16 = 12;

/// 작업 패널에 동시에 보여줄 최대 작업 수
pub const MAX_VISIBLE_JOBS: usize = 4;

/// 레이아웃 모드
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    Normal,
    /// 터미널이 너무 작음
    TooSmall,
}

/// 레이아웃 영역
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutAreas {
    /// 검색어 입력줄
    pub search: Rect,
    /// 압축 파일 테이블
    pub table: Rect,
    /// 진행 중인 작업 패널 (작업이 없으면 높이 0)
    pub jobs: Rect,
    pub status_bar: Rect,
    pub command_bar: Rect,
    /// 경고 메시지 영역 (TooSmall 모드에서 사용)
    pub warning: Rect,
}

/// 터미널 크기에 따라 레이아웃 모드 결정
pub fn determine_mode(width: u16, height: u16) -> LayoutMode {
    if width < MIN_WIDTH || height < MIN_HEIGHT {
        LayoutMode::TooSmall
    } else {
        LayoutMode::Normal
    }
}

/// 레이아웃 영역 계산
pub fn calculate_areas(area: Rect, job_count: usize) -> (LayoutMode, LayoutAreas) {
    let mode = determine_mode(area.width, area.height);
    if mode == LayoutMode::TooSmall {
        return (
            mode,
            LayoutAreas {
                warning: area,
                ..Default::default()
            },
        );
    }

    // 작업 하나당 한 줄 + 테두리 두 줄
    let jobs_height = if job_count == 0 {
        0
    } else {
        job_count.min(MAX_VISIBLE_JOBS) as u16 + 2
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),           // 검색줄
            Constraint::Min(3),              // 테이블
            Constraint::Length(jobs_height), // 작업 패널
            Constraint::Length(1),           // 상태바
            Constraint::Length(1),           // 커맨드바
        ])
        .split(area);

    (
        mode,
        LayoutAreas {
            search: chunks[0],
            table: chunks[1],
            jobs: chunks[2],
            status_bar: chunks[3],
            command_bar: chunks[4],
            warning: Rect::default(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determine_mode() {
        assert_eq!(determine_mode(80, 24), LayoutMode::Normal);
        assert_eq!(determine_mode(40, 12), LayoutMode::Normal);
        assert_eq!(determine_mode(39, 24), LayoutMode::TooSmall);
        assert_eq!(determine_mode(80, 11), LayoutMode::TooSmall);
    }

    #[test]
    fn test_areas_without_jobs() {
        let (mode, areas) = calculate_areas(Rect::new(0, 0, 80, 24), 0);
        assert_eq!(mode, LayoutMode::Normal);
        assert_eq!(areas.search.height, 1);
        assert_eq!(areas.table.height, 21);
        assert_eq!(areas.jobs.height, 0);
        assert_eq!(areas.status_bar.y, 22);
        assert_eq!(areas.command_bar.y, 23);
    }

    #[test]
    fn test_jobs_panel_grows_up_to_limit() {
        let (_, areas) = calculate_areas(Rect::new(0, 0, 80, 24), 2);
        assert_eq!(areas.jobs.height, 4);

        let (_, areas) = calculate_areas(Rect::new(0, 0, 80, 24), 10);
        assert_eq!(areas.jobs.height, MAX_VISIBLE_JOBS as u16 + 2);
    }

    #[test]
    fn test_too_small_uses_whole_area_for_warning() {
        let area = Rect::new(0, 0, 30, 10);
        let (mode, areas) = calculate_areas(area, 0);
        assert_eq!(mode, LayoutMode::TooSmall);
        assert_eq!(areas.warning, area);
        assert_eq!(areas.table, Rect::default());
    }
}
