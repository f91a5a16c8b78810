use crate::config::Config;
use crate::models::{ArchiveRecord, Catalog, ExtractionJob, ExtractionSummary};
use crate::system::{open_folder, scan, CatalogScan, ExtractionScheduler, SchedulerEvent};
use crate::ui::DialogKind;
use crate::utils::error::Result;
use std::path::Path;
use std::time::{Duration, Instant};

/// 토스트 메시지 표시 시간
const TOAST_DURATION: Duration = Duration::from_secs(3);

/// 해제 완료 후 폴더를 여는 함수
pub type FolderOpener = fn(&Path) -> Result<()>;

pub struct App {
    pub config: Config,
    pub catalog: Catalog,
    /// 검색어에 맞는 카탈로그 인덱스
    pub visible: Vec<usize>,
    /// 커서 위치 (visible 인덱스)
    pub selected: usize,
    pub scroll_offset: usize,
    /// 테이블에 보이는 데이터 행 수 (렌더링할 때 갱신)
    pub viewport_rows: usize,
    pub filter: String,
    pub filter_editing: bool,
    pub open_after_extract: bool,
    pub scheduler: ExtractionScheduler,
    pub dialog: Option<DialogKind>,
    toast_message: Option<(String, Instant)>,
    should_quit: bool,
    folder_opener: FolderOpener,
}

impl App {
    /// 설정으로 앱을 만들고 첫 스캔을 수행
    pub fn new(config: Config) -> Self {
        Self::with_opener(config, open_folder)
    }

    pub fn with_opener(config: Config, folder_opener: FolderOpener) -> Self {
        let scheduler = ExtractionScheduler::new(config.tmp.clone());
        let mut app = Self {
            open_after_extract: config.open_folder_after_extract,
            config,
            catalog: Catalog::default(),
            visible: Vec::new(),
            selected: 0,
            scroll_offset: 0,
            viewport_rows: 20,
            filter: String::new(),
            filter_editing: false,
            scheduler,
            dialog: None,
            toast_message: None,
            should_quit: false,
            folder_opener,
        };
        app.rescan();
        app
    }

    // === 카탈로그 ===

    /// 루트 디렉토리를 다시 스캔 (가능하면 커서 항목 유지)
    pub fn rescan(&mut self) {
        let selected_path = self.selected_record().map(|r| r.filepath.clone());

        let CatalogScan { catalog, issue } = scan(
            &self.config.root,
            &self.config.archive_extension,
            &self.config.metadata_file_extension,
        );
        self.catalog = catalog;
        if let Some(err) = issue {
            tracing::error!(error = %err, "catalog scan failed");
            self.dialog = Some(DialogKind::error("Archive root not found", err.to_string()));
        }

        self.refresh_visible();
        if let Some(path) = selected_path {
            let catalog = &self.catalog;
            if let Some(pos) = self
                .visible
                .iter()
                .position(|&i| catalog.get(i).is_some_and(|r| r.filepath == path))
            {
                self.selected = pos;
            }
        }
        self.adjust_scroll_offset();
    }

    /// 검색어를 다시 적용
    fn refresh_visible(&mut self) {
        self.visible = self.catalog.filter(&self.filter);
        if self.selected >= self.visible.len() {
            self.selected = self.visible.len().saturating_sub(1);
        }
        self.adjust_scroll_offset();
    }

    pub fn selected_record(&self) -> Option<&ArchiveRecord> {
        self.visible
            .get(self.selected)
            .and_then(|&index| self.catalog.get(index))
    }

    // === 커서 이동 ===

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.visible.len() {
            self.selected += 1;
            self.adjust_scroll_offset();
        }
    }

    pub fn select_prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.adjust_scroll_offset();
        }
    }

    pub fn page_down(&mut self) {
        let step = self.viewport_rows.max(1);
        self.selected = (self.selected + step).min(self.visible.len().saturating_sub(1));
        self.adjust_scroll_offset();
    }

    pub fn page_up(&mut self) {
        let step = self.viewport_rows.max(1);
        self.selected = self.selected.saturating_sub(step);
        self.adjust_scroll_offset();
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
        self.adjust_scroll_offset();
    }

    pub fn select_last(&mut self) {
        self.selected = self.visible.len().saturating_sub(1);
        self.adjust_scroll_offset();
    }

    /// 테이블 높이 갱신
    pub fn set_viewport_rows(&mut self, rows: usize) {
        self.viewport_rows = rows;
        self.adjust_scroll_offset();
    }

    /// 커서가 화면 안에 보이도록 스크롤 조정
    fn adjust_scroll_offset(&mut self) {
        let rows = self.viewport_rows.max(1);
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if self.selected >= self.scroll_offset + rows {
            self.scroll_offset = self.selected + 1 - rows;
        }
        let max_offset = self.visible.len().saturating_sub(rows);
        self.scroll_offset = self.scroll_offset.min(max_offset);
    }

    // === 검색 ===

    pub fn start_filter(&mut self) {
        self.filter_editing = true;
    }

    pub fn push_filter_char(&mut self, c: char) {
        self.filter.push(c);
        self.selected = 0;
        self.refresh_visible();
    }

    pub fn pop_filter_char(&mut self) {
        if self.filter.pop().is_some() {
            self.selected = 0;
            self.refresh_visible();
        }
    }

    /// 입력 종료 (검색어는 유지)
    pub fn finish_filter(&mut self) {
        self.filter_editing = false;
    }

    /// 입력 종료 후 검색어 삭제
    pub fn clear_filter(&mut self) {
        self.filter_editing = false;
        if !self.filter.is_empty() {
            self.filter.clear();
            self.refresh_visible();
        }
    }

    // === 압축 해제 ===

    pub fn toggle_open_after_extract(&mut self) {
        self.open_after_extract = !self.open_after_extract;
        let state = if self.open_after_extract { "on" } else { "off" };
        self.set_toast(&format!("Open folder after extract: {}", state));
    }

    /// 커서 항목 압축 해제 요청
    pub fn extract_selected(&mut self) {
        let Some(record) = self.selected_record().cloned() else {
            self.set_toast("No archive selected");
            return;
        };
        let name = record.name.clone();
        let job = self.scheduler.submit(record, self.open_after_extract);
        self.set_toast(&format!("Extracting {} ({})", name, job));
    }

    /// 가장 최근에 요청한 작업 취소
    pub fn cancel_latest_job(&mut self) {
        match self.scheduler.latest_job() {
            Some(job) => {
                self.scheduler.cancel(job);
                let name = self
                    .scheduler
                    .job(job)
                    .map(|j| j.record.name.clone())
                    .unwrap_or_default();
                self.set_toast(&format!("Cancel requested for {} {}", job, name));
            }
            None => self.set_toast("No extraction in progress"),
        }
    }

    /// 진행 중인 작업 (요청 순서)
    pub fn active_jobs(&self) -> Vec<&ExtractionJob> {
        self.scheduler.active_jobs().collect()
    }

    pub fn is_extracting(&self) -> bool {
        self.scheduler.has_active_jobs()
    }

    /// 스케줄러 이벤트 처리 (UI 스레드에서 호출)
    ///
    /// 이벤트가 하나라도 있었으면 true
    pub fn process_scheduler_events(&mut self) -> bool {
        let events = self.scheduler.poll();
        let changed = !events.is_empty();
        for event in events {
            tracing::trace!(job = %event.job_id(), "scheduler event");
            if let SchedulerEvent::Finished { job, result } = event {
                self.finish_extraction(job, result);
            }
        }
        changed
    }

    fn finish_extraction(&mut self, job: ExtractionJob, result: Result<ExtractionSummary>) {
        match result {
            Ok(summary) if summary.cancelled => {
                self.set_toast(&format!(
                    "Extraction cancelled: {} ({}/{} entries)",
                    job.record.name, summary.entries_extracted, summary.total_entries
                ));
            }
            Ok(summary) => {
                self.set_toast(&format!(
                    "Extracted {} to {}",
                    job.record.name,
                    summary.destination.display()
                ));
                if job.open_when_done {
                    if let Err(err) = (self.folder_opener)(&summary.destination) {
                        tracing::warn!(error = %err, "failed to open extracted folder");
                        self.dialog = Some(DialogKind::error("Open folder failed", err.to_string()));
                    }
                }
            }
            Err(err) => {
                let title = if err.is_extraction_error() {
                    "Extraction failed"
                } else {
                    "Error"
                };
                // 실패해도 이미 풀린 엔트리는 대상 디렉토리에 남는다
                self.dialog = Some(DialogKind::error(
                    title,
                    format!(
                        "{}\n\n{}\n\nDestination: {}",
                        job.record.name,
                        err,
                        job.destination.display()
                    ),
                ));
            }
        }
    }

    // === 다이얼로그 / 토스트 ===

    pub fn is_dialog_active(&self) -> bool {
        self.dialog.is_some()
    }

    pub fn close_dialog(&mut self) {
        self.dialog = None;
    }

    pub fn set_toast(&mut self, message: &str) {
        self.toast_message = Some((message.to_string(), Instant::now()));
    }

    /// 만료되지 않은 토스트 메시지
    pub fn toast_display(&self) -> Option<&str> {
        self.toast_message.as_ref().and_then(|(msg, time)| {
            if time.elapsed() < TOAST_DURATION {
                Some(msg.as_str())
            } else {
                None
            }
        })
    }

    // === 종료 ===

    /// 진행 중인 작업을 취소하고 끝날 때까지 기다린 뒤 종료 표시
    pub fn quit(&mut self) {
        if self.scheduler.has_active_jobs() {
            tracing::info!("cancelling running extractions before exit");
        }
        self.scheduler.shutdown();
        self.should_quit = true;
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}
