//! 압축 해제 작업 모델
//!
//! 진행률 이벤트, 작업 결과 요약, 진행 중인 작업의 상태 스냅샷

use crate::models::archive_record::ArchiveRecord;
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 완료 신호로 쓰이는 current_path 값
pub const DONE_SENTINEL: &str = "done";

/// 진행률 이벤트
///
/// 진행률은 바이트가 아닌 엔트리 개수 기준의 근사값이다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    /// 0-100
    pub percentage: u8,
    /// 대상 디렉토리 기준 상대 경로, 완료 시 "done"
    pub current_path: String,
}

impl ProgressEvent {
    /// `index`번째(0부터) 엔트리 처리 시작 이벤트
    pub fn for_entry(index: usize, total_entries: usize, current_path: String) -> Self {
        Self {
            percentage: entry_percentage(index, total_entries),
            current_path,
        }
    }

    /// 정상 완료 신호
    pub fn done() -> Self {
        Self {
            percentage: 0,
            current_path: DONE_SENTINEL.to_string(),
        }
    }

    pub fn is_done(&self) -> bool {
        self.percentage == 0 && self.current_path == DONE_SENTINEL
    }
}

/// floor(index * 100 / total)
pub fn entry_percentage(index: usize, total_entries: usize) -> u8 {
    if total_entries == 0 {
        return 0;
    }
    let pct = (index as u128 * 100) / total_entries as u128;
    pct.min(100) as u8
}

/// 압축 해제 결과 요약
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionSummary {
    pub destination: PathBuf,
    pub total_entries: usize,
    pub entries_extracted: usize,
    pub cancelled: bool,
}

impl ExtractionSummary {
    pub(crate) fn new(destination: PathBuf, total_entries: usize) -> Self {
        Self {
            destination,
            total_entries,
            entries_extracted: 0,
            cancelled: false,
        }
    }
}

/// 스케줄러가 발급하는 작업 식별자
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 작업 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    /// 같은 대상 디렉토리의 앞선 작업을 기다리는 중
    Queued,
    /// 압축 해제 중
    Running,
}

/// 진행 중인 압축 해제 작업
#[derive(Debug, Clone)]
pub struct ExtractionJob {
    pub id: JobId,
    pub record: ArchiveRecord,
    pub destination: PathBuf,
    pub state: JobState,
    pub percentage: u8,
    pub current_item: String,
    /// 요청 시점의 "해제 후 폴더 열기" 설정
    pub open_when_done: bool,
    cancel_flag: Arc<AtomicBool>,
}

impl ExtractionJob {
    pub fn new(
        id: JobId,
        record: ArchiveRecord,
        destination: PathBuf,
        open_when_done: bool,
        cancel_flag: Arc<AtomicBool>,
    ) -> Self {
        Self {
            id,
            record,
            destination,
            state: JobState::Queued,
            percentage: 0,
            current_item: String::new(),
            open_when_done,
            cancel_flag,
        }
    }

    /// 진행률 이벤트 반영 (완료 신호는 상태를 바꾸지 않음)
    pub fn apply(&mut self, event: &ProgressEvent) {
        if event.is_done() {
            self.percentage = 100;
            return;
        }
        self.state = JobState::Running;
        self.percentage = event.percentage;
        self.current_item = event.current_path.clone();
    }

    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancel_requested(&self) -> bool {
        self.cancel_flag.load(Ordering::Relaxed)
    }
}
