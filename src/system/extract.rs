//! 압축 해제 작업
//!
//! 대상 디렉토리(`작업 루트 / 항목 이름`)가 이미 있으면 통째로 지운 뒤 다시 만들고,
//! 엔트리를 나열 순서대로 풀면서 엔트리마다 진행률 이벤트를 보낸다.
//! 실패하면 즉시 멈추며 이미 풀린 엔트리는 되돌리지 않는다.

use crate::models::{is_plain_name, ArchiveRecord, ExtractionSummary, ProgressEvent};
use crate::utils::error::{Result, ToolshelfError};
use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use zip::ZipArchive;

/// 한 압축 파일의 해제 작업
#[derive(Debug, Clone)]
pub struct ExtractionTask {
    record: ArchiveRecord,
    working_root: PathBuf,
    destination: PathBuf,
    cancel_flag: Arc<AtomicBool>,
}

impl ExtractionTask {
    pub fn new(record: ArchiveRecord, working_root: &Path) -> Self {
        let destination = destination_for(&record, working_root);
        Self {
            record,
            working_root: working_root.to_path_buf(),
            destination,
            cancel_flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// 외부에서 공유하는 취소 플래그 사용
    pub fn with_cancel_flag(mut self, cancel_flag: Arc<AtomicBool>) -> Self {
        self.cancel_flag = cancel_flag;
        self
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// 압축 해제 실행
    ///
    /// 엔트리마다 `on_progress`가 먼저 호출되고 그 다음 엔트리가 기록된다.
    /// 정상 완료 시 마지막으로 완료 신호(`ProgressEvent::done`)가 전달된다.
    /// 취소 요청은 엔트리 사이에서만 확인하며, 취소된 경우 완료 신호 없이
    /// `cancelled = true` 요약을 반환한다.
    pub fn run<F>(&self, mut on_progress: F) -> Result<ExtractionSummary>
    where
        F: FnMut(ProgressEvent),
    {
        let archive_path = &self.record.filepath;
        // 대상은 반드시 작업 디렉토리 바로 아래 한 단계여야 지울 수 있다
        if !is_plain_name(&self.record.name)
            || self.destination.parent() != Some(self.working_root.as_path())
        {
            tracing::warn!(
                archive = %archive_path.display(),
                destination = %self.destination.display(),
                "refusing destination outside working directory"
            );
            return Err(ToolshelfError::UnsafeDestination {
                path: self.destination.clone(),
            });
        }
        prepare_destination(&self.destination)?;

        let file = File::open(archive_path).map_err(|e| ToolshelfError::ArchiveOpenFailed {
            path: archive_path.clone(),
            reason: e.to_string(),
        })?;
        let mut archive = ZipArchive::new(file).map_err(|e| ToolshelfError::ArchiveOpenFailed {
            path: archive_path.clone(),
            reason: e.to_string(),
        })?;

        let total_entries = archive.len();
        let mut summary = ExtractionSummary::new(self.destination.clone(), total_entries);
        tracing::info!(
            archive = %archive_path.display(),
            destination = %self.destination.display(),
            entries = total_entries,
            "extraction started"
        );

        for index in 0..total_entries {
            if self.cancel_flag.load(Ordering::Relaxed) {
                summary.cancelled = true;
                tracing::info!(archive = %archive_path.display(), extracted = summary.entries_extracted, "extraction cancelled");
                return Ok(summary);
            }

            let mut entry = archive
                .by_index(index)
                .map_err(|e| ToolshelfError::ExtractFailed {
                    path: archive_path.clone(),
                    entry: format!("#{}", index),
                    reason: e.to_string(),
                })?;
            let entry_name = entry.name().to_string();
            let Some(relative) = sanitize_entry_path(&entry_name) else {
                return Err(ToolshelfError::UnsafeEntryPath {
                    path: archive_path.clone(),
                    entry: entry_name,
                });
            };

            on_progress(ProgressEvent::for_entry(
                index,
                total_entries,
                display_relative(&relative),
            ));
            tracing::trace!(entry = %entry_name, "extracting");

            // `./` 같은 엔트리는 대상 디렉토리 자체
            if relative.as_os_str().is_empty() {
                summary.entries_extracted += 1;
                continue;
            }

            let target = self.destination.join(&relative);
            let write_result = if entry.is_dir() {
                fs::create_dir_all(&target)
            } else {
                write_entry(&mut entry, &target)
            };
            write_result.map_err(|e| ToolshelfError::ExtractFailed {
                path: archive_path.clone(),
                entry: entry_name.clone(),
                reason: e.to_string(),
            })?;

            summary.entries_extracted += 1;
        }

        on_progress(ProgressEvent::done());
        tracing::info!(archive = %archive_path.display(), entries = summary.entries_extracted, "extraction finished");
        Ok(summary)
    }
}

/// 항목의 대상 디렉토리 경로
pub fn destination_for(record: &ArchiveRecord, working_root: &Path) -> PathBuf {
    working_root.join(&record.name)
}

/// 대상 디렉토리를 비우고 새로 만든다 (기존 내용은 복구 불가)
fn prepare_destination(destination: &Path) -> Result<()> {
    if destination.exists() {
        tracing::debug!(destination = %destination.display(), "removing previous extraction");
        if destination.is_dir() {
            fs::remove_dir_all(destination)?;
        } else {
            fs::remove_file(destination)?;
        }
    }
    fs::create_dir_all(destination)?;
    Ok(())
}

fn write_entry<R: io::Read>(entry: &mut R, target: &Path) -> io::Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut out = File::create(target)?;
    io::copy(entry, &mut out)?;
    Ok(())
}

/// 엔트리 이름을 대상 디렉토리 안의 상대 경로로 정리
///
/// 상위 디렉토리(`..`), 절대 경로, 드라이브 접두사가 섞이면 `None`.
/// `./`처럼 비는 경로는 대상 디렉토리 자체(빈 경로)가 된다.
fn sanitize_entry_path(name: &str) -> Option<PathBuf> {
    let normalized = name.replace('\\', "/");
    let mut clean = PathBuf::new();
    for comp in Path::new(&normalized).components() {
        match comp {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(clean)
}

fn display_relative(path: &Path) -> String {
    if path.as_os_str().is_empty() {
        return ".".to_string();
    }
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
