//! 압축 파일 카탈로그 스캔
//!
//! 루트 디렉토리를 위에서 아래로 순회하며 압축 파일을 찾는다.
//! 각 디렉토리에서는 파일을 먼저, 하위 디렉토리를 나중에 방문하고
//! 두 그룹 모두 자연 정렬 순서를 따른다. 파일 시스템은 읽기만 한다.

use crate::models::{is_plain_name, ArchiveRecord, Catalog};
use crate::system::metadata::apply_metadata;
use crate::utils::error::ToolshelfError;
use crate::utils::natural_sort::natural_cmp;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// 스캔 결과
///
/// 루트가 없으면 빈 카탈로그와 함께 `issue`에 `RootNotFound`가 담긴다.
#[derive(Debug)]
pub struct CatalogScan {
    pub catalog: Catalog,
    pub issue: Option<ToolshelfError>,
}

/// 루트 아래 압축 파일을 찾아 정렬된 카탈로그 생성
pub fn scan(root: &Path, archive_extension: &str, metadata_extension: &str) -> CatalogScan {
    if !root.is_dir() {
        tracing::warn!(root = %root.display(), "catalog root not found");
        return CatalogScan {
            catalog: Catalog::default(),
            issue: Some(ToolshelfError::RootNotFound {
                path: root.to_path_buf(),
            }),
        };
    }

    let root = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());
    let walker = WalkDir::new(&root)
        .follow_links(false)
        .sort_by(|a, b| {
            is_directory(a).cmp(&is_directory(b)).then_with(|| {
                natural_cmp(
                    &a.file_name().to_string_lossy(),
                    &b.file_name().to_string_lossy(),
                )
            })
        });

    let mut records = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable catalog entry");
                continue;
            }
        };
        if is_directory(&entry) || !entry.path().is_file() {
            continue;
        }
        if let Some(mut record) = build_record(entry.path(), archive_extension) {
            apply_metadata(&mut record, archive_extension, metadata_extension);
            records.push(record);
        }
    }

    let catalog = Catalog::new(records);
    tracing::info!(
        root = %root.display(),
        archives = catalog.len(),
        with_metadata = catalog.iter().filter(|r| r.metadata_applied()).count(),
        "catalog scan finished"
    );
    CatalogScan {
        catalog,
        issue: None,
    }
}

fn is_directory(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
}

/// 확장자가 일치하는 파일이면 기본 항목 생성
fn build_record(path: &Path, archive_extension: &str) -> Option<ArchiveRecord> {
    let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
        tracing::debug!(path = %path.display(), "skipping non UTF-8 file name");
        return None;
    };
    let name = file_name.strip_suffix(archive_extension)?;
    if name.is_empty() {
        tracing::debug!(path = %path.display(), "skipping archive with empty name");
        return None;
    }
    // `..zip`, `...zip` 같은 이름은 작업 디렉토리 밖을 가리킨다
    if !is_plain_name(name) {
        tracing::debug!(path = %path.display(), name, "skipping archive with non-plain name");
        return None;
    }

    let folder_name = path
        .parent()
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Some(ArchiveRecord::new(
        path.to_path_buf(),
        folder_name,
        name.to_string(),
    ))
}
