//! 압축 파일 카탈로그 모델
//!
//! 스캔 한 번으로 만들어지고 다음 스캔에서 통째로 교체되는 불변 목록

use crate::utils::glob;
use std::path::{Component, Path, PathBuf};

/// 사이드카 메타데이터 적용 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetadataStatus {
    /// 사이드카 파일 없음
    #[default]
    Absent,
    /// 사이드카 파일을 읽어 적용함
    Applied,
    /// 사이드카 파일이 있었지만 해석 실패로 무시함
    Rejected,
}

/// 디렉토리 한 단계짜리 이름인지 (`.`, `..`, 구분자, 빈 문자열 불가)
///
/// 항목 이름은 작업 디렉토리 아래 대상 디렉토리 이름으로 그대로 쓰인다.
pub fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// 압축 파일 한 개의 카탈로그 항목
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveRecord {
    /// 압축 파일 절대 경로
    pub filepath: PathBuf,
    /// 바로 위 디렉토리 이름 (그룹 표시용)
    pub folder_name: String,
    /// 확장자를 뗀 파일 이름 (비어 있지 않음)
    pub name: String,
    /// 설명
    pub description: String,
    /// OS 태그
    pub os: String,
    /// 메타데이터 적용 결과
    pub metadata_status: MetadataStatus,
}

impl ArchiveRecord {
    /// 메타데이터 없이 기본값으로 생성
    pub fn new(filepath: PathBuf, folder_name: String, name: String) -> Self {
        Self {
            filepath,
            folder_name,
            name,
            description: String::new(),
            os: String::new(),
            metadata_status: MetadataStatus::Absent,
        }
    }

    /// 메타데이터 적용 여부
    pub fn metadata_applied(&self) -> bool {
        self.metadata_status == MetadataStatus::Applied
    }

    /// 검색어 일치 여부 (대소문자 무시)
    ///
    /// 와일드카드가 있으면 이름 전체에 글로브 매칭, 없으면
    /// 이름/폴더/설명/OS 중 하나에 부분 문자열로 포함되는지 확인한다.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() {
            return true;
        }
        if glob::is_glob_pattern(query) {
            return glob::glob_match(query, &self.name);
        }
        let needle = query.to_lowercase();
        [&self.name, &self.folder_name, &self.description, &self.os]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// 정렬된 카탈로그
///
/// 인덱스는 다음 스캔 전까지만 유효하다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    records: Vec<ArchiveRecord>,
}

impl Catalog {
    pub fn new(records: Vec<ArchiveRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ArchiveRecord> {
        self.records.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ArchiveRecord> {
        self.records.iter()
    }

    /// 검색어에 맞는 항목의 인덱스 (카탈로그 순서 유지)
    pub fn filter(&self, query: &str) -> Vec<usize> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, record)| record.matches(query))
            .map(|(index, _)| index)
            .collect()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a ArchiveRecord;
    type IntoIter = std::slice::Iter<'a, ArchiveRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_name_is_single_normal_component() {
        assert!(is_plain_name("putty"));
        assert!(is_plain_name("..."));
        assert!(is_plain_name(".hidden"));
        assert!(!is_plain_name(""));
        assert!(!is_plain_name("."));
        assert!(!is_plain_name(".."));
        assert!(!is_plain_name("a/b"));
        assert!(!is_plain_name("/abs"));
    }

    fn record(name: &str, folder: &str, description: &str) -> ArchiveRecord {
        let mut record = ArchiveRecord::new(
            PathBuf::from(format!("/tools/{}/{}.zip", folder, name)),
            folder.to_string(),
            name.to_string(),
        );
        record.description = description.to_string();
        record
    }

    #[test]
    fn test_new_record_has_empty_metadata() {
        let record = ArchiveRecord::new(
            PathBuf::from("/tools/net/putty.zip"),
            "net".to_string(),
            "putty".to_string(),
        );
        assert_eq!(record.description, "");
        assert_eq!(record.os, "");
        assert_eq!(record.metadata_status, MetadataStatus::Absent);
        assert!(!record.metadata_applied());
    }

    #[test]
    fn test_catalog_filter_keeps_order() {
        let catalog = Catalog::new(vec![
            record("putty", "net", "SSH client"),
            record("7zip", "archive", "File archiver"),
            record("winscp", "net", "SFTP client"),
        ]);

        assert_eq!(catalog.filter(""), vec![0, 1, 2]);
        assert_eq!(catalog.filter("NET"), vec![0, 2]);
        assert_eq!(catalog.filter("archiver"), vec![1]);
        assert!(catalog.filter("nothing-matches").is_empty());
        assert_eq!(catalog.filter("*scp"), vec![2]);
        assert_eq!(catalog.filter("?zip"), vec![1]);
    }

    #[test]
    fn test_catalog_accessors() {
        let catalog = Catalog::new(vec![record("a", "x", "")]);
        assert_eq!(catalog.len(), 1);
        assert!(!catalog.is_empty());
        assert_eq!(catalog.get(0).map(|r| r.name.as_str()), Some("a"));
        assert!(catalog.get(1).is_none());
        assert_eq!((&catalog).into_iter().count(), 1);
        assert!(Catalog::default().is_empty());
    }
}
