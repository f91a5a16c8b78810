//! 사이드카 메타데이터 로더
//!
//! `tool.zip` 옆의 `tool.ini` 같은 파일에서 `[software]` 섹션의
//! `description`, `os` 값을 읽어 카탈로그 항목에 덧씌운다.
//! 메타데이터는 최선 노력(best-effort)이다: 파일이 없거나 깨져 있어도
//! 카탈로그 구성은 절대 실패하지 않으며, 결과는 `MetadataStatus`로만 드러난다.

use crate::models::{ArchiveRecord, MetadataStatus};
use crate::utils::error::{Result, ToolshelfError};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// 메타데이터를 읽는 섹션 이름
pub const METADATA_SECTION: &str = "software";

/// 섹션 이름 → (키 → 값)
pub type Sections = BTreeMap<String, BTreeMap<String, String>>;

/// 압축 파일 경로에서 사이드카 경로 계산
///
/// 파일 이름이 `archive_extension`으로 끝나면 그 부분을 `metadata_extension`으로
/// 바꾸고, 아니면 뒤에 붙인다.
pub fn sidecar_path(archive_path: &Path, archive_extension: &str, metadata_extension: &str) -> PathBuf {
    let file_name = archive_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = file_name
        .strip_suffix(archive_extension)
        .unwrap_or(&file_name);
    archive_path.with_file_name(format!("{}{}", stem, metadata_extension))
}

/// 사이드카 메타데이터를 항목에 적용
///
/// `name`은 절대 덮어쓰지 않는다. 해석 실패는 로그만 남기고 항목을 그대로 둔다.
pub fn apply_metadata(
    record: &mut ArchiveRecord,
    archive_extension: &str,
    metadata_extension: &str,
) -> MetadataStatus {
    let path = sidecar_path(&record.filepath, archive_extension, metadata_extension);
    if !path.is_file() {
        record.metadata_status = MetadataStatus::Absent;
        return record.metadata_status;
    }

    match read_sections(&path) {
        Ok(sections) => {
            if let Some(software) = sections.get(METADATA_SECTION) {
                if let Some(description) = software.get("description") {
                    record.description = description.clone();
                }
                if let Some(os) = software.get("os") {
                    record.os = os.clone();
                }
            }
            record.metadata_status = MetadataStatus::Applied;
        }
        Err(err) => {
            tracing::warn!(sidecar = %path.display(), error = %err, "ignoring unreadable metadata");
            record.metadata_status = MetadataStatus::Rejected;
        }
    }
    record.metadata_status
}

/// 사이드카 파일을 읽어 섹션 맵으로 변환
pub fn read_sections(path: &Path) -> Result<Sections> {
    let bytes = fs::read(path)?;
    let text = String::from_utf8(bytes).map_err(|_| ToolshelfError::MetadataParse {
        path: path.to_path_buf(),
        line: 0,
        reason: "not valid UTF-8".to_string(),
    })?;
    parse_sections(&text).map_err(|(line, reason)| ToolshelfError::MetadataParse {
        path: path.to_path_buf(),
        line,
        reason,
    })
}

/// `[섹션]` + `키 = 값` 형식 파싱
///
/// 실패 시 (줄 번호, 사유)를 반환한다.
pub fn parse_sections(text: &str) -> std::result::Result<Sections, (usize, String)> {
    let mut sections = Sections::new();
    let mut current_section: Option<String> = None;
    let mut last_key: Option<String> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let raw = if line_no == 1 {
            raw.trim_start_matches('\u{feff}')
        } else {
            raw
        };
        let line = raw.trim();

        if line.is_empty() {
            continue;
        }
        if line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        // 들여쓴 줄은 앞 값의 연속
        let indented = raw.starts_with(|c: char| c == ' ' || c == '\t');
        if indented {
            if let (Some(section), Some(key)) = (&current_section, &last_key) {
                if let Some(value) = sections
                    .get_mut(section)
                    .and_then(|entries| entries.get_mut(key))
                {
                    value.push('\n');
                    value.push_str(line);
                    continue;
                }
            }
        }

        if let Some(header) = line.strip_prefix('[') {
            let Some(name) = header.strip_suffix(']') else {
                return Err((line_no, format!("unterminated section header: {}", line)));
            };
            let name = name.trim().to_string();
            if sections.contains_key(&name) {
                return Err((line_no, format!("duplicate section [{}]", name)));
            }
            sections.insert(name.clone(), BTreeMap::new());
            current_section = Some(name);
            last_key = None;
            continue;
        }

        let Some(section) = &current_section else {
            return Err((line_no, "key outside of any section".to_string()));
        };

        let Some(split_at) = line.find(['=', ':']) else {
            return Err((line_no, format!("expected 'key = value', got: {}", line)));
        };
        let key = line[..split_at].trim().to_lowercase();
        let value = line[split_at + 1..].trim().to_string();
        if key.is_empty() {
            return Err((line_no, "empty key".to_string()));
        }

        let entries = sections.entry(section.clone()).or_default();
        if entries.contains_key(&key) {
            return Err((line_no, format!("duplicate key '{}' in [{}]", key, section)));
        }
        entries.insert(key.clone(), value);
        last_key = Some(key);
    }

    Ok(sections)
}
