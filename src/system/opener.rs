//! 파일 탐색기로 폴더 열기

use crate::utils::error::{Result, ToolshelfError};
use std::path::Path;
use std::process::{Command, Stdio};

/// 플랫폼별 "폴더 열기" 명령
pub fn open_command() -> &'static str {
    if cfg!(target_os = "windows") {
        "explorer"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    }
}

/// OS 파일 탐색기로 디렉토리 열기 (완료를 기다리지 않음)
pub fn open_folder(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(ToolshelfError::ExternalOpenFailed {
            path: path.to_path_buf(),
            reason: "path does not exist".to_string(),
        });
    }

    let command = open_command();
    Command::new(command)
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| ToolshelfError::ExternalOpenFailed {
            path: path.to_path_buf(),
            reason: format!("{}: {}", command, e),
        })?;

    tracing::debug!(path = %path.display(), command, "opened folder");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_open_missing_path_fails_before_spawning() {
        let missing = PathBuf::from("/tmp/toolshelf-open-missing-1234567890");

        match open_folder(&missing) {
            Err(ToolshelfError::ExternalOpenFailed { path, reason }) => {
                assert_eq!(path, missing);
                assert!(reason.contains("does not exist"));
            }
            other => panic!("expected ExternalOpenFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_open_command_per_platform() {
        #[cfg(target_os = "macos")]
        assert_eq!(open_command(), "open");
        #[cfg(target_os = "windows")]
        assert_eq!(open_command(), "explorer");
        #[cfg(all(not(target_os = "macos"), not(target_os = "windows")))]
        assert_eq!(open_command(), "xdg-open");
    }
}
