use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolshelfError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error in {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("No configuration file found (searched: {})", display_paths(.searched))]
    ConfigNotFound { searched: Vec<PathBuf> },

    #[error("Root directory does not exist: {path}")]
    RootNotFound { path: PathBuf },

    #[error("Malformed metadata file {path} (line {line}): {reason}")]
    MetadataParse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Cannot open archive {path}: {reason}")]
    ArchiveOpenFailed { path: PathBuf, reason: String },

    #[error("Failed to extract '{entry}' from {path}: {reason}")]
    ExtractFailed {
        path: PathBuf,
        entry: String,
        reason: String,
    },

    #[error("Archive {path} contains an entry outside the destination: {entry}")]
    UnsafeEntryPath { path: PathBuf, entry: String },

    #[error("Refusing to extract outside the working directory: {path}")]
    UnsafeDestination { path: PathBuf },

    #[error("Cannot open {path}: {reason}")]
    ExternalOpenFailed { path: PathBuf, reason: String },

    #[error("Extraction worker for {archive} panicked")]
    WorkerPanicked { archive: PathBuf },
}

impl ToolshelfError {
    /// 압축 해제 단계에서 발생하는 오류인지 여부
    pub fn is_extraction_error(&self) -> bool {
        matches!(
            self,
            ToolshelfError::Io(_)
                | ToolshelfError::ArchiveOpenFailed { .. }
                | ToolshelfError::ExtractFailed { .. }
                | ToolshelfError::UnsafeEntryPath { .. }
                | ToolshelfError::UnsafeDestination { .. }
                | ToolshelfError::WorkerPanicked { .. }
        )
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, ToolshelfError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_lists_every_path() {
        let err = ToolshelfError::ConfigNotFound {
            searched: vec![PathBuf::from("/a/config.toml"), PathBuf::from("/b/config.toml")],
        };
        let text = err.to_string();
        assert!(text.contains("/a/config.toml"));
        assert!(text.contains("/b/config.toml"));
    }

    #[test]
    fn test_extraction_error_family() {
        let open = ToolshelfError::ArchiveOpenFailed {
            path: PathBuf::from("a.zip"),
            reason: "bad".to_string(),
        };
        let root = ToolshelfError::RootNotFound {
            path: PathBuf::from("/missing"),
        };
        let outside = ToolshelfError::UnsafeDestination {
            path: PathBuf::from("/work/.."),
        };
        assert!(open.is_extraction_error());
        assert!(outside.is_extraction_error());
        assert!(!root.is_extraction_error());
    }
}
