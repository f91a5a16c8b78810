//! 설정 파일 로드
//!
//! 시작할 때 한 번 읽는 TOML 파일. 이후에는 읽기 전용이다.
//!
//! ```toml
//! [config]
//! root = "/srv/portable-apps"
//! tmp = "/tmp/toolshelf"
//! archive_extension = ".zip"
//! metadata_file_extension = ".ini"
//! open_folder_after_extract = true
//! ```

use crate::utils::error::{Result, ToolshelfError};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// 설정 파일 경로를 직접 지정하는 환경 변수
pub const CONFIG_ENV_VAR: &str = "TOOLSHELF_CONFIG";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const APP_DIR_NAME: &str = "toolshelf";

#[derive(Debug, Deserialize)]
struct ConfigFile {
    config: Config,
}

/// 애플리케이션 설정
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// 압축 파일을 찾을 루트 디렉토리
    pub root: PathBuf,
    /// 압축을 풀 작업 디렉토리
    pub tmp: PathBuf,
    #[serde(default = "default_archive_extension")]
    pub archive_extension: String,
    #[serde(default = "default_metadata_extension")]
    pub metadata_file_extension: String,
    #[serde(default)]
    pub open_folder_after_extract: bool,
}

fn default_archive_extension() -> String {
    ".zip".to_string()
}

fn default_metadata_extension() -> String {
    ".ini".to_string()
}

impl Config {
    /// TOML 문자열 파싱
    ///
    /// 상대 경로인 `root`/`tmp`는 `base_dir` 기준으로 바꾼다.
    pub fn from_toml_str(text: &str, source: &Path, base_dir: Option<&Path>) -> Result<Self> {
        let parsed: ConfigFile = toml::from_str(text).map_err(|e| ToolshelfError::Config {
            path: source.to_path_buf(),
            reason: e.message().to_string(),
        })?;
        let mut config = parsed.config;

        if config.archive_extension.is_empty() {
            return Err(ToolshelfError::Config {
                path: source.to_path_buf(),
                reason: "archive_extension must not be empty".to_string(),
            });
        }
        if config.metadata_file_extension.is_empty() {
            return Err(ToolshelfError::Config {
                path: source.to_path_buf(),
                reason: "metadata_file_extension must not be empty".to_string(),
            });
        }

        if let Some(base) = base_dir {
            config.root = resolve(base, &config.root);
            config.tmp = resolve(base, &config.tmp);
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| ToolshelfError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&text, path, path.parent())
    }

    /// 후보 경로를 차례로 확인해 첫 번째 설정 파일을 읽음
    pub fn load() -> Result<(Self, PathBuf)> {
        let candidates = candidate_paths(
            env::var_os(CONFIG_ENV_VAR).map(PathBuf::from),
            env::current_exe()
                .ok()
                .and_then(|exe| exe.parent().map(Path::to_path_buf)),
            dirs::config_dir(),
        );
        load_first(&candidates)
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// 설정 파일 후보 경로 (우선순위 순)
pub fn candidate_paths(
    env_override: Option<PathBuf>,
    exe_dir: Option<PathBuf>,
    config_dir: Option<PathBuf>,
) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(path) = env_override.filter(|p| !p.as_os_str().is_empty()) {
        paths.push(path);
    }
    if let Some(dir) = exe_dir {
        paths.push(dir.join(CONFIG_FILE_NAME));
    }
    if let Some(dir) = config_dir {
        paths.push(dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME));
    }
    paths
}

fn load_first(candidates: &[PathBuf]) -> Result<(Config, PathBuf)> {
    let Some(path) = candidates.iter().find(|p| p.is_file()) else {
        return Err(ToolshelfError::ConfigNotFound {
            searched: candidates.to_vec(),
        });
    };
    let config = Config::from_file(path)?;
    Ok((config, path.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let text = r#"
[config]
root = "/srv/apps"
tmp = "/tmp/toolshelf"
archive_extension = ".7z"
metadata_file_extension = ".meta"
open_folder_after_extract = true
"#;
        let config = Config::from_toml_str(text, Path::new("config.toml"), None).unwrap();
        assert_eq!(config.root, PathBuf::from("/srv/apps"));
        assert_eq!(config.tmp, PathBuf::from("/tmp/toolshelf"));
        assert_eq!(config.archive_extension, ".7z");
        assert_eq!(config.metadata_file_extension, ".meta");
        assert!(config.open_folder_after_extract);
    }

    #[test]
    fn test_defaults() {
        let text = "[config]\nroot = \"/srv/apps\"\ntmp = \"/tmp/x\"\n";
        let config = Config::from_toml_str(text, Path::new("config.toml"), None).unwrap();
        assert_eq!(config.archive_extension, ".zip");
        assert_eq!(config.metadata_file_extension, ".ini");
        assert!(!config.open_folder_after_extract);
    }

    #[test]
    fn test_missing_required_key_is_config_error() {
        let text = "[config]\nroot = \"/srv/apps\"\n";
        match Config::from_toml_str(text, Path::new("c.toml"), None) {
            Err(ToolshelfError::Config { path, reason }) => {
                assert_eq!(path, PathBuf::from("c.toml"));
                assert!(reason.contains("tmp"));
            }
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_extension_rejected() {
        let text = "[config]\nroot = \"/a\"\ntmp = \"/b\"\narchive_extension = \"\"\n";
        assert!(matches!(
            Config::from_toml_str(text, Path::new("c.toml"), None),
            Err(ToolshelfError::Config { .. })
        ));
    }

    #[test]
    fn test_relative_paths_resolve_against_config_dir() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[config]\nroot = \"apps\"\ntmp = \"/abs/tmp\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();

        assert_eq!(config.root, temp.path().join("apps"));
        assert_eq!(config.tmp, PathBuf::from("/abs/tmp"));
    }

    #[test]
    fn test_candidate_order() {
        let paths = candidate_paths(
            Some(PathBuf::from("/env/custom.toml")),
            Some(PathBuf::from("/opt/toolshelf")),
            Some(PathBuf::from("/home/u/.config")),
        );
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/env/custom.toml"),
                PathBuf::from("/opt/toolshelf/config.toml"),
                PathBuf::from("/home/u/.config/toolshelf/config.toml"),
            ]
        );
        assert_eq!(candidate_paths(Some(PathBuf::new()), None, None), Vec::<PathBuf>::new());
    }

    #[test]
    fn test_load_first_existing_candidate() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.toml");
        let present = temp.path().join("present.toml");
        fs::write(&present, "[config]\nroot = \"/a\"\ntmp = \"/b\"\n").unwrap();

        let (config, path) = load_first(&[missing.clone(), present.clone()]).unwrap();
        assert_eq!(path, present);
        assert_eq!(config.root, PathBuf::from("/a"));

        match load_first(&[missing.clone()]) {
            Err(ToolshelfError::ConfigNotFound { searched }) => assert_eq!(searched, vec![missing]),
            other => panic!("expected ConfigNotFound, got {:?}", other),
        }
    }
}
