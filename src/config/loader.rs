//! `.ts-catalog.json` の読み込み

use std::io::ErrorKind;
use std::path::{
    Path,
    PathBuf,
};

use super::{
    CatalogSettings,
    ConfigError,
};

/// ワークスペースルートに置く設定ファイル名
pub const CONFIG_FILE_NAME: &str = ".ts-catalog.json";

/// 読み込んだ設定ファイル
#[derive(Debug)]
pub(super) struct ConfigFile {
    /// 設定ファイルのパス
    pub path: PathBuf,
    /// ファイルの内容（未検証）
    pub settings: CatalogSettings,
}

/// ワークスペースルートの設定ファイルを読む
///
/// ファイルがなければ `Ok(None)`。エラーにはファイルのパスが含まれる。
///
/// # Errors
/// - ファイル読み込みエラー
/// - JSON パースエラー
pub(super) fn read_config_file(workspace_root: &Path) -> Result<Option<ConfigFile>, ConfigError> {
    let path = workspace_root.join(CONFIG_FILE_NAME);

    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(error) if error.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "No configuration file");
            return Ok(None);
        }
        Err(source) => return Err(ConfigError::IoError { path, source }),
    };

    match serde_json::from_str(&content) {
        Ok(settings) => {
            tracing::debug!(path = %path.display(), "Configuration file read");
            Ok(Some(ConfigFile { path, settings }))
        }
        Err(source) => Err(ConfigError::ParseError { path, source }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::fs;

    use googletest::prelude::*;
    use rstest::*;
    use tempfile::TempDir;

    use super::*;
    use crate::catalog::LookupMode;

    #[fixture]
    fn workspace() -> TempDir {
        TempDir::new().unwrap()
    }

    #[rstest]
    fn test_read_config_file(workspace: TempDir) {
        fs::write(workspace.path().join(CONFIG_FILE_NAME), r#"{"lookupMode": "permissive"}"#)
            .unwrap();

        let file = read_config_file(workspace.path()).unwrap().unwrap();

        assert_eq!(file.path, workspace.path().join(CONFIG_FILE_NAME));
        assert_eq!(file.settings.lookup_mode, LookupMode::Permissive);
    }

    #[rstest]
    fn test_read_config_file_missing(workspace: TempDir) {
        assert!(read_config_file(workspace.path()).unwrap().is_none());
    }

    /// パースエラーはファイルのパスを示す
    #[rstest]
    #[case::not_json("invalid json")]
    #[case::unknown_level(r#"{"lint": {"unfinished": "loud"}}"#)]
    #[case::wrong_type(r#"{"indexing": {"numThreads": "four"}}"#)]
    fn test_read_config_file_parse_error(workspace: TempDir, #[case] content: &str) {
        fs::write(workspace.path().join(CONFIG_FILE_NAME), content).unwrap();

        let error = read_config_file(workspace.path()).unwrap_err();

        assert!(matches!(error, ConfigError::ParseError { .. }));
        assert_that!(error.to_string(), contains_substring(CONFIG_FILE_NAME));
    }

    #[rstest]
    fn test_read_config_file_directory_is_io_error(workspace: TempDir) {
        fs::create_dir(workspace.path().join(CONFIG_FILE_NAME)).unwrap();

        let error = read_config_file(workspace.path()).unwrap_err();

        assert!(matches!(error, ConfigError::IoError { .. }));
    }
}
