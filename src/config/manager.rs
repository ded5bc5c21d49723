//! 設定の読み込みとコマンドラインによる上書き

use std::path::Path;

use super::{
    CatalogSettings,
    ConfigError,
    loader,
};
use crate::catalog::LookupMode;

/// 設定ファイルより優先されるコマンドラインの指定
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsOverrides {
    /// `lookup --permissive`
    pub lookup_mode: Option<LookupMode>,
    /// `--threads`
    pub num_threads: Option<usize>,
}

impl SettingsOverrides {
    /// Writes the given values over `settings`.
    fn apply_to(self, settings: &mut CatalogSettings) {
        if let Some(mode) = self.lookup_mode {
            settings.lookup_mode = mode;
        }
        if let Some(threads) = self.num_threads {
            settings.indexing.num_threads = Some(threads);
        }
    }
}

/// 検証済みの設定を保持する
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// 現在の設定
    current_settings: CatalogSettings,
}

impl ConfigManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// ワークスペースの `.ts-catalog.json` を読み込む
    ///
    /// ファイルがない場合はデフォルト設定。失敗した場合、現在の設定は変わらない。
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー
    pub fn load_settings(&mut self, workspace_root: &Path) -> Result<(), ConfigError> {
        let settings = match loader::read_config_file(workspace_root)? {
            Some(file) => {
                tracing::debug!(
                    path = %file.path.display(),
                    settings = ?file.settings,
                    "Using workspace settings"
                );
                file.settings
            }
            None => CatalogSettings::default(),
        };

        self.replace_settings(settings)
    }

    /// コマンドラインの指定で上書きする
    ///
    /// 上書き後の設定も検証される。
    ///
    /// # Errors
    /// - バリデーションエラー（例: `--threads 0`）
    pub fn apply_overrides(&mut self, overrides: SettingsOverrides) -> Result<(), ConfigError> {
        if overrides == SettingsOverrides::default() {
            return Ok(());
        }

        let mut settings = self.current_settings.clone();
        overrides.apply_to(&mut settings);
        tracing::debug!(?overrides, "Applying command line overrides");
        self.replace_settings(settings)
    }

    /// 検証してから設定を差し替える
    fn replace_settings(&mut self, settings: CatalogSettings) -> Result<(), ConfigError> {
        settings.validate().map_err(ConfigError::ValidationErrors)?;
        self.current_settings = settings;
        Ok(())
    }

    /// 現在の設定を取得
    #[must_use]
    pub const fn get_settings(&self) -> &CatalogSettings {
        &self.current_settings
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use rstest::*;
    use tempfile::TempDir;

    use super::*;
    use crate::config::{
        CONFIG_FILE_NAME,
        RuleLevel,
    };

    #[fixture]
    fn workspace() -> TempDir {
        TempDir::new().unwrap()
    }

    fn write_config(workspace: &TempDir, content: &str) {
        fs::write(workspace.path().join(CONFIG_FILE_NAME), content).unwrap();
    }

    /// new: デフォルト値で作成される
    #[rstest]
    fn test_new_creates_default_settings() {
        let manager = ConfigManager::new();

        assert_eq!(manager.get_settings().lookup_mode, LookupMode::Strict);
        assert_eq!(manager.get_settings().indexing.num_threads, None);
    }

    /// load_settings: 設定ファイルがある場合
    #[rstest]
    fn test_load_settings_with_config_file(workspace: TempDir) {
        write_config(&workspace, r#"{"lint": {"unfinished": "error"}}"#);

        let mut manager = ConfigManager::new();
        manager.load_settings(workspace.path()).unwrap();

        assert_eq!(manager.get_settings().lint.unfinished, RuleLevel::Error);
    }

    /// load_settings: 設定ファイルがない場合はデフォルト値
    #[rstest]
    fn test_load_settings_without_config_file(workspace: TempDir) {
        let mut manager = ConfigManager::new();
        manager.load_settings(workspace.path()).unwrap();

        assert_eq!(manager.get_settings().lint.unfinished, RuleLevel::Info);
    }

    /// load_settings: 無効な設定ファイルはエラーで、現在の設定は残る
    #[rstest]
    fn test_load_settings_with_invalid_config_file(workspace: TempDir) {
        let mut manager = ConfigManager::new();
        let overrides = SettingsOverrides { num_threads: Some(3), ..SettingsOverrides::default() };
        manager.apply_overrides(overrides).unwrap();
        write_config(&workspace, r#"{"translationFiles": {"includePatterns": []}}"#);

        let result = manager.load_settings(workspace.path());

        assert!(matches!(result, Err(ConfigError::ValidationErrors(_))));
        assert_eq!(manager.get_settings().indexing.num_threads, Some(3));
    }

    /// apply_overrides: コマンドラインが設定ファイルより優先される
    #[rstest]
    fn test_overrides_take_precedence_over_config_file(workspace: TempDir) {
        write_config(&workspace, r#"{"lookupMode": "strict", "indexing": {"numThreads": 2}}"#);
        let mut manager = ConfigManager::new();
        manager.load_settings(workspace.path()).unwrap();

        manager
            .apply_overrides(SettingsOverrides {
                lookup_mode: Some(LookupMode::Permissive),
                num_threads: None,
            })
            .unwrap();

        assert_eq!(manager.get_settings().lookup_mode, LookupMode::Permissive);
        assert_eq!(manager.get_settings().indexing.num_threads, Some(2));
    }

    /// apply_overrides: 無効な上書きはエラーで、現在の設定は残る
    #[rstest]
    fn test_invalid_override_is_rejected() {
        let mut manager = ConfigManager::new();

        let result = manager.apply_overrides(SettingsOverrides {
            lookup_mode: Some(LookupMode::Permissive),
            num_threads: Some(0),
        });

        assert!(matches!(result, Err(ConfigError::ValidationErrors(_))));
        assert_eq!(manager.get_settings().lookup_mode, LookupMode::Strict);
    }
}
