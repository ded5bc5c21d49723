//! Workspace indexer: finds `.ts` catalogs and loads them concurrently.
use std::path::{
    Path,
    PathBuf,
};
use std::sync::Arc;

use ignore::WalkBuilder;
use tokio::sync::Semaphore;

use crate::catalog::{
    CatalogError,
    detect_language,
    parse_catalog,
};
use crate::config::{
    ConfigManager,
    FileMatcher,
};
use crate::indexer::types::{
    IndexerError,
    LoadFailure,
    LoadedCatalog,
    WorkspaceIndex,
};

/// Outcome of loading a single file.
enum FileOutcome {
    /// Parsed successfully
    Loaded(LoadedCatalog),
    /// Unreadable or malformed
    Failed(LoadFailure),
    /// A `.ts` file that is not XML (e.g. a TypeScript source).
    Skipped,
}

/// ワークスペース内のカタログを読み込むインデクサー
#[derive(Clone, Debug)]
pub struct WorkspaceIndexer {
    /// 同時に解析するファイル数の上限
    limit: Arc<Semaphore>,
}

impl WorkspaceIndexer {
    /// 新しいインデクサーを作成
    #[must_use]
    pub fn new(num_threads: usize) -> Self {
        Self { limit: Arc::new(Semaphore::new(num_threads.max(1))) }
    }

    /// ワークスペースをインデックス
    ///
    /// # Errors
    /// - ワークスペースのパスがディレクトリでない
    /// - 設定のパターンが不正
    /// - 読み込みタスクの失敗
    pub async fn index_workspace(
        &self,
        workspace_path: &Path,
        config_manager: &ConfigManager,
    ) -> Result<WorkspaceIndex, IndexerError> {
        tracing::debug!(workspace_path = %workspace_path.display(), "Indexing workspace");
        if !workspace_path.is_dir() {
            return Err(IndexerError::InvalidPath(workspace_path.display().to_string()));
        }

        let matcher = FileMatcher::new(workspace_path.to_path_buf(), config_manager.get_settings())?;
        let files = Self::find_catalog_files(&matcher);
        tracing::debug!(count = files.len(), "Found catalog candidates");

        self.load(files, true).await
    }

    /// 指定されたファイルを読み込む
    ///
    /// Unlike workspace discovery, every named file must be a catalog.
    ///
    /// # Errors
    /// 読み込みタスクの失敗
    pub async fn load_paths(&self, paths: Vec<PathBuf>) -> Result<WorkspaceIndex, IndexerError> {
        self.load(paths, false).await
    }

    /// 並列処理でファイルを読み込む
    async fn load(&self, files: Vec<PathBuf>, sniff: bool) -> Result<WorkspaceIndex, IndexerError> {
        let futures: Vec<_> = files.into_iter().map(|file| self.load_file(file, sniff)).collect();

        let mut index = WorkspaceIndex::default();
        for outcome in futures::future::join_all(futures).await {
            match outcome? {
                FileOutcome::Loaded(catalog) => index.catalogs.push(catalog),
                FileOutcome::Failed(failure) => index.failures.push(failure),
                FileOutcome::Skipped => {}
            }
        }

        index.catalogs.sort_by(|a, b| a.path.cmp(&b.path));
        index.failures.sort_by(|a, b| a.path.cmp(&b.path));
        tracing::debug!(
            loaded = index.catalogs.len(),
            failed = index.failures.len(),
            "Catalog loading finished"
        );
        Ok(index)
    }

    /// 単一ファイルを読み込む
    async fn load_file(&self, path: PathBuf, sniff: bool) -> Result<FileOutcome, IndexerError> {
        let _permit = self.limit.acquire().await?;

        // ファイル読み込みエラーは警告として扱い、処理を続行
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Failed to read file {:?}: {}", path, e);
                return Ok(FileOutcome::Failed(LoadFailure { path, error: CatalogError::Io(e) }));
            }
        };

        if sniff && !looks_like_xml(&content) {
            tracing::debug!("Skipping non-XML file {:?}", path);
            return Ok(FileOutcome::Skipped);
        }

        let parsed = tokio::task::spawn_blocking(move || parse_catalog(&content)).await?;
        match parsed {
            Ok(catalog) => {
                let language = detect_language(&catalog, &path);
                Ok(FileOutcome::Loaded(LoadedCatalog { path, language, catalog }))
            }
            Err(error) => {
                tracing::warn!("Failed to load catalog {:?}: {}", path, error);
                Ok(FileOutcome::Failed(LoadFailure { path, error }))
            }
        }
    }

    /// カタログファイルを検索
    fn find_catalog_files(matcher: &FileMatcher) -> Vec<PathBuf> {
        let workspace_path = matcher.workspace_root();
        let mut found_files = Vec::new();

        // ignore クレートでファイルを走査
        for result in WalkBuilder::new(workspace_path)
            .hidden(false)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .follow_links(false)
            .build()
        {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::debug!(?err, "Failed to read directory entry");
                    continue;
                }
            };

            // ファイルのみを対象
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let path = entry.path();
            if matcher.is_translation_file(path) {
                found_files.push(path.to_path_buf());
            }
        }

        found_files
    }
}

impl Default for WorkspaceIndexer {
    fn default() -> Self {
        Self::new(crate::config::IndexingConfig::default().effective_threads())
    }
}

/// XML 文書らしいかどうか（最初の非空白文字が `<`）
fn looks_like_xml(content: &str) -> bool {
    content.trim_start_matches('\u{feff}').trim_start().starts_with('<')
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::fs;

    use googletest::prelude::*;
    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;
    use crate::config::CONFIG_FILE_NAME;

    const CATALOG: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE TS>
<TS version="2.1">
<context>
    <name>EnableToolAction</name>
    <message>
        <source>Box tool</source>
        <translation>Bux tuul</translation>
    </message>
</context>
</TS>
"#;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn manager_for(root: &Path) -> ConfigManager {
        let mut manager = ConfigManager::new();
        manager.load_settings(root).unwrap();
        manager
    }

    #[rstest]
    #[case("<TS></TS>", true)]
    #[case("\u{feff}\n  <?xml version=\"1.0\"?>", true)]
    #[case("import { t } from './i18n';", false)]
    #[case("", false)]
    fn test_looks_like_xml(#[case] content: &str, #[case] expected: bool) {
        assert_eq!(looks_like_xml(content), expected);
    }

    #[tokio::test]
    async fn test_index_workspace_finds_catalogs() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "translations/visit_de.ts", CATALOG);
        write(root, "translations/visit_pirate.ts", CATALOG);
        write(root, "web/src/app.ts", "export const x = 1;\n");
        write(root, "node_modules/pkg/visit_fr.ts", CATALOG);
        write(root, "translations/visit_de.qm", "binary");

        let index =
            WorkspaceIndexer::new(2).index_workspace(root, &manager_for(root)).await.unwrap();

        let names: Vec<_> = index
            .catalogs
            .iter()
            .map(|c| c.path.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(names, vec!["translations/visit_de.ts", "translations/visit_pirate.ts"]);
        assert_that!(index.catalogs[0].language.as_deref(), some(eq("de")));
        assert_that!(index.catalogs[1].language, none());
        assert_that!(index.failures, is_empty());
    }

    #[tokio::test]
    async fn test_index_workspace_reports_malformed_catalogs() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "good_de.ts", CATALOG);
        write(root, "broken_fr.ts", "<TS><context><name>C</name></TS>");

        let index =
            WorkspaceIndexer::new(1).index_workspace(root, &manager_for(root)).await.unwrap();

        assert_that!(index.catalogs.len(), eq(1));
        assert_that!(index.failures.len(), eq(1));
        assert!(index.failures[0].path.ends_with("broken_fr.ts"));
        assert!(matches!(index.failures[0].error, CatalogError::Xml { .. }));
    }

    #[tokio::test]
    async fn test_index_workspace_honours_config_patterns() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "i18n/app_de.ts", CATALOG);
        write(root, "legacy/app_fr.ts", CATALOG);
        write(
            root,
            CONFIG_FILE_NAME,
            r#"{"translationFiles": {"includePatterns": ["i18n/**/*.ts"]}}"#,
        );

        let index =
            WorkspaceIndexer::new(1).index_workspace(root, &manager_for(root)).await.unwrap();

        assert_that!(index.catalogs.len(), eq(1));
        assert!(index.catalogs[0].path.ends_with("i18n/app_de.ts"));
    }

    #[tokio::test]
    async fn test_index_workspace_rejects_missing_root() {
        let result = WorkspaceIndexer::new(1)
            .index_workspace(Path::new("/nonexistent/workspace"), &ConfigManager::new())
            .await;

        assert!(matches!(result, Err(IndexerError::InvalidPath(_))));
    }

    #[tokio::test]
    async fn test_load_paths_does_not_skip_named_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "notes.ts", "not a catalog");
        write(root, "visit_de.ts", CATALOG);

        let index = WorkspaceIndexer::new(4)
            .load_paths(vec![root.join("visit_de.ts"), root.join("notes.ts"), root.join("missing.ts")])
            .await
            .unwrap();

        assert_that!(index.catalogs.len(), eq(1));
        assert_that!(index.failures.len(), eq(2));
        assert!(
            index
                .failures
                .iter()
                .any(|failure| matches!(failure.error, CatalogError::Io(_)))
        );
    }
}
