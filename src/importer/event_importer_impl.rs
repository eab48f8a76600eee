// ==========================================
// 赛事数据导入 - 导入器实现
// ==========================================
// 流程: 读取配置 → 校验赛事 → 加载组别类型表 → 解析文件 → 逐行协调
// ==========================================

use crate::config::ImportConfigReader;
use crate::domain::{ImportMode, ImportStats, RawRow};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::event_importer_trait::{EventImporter, FileParser};
use crate::importer::import_coordinator::{ImportContext, ImportCoordinator};
use crate::repository::ImportRepository;
use async_trait::async_trait;
use std::path::Path;
use tracing::{error, info, instrument};

// ==========================================
// EventImporterImpl
// ==========================================
pub struct EventImporterImpl<R, C>
where
    R: ImportRepository,
    C: ImportConfigReader,
{
    // 数据访问层
    import_repo: R,

    // 配置读取器
    config: C,

    // 文件解析器
    file_parser: Box<dyn FileParser>,
}

impl<R, C> EventImporterImpl<R, C>
where
    R: ImportRepository,
    C: ImportConfigReader,
{
    pub fn new(import_repo: R, config: C, file_parser: Box<dyn FileParser>) -> Self {
        Self {
            import_repo,
            config,
            file_parser,
        }
    }

    pub fn repository(&self) -> &R {
        &self.import_repo
    }

    fn load_context(&self, event_id: &str, mode: ImportMode) -> ImportResult<ImportContext> {
        if self.import_repo.find_event(event_id)?.is_none() {
            return Err(ImportError::EventNotFound(event_id.to_string()));
        }
        let division_types = self.import_repo.load_division_types(event_id)?;
        Ok(ImportContext::new(event_id, division_types, mode))
    }
}

#[async_trait]
impl<R, C> EventImporter for EventImporterImpl<R, C>
where
    R: ImportRepository,
    C: ImportConfigReader,
{
    #[instrument(skip(self, rows), fields(rows = rows.len()))]
    async fn import_rows(
        &self,
        event_id: &str,
        rows: Vec<RawRow>,
        mode: ImportMode,
    ) -> ImportResult<ImportStats> {
        let config = self.config.load_import_config().await?;
        let ctx = self.load_context(event_id, mode)?;

        let coordinator = ImportCoordinator::new(&self.import_repo, &config);
        Ok(coordinator.run(&ctx, &rows))
    }

    async fn import_file<P: AsRef<Path> + Send>(
        &self,
        event_id: &str,
        file_path: P,
        mode: ImportMode,
    ) -> ImportResult<ImportStats> {
        let path = file_path.as_ref();
        info!(file = %path.display(), event_id, %mode, "开始导入文件");

        // 先校验赛事，避免无意义的文件解析
        self.load_context(event_id, mode)?;
        let rows = self.file_parser.parse_to_raw_rows(path)?;

        self.import_rows(event_id, rows, mode).await
    }

    async fn batch_import<P: AsRef<Path> + Send + Sync>(
        &self,
        event_id: &str,
        file_paths: Vec<P>,
        mode: ImportMode,
    ) -> ImportResult<Vec<Result<ImportStats, String>>> {
        use futures::future::join_all;

        info!(count = file_paths.len(), "开始批量导入文件");

        let import_tasks = file_paths.into_iter().map(|path| async move {
            let path_str = path.as_ref().display().to_string();
            match self.import_file(event_id, path, mode).await {
                Ok(stats) => {
                    info!(
                        file = %path_str,
                        entries = stats.entries,
                        errors = stats.errors.len(),
                        "文件导入成功"
                    );
                    Ok(stats)
                }
                Err(e) => {
                    error!(file = %path_str, error = %e, "文件导入失败");
                    Err(format!("文件 {} 导入失败: {}", path_str, e))
                }
            }
        });

        let results = join_all(import_tasks).await;

        info!(
            total = results.len(),
            success = results.iter().filter(|r| r.is_ok()).count(),
            failed = results.iter().filter(|r| r.is_err()).count(),
            "批量导入完成"
        );

        Ok(results)
    }
}
