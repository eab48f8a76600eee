// ==========================================
// 赛事数据导入 - 导入器 Trait 定义
// ==========================================
// 职责: 定义导入门面与文件解析接口（不包含实现）
// ==========================================

use crate::domain::{ImportMode, ImportStats, RawRow};
use crate::importer::error::ImportResult;
use async_trait::async_trait;
use std::path::Path;

// ==========================================
// EventImporter Trait
// ==========================================
// 用途: 赛事数据导入主接口
// 实现者: EventImporterImpl
#[async_trait]
pub trait EventImporter: Send + Sync {
    /// 导入已解析的原始行
    ///
    /// # 参数
    /// - event_id: 目标赛事
    /// - rows: 原始行（不含表头）
    /// - mode: 导入模式
    ///
    /// # 返回
    /// - Ok(ImportStats): 行级错误都在 stats.errors 中
    /// - Err: 赛事不存在、配置错误等批次级错误
    async fn import_rows(
        &self,
        event_id: &str,
        rows: Vec<RawRow>,
        mode: ImportMode,
    ) -> ImportResult<ImportStats>;

    /// 从文件导入（.csv / .xlsx / .xls）
    async fn import_file<P: AsRef<Path> + Send>(
        &self,
        event_id: &str,
        file_path: P,
        mode: ImportMode,
    ) -> ImportResult<ImportStats>;

    /// 批量导入多个文件（并发执行）
    ///
    /// # 返回
    /// - Ok(Vec<Result<ImportStats, String>>): 与输入顺序一致的逐文件结果
    ///
    /// # 说明
    /// - 某个文件失败不影响其他文件
    async fn batch_import<P: AsRef<Path> + Send + Sync>(
        &self,
        event_id: &str,
        file_paths: Vec<P>,
        mode: ImportMode,
    ) -> ImportResult<Vec<Result<ImportStats, String>>>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 实现者: CsvParser, ExcelParser, UniversalFileParser
pub trait FileParser: Send + Sync {
    /// 解析文件为原始行（首行为表头，不计入结果）
    fn parse_to_raw_rows(&self, file_path: &Path) -> ImportResult<Vec<RawRow>>;
}
