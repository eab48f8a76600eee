// ==========================================
// 赛事数据导入 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::import_config::ImportConfig;
use crate::importer::error::ImportResult;
use async_trait::async_trait;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）, ImportConfig（静态配置）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// 获取作品编号最大尝试次数
    ///
    /// # 默认值
    /// - 5
    async fn get_max_allocation_attempts(&self) -> ImportResult<u32>;

    /// 获取组别类型兜底值
    ///
    /// # 默认值
    /// - "Other"
    async fn get_default_division_type(&self) -> ImportResult<String>;

    /// 获取表头行数（用于计算错误信息中的展示行号）
    ///
    /// # 默认值
    /// - 1
    async fn get_header_rows(&self) -> ImportResult<usize>;

    /// 获取组别代码列名别名（按优先级）
    ///
    /// # 默认值
    /// - ["division"]
    async fn get_division_aliases(&self) -> ImportResult<Vec<String>>;

    /// 获取选手姓名列名别名（按优先级）
    ///
    /// # 默认值
    /// - ["participant", "chef", "name"]
    async fn get_participant_aliases(&self) -> ImportResult<Vec<String>>;

    /// 一次性读取完整导入配置
    async fn load_import_config(&self) -> ImportResult<ImportConfig> {
        Ok(ImportConfig {
            max_allocation_attempts: self.get_max_allocation_attempts().await?,
            default_division_type: self.get_default_division_type().await?,
            header_rows: self.get_header_rows().await?,
            division_aliases: self.get_division_aliases().await?,
            participant_aliases: self.get_participant_aliases().await?,
        })
    }
}
