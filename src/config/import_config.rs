// ==========================================
// 赛事数据导入 - 导入配置
// ==========================================
// 职责: 导入引擎的可调参数及默认值
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use crate::importer::error::ImportResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// 作品编号最大尝试次数
pub const DEFAULT_MAX_ALLOCATION_ATTEMPTS: u32 = 5;

/// 组别类型表无匹配时的兜底类型
pub const DEFAULT_DIVISION_TYPE: &str = "Other";

/// 表头行数（展示行号 = 数据行下标 + 1 + 表头行数）
pub const DEFAULT_HEADER_ROWS: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportConfig {
    pub max_allocation_attempts: u32,
    pub default_division_type: String,
    pub header_rows: usize,
    pub division_aliases: Vec<String>,    // 组别代码列名（按优先级）
    pub participant_aliases: Vec<String>, // 选手姓名列名（按优先级）
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_allocation_attempts: DEFAULT_MAX_ALLOCATION_ATTEMPTS,
            default_division_type: DEFAULT_DIVISION_TYPE.to_string(),
            header_rows: DEFAULT_HEADER_ROWS,
            division_aliases: vec!["division".to_string()],
            participant_aliases: vec![
                "participant".to_string(),
                "chef".to_string(),
                "name".to_string(),
            ],
        }
    }
}

// 静态配置直接作为配置读取器（测试与嵌入场景）
#[async_trait]
impl ImportConfigReader for ImportConfig {
    async fn get_max_allocation_attempts(&self) -> ImportResult<u32> {
        Ok(self.max_allocation_attempts)
    }

    async fn get_default_division_type(&self) -> ImportResult<String> {
        Ok(self.default_division_type.clone())
    }

    async fn get_header_rows(&self) -> ImportResult<usize> {
        Ok(self.header_rows)
    }

    async fn get_division_aliases(&self) -> ImportResult<Vec<String>> {
        Ok(self.division_aliases.clone())
    }

    async fn get_participant_aliases(&self) -> ImportResult<Vec<String>> {
        Ok(self.participant_aliases.clone())
    }
}
