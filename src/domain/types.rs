// ==========================================
// 赛事数据导入 - 领域类型定义
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 导入模式 (Import Mode)
// ==========================================
// 控制本次导入创建哪些层级的实体
// 序列化格式: lowercase (与上传表单取值一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    #[default]
    Combined,     // 组别 + 选手 + 作品
    Participants, // 组别 + 选手
    Divisions,    // 仅组别
}

impl ImportMode {
    /// 是否创建选手
    pub fn creates_participants(&self) -> bool {
        !matches!(self, ImportMode::Divisions)
    }

    /// 是否创建作品
    pub fn creates_entries(&self) -> bool {
        matches!(self, ImportMode::Combined)
    }

    /// 宽松解析: 空值/未知取值回退为 Combined
    pub fn parse_or_default(value: Option<&str>) -> Self {
        value
            .and_then(|v| v.parse::<ImportMode>().ok())
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImportMode::Combined => "combined",
            ImportMode::Participants => "participants",
            ImportMode::Divisions => "divisions",
        }
    }
}

impl fmt::Display for ImportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ImportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "combined" => Ok(ImportMode::Combined),
            "participants" => Ok(ImportMode::Participants),
            "divisions" => Ok(ImportMode::Divisions),
            other => Err(format!("未知导入模式: {}", other)),
        }
    }
}
