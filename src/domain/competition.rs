// ==========================================
// 赛事数据导入 - 赛事领域模型
// ==========================================
// 层级: Event → Division → Participant → Entry
// 红线: 所有实体都归属于某一个 Event（由外部创建）
// 用途: 导入层写入,业务层只读
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Event - 赛事（根作用域）
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub event_id: String,
    pub name: String,
    pub template_id: Option<String>, // 赛事模板（提供组别类型表）
    pub created_at: DateTime<Utc>,
}

// ==========================================
// DivisionTypeRule - 组别类型规则
// ==========================================
// 例: { code: "K", name: "Kids" }
// code 为组别代码的首字符前缀
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivisionTypeRule {
    pub code: String,
    pub name: String,
}

impl DivisionTypeRule {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// 组别类型表（有序,首个匹配生效）
pub type DivisionTypeTable = Vec<DivisionTypeRule>;

// ==========================================
// EventTemplate - 赛事模板
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventTemplate {
    pub template_id: String,
    pub name: String,
    pub division_types: DivisionTypeTable,
}

// ==========================================
// Division - 组别
// ==========================================
// 约束: code 在同一赛事内唯一（code 非空时）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Division {
    pub division_id: String,
    pub event_id: String,
    pub code: Option<String>,
    pub name: String, // 派生: type + " " + code 去掉首字符
    #[serde(rename = "type")]
    pub division_type: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

// ==========================================
// Participant - 选手
// ==========================================
// 每行新建,不按姓名去重
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub participant_id: String,
    pub event_id: String,
    pub division_id: Option<String>,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

// ==========================================
// Entry - 参赛作品
// ==========================================
// 约束: entry_number 在同一赛事内唯一（只保证唯一,不保证连续）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub entry_id: String,
    pub event_id: String,
    pub division_id: Option<String>,
    pub participant_id: Option<String>,
    pub entry_number: i64,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

// ==========================================
// NewEntry - 待编号作品
// ==========================================
// 用途: 序号分配器的输入,编号成功后落库为 Entry
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub event_id: String,
    pub division_id: Option<String>,
    pub participant_id: Option<String>,
    pub name: String,
}

impl NewEntry {
    /// 按给定编号生成待落库的 Entry
    pub fn numbered(&self, entry_number: i64) -> Entry {
        Entry {
            entry_id: uuid::Uuid::new_v4().to_string(),
            event_id: self.event_id.clone(),
            division_id: self.division_id.clone(),
            participant_id: self.participant_id.clone(),
            entry_number,
            name: self.name.clone(),
            is_active: true,
            created_at: Utc::now(),
        }
    }
}
