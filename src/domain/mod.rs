// ==========================================
// 赛事数据导入 - 领域模型层
// ==========================================
// 职责: 定义赛事实体（组别/选手/作品）、导入中间结构与导入统计
// 红线: 不含数据访问逻辑,不含导入流程逻辑
// ==========================================

pub mod competition;
pub mod import;
pub mod types;

// 重导出核心类型
pub use competition::{
    Division, DivisionTypeRule, DivisionTypeTable, Entry, Event, EventTemplate, NewEntry,
    Participant,
};
pub use import::{CanonicalRow, ImportStats, RawCell, RawRow, RowOutcome, RowTally};
pub use types::ImportMode;
