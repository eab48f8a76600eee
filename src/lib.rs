// ==========================================
// 赛事数据导入 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 表格 → 组别 / 选手 / 作品 的导入与对账引擎
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 导入配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::ImportMode;

// 领域实体
pub use domain::{
    Division, DivisionTypeRule, DivisionTypeTable, Entry, Event, EventTemplate, ImportStats,
    Participant, RawRow,
};

// 导入
pub use importer::{EventImporter, EventImporterImpl, ImportCoordinator, ImportError};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "赛事数据导入";
