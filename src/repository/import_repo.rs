// ==========================================
// 赛事数据导入 - 导入 Repository Trait
// ==========================================
// 职责: 定义导入流程所需的数据访问接口（不包含实现）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::domain::{Division, DivisionTypeTable, Entry, Event, Participant};
use crate::repository::error::RepositoryResult;

// ==========================================
// ImportRepository Trait
// ==========================================
// 用途: 导入引擎访问赛事实体的唯一入口
// 实现者: ImportRepositoryImpl（使用 rusqlite）
pub trait ImportRepository: Send + Sync {
    // ===== 赛事上下文 =====

    /// 查询赛事
    fn find_event(&self, event_id: &str) -> RepositoryResult<Option<Event>>;

    /// 读取赛事模板提供的组别类型表
    ///
    /// # 返回
    /// - 赛事未关联模板时返回空表
    fn load_division_types(&self, event_id: &str) -> RepositoryResult<DivisionTypeTable>;

    // ===== 组别 =====

    /// 按组别代码精确查找（同一赛事内）
    fn find_division_by_code(&self, event_id: &str, code: &str)
        -> RepositoryResult<Option<Division>>;

    /// 插入组别
    ///
    /// # 错误
    /// - UniqueConstraintViolation: 同一赛事内 code 已存在（并发导入抢先创建）
    fn insert_division(&self, division: &Division) -> RepositoryResult<()>;

    // ===== 选手 =====

    /// 插入选手（不做去重）
    fn insert_participant(&self, participant: &Participant) -> RepositoryResult<()>;

    // ===== 作品 =====

    /// 当前赛事最大作品编号（无作品时为 0）
    fn max_entry_number(&self, event_id: &str) -> RepositoryResult<i64>;

    /// 插入作品
    ///
    /// # 错误
    /// - UniqueConstraintViolation: entry_number 已被占用
    fn insert_entry(&self, entry: &Entry) -> RepositoryResult<()>;
}
