// ==========================================
// 赛事数据导入 - 实体解析器
// ==========================================
// 职责:
// - resolve_division: 按 code 查找或创建组别（同一 code 只创建一次）
// - create_participant: 每次无条件新建选手（不按姓名去重）
// 作用域: 当前赛事
// ==========================================

use crate::domain::{Division, DivisionTypeTable, ImportMode, Participant};
use crate::importer::division_classifier::DivisionTypeClassifier;
use crate::importer::error::ImportResult;
use crate::repository::ImportRepository;
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

/// 查找或创建的结果
#[derive(Debug, Clone)]
pub enum Resolution<T> {
    Existing(T),
    Created(T),
}

impl<T> Resolution<T> {
    pub fn is_created(&self) -> bool {
        matches!(self, Resolution::Created(_))
    }

    pub fn value(&self) -> &T {
        match self {
            Resolution::Existing(v) | Resolution::Created(v) => v,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Resolution::Existing(v) | Resolution::Created(v) => v,
        }
    }
}

pub struct EntityResolver<'a, R: ?Sized> {
    repo: &'a R,
    classifier: &'a DivisionTypeClassifier,
    event_id: &'a str,
    division_types: &'a DivisionTypeTable,
}

impl<'a, R> EntityResolver<'a, R>
where
    R: ImportRepository + ?Sized,
{
    pub fn new(
        repo: &'a R,
        classifier: &'a DivisionTypeClassifier,
        event_id: &'a str,
        division_types: &'a DivisionTypeTable,
    ) -> Self {
        Self {
            repo,
            classifier,
            event_id,
            division_types,
        }
    }

    /// 查找或创建组别
    ///
    /// # 返回
    /// - Ok(None): code 为空，无副作用
    /// - Ok(Some(Existing)): 已存在，原样返回（不修改、不重新分类）
    /// - Ok(Some(Created)): 新建并落库
    ///
    /// # 并发
    /// 插入撞到唯一索引（其他导入抢先创建同 code）时回读并复用对方的组别
    pub fn resolve_division(&self, code: &str) -> ImportResult<Option<Resolution<Division>>> {
        if code.is_empty() {
            return Ok(None);
        }

        if let Some(existing) = self.repo.find_division_by_code(self.event_id, code)? {
            return Ok(Some(Resolution::Existing(existing)));
        }

        let division_type = self.classifier.classify(code, self.division_types);
        let division = Division {
            division_id: Uuid::new_v4().to_string(),
            event_id: self.event_id.to_string(),
            code: Some(code.to_string()),
            name: DivisionTypeClassifier::division_name(division_type, code),
            division_type: division_type.to_string(),
            is_active: true,
            created_at: Utc::now(),
        };

        match self.repo.insert_division(&division) {
            Ok(()) => {
                debug!(code, name = %division.name, "新建组别");
                Ok(Some(Resolution::Created(division)))
            }
            Err(e) if e.is_unique_violation() => {
                match self.repo.find_division_by_code(self.event_id, code)? {
                    Some(winner) => {
                        debug!(code, "组别已被并发导入创建，复用");
                        Ok(Some(Resolution::Existing(winner)))
                    }
                    None => Err(e.into()),
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    /// 新建选手
    ///
    /// # 返回
    /// - Ok(None): 姓名为空，或导入模式不含选手，无副作用
    /// - Ok(Some(_)): 新建并落库（关联组别可为空）
    pub fn create_participant(
        &self,
        name: &str,
        division: Option<&Division>,
        mode: ImportMode,
    ) -> ImportResult<Option<Participant>> {
        if name.is_empty() || !mode.creates_participants() {
            return Ok(None);
        }

        let participant = Participant {
            participant_id: Uuid::new_v4().to_string(),
            event_id: self.event_id.to_string(),
            division_id: division.map(|d| d.division_id.clone()),
            name: name.to_string(),
            is_active: true,
            created_at: Utc::now(),
        };

        self.repo.insert_participant(&participant)?;
        debug!(name, "新建选手");
        Ok(Some(participant))
    }
}
