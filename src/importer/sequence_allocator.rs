// ==========================================
// 赛事数据导入 - 序号分配器
// ==========================================
// 并发模型: 乐观重试（不加全局锁）
// - 每次尝试重新读取当前最大序号
// - 候选值 = max(当前最大 + 1, 上次冲突值 + 1)，保证不会重复撞同一个值
// - 唯一约束冲突 → 重试；其他错误 → 直接失败
// - 达到尝试上限 → AllocationError::Exhausted
// 只保证唯一，不保证连续
// ==========================================

use crate::domain::{Entry, NewEntry};
use crate::importer::error::{ImportError, ImportResult};
use crate::repository::{ImportRepository, RepositoryError, RepositoryResult};
use thiserror::Error;
use tracing::{debug, warn};

// ==========================================
// SequenceScope - 可编号的作用域
// ==========================================
// 任意“作用域内唯一递增编号”都可以实现此 trait 复用分配器
pub trait SequenceScope {
    type Claimed;

    /// 当前已用到的最大序号（无记录为 0）
    fn current_extent(&self) -> RepositoryResult<i64>;

    /// 以 candidate 尝试落库
    ///
    /// # 错误
    /// - UniqueConstraintViolation: candidate 已被占用（可重试）
    fn try_claim(&self, candidate: i64) -> RepositoryResult<Self::Claimed>;
}

#[derive(Error, Debug)]
pub enum AllocationError {
    #[error("连续 {attempts} 次序号冲突（最后候选值 {last_candidate}）")]
    Exhausted { attempts: u32, last_candidate: i64 },

    #[error(transparent)]
    Store(#[from] RepositoryError),
}

// ==========================================
// SequenceAllocator
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct SequenceAllocator {
    max_attempts: u32,
}

impl SequenceAllocator {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// 分配下一个序号并落库
    pub fn allocate<S: SequenceScope>(&self, scope: &S) -> Result<S::Claimed, AllocationError> {
        let mut last_conflict: Option<i64> = None;
        let mut candidate = 0;

        for attempt in 0..self.max_attempts {
            let extent = scope.current_extent()?;
            let floor = last_conflict.map_or(extent, |conflicted| conflicted.max(extent));
            candidate = next_after(floor)?;

            match scope.try_claim(candidate) {
                Ok(claimed) => {
                    if attempt > 0 {
                        debug!(attempt, candidate, "序号冲突后重试成功");
                    }
                    return Ok(claimed);
                }
                Err(e) if e.is_unique_violation() => {
                    debug!(attempt, candidate, extent, "序号冲突，准备重试");
                    last_conflict = Some(candidate);
                }
                Err(e) => return Err(AllocationError::Store(e)),
            }
        }

        warn!(
            attempts = self.max_attempts,
            last_candidate = candidate,
            "序号分配重试耗尽"
        );
        Err(AllocationError::Exhausted {
            attempts: self.max_attempts,
            last_candidate: candidate,
        })
    }

    /// 为作品分配赛事内唯一编号并落库
    pub fn allocate_entry<R>(&self, repo: &R, draft: &NewEntry) -> ImportResult<Entry>
    where
        R: ImportRepository + ?Sized,
    {
        let scope = EntryNumberScope { repo, draft };
        self.allocate(&scope).map_err(|e| match e {
            AllocationError::Exhausted { attempts, .. } => ImportError::AllocationExhausted {
                name: draft.name.clone(),
                attempts,
            },
            AllocationError::Store(e) => ImportError::Repository(e),
        })
    }
}

/// floor + 1；已到 i64 上限时报错而不是溢出
fn next_after(floor: i64) -> Result<i64, AllocationError> {
    floor.checked_add(1).ok_or_else(|| {
        AllocationError::Store(RepositoryError::FieldValueError {
            field: "entry_number".to_string(),
            message: format!("序号已达上限 {}", floor),
        })
    })
}

// ==========================================
// EntryNumberScope - 赛事内作品编号
// ==========================================
struct EntryNumberScope<'a, R: ?Sized> {
    repo: &'a R,
    draft: &'a NewEntry,
}

impl<R> SequenceScope for EntryNumberScope<'_, R>
where
    R: ImportRepository + ?Sized,
{
    type Claimed = Entry;

    fn current_extent(&self) -> RepositoryResult<i64> {
        self.repo.max_entry_number(&self.draft.event_id)
    }

    fn try_claim(&self, candidate: i64) -> RepositoryResult<Entry> {
        let entry = self.draft.numbered(candidate);
        self.repo.insert_entry(&entry)?;
        Ok(entry)
    }
}
