// ==========================================
// 赛事数据导入 - 导入中间结构与统计
// ==========================================
// 管道: RawRow（文件解析）→ CanonicalRow（行规整）→ RowOutcome（逐行结果）→ ImportStats
// 生命周期: 仅在导入流程内
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// RawRow - 原始行
// ==========================================
// 保留列顺序: 同时支持按表头别名访问与按列位置访问
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    cells: Vec<RawCell>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCell {
    pub header: String,
    pub value: String,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// 由 (表头, 值) 序列构造
    pub fn from_pairs<I, H, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (H, V)>,
        H: Into<String>,
        V: Into<String>,
    {
        let cells = pairs
            .into_iter()
            .map(|(header, value)| RawCell {
                header: header.into(),
                value: value.into(),
            })
            .collect();
        Self { cells }
    }

    /// 无表头行（仅按位置访问）
    pub fn positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self::from_pairs(values.into_iter().map(|v| (String::new(), v)))
    }

    pub fn push(&mut self, header: impl Into<String>, value: impl Into<String>) {
        self.cells.push(RawCell {
            header: header.into(),
            value: value.into(),
        });
    }

    pub fn cells(&self) -> &[RawCell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// 按列位置取值
    pub fn value_at(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(|c| c.value.as_str())
    }

    /// 按表头查找列位置（TRIM 后不区分大小写）
    pub fn position_of(&self, header: &str) -> Option<usize> {
        let wanted = header.trim();
        self.cells
            .iter()
            .position(|c| c.header.trim().eq_ignore_ascii_case(wanted))
    }
}

// ==========================================
// CanonicalRow - 规整行
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRow {
    pub row_number: usize, // 展示行号（含表头偏移）
    pub division_code: String,
    pub participant_name: String,
    pub extra_values: Vec<String>, // 作品名称,保持原列顺序
}

impl CanonicalRow {
    /// 组别代码与选手姓名均为空 → 空行
    pub fn is_empty(&self) -> bool {
        self.division_code.is_empty() && self.participant_name.is_empty()
    }
}

// ==========================================
// RowTally - 单行已落库计数
// ==========================================
// 行失败时仍需计入失败点之前已落库的实体
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowTally {
    pub divisions: usize,
    pub participants: usize,
    pub entries: usize,
    pub entry_errors: Vec<String>, // 单个作品编号失败（不中断本行）
}

// ==========================================
// RowOutcome - 逐行结果
// ==========================================
// 状态: Parsed → Skipped | Imported | Failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Skipped,
    Imported(RowTally),
    Failed { tally: RowTally, message: String },
}

// ==========================================
// ImportStats - 导入统计
// ==========================================
// 字段名 divisions / participants / entries / errors 与调用方约定一致
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportStats {
    pub batch_id: String,
    pub divisions: usize,    // 本次新建组别数
    pub participants: usize, // 本次新建选手数
    pub entries: usize,      // 本次新建作品数
    pub errors: Vec<String>, // "Row {n}: {message}"
    pub rows_total: usize,
    pub rows_skipped: usize,
    pub elapsed_ms: u64,
}

impl ImportStats {
    pub fn new(batch_id: impl Into<String>) -> Self {
        Self {
            batch_id: batch_id.into(),
            ..Self::default()
        }
    }

    /// 累加单行结果
    pub fn record(&mut self, row_number: usize, outcome: RowOutcome) {
        self.rows_total += 1;
        match outcome {
            RowOutcome::Skipped => self.rows_skipped += 1,
            RowOutcome::Imported(tally) => self.absorb(row_number, tally),
            RowOutcome::Failed { tally, message } => {
                self.absorb(row_number, tally);
                self.push_error(row_number, &message);
            }
        }
    }

    pub fn push_error(&mut self, row_number: usize, message: &str) {
        self.errors.push(format!("Row {}: {}", row_number, message));
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn absorb(&mut self, row_number: usize, tally: RowTally) {
        self.divisions += tally.divisions;
        self.participants += tally.participants;
        self.entries += tally.entries;
        for message in tally.entry_errors {
            self.push_error(row_number, &message);
        }
    }
}
