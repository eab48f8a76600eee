// ==========================================
// 赛事数据导入 - 行规整器
// ==========================================
// 职责: 原始行（列名不统一）→ CanonicalRow { 组别代码, 选手姓名, 作品名称列表 }
// 规则:
// - 组别代码: 别名列中首个非空值；行内不存在任何别名列时回退到第 0 列
// - 选手姓名: 别名列中首个非空值；行内不存在任何别名列时回退到第 1 列
// - 回退列已被另一字段的别名列占用时，改取最左侧未占用列
// - 作品名称: 未被上述两项占用、TRIM 后非空的其余列，保持原列顺序
// - 不抛错: 缺列/空值一律视为空字符串
// ==========================================

use crate::config::ImportConfig;
use crate::domain::{CanonicalRow, RawRow};

const DIVISION_POSITION: usize = 0;
const PARTICIPANT_POSITION: usize = 1;

pub struct RowNormalizer {
    division_aliases: Vec<String>,
    participant_aliases: Vec<String>,
    header_rows: usize,
}

impl RowNormalizer {
    pub fn new(config: &ImportConfig) -> Self {
        Self {
            division_aliases: config.division_aliases.clone(),
            participant_aliases: config.participant_aliases.clone(),
            header_rows: config.header_rows,
        }
    }

    /// 数据行下标 → 展示行号（1 起，含表头行）
    pub fn display_row_number(&self, row_index: usize) -> usize {
        row_index + 1 + self.header_rows
    }

    /// 规整一行
    ///
    /// # 参数
    /// - raw: 原始行
    /// - row_index: 数据行下标（0 起，不含表头）
    pub fn normalize(&self, raw: &RawRow, row_index: usize) -> CanonicalRow {
        // 先登记两个字段的别名列，再做位置回退，回退不会抢走别名列
        let division_columns = alias_positions(raw, &self.division_aliases);
        let participant_columns: Vec<usize> = alias_positions(raw, &self.participant_aliases)
            .into_iter()
            .filter(|idx| !division_columns.contains(idx))
            .collect();

        let mut consumed: Vec<usize> = division_columns
            .iter()
            .chain(participant_columns.iter())
            .copied()
            .collect();

        let division_code =
            resolve_field(raw, &division_columns, DIVISION_POSITION, &mut consumed);
        let participant_name =
            resolve_field(raw, &participant_columns, PARTICIPANT_POSITION, &mut consumed);

        let extra_values = raw
            .cells()
            .iter()
            .enumerate()
            .filter(|(idx, _)| !consumed.contains(idx))
            .map(|(_, cell)| cell.value.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect();

        CanonicalRow {
            row_number: self.display_row_number(row_index),
            division_code,
            participant_name,
            extra_values,
        }
    }
}

/// 行内出现的别名列（按别名优先级，去重）
fn alias_positions(raw: &RawRow, aliases: &[String]) -> Vec<usize> {
    let mut positions = Vec::with_capacity(aliases.len());
    for idx in aliases.iter().filter_map(|alias| raw.position_of(alias)) {
        if !positions.contains(&idx) {
            positions.push(idx);
        }
    }
    positions
}

/// 取字段值（TRIM 后）
///
/// - 有别名列: 首个非空别名列的值（别名列已全部登记为占用）
/// - 无别名列: 优先取默认列位；该列已被占用时取最左侧未占用列
fn resolve_field(
    raw: &RawRow,
    alias_columns: &[usize],
    preferred_position: usize,
    consumed: &mut Vec<usize>,
) -> String {
    if !alias_columns.is_empty() {
        return alias_columns
            .iter()
            .filter_map(|idx| raw.value_at(*idx))
            .map(str::trim)
            .find(|v| !v.is_empty())
            .unwrap_or_default()
            .to_string();
    }

    let position = if consumed.contains(&preferred_position) {
        (0..raw.len()).find(|idx| !consumed.contains(idx))
    } else {
        Some(preferred_position)
    };

    match position.and_then(|idx| raw.value_at(idx).map(|v| (idx, v))) {
        Some((idx, value)) => {
            consumed.push(idx);
            value.trim().to_string()
        }
        None => String::new(),
    }
}

impl Default for RowNormalizer {
    fn default() -> Self {
        Self::new(&ImportConfig::default())
    }
}
