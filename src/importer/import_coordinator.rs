// ==========================================
// 赛事数据导入 - 导入协调器
// ==========================================
// 流程（逐行、严格顺序）:
//   规整 → 空行跳过 → 组别（有 code 即解析，与模式无关）
//        → 选手（模式含选手） → 作品编号 + 落库（仅 combined）
// 行边界: 本行任何错误都转为 RowOutcome::Failed，批次继续
// 事务: 不跨行，已成功的行不会因后续行失败回滚
// ==========================================

use crate::config::ImportConfig;
use crate::domain::{
    CanonicalRow, DivisionTypeTable, ImportMode, ImportStats, NewEntry, RawRow, RowOutcome,
    RowTally,
};
use crate::importer::division_classifier::DivisionTypeClassifier;
use crate::importer::entity_resolver::EntityResolver;
use crate::importer::error::ImportError;
use crate::importer::row_normalizer::RowNormalizer;
use crate::importer::sequence_allocator::SequenceAllocator;
use crate::repository::ImportRepository;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// 单次导入的赛事上下文
#[derive(Debug, Clone)]
pub struct ImportContext {
    pub event_id: String,
    pub division_types: DivisionTypeTable,
    pub mode: ImportMode,
}

impl ImportContext {
    pub fn new(
        event_id: impl Into<String>,
        division_types: DivisionTypeTable,
        mode: ImportMode,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            division_types,
            mode,
        }
    }
}

// ==========================================
// ImportCoordinator
// ==========================================
pub struct ImportCoordinator<'a, R: ?Sized> {
    repo: &'a R,
    normalizer: RowNormalizer,
    classifier: DivisionTypeClassifier,
    allocator: SequenceAllocator,
}

impl<'a, R> ImportCoordinator<'a, R>
where
    R: ImportRepository + ?Sized,
{
    pub fn new(repo: &'a R, config: &ImportConfig) -> Self {
        Self {
            repo,
            normalizer: RowNormalizer::new(config),
            classifier: DivisionTypeClassifier::new(config.default_division_type.clone()),
            allocator: SequenceAllocator::new(config.max_allocation_attempts),
        }
    }

    /// 导入一批原始行
    ///
    /// # 返回
    /// - ImportStats: 始终完整反映每一行的结果，不会返回错误
    #[instrument(skip(self, ctx, rows), fields(event_id = %ctx.event_id, mode = %ctx.mode, batch_id))]
    pub fn run(&self, ctx: &ImportContext, rows: &[RawRow]) -> ImportStats {
        let start = Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("batch_id", batch_id.as_str());
        info!(rows = rows.len(), "开始导入");

        let mut stats = ImportStats::new(batch_id);
        for (row_index, raw) in rows.iter().enumerate() {
            let (row_number, outcome) = self.process_row(ctx, raw, row_index);
            stats.record(row_number, outcome);
        }

        stats.elapsed_ms = start.elapsed().as_millis() as u64;
        info!(
            divisions = stats.divisions,
            participants = stats.participants,
            entries = stats.entries,
            errors = stats.errors.len(),
            skipped = stats.rows_skipped,
            elapsed_ms = stats.elapsed_ms,
            "导入完成"
        );
        stats
    }

    /// 处理单行，返回（展示行号, 行结果）
    pub fn process_row(
        &self,
        ctx: &ImportContext,
        raw: &RawRow,
        row_index: usize,
    ) -> (usize, RowOutcome) {
        let row = self.normalizer.normalize(raw, row_index);
        let row_number = row.row_number;

        if row.is_empty() {
            debug!(row_number, "空行，跳过");
            return (row_number, RowOutcome::Skipped);
        }

        let mut tally = RowTally::default();
        let outcome = match self.import_row(ctx, &row, &mut tally) {
            Ok(()) => RowOutcome::Imported(tally),
            Err(e) => {
                warn!(row_number, error = %e, "行导入失败");
                RowOutcome::Failed {
                    tally,
                    message: e.to_string(),
                }
            }
        };
        (row_number, outcome)
    }

    /// 已落库的实体计入 tally；出错时 tally 保留出错前的计数
    fn import_row(
        &self,
        ctx: &ImportContext,
        row: &CanonicalRow,
        tally: &mut RowTally,
    ) -> Result<(), ImportError> {
        let resolver =
            EntityResolver::new(self.repo, &self.classifier, &ctx.event_id, &ctx.division_types);

        let division = match resolver.resolve_division(&row.division_code)? {
            Some(resolution) => {
                if resolution.is_created() {
                    tally.divisions += 1;
                }
                Some(resolution.into_value())
            }
            None => None,
        };

        let participant =
            resolver.create_participant(&row.participant_name, division.as_ref(), ctx.mode)?;
        if participant.is_some() {
            tally.participants += 1;
        }

        if !ctx.mode.creates_entries() {
            return Ok(());
        }

        for name in &row.extra_values {
            let draft = NewEntry {
                event_id: ctx.event_id.clone(),
                division_id: division.as_ref().map(|d| d.division_id.clone()),
                participant_id: participant.as_ref().map(|p| p.participant_id.clone()),
                name: name.clone(),
            };
            match self.allocator.allocate_entry(self.repo, &draft) {
                Ok(entry) => {
                    debug!(entry_number = entry.entry_number, name = %entry.name, "新建作品");
                    tally.entries += 1;
                }
                Err(e) => {
                    warn!(row_number = row.row_number, name = %name, error = %e, "作品创建失败");
                    tally.entry_errors.push(e.to_string());
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DivisionTypeRule;
    use crate::importer::test_support::MemoryRepository;

    fn kids_table() -> DivisionTypeTable {
        vec![DivisionTypeRule::new("K", "Kids")]
    }

    fn setup() -> MemoryRepository {
        MemoryRepository::with_event("e1", kids_table())
    }

    fn ctx(mode: ImportMode) -> ImportContext {
        ImportContext::new("e1", kids_table(), mode)
    }

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        RawRow::from_pairs(pairs.iter().copied())
    }

    #[test]
    fn test_combined_row_creates_division_participant_and_entries() {
        let repo = setup();
        let coordinator = ImportCoordinator::new(&repo, &ImportConfig::default());
        let rows = vec![row(&[
            ("division", "K1"),
            ("participant", "Jane Doe"),
            ("col3", "Cake"),
            ("col4", "Pie"),
        ])];

        let stats = coordinator.run(&ctx(ImportMode::Combined), &rows);

        assert_eq!(stats.divisions, 1);
        assert_eq!(stats.participants, 1);
        assert_eq!(stats.entries, 2);
        assert!(stats.errors.is_empty());

        let divisions = repo.divisions();
        assert_eq!(divisions[0].name, "Kids 1");
        assert_eq!(divisions[0].division_type, "Kids");

        let participants = repo.participants();
        assert_eq!(participants[0].name, "Jane Doe");
        assert_eq!(
            participants[0].division_id.as_deref(),
            Some(divisions[0].division_id.as_str())
        );

        let entries = repo.entries();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Cake", "Pie"]);
        assert_eq!(entries[0].entry_number, 1);
        assert_eq!(entries[1].entry_number, 2);
        assert!(entries.iter().all(|e| e.participant_id.as_deref()
            == Some(participants[0].participant_id.as_str())));
    }

    #[test]
    fn test_empty_row_is_skipped_without_error() {
        let repo = setup();
        let coordinator = ImportCoordinator::new(&repo, &ImportConfig::default());
        let rows = vec![row(&[("division", ""), ("participant", "  ")])];

        let stats = coordinator.run(&ctx(ImportMode::Combined), &rows);

        assert_eq!(stats.rows_total, 1);
        assert_eq!(stats.rows_skipped, 1);
        assert_eq!((stats.divisions, stats.participants, stats.entries), (0, 0, 0));
        assert!(stats.errors.is_empty());
        assert!(repo.divisions().is_empty());
    }

    #[test]
    fn test_division_is_reused_within_batch() {
        let repo = setup();
        let coordinator = ImportCoordinator::new(&repo, &ImportConfig::default());
        let rows = vec![
            row(&[("division", "K1"), ("participant", "A"), ("x", "One")]),
            row(&[("division", "K1"), ("participant", "B"), ("x", "Two")]),
        ];

        let stats = coordinator.run(&ctx(ImportMode::Combined), &rows);

        assert_eq!(stats.divisions, 1);
        assert_eq!(stats.participants, 2);
        let division_id = repo.divisions()[0].division_id.clone();
        assert!(repo
            .participants()
            .iter()
            .all(|p| p.division_id.as_deref() == Some(division_id.as_str())));
        assert!(repo
            .entries()
            .iter()
            .all(|e| e.division_id.as_deref() == Some(division_id.as_str())));
    }

    #[test]
    fn test_divisions_mode_creates_only_divisions() {
        let repo = setup();
        let coordinator = ImportCoordinator::new(&repo, &ImportConfig::default());
        let rows = vec![row(&[("division", "K1"), ("participant", "A"), ("x", "Cake")])];

        let stats = coordinator.run(&ctx(ImportMode::Divisions), &rows);

        assert_eq!((stats.divisions, stats.participants, stats.entries), (1, 0, 0));
        assert!(repo.participants().is_empty());
        assert!(repo.entries().is_empty());
    }

    #[test]
    fn test_participants_mode_creates_no_entries() {
        let repo = setup();
        let coordinator = ImportCoordinator::new(&repo, &ImportConfig::default());
        let rows = vec![row(&[("division", "K1"), ("participant", "A"), ("x", "Cake")])];

        let stats = coordinator.run(&ctx(ImportMode::Participants), &rows);

        assert_eq!((stats.divisions, stats.participants, stats.entries), (1, 1, 0));
        assert!(repo.entries().is_empty());
    }

    #[test]
    fn test_failed_row_does_not_stop_batch() {
        let repo = setup();
        repo.fail_participant("Broken");
        let coordinator = ImportCoordinator::new(&repo, &ImportConfig::default());
        let rows = vec![
            row(&[("division", "K1"), ("participant", "Broken"), ("x", "Cake")]),
            row(&[("division", "K2"), ("participant", "Fine"), ("x", "Pie")]),
        ];

        let stats = coordinator.run(&ctx(ImportMode::Combined), &rows);

        assert_eq!(stats.errors.len(), 1);
        assert!(stats.errors[0].starts_with("Row 2: "));
        // 第一行失败前已创建的组别仍计入
        assert_eq!(stats.divisions, 2);
        assert_eq!(stats.participants, 1);
        assert_eq!(stats.entries, 1);
        assert_eq!(repo.entries()[0].name, "Pie");
    }

    #[test]
    fn test_entry_failure_continues_with_next_entry() {
        let repo = setup();
        repo.fail_entry("Burnt");
        let coordinator = ImportCoordinator::new(&repo, &ImportConfig::default());
        let rows = vec![row(&[
            ("division", "K1"),
            ("participant", "A"),
            ("a", "Burnt"),
            ("b", "Cake"),
        ])];

        let stats = coordinator.run(&ctx(ImportMode::Combined), &rows);

        assert_eq!(stats.entries, 1);
        assert_eq!(stats.errors.len(), 1);
        assert!(stats.errors[0].starts_with("Row 2: "));
        assert_eq!(repo.entries()[0].name, "Cake");
    }

    #[test]
    fn test_row_without_participant_still_creates_entries() {
        let repo = setup();
        let coordinator = ImportCoordinator::new(&repo, &ImportConfig::default());
        let rows = vec![row(&[("division", "K1"), ("participant", ""), ("x", "Cake")])];

        let stats = coordinator.run(&ctx(ImportMode::Combined), &rows);

        assert_eq!((stats.divisions, stats.participants, stats.entries), (1, 0, 1));
        assert!(repo.entries()[0].participant_id.is_none());
    }

    #[test]
    fn test_entry_numbers_continue_from_existing_max() {
        let repo = setup();
        let coordinator = ImportCoordinator::new(&repo, &ImportConfig::default());
        let first = vec![row(&[("division", "K1"), ("participant", "A"), ("x", "One")])];
        let second = vec![row(&[("division", "K1"), ("participant", "A"), ("x", "Two")])];

        coordinator.run(&ctx(ImportMode::Combined), &first);
        let stats = coordinator.run(&ctx(ImportMode::Combined), &second);

        // 第二次运行复用组别，但选手不去重
        assert_eq!(stats.divisions, 0);
        assert_eq!(stats.participants, 1);
        let numbers: Vec<i64> = repo.entries().iter().map(|e| e.entry_number).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert_eq!(repo.participants().len(), 2);
    }

    #[test]
    fn test_row_numbers_follow_header_rows() {
        let repo = setup();
        repo.fail_participant("Broken");
        let config = ImportConfig {
            header_rows: 3,
            ..ImportConfig::default()
        };
        let coordinator = ImportCoordinator::new(&repo, &config);
        let rows = vec![
            row(&[("division", ""), ("participant", "")]),
            row(&[("division", "K1"), ("participant", "Broken")]),
        ];

        let stats = coordinator.run(&ctx(ImportMode::Combined), &rows);

        assert_eq!(stats.rows_skipped, 1);
        assert_eq!(stats.errors.len(), 1);
        assert!(stats.errors[0].starts_with("Row 5: "));
        assert!(stats.errors[0].contains("participant rejected: Broken"));
    }
}
