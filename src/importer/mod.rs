// ==========================================
// 赛事数据导入 - 导入层
// ==========================================
// 职责: 表格数据 → 组别 / 选手 / 作品
// 支持: Excel, CSV, 已解析的原始行
// ==========================================

// 模块声明
pub mod division_classifier;
pub mod entity_resolver;
pub mod error;
pub mod event_importer_impl;
pub mod event_importer_trait;
pub mod file_parser;
pub mod import_coordinator;
pub mod row_normalizer;
pub mod sequence_allocator;

#[cfg(test)]
pub(crate) mod test_support;

// 重导出核心类型
pub use division_classifier::DivisionTypeClassifier;
pub use entity_resolver::{EntityResolver, Resolution};
pub use error::{ImportError, ImportResult};
pub use event_importer_impl::EventImporterImpl;
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use import_coordinator::{ImportContext, ImportCoordinator};
pub use row_normalizer::RowNormalizer;
pub use sequence_allocator::{AllocationError, SequenceAllocator, SequenceScope};

// 重导出 Trait 接口
pub use event_importer_trait::{EventImporter, FileParser};
