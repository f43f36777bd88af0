// ==========================================
// 课表排课系统 - 导入层
// ==========================================
// 职责: 课表文件解析、字段映射、导入预览
// 支持: Excel, CSV
// ==========================================

// 模块声明
pub mod column_layout;
pub mod data_cleaner;
pub mod era_calendar;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod schedule_importer_impl;
pub mod schedule_importer_trait;

// 重导出核心类型
pub use column_layout::{ColumnLayout, SCHEDULE_EXPORT_LAYOUT};
pub use data_cleaner::DataCleaner;
pub use era_calendar::{local_era_to_iso, EraDateError, DEFAULT_ERA_OFFSET};
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper;
pub use file_parser::{decode_delimited, CsvParser, ExcelParser, RawRow, UniversalFileParser};
pub use schedule_importer_impl::ScheduleImporterImpl;

// 重导出 Trait 接口
pub use schedule_importer_trait::{FileParser, RecordMapper, ScheduleImporter};
