// ==========================================
// 课表排课系统 - 课表导入 Trait
// ==========================================
// 职责: 定义课表导入接口（不包含实现）
// ==========================================

use crate::domain::program::ProgramLookup;
use crate::domain::schedule::{CandidateRecord, ImportReport};
use crate::importer::error::ImportResult;
use crate::importer::file_parser::RawRow;
use async_trait::async_trait;
use std::path::Path;

// ==========================================
// ScheduleImporter Trait
// ==========================================
// 用途: 课表导入主接口（只生成预览，不落库）
// 实现者: ScheduleImporterImpl
#[async_trait]
pub trait ScheduleImporter: Send + Sync {
    /// 导入单个课表文件
    ///
    /// # 参数
    /// - file_path: 课表文件路径（.xlsx / .csv）
    ///
    /// # 返回
    /// - Ok(ImportReport): 候选记录（含行级诊断）+ 汇总统计
    /// - Err: 输入结构错误（列数不符、非表格文件、空表）或快照读取失败
    async fn import_file<P: AsRef<Path> + Send + Sync>(
        &self,
        file_path: P,
    ) -> ImportResult<ImportReport>;

    /// 按顺序导入多个课表文件，共享同一个教室占用索引
    ///
    /// # 说明
    /// - 快照只在调用开始时读取一次
    /// - 任一文件结构错误 → 整次调用失败，不输出任何记录
    /// - 后一个文件的行可以与前一个文件的行冲突
    async fn import_files<P: AsRef<Path> + Send + Sync>(
        &self,
        file_paths: &[P],
    ) -> ImportResult<ImportReport>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 0）
// 实现者: ExcelParser, CsvParser, UniversalFileParser
pub trait FileParser: Send + Sync {
    /// 解析文件为原始数据行（表头已校验并丢弃）
    ///
    /// # 参数
    /// - file_path: 文件路径
    /// - expected_columns: 表头必须具有的列数
    ///
    /// # 返回
    /// - Ok(Vec<RawRow>): 数据行列表（文件顺序）
    /// - Err: 文件读取错误、格式错误、列布局错误
    fn parse_to_raw_rows(
        &self,
        file_path: &Path,
        expected_columns: usize,
    ) -> ImportResult<Vec<RawRow>>;
}

// ==========================================
// RecordMapper Trait
// ==========================================
// 用途: 按固定列布局映射候选记录（阶段 1）
// 实现者: FieldMapper
pub trait RecordMapper: Send + Sync {
    /// 将原始行映射为候选记录
    ///
    /// # 返回
    /// - None: 课程号为空，整行跳过
    /// - Some: 候选记录（无法解析的字段已记入 problems）
    fn map_to_candidate(&self, row: &RawRow, programs: &ProgramLookup)
        -> Option<CandidateRecord>;
}
