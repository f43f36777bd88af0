// ==========================================
// 课表排课系统 - 课表导入器实现
// ==========================================
// 职责: 整合导入流程，从文件到带诊断的候选记录
// 流程: 读配置 → 读快照 → 解析全部文件 → 映射 → 冲突标注 → 汇总
// 红线: 只生成预览，不落库；结构错误时不输出任何记录
// ==========================================

use crate::config::{ImportConfig, ImportConfigReader};
use crate::domain::program::ProgramLookup;
use crate::domain::schedule::{CandidateRecord, ImportReport, ImportSummary};
use crate::engine::conflict_detector::ConflictDetector;
use crate::engine::room_time_index::RoomTimeIndex;
use crate::importer::column_layout::ColumnLayout;
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::{RawRow, UniversalFileParser};
use crate::importer::schedule_importer_trait::{FileParser, RecordMapper, ScheduleImporter};
use crate::repository::ScheduleSnapshotRepository;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

/// 单个文件的解析结果
struct DecodedFile {
    name: String,
    display: String,
    rows: Vec<RawRow>,
}

// ==========================================
// ScheduleImporterImpl - 课表导入器实现
// ==========================================
pub struct ScheduleImporterImpl<R, C>
where
    R: ScheduleSnapshotRepository,
    C: ImportConfigReader,
{
    // 快照来源
    snapshot_repo: R,

    // 配置读取器
    config: C,

    // 列布局
    layout: ColumnLayout,
}

impl<R, C> ScheduleImporterImpl<R, C>
where
    R: ScheduleSnapshotRepository,
    C: ImportConfigReader,
{
    /// 创建新的 ScheduleImporter 实例
    ///
    /// # 参数
    /// - snapshot_repo: 已落库课表/专业快照来源
    /// - config: 配置读取器
    pub fn new(snapshot_repo: R, config: C) -> Self {
        Self::with_layout(snapshot_repo, config, ColumnLayout::default())
    }

    pub fn with_layout(snapshot_repo: R, config: C, layout: ColumnLayout) -> Self {
        Self {
            snapshot_repo,
            config,
            layout,
        }
    }

    pub fn snapshot_repo(&self) -> &R {
        &self.snapshot_repo
    }

    /// 解析全部文件；任一文件失败则整体失败
    fn decode_all<P: AsRef<Path>>(
        parser: &dyn FileParser,
        file_paths: &[P],
        expected_columns: usize,
    ) -> ImportResult<Vec<DecodedFile>> {
        let mut decoded = Vec::with_capacity(file_paths.len());

        for path in file_paths {
            let path = path.as_ref();
            let rows = parser
                .parse_to_raw_rows(path, expected_columns)
                .map_err(|e| {
                    error!(file = %path.display(), error = %e, "文件解析失败");
                    e
                })?;

            debug!(file = %path.display(), rows = rows.len(), "文件解析完成");
            decoded.push(DecodedFile {
                name: path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.display().to_string()),
                display: path.display().to_string(),
                rows,
            });
        }

        Ok(decoded)
    }

    /// 映射全部行（文件顺序 + 行顺序）
    fn map_all(
        mapper: &dyn RecordMapper,
        files: &[DecodedFile],
        programs: &ProgramLookup,
        summary: &mut ImportSummary,
    ) -> Vec<CandidateRecord> {
        let mut records = Vec::new();

        for file in files {
            for row in &file.rows {
                summary.total_rows += 1;
                match mapper.map_to_candidate(row, programs) {
                    Some(mut record) => {
                        record.source_file = Some(file.name.clone());
                        records.push(record);
                    }
                    None => summary.skipped_rows += 1,
                }
            }
        }

        records
    }
}

#[async_trait::async_trait]
impl<R, C> ScheduleImporter for ScheduleImporterImpl<R, C>
where
    R: ScheduleSnapshotRepository + Send + Sync,
    C: ImportConfigReader + Send + Sync,
{
    async fn import_file<P: AsRef<Path> + Send + Sync>(
        &self,
        file_path: P,
    ) -> ImportResult<ImportReport> {
        self.import_files(std::slice::from_ref(&file_path)).await
    }

    #[instrument(skip(self, file_paths), fields(files = file_paths.len()))]
    async fn import_files<P: AsRef<Path> + Send + Sync>(
        &self,
        file_paths: &[P],
    ) -> ImportResult<ImportReport> {
        let start_time = Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        info!(batch_id = %batch_id, "开始导入课表");

        // === 步骤 0: 配置 + 快照（每次调用只读一次）===
        let config = ImportConfig::load(&self.config).await?;
        let committed = self.snapshot_repo.list_committed_intervals().await?;
        let programs = ProgramLookup::new(self.snapshot_repo.list_programs().await?);
        debug!(
            committed = committed.len(),
            programs = programs.len(),
            expected_columns = config.expected_columns,
            "快照读取完成"
        );

        // === 步骤 1: 解析全部文件 ===
        let parser = UniversalFileParser::new(config.era_offset, config.allowed_extensions.clone())
            .with_time_columns(&self.layout.time_columns());
        let files = Self::decode_all(&parser, file_paths, config.expected_columns)?;

        // === 步骤 2: 字段映射 ===
        let mapper = FieldMapper::new(self.layout, config.era_offset);
        let mut summary = ImportSummary::default();
        let mut records = Self::map_all(&mapper, &files, &programs, &mut summary);

        // === 步骤 3: 冲突标注 ===
        let mut index = RoomTimeIndex::build(committed);
        debug!(
            rooms = index.room_count(),
            intervals = index.interval_count(),
            "占用索引已构建"
        );
        summary.conflict_rows = ConflictDetector::annotate(&mut records, &mut index);

        // === 步骤 4: 汇总 ===
        summary.emitted_rows = records.len();
        summary.problem_rows = records.iter().filter(|r| r.has_problems()).count();

        let elapsed_ms = start_time.elapsed().as_millis() as u64;
        info!(
            batch_id = %batch_id,
            total_rows = summary.total_rows,
            skipped_rows = summary.skipped_rows,
            emitted_rows = summary.emitted_rows,
            problem_rows = summary.problem_rows,
            conflict_rows = summary.conflict_rows,
            elapsed_ms,
            "课表导入完成"
        );

        Ok(ImportReport {
            batch_id,
            files: files.into_iter().map(|f| f.display).collect(),
            records,
            summary,
            elapsed_ms,
        })
    }
}
