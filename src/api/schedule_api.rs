// ==========================================
// 课表排课系统 - 课表 API
// ==========================================
// 职责: 导入预览 / 直接提交校验 / 单条修改校验
// 说明: 只做校验与诊断，是否落库由调用方决定
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{ConfigManager, ImportConfigReader};
use crate::domain::schedule::{ImportReport, ScheduleSubmission};
use crate::engine::batch_validator::BatchValidator;
use crate::importer::{ScheduleImporter, ScheduleImporterImpl};
use crate::repository::{ScheduleSnapshotRepository, ScheduleSnapshotRepositoryImpl};
use std::path::Path;
use tracing::{info, instrument};

/// 课表API
pub struct ScheduleApi<R, C>
where
    R: ScheduleSnapshotRepository,
    C: ImportConfigReader,
{
    importer: ScheduleImporterImpl<R, C>,
}

impl ScheduleApi<ScheduleSnapshotRepositoryImpl, ConfigManager> {
    /// 基于 SQLite 数据库创建
    pub fn open(db_path: &str) -> ApiResult<Self> {
        let repo = ScheduleSnapshotRepositoryImpl::new(db_path)?;
        let config = ConfigManager::new(db_path)?;
        Ok(Self::new(repo, config))
    }
}

impl<R, C> ScheduleApi<R, C>
where
    R: ScheduleSnapshotRepository + Send + Sync,
    C: ImportConfigReader + Send + Sync,
{
    pub fn new(snapshot_repo: R, config: C) -> Self {
        Self {
            importer: ScheduleImporterImpl::new(snapshot_repo, config),
        }
    }

    /// 读取课表文件，返回带诊断的候选记录
    ///
    /// # 返回
    /// - Ok(ImportReport): 预览结果
    /// - Err(ApiError::MalformedInput): 任一文件结构错误
    pub async fn read_table<P: AsRef<Path> + Send + Sync>(
        &self,
        file_paths: &[P],
    ) -> ApiResult<ImportReport> {
        if file_paths.is_empty() {
            return Err(ApiError::InvalidInput("未提供课表文件".to_string()));
        }
        Ok(self.importer.import_files(file_paths).await?)
    }

    /// 校验一批直接提交的记录
    ///
    /// # 返回
    /// - Ok(记录): 标准化后的记录（考试日期为空 → 考试时间窗置空），可提交
    /// - Err(ApiError::ScheduleConflict): 冲突明细
    /// - Err(ApiError::InvalidInput): 空提交或 start >= end
    #[instrument(skip(self, records), fields(count = records.len()))]
    pub async fn validate_submission(
        &self,
        records: Vec<ScheduleSubmission>,
    ) -> ApiResult<Vec<ScheduleSubmission>> {
        if records.is_empty() {
            return Err(ApiError::InvalidInput("提交记录为空".to_string()));
        }

        let committed = self.importer.snapshot_repo().list_committed_intervals().await?;
        BatchValidator::validate_submission(&records, &committed)?;

        info!(count = records.len(), "直接提交校验通过");
        Ok(records.into_iter().map(ScheduleSubmission::normalized).collect())
    }

    /// 校验单条记录的修改（排除记录自身）
    #[instrument(skip(self, record))]
    pub async fn validate_update(
        &self,
        id: i64,
        record: ScheduleSubmission,
    ) -> ApiResult<ScheduleSubmission> {
        let committed = self.importer.snapshot_repo().list_committed_intervals().await?;
        if !committed.iter().any(|c| c.id == id) {
            return Err(ApiError::NotFound(format!("Schedule(id={})不存在", id)));
        }

        BatchValidator::validate_update(id, &record, &committed)?;
        Ok(record.normalized())
    }
}
