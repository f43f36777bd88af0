// ==========================================
// 课表排课系统 - 导入配置值
// ==========================================
// 职责: 单次导入调用使用的配置快照（调用开始时读取一次）
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use crate::importer::column_layout::SCHEDULE_EXPORT_LAYOUT;
use crate::importer::era_calendar::DEFAULT_ERA_OFFSET;
use crate::importer::error::ImportResult;
use async_trait::async_trait;

/// 默认允许的扩展名
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &["xlsx", "csv"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportConfig {
    pub expected_columns: usize,
    pub era_offset: i32,
    pub allowed_extensions: Vec<String>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            expected_columns: SCHEDULE_EXPORT_LAYOUT.column_count,
            era_offset: DEFAULT_ERA_OFFSET,
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }
}

impl ImportConfig {
    /// 从配置读取器加载
    pub async fn load(reader: &dyn ImportConfigReader) -> ImportResult<Self> {
        Ok(Self {
            expected_columns: reader.get_expected_column_count().await?,
            era_offset: reader.get_era_offset().await?,
            allowed_extensions: reader.get_allowed_extensions().await?,
        })
    }
}

#[async_trait]
impl ImportConfigReader for ImportConfig {
    async fn get_expected_column_count(&self) -> ImportResult<usize> {
        Ok(self.expected_columns)
    }

    async fn get_era_offset(&self) -> ImportResult<i32> {
        Ok(self.era_offset)
    }

    async fn get_allowed_extensions(&self) -> ImportResult<Vec<String>> {
        Ok(self.allowed_extensions.clone())
    }
}
