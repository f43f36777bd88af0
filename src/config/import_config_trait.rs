// ==========================================
// 课表排课系统 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::importer::error::ImportResult;
use async_trait::async_trait;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 导入模块所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）, ImportConfig（内存值）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// 获取表头应有的列数
    ///
    /// # 默认值
    /// - 29
    async fn get_expected_column_count(&self) -> ImportResult<usize>;

    /// 获取本地纪年与公历的年份差
    ///
    /// # 默认值
    /// - 543
    async fn get_era_offset(&self) -> ImportResult<i32>;

    /// 获取允许上传的文件扩展名（小写，不含点）
    ///
    /// # 默认值
    /// - ["xlsx", "csv"]
    async fn get_allowed_extensions(&self) -> ImportResult<Vec<String>>;
}
