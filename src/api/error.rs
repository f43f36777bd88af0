// ==========================================
// 课表排课系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换导入/仓储/校验错误为用户友好的错误消息
// ==========================================

use crate::domain::schedule::ConflictDetail;
use crate::engine::batch_validator::BatchValidationError;
use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入错误
    // ==========================================
    /// 列布局不符、非表格文件、空表等（整次调用失败）
    #[error("输入格式错误: {0}")]
    MalformedInput(String),

    #[error("无效输入: {0}")]
    InvalidInput(String),

    // ==========================================
    // 业务规则错误
    // ==========================================
    /// 直接提交时的时间冲突（整批拒绝）
    #[error("时间冲突: {message}")]
    ScheduleConflict {
        message: String,
        details: Vec<ConflictDetail>,
    },

    #[error("资源未找到: {0}")]
    NotFound(String),

    // ==========================================
    // 配置 / 数据访问错误
    // ==========================================
    #[error("配置错误: {0}")]
    ConfigError(String),

    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),
}

impl ApiError {
    pub fn is_malformed_input(&self) -> bool {
        matches!(self, ApiError::MalformedInput(_))
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
        }
    }
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        if err.is_malformed_input() {
            return ApiError::MalformedInput(err.to_string());
        }

        match err {
            ImportError::SnapshotError(repo_err) => repo_err.into(),
            ImportError::ConfigReadError { .. } | ImportError::ConfigValueError { .. } => {
                ApiError::ConfigError(err.to_string())
            }
            other => ApiError::InternalError(other.to_string()),
        }
    }
}

// ==========================================
// 从 BatchValidationError 转换
// ==========================================
impl From<BatchValidationError> for ApiError {
    fn from(err: BatchValidationError) -> Self {
        match err {
            BatchValidationError::InvalidTimeRange { .. } => ApiError::InvalidInput(err.to_string()),
            BatchValidationError::Conflicts { details } => ApiError::ScheduleConflict {
                message: format!("{} 条记录存在时间冲突", details.len()),
                details,
            },
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
