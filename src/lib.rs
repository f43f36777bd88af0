// ==========================================
// 课表排课系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 课表导入预览与教室时间冲突检测（人工审核后提交）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 只读快照
pub mod repository;

// 引擎层 - 占用索引与冲突判定
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::Weekday;

// 领域实体
pub use domain::{
    CandidateRecord, ConflictDetail, ConflictSource, ImportReport, ImportSummary, Program,
    ProgramLookup, RowProblem, ScheduleInterval, ScheduleSubmission,
};

// 引擎
pub use engine::{BatchValidator, ConflictDetector, RoomTimeIndex};

// API
pub use api::{ApiError, ApiResult, ScheduleApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "课表排课系统";
