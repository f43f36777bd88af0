// ==========================================
// 课表排课系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 提供只读快照，屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod schedule_snapshot_repo;
pub mod schedule_snapshot_repo_impl;

pub use error::{RepositoryError, RepositoryResult};
pub use schedule_snapshot_repo::{InMemorySnapshotRepository, ScheduleSnapshotRepository};
pub use schedule_snapshot_repo_impl::ScheduleSnapshotRepositoryImpl;
