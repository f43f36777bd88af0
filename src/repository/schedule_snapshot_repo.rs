// ==========================================
// 课表排课系统 - 课表快照 Repository Trait
// ==========================================
// 职责: 只读提供已落库课表区间与专业列表
// 红线: Repository 不含业务规则，不做冲突判定
// ==========================================

use crate::domain::program::Program;
use crate::domain::schedule::ScheduleInterval;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// ScheduleSnapshotRepository Trait
// ==========================================
// 用途: 每次导入/校验调用开始时读取一次快照
// 实现者: ScheduleSnapshotRepositoryImpl（rusqlite）, InMemorySnapshotRepository
#[async_trait]
pub trait ScheduleSnapshotRepository: Send + Sync {
    /// 全部已落库课表的占用区间
    async fn list_committed_intervals(&self) -> RepositoryResult<Vec<ScheduleInterval>>;

    /// 全部专业（按 id 排序，名称匹配取第一个）
    async fn list_programs(&self) -> RepositoryResult<Vec<Program>>;
}

// ==========================================
// InMemorySnapshotRepository
// ==========================================
// 用途: 调用方已持有快照（测试 / 嵌入式调用）
#[derive(Debug, Clone, Default)]
pub struct InMemorySnapshotRepository {
    intervals: Vec<ScheduleInterval>,
    programs: Vec<Program>,
}

impl InMemorySnapshotRepository {
    pub fn new(intervals: Vec<ScheduleInterval>, programs: Vec<Program>) -> Self {
        Self {
            intervals,
            programs,
        }
    }
}

#[async_trait]
impl ScheduleSnapshotRepository for InMemorySnapshotRepository {
    async fn list_committed_intervals(&self) -> RepositoryResult<Vec<ScheduleInterval>> {
        Ok(self.intervals.clone())
    }

    async fn list_programs(&self) -> RepositoryResult<Vec<Program>> {
        Ok(self.programs.clone())
    }
}
