// ==========================================
// 课表排课系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod program;
pub mod schedule;
pub mod types;

// 重导出核心类型
pub use program::{Program, ProgramLookup};
pub use schedule::{
    CandidateRecord, ConflictDetail, ConflictSource, ExamKind, ExamWindow, ImportReport,
    ImportSummary, RowProblem, ScheduleInterval, ScheduleSubmission, IN_BATCH_ID,
};
pub use types::{parse_time_of_day, Weekday};
