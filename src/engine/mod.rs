// ==========================================
// 课表排课系统 - 引擎层
// ==========================================
// 职责: 教室占用索引与时间冲突判定
// 红线: Engine 不拼 SQL、不做 I/O，所有冲突必须给出来源
// ==========================================

pub mod batch_validator;
pub mod conflict_detector;
pub mod room_time_index;

// 重导出核心引擎
pub use batch_validator::{BatchValidationError, BatchValidationResult, BatchValidator};
pub use conflict_detector::ConflictDetector;
pub use room_time_index::RoomTimeIndex;
