// ==========================================
// 课表排课系统 - 直接提交校验
// ==========================================
// 职责: 提交前对结构化记录做冲突复检
// 策略: 与导入路径相同的检测器；每条记录同时对照已落库快照与同批次中较早的记录
// 结果: 全部通过 / 整批拒绝（列出每条冲突记录的第一个冲突来源）
// ==========================================

use crate::domain::schedule::{ConflictDetail, ConflictSource, ScheduleInterval, ScheduleSubmission};
use crate::engine::conflict_detector::ConflictDetector;
use crate::engine::room_time_index::RoomTimeIndex;
use chrono::NaiveTime;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BatchValidationError {
    #[error("第 {index} 条记录时间无效: 开始 {start} 不早于结束 {end}")]
    InvalidTimeRange {
        index: usize,
        start: NaiveTime,
        end: NaiveTime,
    },

    #[error("{} 条记录存在时间冲突", details.len())]
    Conflicts { details: Vec<ConflictDetail> },
}

pub type BatchValidationResult = Result<(), BatchValidationError>;

pub struct BatchValidator;

impl BatchValidator {
    /// 校验一批直接提交的记录
    ///
    /// # 参数
    /// - records: 提交的记录（顺序即批次内下标）
    /// - committed: 已落库快照
    ///
    /// # 返回
    /// - Ok(()): 无冲突，可提交
    /// - Err(InvalidTimeRange): 存在 start >= end 的记录（先于冲突检测）
    /// - Err(Conflicts): 冲突明细
    pub fn validate_submission(
        records: &[ScheduleSubmission],
        committed: &[ScheduleInterval],
    ) -> BatchValidationResult {
        Self::check_time_ranges(records)?;

        let index = RoomTimeIndex::build(committed.iter().cloned());
        let intervals: Vec<ScheduleInterval> = records.iter().map(|r| r.interval()).collect();

        let mut details = Vec::new();
        for (i, (record, interval)) in records.iter().zip(&intervals).enumerate() {
            // 桶内顺序: 已落库在前，同批次较早记录在后
            let conflict_with = match ConflictDetector::first_conflict(&index, interval) {
                Some(hit) => Some(ConflictSource::Committed { id: hit.id }),
                None => intervals[..i]
                    .iter()
                    .position(|earlier| ConflictDetector::overlaps(earlier, interval))
                    .map(|earlier_idx| ConflictSource::InBatch { index: earlier_idx }),
            };

            if let Some(conflict_with) = conflict_with {
                debug!(index = i, room_key = %record.room_key, ?conflict_with, "提交记录冲突");
                details.push(ConflictDetail {
                    record: record.clone(),
                    conflict_with,
                });
            }
        }

        if details.is_empty() {
            Ok(())
        } else {
            warn!(count = details.len(), total = records.len(), "直接提交被拒绝: 时间冲突");
            Err(BatchValidationError::Conflicts { details })
        }
    }

    /// 校验单条记录的修改
    ///
    /// 已落库快照中排除记录自身 id 后再检测
    pub fn validate_update(
        id: i64,
        record: &ScheduleSubmission,
        committed: &[ScheduleInterval],
    ) -> BatchValidationResult {
        Self::check_time_ranges(std::slice::from_ref(record))?;

        let index = RoomTimeIndex::build(committed.iter().filter(|c| c.id != id).cloned());
        match ConflictDetector::first_conflict(&index, &record.interval()) {
            Some(hit) => {
                warn!(id, conflict_id = hit.id, "修改被拒绝: 时间冲突");
                Err(BatchValidationError::Conflicts {
                    details: vec![ConflictDetail {
                        record: record.clone(),
                        conflict_with: ConflictSource::Committed { id: hit.id },
                    }],
                })
            }
            None => Ok(()),
        }
    }

    fn check_time_ranges(records: &[ScheduleSubmission]) -> BatchValidationResult {
        match records
            .iter()
            .position(|r| r.start_time >= r.end_time)
        {
            Some(index) => Err(BatchValidationError::InvalidTimeRange {
                index,
                start: records[index].start_time,
                end: records[index].end_time,
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Weekday;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn submission(room: &str, start: NaiveTime, end: NaiveTime) -> ScheduleSubmission {
        ScheduleSubmission {
            course_id: "01418111".to_string(),
            program_id: 1,
            session_type: "lecture".to_string(),
            group: 1,
            pair_group: 0,
            student_count: 30,
            lecturer: "A".to_string(),
            day: Weekday::Friday,
            start_time: start,
            end_time: end,
            room_key: room.to_string(),
            midterm: None,
            final_exam: None,
        }
    }

    fn committed(id: i64, room: &str, start: NaiveTime, end: NaiveTime) -> ScheduleInterval {
        ScheduleInterval::committed(id, room, Weekday::Friday, start, end)
    }

    #[test]
    fn test_clean_batch_passes() {
        let records = vec![
            submission("R1", t(9, 0), t(10, 0)),
            submission("R1", t(10, 0), t(11, 0)),
        ];
        let snapshot = vec![committed(1, "R1", t(11, 0), t(12, 0))];

        assert_eq!(BatchValidator::validate_submission(&records, &snapshot), Ok(()));
    }

    #[test]
    fn test_conflict_with_committed() {
        let records = vec![submission("R1", t(9, 0), t(10, 0))];
        let snapshot = vec![committed(42, "R1", t(9, 30), t(12, 0))];

        let err = BatchValidator::validate_submission(&records, &snapshot).unwrap_err();
        let BatchValidationError::Conflicts { details } = err else {
            panic!("expected conflicts");
        };
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].conflict_with, ConflictSource::Committed { id: 42 });
    }

    #[test]
    fn test_conflict_within_batch_is_reported() {
        let records = vec![
            submission("R1", t(9, 0), t(10, 0)),
            submission("R2", t(9, 0), t(10, 0)),
            submission("R1", t(9, 30), t(10, 30)),
        ];

        let err = BatchValidator::validate_submission(&records, &[]).unwrap_err();
        let BatchValidationError::Conflicts { details } = err else {
            panic!("expected conflicts");
        };
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].conflict_with, ConflictSource::InBatch { index: 0 });
        assert_eq!(details[0].record, records[2]);
    }

    #[test]
    fn test_committed_checked_before_batch() {
        let records = vec![
            submission("R1", t(9, 0), t(10, 0)),
            submission("R1", t(9, 0), t(10, 0)),
        ];
        let snapshot = vec![committed(5, "R1", t(8, 0), t(9, 30))];

        let err = BatchValidator::validate_submission(&records, &snapshot).unwrap_err();
        let BatchValidationError::Conflicts { details } = err else {
            panic!("expected conflicts");
        };
        assert_eq!(details.len(), 2);
        assert_eq!(details[1].conflict_with, ConflictSource::Committed { id: 5 });
    }

    #[test]
    fn test_invalid_time_range_rejected_first() {
        let records = vec![
            submission("R1", t(9, 0), t(10, 0)),
            submission("R1", t(10, 0), t(10, 0)),
        ];

        let err = BatchValidator::validate_submission(&records, &[]).unwrap_err();
        assert!(matches!(err, BatchValidationError::InvalidTimeRange { index: 1, .. }));
    }

    #[test]
    fn test_update_ignores_own_id() {
        let record = submission("R1", t(9, 0), t(11, 0));
        let snapshot = vec![
            committed(10, "R1", t(9, 0), t(10, 0)),
            committed(11, "R1", t(11, 0), t(12, 0)),
        ];

        assert_eq!(BatchValidator::validate_update(10, &record, &snapshot), Ok(()));

        let err = BatchValidator::validate_update(11, &record, &snapshot).unwrap_err();
        let BatchValidationError::Conflicts { details } = err else {
            panic!("expected conflicts");
        };
        assert_eq!(details[0].conflict_with, ConflictSource::Committed { id: 10 });
    }
}
