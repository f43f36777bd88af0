// ==========================================
// 课表排课系统 - 教室时间冲突检测
// ==========================================
// 判定: 同一教室 + 同一星期 + 半开区间 [start, end) 重叠
// 流程: 查桶 → 按插入顺序扫描 → 首个冲突即停止 → 无论是否冲突都追加自身区间
// 红线: 无 I/O；后处理的行不能回溯标注先处理的行
// ==========================================

use crate::domain::schedule::{CandidateRecord, RowProblem, ScheduleInterval};
use crate::engine::room_time_index::RoomTimeIndex;
use tracing::debug;

pub struct ConflictDetector;

impl ConflictDetector {
    /// 两个区间是否冲突（边界相接不算冲突）
    pub fn overlaps(a: &ScheduleInterval, b: &ScheduleInterval) -> bool {
        a.room_key == b.room_key
            && a.day == b.day
            && a.start_time < b.end_time
            && a.end_time > b.start_time
    }

    /// 在索引中查找第一个与候选区间冲突的区间（按插入顺序）
    pub fn first_conflict<'a>(
        index: &'a RoomTimeIndex,
        candidate: &ScheduleInterval,
    ) -> Option<&'a ScheduleInterval> {
        index
            .lookup(&candidate.room_key)
            .iter()
            .find(|existing| Self::overlaps(existing, candidate))
    }

    /// 检查候选区间，然后将其追加到索引
    ///
    /// # 返回
    /// - Some(区间): 第一个冲突的已知区间
    /// - None: 无冲突
    pub fn check_and_insert(
        index: &mut RoomTimeIndex,
        candidate: ScheduleInterval,
    ) -> Option<ScheduleInterval> {
        let hit = Self::first_conflict(index, &candidate).cloned();
        index.insert(candidate);
        hit
    }

    /// 冲突区间 → 行级诊断
    pub fn problem_for(hit: &ScheduleInterval) -> RowProblem {
        if hit.is_committed() {
            RowProblem::DuplicateWithCommitted { id: hit.id }
        } else {
            RowProblem::DuplicateWithinBatch
        }
    }

    /// 按顺序标注候选记录
    ///
    /// 星期/时刻未能解析的记录既不检查也不入索引
    ///
    /// # 返回
    /// - 新增时间冲突诊断的记录数
    pub fn annotate(records: &mut [CandidateRecord], index: &mut RoomTimeIndex) -> usize {
        let mut conflicts = 0;

        for record in records.iter_mut() {
            let Some(interval) = record.interval() else {
                continue;
            };

            if let Some(hit) = Self::check_and_insert(index, interval) {
                debug!(
                    row = record.row_number,
                    room_key = %record.room_key,
                    conflict_id = hit.id,
                    "检测到时间冲突"
                );
                record.problems.push(Self::problem_for(&hit));
                conflicts += 1;
            }
        }

        conflicts
    }
}
