// ==========================================
// 课表排课系统 - 教室占用索引
// ==========================================
// 结构: room_key → 占用区间列表（按插入顺序）
// 生命周期: 每次调用从快照新建，只追加不删除，调用结束即丢弃
// 红线: 不落库、不跨调用复用
// ==========================================

use crate::domain::schedule::ScheduleInterval;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct RoomTimeIndex {
    buckets: HashMap<String, Vec<ScheduleInterval>>,
}

impl RoomTimeIndex {
    /// 由已落库快照构建索引
    pub fn build<I>(existing: I) -> Self
    where
        I: IntoIterator<Item = ScheduleInterval>,
    {
        let mut index = Self::default();
        for interval in existing {
            index.insert(interval);
        }
        index
    }

    /// 查询教室的占用区间（按插入顺序，可能为空）
    pub fn lookup(&self, room_key: &str) -> &[ScheduleInterval] {
        self.buckets
            .get(room_key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// 追加占用区间
    pub fn insert(&mut self, interval: ScheduleInterval) {
        self.buckets
            .entry(interval.room_key.clone())
            .or_default()
            .push(interval);
    }

    /// 区间总数
    pub fn interval_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn room_count(&self) -> usize {
        self.buckets.len()
    }
}
