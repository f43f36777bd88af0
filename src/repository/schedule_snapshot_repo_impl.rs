// ==========================================
// 课表排课系统 - 课表快照 Repository 实现
// ==========================================
// 职责: 从 schedules / programs 表读取只读快照（使用 rusqlite）
// 说明: 无法解析的已落库行跳过并告警，不中断调用
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::program::Program;
use crate::domain::schedule::ScheduleInterval;
use crate::domain::types::{parse_time_of_day, Weekday};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::schedule_snapshot_repo::ScheduleSnapshotRepository;
use async_trait::async_trait;
use rusqlite::Connection;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

/// schedules 表原始行
struct CommittedRow {
    id: i64,
    room_id: String,
    day: String,
    start_time: String,
    end_time: String,
}

impl CommittedRow {
    fn into_interval(self) -> Option<ScheduleInterval> {
        let day = Weekday::from_label(&self.day)?;
        let start = parse_time_of_day(&self.start_time)?;
        let end = parse_time_of_day(&self.end_time)?;
        if start >= end {
            return None;
        }
        Some(ScheduleInterval::committed(self.id, self.room_id, day, start, end))
    }
}

pub struct ScheduleSnapshotRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl ScheduleSnapshotRepositoryImpl {
    /// 创建新的 Repository 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn query_committed_rows(&self) -> RepositoryResult<Vec<CommittedRow>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, room_id, day, start_time, end_time
            FROM schedules
            ORDER BY id
            "#,
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok(CommittedRow {
                    id: row.get(0)?,
                    room_id: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    day: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                    start_time: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                    end_time: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }
}

#[async_trait]
impl ScheduleSnapshotRepository for ScheduleSnapshotRepositoryImpl {
    async fn list_committed_intervals(&self) -> RepositoryResult<Vec<ScheduleInterval>> {
        let rows = self.query_committed_rows()?;
        let total = rows.len();

        let mut intervals = Vec::with_capacity(total);
        for row in rows {
            let id = row.id;
            match row.into_interval() {
                Some(interval) => intervals.push(interval),
                None => warn!(schedule_id = id, "已落库课表无法解析星期/时刻，已跳过"),
            }
        }

        debug!(total, loaded = intervals.len(), "已读取课表快照");
        Ok(intervals)
    }

    async fn list_programs(&self) -> RepositoryResult<Vec<Program>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT id, name_th FROM programs ORDER BY id")?;

        let programs = stmt
            .query_map([], |row| {
                Ok(Program::new(
                    row.get(0)?,
                    row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(programs)
    }
}
