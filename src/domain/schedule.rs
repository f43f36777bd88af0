// ==========================================
// 课表排课系统 - 课表领域模型
// ==========================================
// 职责: 占用区间 / 候选记录 / 直接提交记录 / 导入报告
// 生命周期: 全部为单次调用内的值对象，不跨调用共享
// ==========================================

use crate::domain::types::{parse_time_of_day, Weekday};
use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// 批次内（尚未落库）区间的哨兵 ID
pub const IN_BATCH_ID: i64 = -1;

// ==========================================
// ScheduleInterval - 教室占用区间
// ==========================================
// 不变量: start_time < end_time（进入索引前保证）
// id >= 0: 已落库课表; id < 0: 本批次候选
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleInterval {
    pub id: i64,
    pub room_key: String,
    pub day: Weekday,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
}

impl ScheduleInterval {
    /// 已落库课表
    pub fn committed(
        id: i64,
        room_key: impl Into<String>,
        day: Weekday,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Self {
        Self {
            id,
            room_key: room_key.into(),
            day,
            start_time,
            end_time,
        }
    }

    /// 本批次候选（id = -1）
    pub fn in_batch(
        room_key: impl Into<String>,
        day: Weekday,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Self {
        Self::committed(IN_BATCH_ID, room_key, day, start_time, end_time)
    }

    pub fn is_committed(&self) -> bool {
        self.id >= 0
    }
}

// ==========================================
// ConflictSource - 冲突来源
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictSource {
    /// 与已落库课表冲突
    Committed { id: i64 },
    /// 与同一批次中较早的记录冲突（index 为批次内下标）
    InBatch { index: usize },
}

// ==========================================
// ExamKind / ExamWindow - 考试时间窗
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExamKind {
    Midterm,
    Final,
}

impl fmt::Display for ExamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExamKind::Midterm => write!(f, "midterm"),
            ExamKind::Final => write!(f, "final"),
        }
    }
}

/// 考试日期 + 时间窗
///
/// date 为 ISO 风格字符串（年-月-日），月/日按源数据原样保留，不补零。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamWindow {
    pub date: String,
    #[serde(default, with = "hhmm_opt")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, with = "hhmm_opt")]
    pub end_time: Option<NaiveTime>,
}

// ==========================================
// RowProblem - 行级诊断
// ==========================================
// 非致命：只标注，不中断整批导入
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowProblem {
    /// 与已落库课表时间重叠
    DuplicateWithCommitted { id: i64 },
    /// 与表格中较早的行时间重叠
    DuplicateWithinBatch,
    /// 星期无法识别
    UnknownDay(String),
    /// 上课时刻无法解析（field: start / end）
    InvalidTime { field: &'static str, value: String },
    /// 开始时刻不早于结束时刻
    InvalidTimeRange { start: NaiveTime, end: NaiveTime },
    /// 考试日期无法转换
    InvalidExamDate { exam: ExamKind, value: String },
    /// 考试时刻无法解析
    InvalidExamTime { exam: ExamKind, value: String },
}

impl RowProblem {
    pub fn is_time_conflict(&self) -> bool {
        matches!(
            self,
            RowProblem::DuplicateWithCommitted { .. } | RowProblem::DuplicateWithinBatch
        )
    }
}

impl fmt::Display for RowProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowProblem::DuplicateWithCommitted { id } => write!(f, "duplicate time with id:{}", id),
            RowProblem::DuplicateWithinBatch => write!(f, "duplicate time with some row in excel"),
            RowProblem::UnknownDay(value) => write!(f, "unknown day: {}", value),
            RowProblem::InvalidTime { field, value } => {
                write!(f, "invalid {} time: {}", field, value)
            }
            RowProblem::InvalidTimeRange { start, end } => write!(
                f,
                "start time {} is not before end time {}",
                start.format("%H:%M"),
                end.format("%H:%M")
            ),
            RowProblem::InvalidExamDate { exam, value } => {
                write!(f, "invalid {} date: {}", exam, value)
            }
            RowProblem::InvalidExamTime { exam, value } => {
                write!(f, "invalid {} time: {}", exam, value)
            }
        }
    }
}

// 对外统一以字符串输出
impl Serialize for RowProblem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ==========================================
// CandidateRecord - 表格行解析结果
// ==========================================
// 用途: 导入预览，交由人工审核后再提交
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateRecord {
    // ===== 元信息 =====
    pub source_file: Option<String>, // 来源文件名
    pub row_number: usize,           // 原始表格行号（表头为第 1 行）

    // ===== 课程信息 =====
    pub course_id: String,
    pub program_id: i64, // 0 = 专业名称未匹配
    #[serde(rename = "type")]
    pub session_type: String,
    pub group: i32,
    pub pair_group: i32,
    pub student_count: i32,
    pub lecturer: String,

    // ===== 上课时间与地点 =====
    pub day: Option<Weekday>,
    #[serde(with = "hhmm_opt")]
    pub start_time: Option<NaiveTime>,
    #[serde(with = "hhmm_opt")]
    pub end_time: Option<NaiveTime>,
    pub room_key: String,

    // ===== 考试 =====
    pub midterm: Option<ExamWindow>,
    pub final_exam: Option<ExamWindow>,

    // ===== 诊断 =====
    pub problems: Vec<RowProblem>,
}

impl CandidateRecord {
    /// 本行对应的占用区间（id = -1）
    ///
    /// 星期/时刻缺失或 start >= end 时返回 None，此类行不参与冲突检测
    pub fn interval(&self) -> Option<ScheduleInterval> {
        let day = self.day?;
        let start = self.start_time?;
        let end = self.end_time?;
        if start >= end {
            return None;
        }
        Some(ScheduleInterval::in_batch(self.room_key.clone(), day, start, end))
    }

    pub fn has_problems(&self) -> bool {
        !self.problems.is_empty()
    }

    pub fn has_time_conflict(&self) -> bool {
        self.problems.iter().any(RowProblem::is_time_conflict)
    }

    pub fn problem_messages(&self) -> Vec<String> {
        self.problems.iter().map(|p| p.to_string()).collect()
    }

    /// 转换为直接提交记录（人工审核后提交使用）
    ///
    /// # 返回
    /// - None: 星期或时刻未能解析
    pub fn to_submission(&self) -> Option<ScheduleSubmission> {
        Some(ScheduleSubmission {
            course_id: self.course_id.clone(),
            program_id: self.program_id,
            session_type: self.session_type.clone(),
            group: self.group,
            pair_group: self.pair_group,
            student_count: self.student_count,
            lecturer: self.lecturer.clone(),
            day: self.day?,
            start_time: self.start_time?,
            end_time: self.end_time?,
            room_key: self.room_key.clone(),
            midterm: self.midterm.clone(),
            final_exam: self.final_exam.clone(),
        })
    }
}

// ==========================================
// ScheduleSubmission - 直接提交的结构化记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSubmission {
    pub course_id: String,
    pub program_id: i64,
    #[serde(rename = "type")]
    pub session_type: String,
    pub group: i32,
    pub pair_group: i32,
    pub student_count: i32,
    pub lecturer: String,
    pub day: Weekday,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub room_key: String,
    #[serde(default)]
    pub midterm: Option<ExamWindow>,
    #[serde(default)]
    pub final_exam: Option<ExamWindow>,
}

impl ScheduleSubmission {
    /// 本记录对应的占用区间（id = -1）
    pub fn interval(&self) -> ScheduleInterval {
        ScheduleInterval::in_batch(
            self.room_key.clone(),
            self.day,
            self.start_time,
            self.end_time,
        )
    }

    /// 落库前标准化: 考试日期为空 → 整个考试时间窗置空
    pub fn normalized(mut self) -> Self {
        self.midterm = self.midterm.filter(|w| !w.date.trim().is_empty());
        self.final_exam = self.final_exam.filter(|w| !w.date.trim().is_empty());
        self
    }
}

// ==========================================
// ConflictDetail - 直接提交冲突明细
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictDetail {
    pub record: ScheduleSubmission,
    pub conflict_with: ConflictSource,
}

// ==========================================
// ImportSummary / ImportReport - 导入报告
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub total_rows: usize,    // 数据行总数（不含表头）
    pub skipped_rows: usize,  // 课程号为空被跳过的行
    pub emitted_rows: usize,  // 输出记录数
    pub problem_rows: usize,  // 带诊断的记录数
    pub conflict_rows: usize, // 带时间冲突诊断的记录数
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub batch_id: String,
    pub files: Vec<String>,
    pub records: Vec<CandidateRecord>,
    pub summary: ImportSummary,
    pub elapsed_ms: u64,
}

// ==========================================
// 时刻序列化（HH:MM，反序列化兼容 HH:MM:SS / H.MM）
// ==========================================
mod hhmm {
    use super::*;

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format("%H:%M"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_time_of_day(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("无效时刻: {}", raw)))
    }
}

mod hhmm_opt {
    use super::*;

    pub fn serialize<S: Serializer>(
        time: &Option<NaiveTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match time {
            Some(t) => serializer.collect_str(&t.format("%H:%M")),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveTime>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => parse_time_of_day(value)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("无效时刻: {}", value))),
        }
    }
}
