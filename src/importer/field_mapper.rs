// ==========================================
// 课表排课系统 - 字段映射器实现
// ==========================================
// 依据: ColumnLayout（固定列位置）
// 职责: 原始行 → CandidateRecord + 类型转换 + 行级诊断
// ==========================================

use crate::domain::program::ProgramLookup;
use crate::domain::schedule::{CandidateRecord, ExamKind, ExamWindow, RowProblem};
use crate::importer::column_layout::ColumnLayout;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::era_calendar::{local_era_to_iso, DEFAULT_ERA_OFFSET};
use crate::importer::file_parser::RawRow;
use crate::importer::schedule_importer_trait::RecordMapper;
use chrono::NaiveTime;

pub struct FieldMapper {
    layout: ColumnLayout,
    era_offset: i32,
    cleaner: DataCleaner,
}

impl FieldMapper {
    pub fn new(layout: ColumnLayout, era_offset: i32) -> Self {
        Self {
            layout,
            era_offset,
            cleaner: DataCleaner,
        }
    }

    /// 上课时刻，空白与无法解析同样记为诊断
    fn class_time(
        &self,
        row: &RawRow,
        index: usize,
        field: &'static str,
        problems: &mut Vec<RowProblem>,
    ) -> Option<NaiveTime> {
        let raw = row.cell(index);
        match self.cleaner.parse_optional_time(raw) {
            Ok(Some(time)) => Some(time),
            Ok(None) => {
                problems.push(RowProblem::InvalidTime {
                    field,
                    value: String::new(),
                });
                None
            }
            Err(value) => {
                problems.push(RowProblem::InvalidTime { field, value });
                None
            }
        }
    }

    /// 考试时间窗
    ///
    /// - 日期空白 → None（时刻一并忽略）
    /// - 日期无法转换 → 诊断 + None
    /// - 时刻无法解析 → 诊断，该时刻置空，时间窗保留
    fn exam_window(
        &self,
        row: &RawRow,
        exam: ExamKind,
        (date_idx, start_idx, end_idx): (usize, usize, usize),
        problems: &mut Vec<RowProblem>,
    ) -> Option<ExamWindow> {
        let date = match local_era_to_iso(row.cell(date_idx), self.era_offset) {
            Ok(Some(date)) => date,
            Ok(None) => return None,
            Err(_) => {
                problems.push(RowProblem::InvalidExamDate {
                    exam,
                    value: self.cleaner.clean_text(row.cell(date_idx)),
                });
                return None;
            }
        };

        let mut exam_time = |index: usize| match self.cleaner.parse_optional_time(row.cell(index)) {
            Ok(time) => time,
            Err(value) => {
                problems.push(RowProblem::InvalidExamTime { exam, value });
                None
            }
        };
        let start_time = exam_time(start_idx);
        let end_time = exam_time(end_idx);

        Some(ExamWindow {
            date,
            start_time,
            end_time,
        })
    }
}

impl Default for FieldMapper {
    fn default() -> Self {
        Self::new(ColumnLayout::default(), DEFAULT_ERA_OFFSET)
    }
}

impl RecordMapper for FieldMapper {
    fn map_to_candidate(&self, row: &RawRow, programs: &ProgramLookup) -> Option<CandidateRecord> {
        let layout = &self.layout;

        // 课程号为空 → 空行/分隔行，整行跳过
        let course_id = self.cleaner.normalize_null(row.cell(layout.course_id))?;

        let mut problems = Vec::new();

        let day = match self.cleaner.parse_day(row.cell(layout.day)) {
            Ok(day) => Some(day),
            Err(value) => {
                problems.push(RowProblem::UnknownDay(value));
                None
            }
        };

        let start_time = self.class_time(row, layout.start_time, "start", &mut problems);
        let end_time = self.class_time(row, layout.end_time, "end", &mut problems);
        if let (Some(start), Some(end)) = (start_time, end_time) {
            if start >= end {
                problems.push(RowProblem::InvalidTimeRange { start, end });
            }
        }

        let room_key = format!(
            "{}{}",
            self.cleaner.clean_text(row.cell(layout.building_code)),
            self.cleaner.clean_text(row.cell(layout.room_number))
        );

        let midterm = self.exam_window(
            row,
            ExamKind::Midterm,
            (layout.midterm_date, layout.midterm_start, layout.midterm_end),
            &mut problems,
        );
        let final_exam = self.exam_window(
            row,
            ExamKind::Final,
            (layout.final_date, layout.final_start, layout.final_end),
            &mut problems,
        );

        Some(CandidateRecord {
            source_file: None,
            row_number: row.row_number,

            course_id,
            program_id: programs
                .resolve(row.cell(layout.program_name))
                .unwrap_or(0),
            session_type: self.cleaner.clean_text(row.cell(layout.session_type)),
            group: self.cleaner.parse_int_or_zero(row.cell(layout.group)),
            pair_group: self.cleaner.parse_int_or_zero(row.cell(layout.pair_group)),
            student_count: self.cleaner.parse_int_or_zero(row.cell(layout.student_count)),
            lecturer: self.cleaner.clean_text(row.cell(layout.lecturer)),

            day,
            start_time,
            end_time,
            room_key,

            midterm,
            final_exam,

            problems,
        })
    }
}
