// ==========================================
// 课表排课系统 - 课表表格列布局
// ==========================================
// 依据: 教务处课表导出格式（单工作表，29 列）
// 约束: 所有列下标只在此处定义，布局变更只改这一张表
// ==========================================

/// 课表导出的列下标（从 0 开始）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub column_count: usize,

    // ===== 课程信息 =====
    pub course_id: usize,
    pub program_name: usize,
    pub session_type: usize,
    pub group: usize,
    pub pair_group: usize,
    pub student_count: usize,
    pub lecturer: usize,

    // ===== 上课时间与地点 =====
    pub day: usize,
    pub start_time: usize,
    pub end_time: usize,
    pub building_code: usize, // 与 room_number 拼接为 room_key
    pub room_number: usize,

    // ===== 期中考试 =====
    pub midterm_date: usize,
    pub midterm_start: usize,
    pub midterm_end: usize,

    // ===== 期末考试 =====
    pub final_date: usize,
    pub final_start: usize,
    pub final_end: usize,
}

/// 当前课表导出布局
pub const SCHEDULE_EXPORT_LAYOUT: ColumnLayout = ColumnLayout {
    column_count: 29,

    course_id: 0,
    program_name: 3,
    session_type: 5,
    group: 6,
    pair_group: 7,
    student_count: 8,
    lecturer: 9,

    day: 10,
    start_time: 11,
    end_time: 12,
    building_code: 13,
    room_number: 15,

    midterm_date: 17,
    midterm_start: 18,
    midterm_end: 19,

    final_date: 21,
    final_start: 22,
    final_end: 23,
};

impl Default for ColumnLayout {
    fn default() -> Self {
        SCHEDULE_EXPORT_LAYOUT
    }
}

impl ColumnLayout {
    /// 布局中引用的最大列下标
    pub fn max_index(&self) -> usize {
        [
            self.course_id,
            self.program_name,
            self.session_type,
            self.group,
            self.pair_group,
            self.student_count,
            self.lecturer,
            self.day,
            self.start_time,
            self.end_time,
            self.building_code,
            self.room_number,
            self.midterm_date,
            self.midterm_start,
            self.midterm_end,
            self.final_date,
            self.final_start,
            self.final_end,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }

    /// 存放时刻的列（上课 + 期中 + 期末）
    pub fn time_columns(&self) -> [usize; 6] {
        [
            self.start_time,
            self.end_time,
            self.midterm_start,
            self.midterm_end,
            self.final_start,
            self.final_end,
        ]
    }
}
