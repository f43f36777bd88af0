// ==========================================
// 课表排课系统 - 单元格清洗
// ==========================================
// 职责: TRIM / NULL 标准化 / 数值回退 / 时刻与星期解析
// 原则: 清洗失败不报错，由调用方决定回退值或行级诊断
// ==========================================

use crate::domain::types::{parse_time_of_day, Weekday};
use chrono::NaiveTime;

pub struct DataCleaner;

impl DataCleaner {
    /// TRIM
    pub fn clean_text(&self, value: &str) -> String {
        value.trim().to_string()
    }

    /// 标准化 NULL 值（空字符串/空白 → None）
    pub fn normalize_null(&self, value: &str) -> Option<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// 解析整数，空白或无法解析时回退为 0
    ///
    /// 工作簿数值单元格可能渲染为 "3.0"，整数值的浮点写法同样接受
    pub fn parse_int_or_zero(&self, value: &str) -> i32 {
        let trimmed = value.trim();
        if let Ok(v) = trimmed.parse::<i32>() {
            return v;
        }
        match trimmed.parse::<f64>() {
            Ok(f) if f.is_finite() && f.fract() == 0.0 && f.abs() <= i32::MAX as f64 => f as i32,
            _ => 0,
        }
    }

    /// 解析可空时刻
    ///
    /// # 返回
    /// - Ok(None): 空白
    /// - Ok(Some): 解析成功
    /// - Err(原值): 非空但无法解析
    pub fn parse_optional_time(&self, value: &str) -> Result<Option<NaiveTime>, String> {
        match self.normalize_null(value) {
            None => Ok(None),
            Some(v) => parse_time_of_day(&v).map(Some).ok_or(v),
        }
    }

    /// 解析星期
    ///
    /// # 返回
    /// - Err(原值): 无法识别（含空白）
    pub fn parse_day(&self, value: &str) -> Result<Weekday, String> {
        Weekday::from_label(value).ok_or_else(|| self.clean_text(value))
    }
}
