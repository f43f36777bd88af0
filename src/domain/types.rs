// ==========================================
// 课表排课系统 - 领域类型定义
// ==========================================
// 职责: 星期枚举 / 时刻解析
// 说明: 源表格中的星期可能是英文全称、英文缩写或泰文名称
// ==========================================

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 星期 (Weekday)
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// 从表格/数据库中的星期文本解析
    ///
    /// # 支持
    /// - 英文全称/缩写（大小写不敏感）: "Monday" / "MON" / "mo"
    /// - 泰文全称/缩写: "จันทร์" / "วันจันทร์" / "จ."
    /// - 序列化形式: "MONDAY"
    ///
    /// # 返回
    /// - None: 无法识别
    pub fn from_label(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let without_prefix = trimmed.strip_prefix("วัน").unwrap_or(trimmed);
        let label = without_prefix.trim_end_matches('.').trim().to_lowercase();

        let day = match label.as_str() {
            "monday" | "mon" | "mo" | "จันทร์" | "จ" => Weekday::Monday,
            "tuesday" | "tue" | "tues" | "tu" | "อังคาร" | "อ" => Weekday::Tuesday,
            "wednesday" | "wed" | "we" | "พุธ" | "พ" => Weekday::Wednesday,
            "thursday" | "thu" | "thur" | "thurs" | "th" | "พฤหัสบดี" | "พฤหัส" | "พฤ" => {
                Weekday::Thursday
            }
            "friday" | "fri" | "fr" | "ศุกร์" | "ศ" => Weekday::Friday,
            "saturday" | "sat" | "sa" | "เสาร์" | "ส" => Weekday::Saturday,
            "sunday" | "sun" | "su" | "อาทิตย์" | "อา" => Weekday::Sunday,
            _ => return None,
        };
        Some(day)
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Weekday::Monday => write!(f, "MONDAY"),
            Weekday::Tuesday => write!(f, "TUESDAY"),
            Weekday::Wednesday => write!(f, "WEDNESDAY"),
            Weekday::Thursday => write!(f, "THURSDAY"),
            Weekday::Friday => write!(f, "FRIDAY"),
            Weekday::Saturday => write!(f, "SATURDAY"),
            Weekday::Sunday => write!(f, "SUNDAY"),
        }
    }
}

impl FromStr for Weekday {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Weekday::from_label(s).ok_or_else(|| format!("无法识别的星期: {}", s))
    }
}

// ==========================================
// 时刻解析
// ==========================================

/// 解析一天内的时刻
///
/// # 支持格式
/// - "9:00" / "09:00" / "09:00:00"
/// - "9.00" / "9.30"（泰国课表常见写法，点号分隔）
///
/// 分、秒必须是两位数字："9.3" 既不是 9:30 也不是 9:03，按格式错误处理
///
/// # 返回
/// - None: 空白或格式错误（不做 12 小时制换算）
pub fn parse_time_of_day(raw: &str) -> Option<NaiveTime> {
    let normalized = raw.trim().replace('.', ":");
    if normalized.is_empty() {
        return None;
    }

    let parts: Vec<&str> = normalized.split(':').map(str::trim).collect();
    let (hour, rest) = parts.split_first()?;
    if !(1..=2).contains(&hour.len()) || !is_ascii_digits(hour) {
        return None;
    }
    if rest.is_empty() || rest.len() > 2 {
        return None;
    }
    if !rest.iter().all(|p| p.len() == 2 && is_ascii_digits(p)) {
        return None;
    }

    let hour = hour.parse::<u32>().ok()?;
    let minute = rest[0].parse::<u32>().ok()?;
    let second = match rest.get(1) {
        Some(s) => s.parse::<u32>().ok()?,
        None => 0,
    };

    NaiveTime::from_hms_opt(hour, minute, second)
}

fn is_ascii_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
