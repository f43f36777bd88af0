// ==========================================
// 课表排课系统 - 本地纪年日期转换
// ==========================================
// 输入: "D/M/Y"，Y 为本地纪年（= 公历年 + 543）
// 输出: "Y-M-D"，Y 换算为公历；月/日原样保留，不补零、不校验日历合法性
// 空白输入: 视为无日期（None），不生成非法日期串
// ==========================================

use thiserror::Error;

/// 本地纪年与公历的差值
pub const DEFAULT_ERA_OFFSET: i32 = 543;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EraDateError {
    #[error("日期应为 D/M/Y 三段: {0}")]
    WrongShape(String),

    #[error("年份不是整数: {0}")]
    InvalidYear(String),
}

/// 本地纪年日期 → ISO 风格日期串
///
/// # 示例
/// - "15/3/2566" → Some("2023-3-15")
/// - "" → None
///
/// # 返回
/// - Ok(None): 空白输入
/// - Err: 非空但无法转换
pub fn local_era_to_iso(raw: &str, era_offset: i32) -> Result<Option<String>, EraDateError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let parts: Vec<&str> = trimmed.split('/').map(str::trim).collect();
    let [day, month, year] = parts.as_slice() else {
        return Err(EraDateError::WrongShape(trimmed.to_string()));
    };
    if day.is_empty() || month.is_empty() {
        return Err(EraDateError::WrongShape(trimmed.to_string()));
    }

    let local_year: i32 = year
        .parse()
        .map_err(|_| EraDateError::InvalidYear(year.to_string()))?;

    Ok(Some(format!("{}-{}-{}", local_year - era_offset, month, day)))
}

/// 公历年 → 本地纪年（工作簿原生日期单元格渲染时使用）
pub fn to_local_era_year(gregorian_year: i32, era_offset: i32) -> i32 {
    gregorian_year + era_offset
}
