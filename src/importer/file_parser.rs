// ==========================================
// 课表排课系统 - 文件解析器实现
// ==========================================
// 阶段 0: 文件读取与解析
// 支持: Excel (.xlsx/.xls/.xlsm/.ods，仅第一个工作表) / CSV (.csv)
// 流程: 工作簿 → CSV 中间文本 → 统一 CSV 解码 → 表头列数校验 → 数据行
// ==========================================

use crate::importer::column_layout::SCHEDULE_EXPORT_LAYOUT;
use crate::importer::era_calendar::{to_local_era_year, DEFAULT_ERA_OFFSET};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::schedule_importer_trait::FileParser;
use calamine::{open_workbook_auto, Data, Reader};
use chrono::Datelike;
use csv::{ReaderBuilder, WriterBuilder};
use std::path::Path;
use tracing::debug;

// ==========================================
// RawRow - 原始数据行
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub row_number: usize, // 表格行号（表头为第 1 行）
    pub cells: Vec<String>,
}

impl RawRow {
    /// 按列下标取值，越界返回空串
    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.trim().is_empty())
    }
}

/// 解码 CSV 文本（CSV 上传与工作簿中间格式共用）
///
/// # 规则
/// - 去除 UTF-8 BOM
/// - 第一行为表头，列数必须等于 expected_columns，否则整体失败
/// - 表头丢弃，单元格 TRIM，完全空白的行跳过
pub fn decode_delimited(text: &str, expected_columns: usize) -> ImportResult<Vec<RawRow>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true) // 数据行长度允许与表头不一致
        .from_reader(text.as_bytes());

    let mut records = reader.records();
    let header = match records.next() {
        Some(result) => result?,
        None => return Err(ImportError::EmptySheet("缺少表头行".to_string())),
    };

    if header.len() != expected_columns {
        return Err(ImportError::WrongColumnLayout {
            expected: expected_columns,
            actual: header.len(),
        });
    }

    let mut rows = Vec::new();
    for (idx, result) in records.enumerate() {
        let record = result?;
        let row = RawRow {
            row_number: idx + 2,
            cells: record.iter().map(|v| v.trim().to_string()).collect(),
        };

        if row.is_blank() {
            continue;
        }
        rows.push(row);
    }

    Ok(rows)
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_rows(
        &self,
        file_path: &Path,
        expected_columns: usize,
    ) -> ImportResult<Vec<RawRow>> {
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }

        let text = std::fs::read_to_string(file_path)?;
        decode_delimited(&text, expected_columns)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser {
    era_offset: i32, // 原生日期单元格按本地纪年渲染
    time_columns: Vec<usize>, // 数值单元格按 H.MM 时刻渲染的列
}

impl ExcelParser {
    pub fn new(era_offset: i32) -> Self {
        Self {
            era_offset,
            time_columns: SCHEDULE_EXPORT_LAYOUT.time_columns().to_vec(),
        }
    }

    pub fn with_time_columns(mut self, time_columns: &[usize]) -> Self {
        self.time_columns = time_columns.to_vec();
        self
    }

    /// 读取第一个工作表并渲染为 CSV 文本
    pub fn render_first_sheet(&self, file_path: &Path) -> ImportResult<String> {
        let mut workbook = open_workbook_auto(file_path)?;

        let sheet_names = workbook.sheet_names();
        let sheet_name = sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;
        // 区域不一定从 A 列开始，左侧空列同样计入列布局
        let col_offset = range.start().map(|(_, col)| col as usize).unwrap_or(0);

        let mut writer = WriterBuilder::new().flexible(true).from_writer(Vec::new());
        for row in range.rows() {
            let mut cells = vec![String::new(); col_offset];
            cells.extend(
                row.iter()
                    .enumerate()
                    .map(|(idx, cell)| self.cell_to_text(cell, col_offset + idx)),
            );
            writer.write_record(&cells)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ImportError::InternalError(format!("CSV 中间格式写入失败: {}", e)))?;
        debug!(sheet = %sheet_name, bytes = bytes.len(), "工作表已渲染为 CSV");

        String::from_utf8(bytes).map_err(|e| ImportError::ExcelParseError(e.to_string()))
    }

    /// 单元格 → 文本
    ///
    /// - 纯时刻单元格 → "HH:MM"
    /// - 日期单元格 → "D/M/Y"（本地纪年）
    /// - 时刻列中的数值（9.30 / 13）→ "H:MM"
    fn cell_to_text(&self, cell: &Data, column: usize) -> String {
        let is_time_column = self.time_columns.contains(&column);
        match cell {
            Data::Empty => String::new(),
            Data::Float(value) if is_time_column => decimal_clock_text(*value),
            Data::Int(value) if is_time_column => decimal_clock_text(*value as f64),
            Data::String(s) => s.trim().to_string(),
            Data::DateTime(dt) => {
                let serial = dt.as_f64();
                match dt.as_datetime() {
                    Some(datetime) if dt.is_duration() || serial < 1.0 => {
                        datetime.format("%H:%M").to_string()
                    }
                    Some(datetime) => format!(
                        "{}/{}/{}",
                        datetime.day(),
                        datetime.month(),
                        to_local_era_year(datetime.year(), self.era_offset)
                    ),
                    None => serial.to_string(),
                }
            }
            other => other.to_string(),
        }
    }
}

/// 数值写法的时刻：整数部分为时，小数部分 ×100 为分
///
/// 9.3 → "9:30"，13 → "13:00"；分钟超出 0-59 时原样输出，交给字段映射报错
fn decimal_clock_text(value: f64) -> String {
    let hours = value.trunc();
    let minutes = ((value - hours) * 100.0).round();
    if value >= 0.0 && hours < 24.0 && minutes < 60.0 {
        format!("{}:{:02}", hours as u32, minutes as u32)
    } else {
        value.to_string()
    }
}

impl Default for ExcelParser {
    fn default() -> Self {
        Self::new(DEFAULT_ERA_OFFSET)
    }
}

impl FileParser for ExcelParser {
    fn parse_to_raw_rows(
        &self,
        file_path: &Path,
        expected_columns: usize,
    ) -> ImportResult<Vec<RawRow>> {
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }

        let text = self.render_first_sheet(file_path)?;
        decode_delimited(&text, expected_columns)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser {
    excel: ExcelParser,
    allowed_extensions: Vec<String>,
}

impl UniversalFileParser {
    pub fn new(era_offset: i32, allowed_extensions: Vec<String>) -> Self {
        Self {
            excel: ExcelParser::new(era_offset),
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|e| e.trim().trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    /// 指定工作簿中按时刻渲染的列
    pub fn with_time_columns(mut self, time_columns: &[usize]) -> Self {
        self.excel = self.excel.with_time_columns(time_columns);
        self
    }
}

impl FileParser for UniversalFileParser {
    fn parse_to_raw_rows(
        &self,
        file_path: &Path,
        expected_columns: usize,
    ) -> ImportResult<Vec<RawRow>> {
        let ext = file_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        if !self.allowed_extensions.contains(&ext) {
            return Err(ImportError::UnsupportedFormat(format!(
                "{}（允许: {}）",
                if ext.is_empty() { "无扩展名" } else { ext.as_str() },
                self.allowed_extensions.join(", ")
            )));
        }

        match ext.as_str() {
            "csv" => CsvParser.parse_to_raw_rows(file_path, expected_columns),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => {
                self.excel.parse_to_raw_rows(file_path, expected_columns)
            }
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}
