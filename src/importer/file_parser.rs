// ==========================================
// 赛事数据导入 - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xls，首个工作表) / CSV (.csv)
// 输出: Vec<RawRow>，保留列顺序，供行规整器按表头或列位置取值
// 说明: 完全空白的行保留原位（由行规整器判定为空行跳过），
//       以保证错误信息中的行号与表格一致
//       CSV 中非 UTF-8 的单元格按空值读取，整份文件照常导入
// ==========================================

use crate::domain::RawRow;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::event_importer_trait::FileParser;
use calamine::{open_workbook_auto, Reader};
use csv::{ByteRecord, ReaderBuilder};
use std::path::Path;
use tracing::debug;

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// 按表头组装一行；超出表头宽度的列以空表头保留（仅可按位置访问）
fn build_row<I>(headers: &[String], values: I) -> RawRow
where
    I: IntoIterator<Item = String>,
{
    let mut row = RawRow::new();
    for (col_idx, value) in values.into_iter().enumerate() {
        let header = headers.get(col_idx).cloned().unwrap_or_default();
        row.push(header, value.trim());
    }
    row
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_rows(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let bytes = std::fs::read(file_path)?;
        let lines = LineIndex::new(&bytes);
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(bytes.as_slice());

        let headers: Vec<String> = reader
            .byte_headers()?
            .iter()
            .map(|h| decode_field(h).trim().to_string())
            .collect();

        // csv 会跳过完全空白的行，按行号差补回空行
        let mut last_line = lines.last_line_before(reader.position().byte());
        let mut rows = Vec::new();
        let mut record = ByteRecord::new();
        loop {
            let start = reader.position().byte();
            if !reader.read_byte_record(&mut record)? {
                break;
            }

            let first_line = lines.first_content_line(start);
            for _ in (last_line + 1)..first_line {
                rows.push(RawRow::new());
            }
            last_line = lines.last_line_before(reader.position().byte());

            rows.push(build_row(&headers, record.iter().map(decode_field)));
        }

        Ok(rows)
    }
}

/// 非 UTF-8 单元格按空值处理，不影响同行其他列和其他行
fn decode_field(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(value) => value.to_string(),
        Err(e) => {
            debug!(error = %e, "单元格不是合法 UTF-8，按空值处理");
            String::new()
        }
    }
}

/// 字节偏移 → 行号（1 起）
struct LineIndex<'a> {
    bytes: &'a [u8],
    newlines: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        let newlines = bytes
            .iter()
            .enumerate()
            .filter(|(_, b)| **b == b'\n')
            .map(|(idx, _)| idx)
            .collect();
        Self { bytes, newlines }
    }

    fn line_at(&self, offset: usize) -> u64 {
        self.newlines.partition_point(|&nl| nl < offset) as u64 + 1
    }

    /// 记录结束偏移（可能含行终止符）之前最后一个字节所在行
    fn last_line_before(&self, end: u64) -> u64 {
        self.line_at((end as usize).saturating_sub(1))
    }

    /// 从 start 起跳过行终止符后，第一个内容字节所在行
    fn first_content_line(&self, start: u64) -> u64 {
        let offset = self.bytes[(start as usize).min(self.bytes.len())..]
            .iter()
            .position(|b| *b != b'\n' && *b != b'\r')
            .map_or(self.bytes.len(), |skip| start as usize + skip);
        self.line_at(offset)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_to_raw_rows(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(file_path)?;

        // 只读取第一个 sheet
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;

        // 提取表头（第一行）
        let mut sheet_rows = range.rows();
        let headers: Vec<String> = match sheet_rows.next() {
            Some(header_row) => header_row
                .iter()
                .map(|cell| cell.to_string().trim().to_string())
                .collect(),
            None => return Ok(Vec::new()),
        };

        let rows = sheet_rows
            .map(|data_row| build_row(&headers, data_row.iter().map(|cell| cell.to_string())))
            .collect();

        Ok(rows)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl FileParser for UniversalFileParser {
    fn parse_to_raw_rows(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        match extension_of(file_path).as_str() {
            "csv" => CsvParser.parse_to_raw_rows(file_path),
            "xlsx" | "xls" => ExcelParser.parse_to_raw_rows(file_path),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}
