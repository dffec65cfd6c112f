// ============================================================
// SPREADSHEET DECODER
// ============================================================
// Decode XLSX/XLS workbooks into raw rows keyed by the header row

use std::io::Cursor;

use calamine::{Data, Range, Reader, Xls, Xlsx};
use serde_json::Value;

use crate::domain::error::AppError;
use crate::domain::lead::RawRow;

/// Decode an XLSX workbook. Only the first sheet is read; lead exports put
/// their data there and further sheets are pivot/chart noise.
pub fn decode_xlsx_bytes(bytes: &[u8]) -> Result<Vec<Value>, AppError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| AppError::ParseError(format!("Failed to open Excel file: {}", e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::ParseError("No worksheet found".to_string()))?
        .map_err(|e| AppError::ParseError(format!("Failed to read Excel range: {}", e)))?;

    Ok(range_to_rows(&range))
}

/// Decode a legacy XLS workbook, first sheet only.
pub fn decode_xls_bytes(bytes: &[u8]) -> Result<Vec<Value>, AppError> {
    let mut workbook: Xls<_> = Xls::new(Cursor::new(bytes))
        .map_err(|e| AppError::ParseError(format!("Failed to open Excel file: {}", e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::ParseError("No worksheet found".to_string()))?
        .map_err(|e| AppError::ParseError(format!("Failed to read Excel range: {}", e)))?;

    Ok(range_to_rows(&range))
}

fn range_to_rows(range: &Range<Data>) -> Vec<Value> {
    let mut rows_iter = range.rows();
    let Some(header_cells) = rows_iter.next() else {
        return Vec::new();
    };

    let headers: Vec<String> = header_cells
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let text = cell_to_text(cell);
            if text.trim().is_empty() {
                format!("col{}", idx)
            } else {
                text
            }
        })
        .collect();

    rows_iter
        .filter_map(|cells| {
            let mut row = RawRow::new();
            let mut has_content = false;
            for (idx, header) in headers.iter().enumerate() {
                let text = cells.get(idx).map(cell_to_text).unwrap_or_default();
                if !text.trim().is_empty() {
                    has_content = true;
                }
                row.insert(header.clone(), Value::String(text));
            }
            has_content.then(|| Value::Object(row))
        })
        .collect()
}

/// Stringify a cell. Integral floats print without the trailing `.0`:
/// phone columns come out of Excel as numbers and must keep their digits.
fn cell_to_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 9e18 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        other => format!("{}", other),
    }
}
