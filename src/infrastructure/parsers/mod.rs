// ============================================================
// IMPORT DECODERS
// ============================================================
// File reading and per-format decoding into raw row sequences

mod csv;
mod json;
mod xlsx;

use std::path::Path;

use serde_json::Value;

use crate::domain::error::{AppError, Result};

pub use self::csv::CsvDecoder;
pub use self::json::{decode_json_bytes, extract_rows, CONTAINER_KEYS};
pub use self::xlsx::{decode_xls_bytes, decode_xlsx_bytes};

/// Read an import file and decode it into raw rows.
///
/// The whole file is read in one await; a failed read or undecodable
/// content is one terminal error for the import, never partial rows.
pub async fn decode_file(path: &Path) -> Result<Vec<Value>> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| AppError::IoError(format!("Failed to read {}: {}", path.display(), e)))?;

    tracing::info!(file = %path.display(), size = bytes.len(), "decoding import file");
    decode_bytes(path, &bytes)
}

/// Decode already-read file bytes based on the file extension.
pub fn decode_bytes(path: &Path, bytes: &[u8]) -> Result<Vec<Value>> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "json" => decode_json_bytes(bytes),
        "csv" => CsvDecoder::decode_bytes(bytes),
        "xlsx" => decode_xlsx_bytes(bytes),
        "xls" => decode_xls_bytes(bytes),
        other => Err(AppError::ValidationError(format!(
            "Unsupported file format '{}', expected .xlsx, .xls, .csv or .json",
            other
        ))),
    }
}
