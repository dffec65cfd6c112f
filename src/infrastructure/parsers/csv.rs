// ============================================================
// CSV DECODER
// ============================================================
// Decode CSV exports into raw rows keyed by the header line

use csv::{ReaderBuilder, StringRecord, Trim};
use serde_json::Value;

use crate::domain::error::AppError;
use crate::domain::lead::RawRow;

/// CSV decoder with delimiter and encoding detection
pub struct CsvDecoder {
    /// Delimiter character (default: comma)
    delimiter: u8,

    /// Whether to trim whitespace from values
    trim: bool,
}

impl Default for CsvDecoder {
    fn default() -> Self {
        Self {
            delimiter: b',',
            trim: true,
        }
    }
}

impl CsvDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Decode raw file bytes with automatic delimiter detection.
    pub fn decode_bytes(bytes: &[u8]) -> Result<Vec<Value>, AppError> {
        let content = decode_text(bytes);
        let delimiter = Self::detect_delimiter(&content);
        Self::default()
            .with_delimiter(delimiter)
            .parse_content(&content)
    }

    /// Parse CSV content into header-keyed rows.
    pub fn parse_content(&self, content: &str) -> Result<Vec<Value>, AppError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(if self.trim { Trim::All } else { Trim::None })
            .flexible(true) // Allow rows with different lengths
            .from_reader(content.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| AppError::ParseError(format!("Failed to read CSV headers: {}", e)))?
            .clone();

        let mut rows = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                AppError::ParseError(format!("Failed to parse CSV row {}: {}", index + 1, e))
            })?;
            rows.push(Value::Object(record_to_row(&headers, &record)));
        }

        Ok(rows)
    }

    /// Detect delimiter from content (comma, semicolon, tab, pipe).
    ///
    /// Scored by per-line frequency and consistency over a sample of lines;
    /// Brazilian spreadsheet exports are semicolon-separated more often
    /// than not.
    pub fn detect_delimiter(content: &str) -> u8 {
        let candidates = [b',', b';', b'\t', b'|'];
        let sample_lines: Vec<_> = content.lines().take(10).collect();

        let mut best_delimiter = b',';
        let mut best_score = 0.0f32;

        for &delimiter in &candidates {
            if sample_lines.is_empty() {
                continue;
            }

            let field_counts: Vec<usize> = sample_lines
                .iter()
                .map(|line| line.bytes().filter(|&b| b == delimiter).count())
                .collect();

            let avg = field_counts.iter().sum::<usize>() as f32 / field_counts.len() as f32;
            let variance = field_counts
                .iter()
                .map(|&x| (x as f32 - avg).powi(2))
                .sum::<f32>()
                / field_counts.len() as f32;

            let score = avg / (1.0 + variance.sqrt());
            if score > best_score {
                best_score = score;
                best_delimiter = delimiter;
            }
        }

        best_delimiter
    }
}

/// Decode bytes to text: UTF-8 when valid, Windows-1252 otherwise (the
/// encoding legacy Excel CSV exports actually use).
fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(content) => content.to_string(),
        Err(_) => {
            let (content, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            content.into_owned()
        }
    }
}

fn record_to_row(headers: &StringRecord, record: &StringRecord) -> RawRow {
    let mut row = RawRow::new();
    for (idx, header) in headers.iter().enumerate() {
        let value = record.get(idx).unwrap_or("");
        row.insert(header.to_string(), Value::String(value.to_string()));
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_csv() {
        let content = "Nome,Telefone\nAna,(11) 98888-7777\nBia,";
        let rows = CsvDecoder::new().parse_content(content).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Nome"], "Ana");
        assert_eq!(rows[0]["Telefone"], "(11) 98888-7777");
        assert_eq!(rows[1]["Telefone"], "");
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(CsvDecoder::detect_delimiter("a,b,c\nd,e,f"), b',');
        assert_eq!(CsvDecoder::detect_delimiter("a;b;c\nd;e;f"), b';');
        assert_eq!(CsvDecoder::detect_delimiter("a\tb\nc\td"), b'\t');
    }

    #[test]
    fn test_decode_bytes_detects_semicolons() {
        let rows = CsvDecoder::decode_bytes(b"Nome;Telefone\nAna;11988887777").unwrap();
        assert_eq!(rows[0]["Nome"], "Ana");
    }

    #[test]
    fn test_decode_windows_1252_bytes() {
        // "Conceição" in Windows-1252: ç=0xE7, ã=0xE3, invalid as UTF-8
        let mut bytes = b"Nome\nConcei".to_vec();
        bytes.extend([0xE7, 0xE3, 0x6F]);
        let rows = CsvDecoder::decode_bytes(&bytes).unwrap();
        assert_eq!(rows[0]["Nome"], "Conceição");
    }

    #[test]
    fn test_short_rows_are_padded() {
        let content = "Nome,Telefone\nAna";
        let rows = CsvDecoder::new().parse_content(content).unwrap();
        assert_eq!(rows[0]["Telefone"], "");
    }
}
