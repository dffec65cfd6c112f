// ============================================================
// JSON DECODER
// ============================================================
// Unwrap scraper JSON dumps into a row sequence

use serde_json::Value;

use crate::domain::error::AppError;

/// Array-valued properties scrapers wrap their row list in, tried in order.
pub const CONTAINER_KEYS: &[&str] = &[
    "data", "items", "users", "profiles", "leads", "results", "places",
];

/// Parse raw JSON bytes and unwrap the row sequence.
pub fn decode_json_bytes(bytes: &[u8]) -> Result<Vec<Value>, AppError> {
    let parsed: Value = serde_json::from_slice(bytes)
        .map_err(|e| AppError::ParseError(format!("Failed to parse JSON file: {}", e)))?;
    Ok(extract_rows(parsed))
}

/// Locate the row array inside a decoded JSON document.
///
/// A top-level array is the row sequence itself. A top-level object is
/// searched for a well-known container property first, then for any
/// array-valued property. Anything else decodes to no rows; malformed
/// elements inside the array are kept (the resolver skips non-objects).
pub fn extract_rows(parsed: Value) -> Vec<Value> {
    match parsed {
        Value::Array(rows) => rows,
        Value::Object(map) => {
            for key in CONTAINER_KEYS {
                if let Some(Value::Array(rows)) = map.get(*key) {
                    return rows.clone();
                }
            }
            map.into_iter()
                .find_map(|(_, value)| match value {
                    Value::Array(rows) => Some(rows),
                    _ => None,
                })
                .unwrap_or_default()
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_top_level_array() {
        let rows = extract_rows(json!([{"a": 1}, {"b": 2}]));
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_named_container_property() {
        let rows = extract_rows(json!({"total": 2, "results": [{"a": 1}]}));
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_container_order_beats_document_order() {
        // "places" appears first in the document but "data" wins the search
        let rows = extract_rows(json!({
            "places": [{"a": 1}, {"a": 2}],
            "data": [{"b": 1}]
        }));
        assert_eq!(rows, vec![json!({"b": 1})]);
    }

    #[test]
    fn test_first_array_property_fallback() {
        let rows = extract_rows(json!({
            "meta": {"page": 1},
            "records": [{"a": 1}],
            "extra": [{"b": 2}]
        }));
        assert_eq!(rows, vec![json!({"a": 1})]);
    }

    #[test]
    fn test_no_rows_anywhere() {
        assert!(extract_rows(json!({"meta": 1})).is_empty());
        assert!(extract_rows(json!("junk")).is_empty());
        assert!(extract_rows(json!(null)).is_empty());
    }

    #[test]
    fn test_decode_bytes_reports_malformed_json() {
        let err = decode_json_bytes(b"{not json").unwrap_err();
        assert!(matches!(err, AppError::ParseError(_)));
    }
}
