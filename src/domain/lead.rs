// ============================================================
// LEAD TYPES
// ============================================================
// Data structures representing imported and normalized leads

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One untyped record from a decoded import source.
///
/// Decoders produce this shape regardless of container format; the
/// normalization engine consumes nothing else.
pub type RawRow = Map<String, Value>;

/// Placeholder some sources ship instead of a real name.
pub const SOURCE_NAME_PLACEHOLDER: &str = "Sem Nome";

/// Display name assigned when neither name nor handle survives cleaning.
pub const NAME_FALLBACK: &str = "Lead sem nome";

/// Contact workflow status, owned by the presentation layer after import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    Pending,
    Contacted,
    Skipped,
    Prospect,
}

impl std::fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeadStatus::Pending => write!(f, "pending"),
            LeadStatus::Contacted => write!(f, "contacted"),
            LeadStatus::Skipped => write!(f, "skipped"),
            LeadStatus::Prospect => write!(f, "prospect"),
        }
    }
}

/// A normalized lead record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    /// Unique per import session (row index + creation instant)
    pub id: String,

    /// Display name, never empty after normalization
    pub name: String,

    /// Social handle, or a full profile URI when the source supplied one.
    /// Empty when nothing usable survived cleaning.
    pub username: String,

    /// Digit-only contact number, absent when cleaning failed
    pub phone: Option<String>,

    /// Untouched source value of the phone field, kept for audit
    pub original_phone: String,

    /// Contact workflow status
    pub status: LeadStatus,

    /// Optional free text, unused by the engine
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Lead {
    /// Whether this lead can be messaged right away
    pub fn has_valid_phone(&self) -> bool {
        self.phone.is_some()
    }
}

/// Counters shown alongside an imported lead set
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportStats {
    pub total: usize,
    pub valid_phones: usize,
    pub missing_phones: usize,
    pub contacted: usize,
    pub prospects: usize,
}

/// Outbound message template with the `{nome}` placeholder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageTemplate {
    pub text: String,
}

impl MessageTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl Default for MessageTemplate {
    fn default() -> Self {
        Self::new(
            "Olá {nome}, tudo bem? Vi seu perfil no Instagram e achei seu \
             trabalho incrível! Gostaria de conversar sobre uma oportunidade.",
        )
    }
}

/// Coerce an arbitrary source value to text before any string operation.
///
/// Sources hand us numbers where text is expected (phones from Excel) and
/// arrays where scalars are expected (link lists from scrapers). Integral
/// floats print without the trailing `.0` so a numeric phone cell keeps its
/// digits intact. Nested objects coerce to empty and are treated as absent.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else if let Some(f) = n.as_f64() {
                if f.fract() == 0.0 && f.abs() < 9e18 {
                    format!("{}", f as i64)
                } else {
                    f.to_string()
                }
            } else {
                n.to_string()
            }
        }
        Value::Array(items) => items
            .iter()
            .map(value_to_text)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => String::new(),
    }
}
