// ============================================================
// COLUMN RESOLVER
// ============================================================
// Map arbitrary source column names onto lead roles, once per import

use serde_json::Value;

use crate::domain::lead::RawRow;
use crate::domain::lead_schema::{normalize_key, role_aliases, LeadRole};

/// Source column keys resolved for each lead role.
///
/// `None` means no column matched; the normalizer falls back to direct
/// default-name lookups and ultimately to an empty field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub name: Option<String>,
    pub username: Option<String>,
    pub phone: Option<String>,
}

pub struct ColumnResolver;

impl ColumnResolver {
    /// Resolve columns from the first row that is a plain key-value object.
    ///
    /// Scraper JSON occasionally leads with scalar junk; anything that is
    /// not an object cannot carry column names.
    pub fn resolve(rows: &[Value]) -> ResolvedColumns {
        match rows.iter().find_map(Value::as_object) {
            Some(sample) => Self::resolve_row(sample),
            None => ResolvedColumns::default(),
        }
    }

    /// Resolve columns against a single representative row.
    pub fn resolve_row(sample: &RawRow) -> ResolvedColumns {
        let resolved = ResolvedColumns {
            name: Self::find_column(sample, LeadRole::Name),
            username: Self::find_column(sample, LeadRole::Username),
            phone: Self::find_column(sample, LeadRole::Phone),
        };
        tracing::debug!(
            name = resolved.name.as_deref().unwrap_or("-"),
            username = resolved.username.as_deref().unwrap_or("-"),
            phone = resolved.phone.as_deref().unwrap_or("-"),
            "resolved lead columns"
        );
        resolved
    }

    /// First row key whose normalized form contains a role alias.
    ///
    /// Aliases are tested in catalog order, so earlier aliases win when
    /// several columns could carry the role; among keys matched by the same
    /// alias, row order wins.
    fn find_column(row: &RawRow, role: LeadRole) -> Option<String> {
        let normalized: Vec<(&String, String)> =
            row.keys().map(|k| (k, normalize_key(k))).collect();

        for alias in role_aliases(role) {
            let alias_norm = normalize_key(alias);
            for (key, key_norm) in &normalized {
                if key_norm.contains(&alias_norm) {
                    return Some((*key).clone());
                }
            }
        }
        None
    }
}
