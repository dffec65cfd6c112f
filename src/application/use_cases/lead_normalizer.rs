// ============================================================
// LEAD NORMALIZER
// ============================================================
// Per-row extraction, reclassification and cleanup into canonical leads

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use url::Url;

use crate::application::use_cases::column_resolver::ResolvedColumns;
use crate::domain::lead::{
    value_to_text, Lead, LeadStatus, RawRow, NAME_FALLBACK, SOURCE_NAME_PLACEHOLDER,
};
use crate::domain::lead_schema::{
    COUNTRY_CODE_KEY, DEFAULT_NAME_KEYS, DEFAULT_USERNAME_KEYS, GARBAGE_HANDLE_TOKENS,
    LOCAL_NUMBER_KEY, PLATFORM_DOMAIN,
};
use crate::domain::normalizer_config::NormalizerConfig;
use crate::shared::formatters::{clean_handle, clean_phone_min};

/// Country-code-prefixed digit run, optionally behind an `@` the source
/// pasted along with the value. Tested with whitespace removed.
static COUNTRY_CODE_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^@?55\d+").unwrap());

/// Issues lead identifiers from the row index and the import instant.
///
/// Owned by the import call, never process-wide. Tests pin the epoch.
#[derive(Debug, Clone)]
pub struct LeadIdSequence {
    epoch_ms: i64,
}

impl LeadIdSequence {
    pub fn new() -> Self {
        Self {
            epoch_ms: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Fixed-epoch sequence for deterministic identifiers.
    pub fn with_epoch(epoch_ms: i64) -> Self {
        Self { epoch_ms }
    }

    pub fn id_for(&self, index: usize) -> String {
        format!("lead-{}-{}", index, self.epoch_ms)
    }
}

impl Default for LeadIdSequence {
    fn default() -> Self {
        Self::new()
    }
}

/// One signal that a handle-column value is actually a phone number.
///
/// Scraped datasets routinely put the phone in the handle column (and vice
/// versa); the rules run in order and the first firing rule wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneSignal {
    /// Enough digits and not a single letter
    DigitsNoAlpha,
    /// Starts with the Brazilian country code followed by digits
    CountryCodePrefix,
    /// Overwhelmingly numeric for its length
    DigitRatio,
}

impl PhoneSignal {
    pub const ALL: &'static [PhoneSignal] = &[
        PhoneSignal::DigitsNoAlpha,
        PhoneSignal::CountryCodePrefix,
        PhoneSignal::DigitRatio,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PhoneSignal::DigitsNoAlpha => "digits-no-alpha",
            PhoneSignal::CountryCodePrefix => "country-code-prefix",
            PhoneSignal::DigitRatio => "digit-ratio",
        }
    }

    pub fn fires(&self, value: &str, config: &NormalizerConfig) -> bool {
        match self {
            PhoneSignal::DigitsNoAlpha => {
                digit_count(value) >= config.min_phone_digits
                    && !value.chars().any(|c| c.is_ascii_alphabetic())
            }
            PhoneSignal::CountryCodePrefix => {
                let compact: String = value.split_whitespace().collect();
                COUNTRY_CODE_PREFIX.is_match(&compact)
            }
            PhoneSignal::DigitRatio => {
                let len = value.chars().count();
                len > config.digit_ratio_min_len
                    && digit_count(value) as f32 / len as f32 > config.digit_ratio_threshold
            }
        }
    }
}

fn digit_count(value: &str) -> usize {
    value.chars().filter(|c| c.is_ascii_digit()).count()
}

/// Normalizes raw rows into canonical leads
pub struct LeadNormalizer {
    config: NormalizerConfig,
}

impl LeadNormalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Normalize the whole row set: one lead per row, order-preserving,
    /// no cross-row state. Never fails; ambiguity degrades to empty fields.
    pub fn normalize(
        &self,
        rows: &[Value],
        resolved: &ResolvedColumns,
        ids: &LeadIdSequence,
    ) -> Vec<Lead> {
        rows.iter()
            .enumerate()
            .map(|(index, row)| self.normalize_row(index, row, resolved, ids))
            .collect()
    }

    /// First matching rule for a handle value, `None` when it looks like a
    /// genuine handle.
    pub fn phone_signal(&self, value: &str) -> Option<PhoneSignal> {
        PhoneSignal::ALL
            .iter()
            .copied()
            .find(|signal| signal.fires(value, &self.config))
    }

    fn normalize_row(
        &self,
        index: usize,
        row: &Value,
        resolved: &ResolvedColumns,
        ids: &LeadIdSequence,
    ) -> Lead {
        let obj = row.as_object();

        // Extraction: resolved columns first, common default names otherwise
        let raw_name = match &resolved.name {
            Some(key) => field_text(obj, key),
            None => first_non_empty(obj, DEFAULT_NAME_KEYS),
        };
        let raw_user = match &resolved.username {
            Some(key) => field_text(obj, key),
            None => first_non_empty(obj, DEFAULT_USERNAME_KEYS),
        };
        let mut raw_phone = resolved
            .phone
            .as_ref()
            .map(|key| field_text(obj, key))
            .unwrap_or_default();

        // Scrapers split the number: country code and local part side by side
        if raw_phone.is_empty() {
            let country = field_text(obj, COUNTRY_CODE_KEY);
            let local = field_text(obj, LOCAL_NUMBER_KEY);
            if !country.is_empty() && !local.is_empty() {
                raw_phone = format!("{}{}", country, local);
            }
        }

        // A link that is not the platform is the business website or worse
        let raw_user = if is_foreign_link(raw_user.trim()) {
            String::new()
        } else {
            raw_user
        };

        let name_str = raw_name.trim();
        let mut user_str = raw_user.trim().to_string();
        let mut phone_clean = clean_phone_min(&raw_phone, self.config.min_phone_digits);

        if !user_str.starts_with("http") {
            if let Some(signal) = self.phone_signal(&user_str) {
                tracing::debug!(
                    rule = signal.name(),
                    value = %user_str,
                    "handle column holds a phone number"
                );
                if phone_clean.is_none() {
                    phone_clean = clean_phone_min(&user_str, self.config.min_phone_digits);
                }
                user_str.clear();
            }
            user_str = clean_handle(&user_str);
        }

        if self.is_garbage_handle(&user_str) {
            tracing::debug!(value = %user_str, "discarding handle as unrelated link");
            user_str.clear();
        }

        let name = if name_str.is_empty() || name_str == SOURCE_NAME_PLACEHOLDER {
            if user_str.is_empty() {
                NAME_FALLBACK.to_string()
            } else {
                user_str.clone()
            }
        } else {
            name_str.to_string()
        };

        Lead {
            id: ids.id_for(index),
            name,
            username: user_str,
            phone: phone_clean,
            original_phone: raw_phone,
            status: LeadStatus::Pending,
            notes: None,
        }
    }

    fn is_garbage_handle(&self, handle: &str) -> bool {
        if GARBAGE_HANDLE_TOKENS.iter().any(|t| handle.contains(t)) {
            return true;
        }
        if handle.chars().count() > self.config.max_handle_length
            && !handle.contains(PLATFORM_DOMAIN)
        {
            return true;
        }
        // A non-URI value that still carries path/query/@ characters after
        // cleanup is a link fragment or an email, not a handle
        !handle.starts_with("http")
            && handle.chars().any(|c| matches!(c, '/' | '?' | '@'))
    }
}

impl Default for LeadNormalizer {
    fn default() -> Self {
        Self::new(NormalizerConfig::default())
    }
}

fn field_text(obj: Option<&RawRow>, key: &str) -> String {
    obj.and_then(|o| o.get(key))
        .map(value_to_text)
        .unwrap_or_default()
}

fn first_non_empty(obj: Option<&RawRow>, keys: &[&str]) -> String {
    keys.iter()
        .map(|key| field_text(obj, key))
        .find(|text| !text.is_empty())
        .unwrap_or_default()
}

/// True for http(s) links that do not reference the expected platform.
fn is_foreign_link(value: &str) -> bool {
    if !value.starts_with("http") {
        return false;
    }
    match Url::parse(value) {
        Ok(url) => !url
            .host_str()
            .map_or(false, |host| host.contains(PLATFORM_DOMAIN)),
        Err(_) => !value.contains(PLATFORM_DOMAIN),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::column_resolver::ColumnResolver;
    use serde_json::json;

    fn normalize(rows: Vec<Value>) -> Vec<Lead> {
        let resolved = ColumnResolver::resolve(&rows);
        LeadNormalizer::default().normalize(&rows, &resolved, &LeadIdSequence::with_epoch(1))
    }

    #[test]
    fn test_well_formed_row() {
        let leads = normalize(vec![json!({
            "Nome": "Ana Silva",
            "Usuario": "@ana.fit",
            "Telefone": "(11) 98888-7777"
        })]);

        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].name, "Ana Silva");
        assert_eq!(leads[0].username, "ana.fit");
        assert_eq!(leads[0].phone.as_deref(), Some("11988887777"));
        assert_eq!(leads[0].original_phone, "(11) 98888-7777");
        assert_eq!(leads[0].status, LeadStatus::Pending);
    }

    #[test]
    fn test_phone_in_handle_column_is_reclassified() {
        let leads = normalize(vec![json!({
            "Nome": "Ana",
            "Usuario": "5511988887777",
            "Telefone": ""
        })]);

        assert_eq!(leads[0].phone.as_deref(), Some("5511988887777"));
        assert_eq!(leads[0].username, "");
    }

    #[test]
    fn test_reclassification_keeps_existing_phone() {
        let leads = normalize(vec![json!({
            "Nome": "Ana",
            "Usuario": "5511900001111",
            "Telefone": "(11) 98888-7777"
        })]);

        // The phone column wins; the handle is still cleared
        assert_eq!(leads[0].phone.as_deref(), Some("11988887777"));
        assert_eq!(leads[0].username, "");
    }

    #[test]
    fn test_composite_phone_fallback() {
        // The resolved phone column is empty for this row; the split
        // country-code/local-number pair rescues it
        let leads = normalize(vec![json!({
            "full_name": "Ana",
            "phone_number": "",
            "public_phone_country_code": 55,
            "public_phone_number": "11988887777"
        })]);

        assert_eq!(leads[0].phone.as_deref(), Some("5511988887777"));
        assert_eq!(leads[0].original_phone, "5511988887777");
    }

    #[test]
    fn test_foreign_link_in_handle_is_discarded() {
        let leads = normalize(vec![json!({
            "Nome": "Academia",
            "website": "https://www.academia-fit.com.br"
        })]);

        assert_eq!(leads[0].username, "");
    }

    #[test]
    fn test_platform_link_in_handle_is_kept_verbatim() {
        let leads = normalize(vec![json!({
            "Nome": "Ana",
            "instagram_url": "https://www.instagram.com/ana.fit/?igsh=x"
        })]);

        assert_eq!(
            leads[0].username,
            "https://www.instagram.com/ana.fit/?igsh=x"
        );
    }

    #[test]
    fn test_garbage_handle_rejected() {
        let leads = normalize(vec![json!({
            "Nome": "Ana",
            "Usuario": "lh3.googleusercontent.com/p/AF1Qip"
        })]);
        assert_eq!(leads[0].username, "");

        let long = "a".repeat(60);
        let leads = normalize(vec![json!({"Nome": "Ana", "Usuario": long})]);
        assert_eq!(leads[0].username, "");
    }

    #[test]
    fn test_name_falls_back_to_handle_then_placeholder() {
        let leads = normalize(vec![json!({"Nome": "", "Usuario": "@ana.fit"})]);
        assert_eq!(leads[0].name, "ana.fit");

        let leads = normalize(vec![json!({"Nome": "Sem Nome", "Usuario": ""})]);
        assert_eq!(leads[0].name, NAME_FALLBACK);
    }

    #[test]
    fn test_short_phone_is_absent_but_audited() {
        let leads = normalize(vec![json!({"Nome": "Ana", "Telefone": "1234"})]);
        assert_eq!(leads[0].phone, None);
        assert_eq!(leads[0].original_phone, "1234");
    }

    #[test]
    fn test_non_object_rows_become_empty_leads() {
        let leads = normalize(vec![json!("junk"), json!({"Nome": "Ana"})]);

        assert_eq!(leads.len(), 2);
        assert_eq!(leads[0].name, NAME_FALLBACK);
        assert_eq!(leads[0].phone, None);
        assert_eq!(leads[1].name, "Ana");
    }

    #[test]
    fn test_username_invariant_holds() {
        let leads = normalize(vec![json!({
            "Nome": "Ana",
            "Usuario": "@instagram.com/ana.fit/?igsh=x"
        })]);
        assert_eq!(leads[0].username, "ana.fit");

        // Path fragments and emails are not handles
        for junk in ["facebook.com/ana", "ana@gym.com"] {
            let leads = normalize(vec![json!({"Nome": "Ana", "Usuario": junk})]);
            assert_eq!(leads[0].username, "", "expected {junk:?} to be dropped");
        }
    }

    #[test]
    fn test_ids_are_deterministic_given_epoch() {
        let ids = LeadIdSequence::with_epoch(42);
        assert_eq!(ids.id_for(0), "lead-0-42");
        assert_eq!(ids.id_for(7), "lead-7-42");
    }

    #[test]
    fn test_rule_digits_no_alpha() {
        let config = NormalizerConfig::default();
        assert!(PhoneSignal::DigitsNoAlpha.fires("5511988887777", &config));
        assert!(PhoneSignal::DigitsNoAlpha.fires("(11) 98888-7777", &config));
        assert!(!PhoneSignal::DigitsNoAlpha.fires("ana98888777", &config));
        assert!(!PhoneSignal::DigitsNoAlpha.fires("9888777", &config));
    }

    #[test]
    fn test_rule_country_code_prefix() {
        let config = NormalizerConfig::default();
        assert!(PhoneSignal::CountryCodePrefix.fires("@55 11 9888", &config));
        assert!(PhoneSignal::CountryCodePrefix.fires("55 9888 call", &config));
        assert!(!PhoneSignal::CountryCodePrefix.fires("ana55", &config));
    }

    #[test]
    fn test_rule_digit_ratio() {
        let config = NormalizerConfig::default();
        assert!(PhoneSignal::DigitRatio.fires("98887777x", &config));
        // Short numeric tokens stay handles
        assert!(!PhoneSignal::DigitRatio.fires("2024", &config));
        assert!(!PhoneSignal::DigitRatio.fires("ana.fit.2024", &config));
    }

    #[test]
    fn test_first_firing_rule_wins() {
        let normalizer = LeadNormalizer::default();
        assert_eq!(
            normalizer.phone_signal("5511988887777"),
            Some(PhoneSignal::DigitsNoAlpha)
        );
        assert_eq!(
            normalizer.phone_signal("55 9888 call"),
            Some(PhoneSignal::CountryCodePrefix)
        );
        assert_eq!(normalizer.phone_signal("ana.fit"), None);
        assert_eq!(normalizer.phone_signal(""), None);
    }

    #[test]
    fn test_phone_recovered_from_ratio_handle() {
        let leads = normalize(vec![json!({"Nome": "Ana", "Usuario": "98887777x"})]);
        assert_eq!(leads[0].phone.as_deref(), Some("98887777"));
        assert_eq!(leads[0].username, "");
    }
}
