//! Phone and profile-link formatting for outbound messaging.
//!
//! Pure helpers: no resolver state, no I/O. Phone grouping assumes Brazilian
//! numbers (DDD + 8/9 digits, optional 55 country code); anything else is
//! passed through unformatted.

use once_cell::sync::Lazy;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;

/// Minimum digits for a value to count as a contact number.
pub const MIN_PHONE_DIGITS: usize = 8;

/// Shown when a lead has no usable phone.
pub const PHONE_DISPLAY_PLACEHOLDER: &str = "Sem número";

/// Recipient substituted when a lead has no name.
const FALLBACK_RECIPIENT: &str = "Cliente";

/// Message placeholder replaced with the lead name, case-insensitive.
static NOME_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\{nome\}").unwrap());

/// Embedded platform prefix stripped from pasted handles.
static INSTAGRAM_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(https?://)?(www\.)?instagram\.com/").unwrap());

/// encodeURIComponent-compatible set: everything except ALPHA / DIGIT /
/// `-_.!~*'()` is percent-encoded.
const MESSAGE_TEXT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

fn strip_non_digits(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Strip a raw phone value down to digits.
///
/// Returns `None` when fewer than [`MIN_PHONE_DIGITS`] digits remain; a
/// too-short value is treated as absent rather than invalid-but-present.
pub fn clean_phone(raw: &str) -> Option<String> {
    clean_phone_min(raw, MIN_PHONE_DIGITS)
}

/// [`clean_phone`] with a caller-supplied minimum digit count.
pub fn clean_phone_min(raw: &str, min_digits: usize) -> Option<String> {
    let cleaned = strip_non_digits(raw.trim());
    if cleaned.len() < min_digits {
        return None;
    }
    Some(cleaned)
}

/// Format a cleaned digit string for display.
///
/// 10/11 digits get local grouping with the area code in parentheses, 12/13
/// digits with a `55` prefix get international grouping. Other lengths come
/// back unformatted.
pub fn display_phone(phone: Option<&str>) -> String {
    let Some(phone) = phone else {
        return PHONE_DISPLAY_PLACEHOLDER.to_string();
    };
    if phone.is_empty() || !phone.bytes().all(|b| b.is_ascii_digit()) {
        return phone.to_string();
    }

    match phone.len() {
        11 => format!("({}) {}-{}", &phone[..2], &phone[2..7], &phone[7..]),
        10 => format!("({}) {}-{}", &phone[..2], &phone[2..6], &phone[6..]),
        13 if phone.starts_with("55") => {
            format!("+55 ({}) {}-{}", &phone[2..4], &phone[4..9], &phone[9..])
        }
        12 if phone.starts_with("55") => {
            format!("+55 ({}) {}-{}", &phone[2..4], &phone[4..8], &phone[8..])
        }
        _ => phone.to_string(),
    }
}

/// Build a wa.me click-to-chat link with the template text filled in.
///
/// Bare 10/11-digit numbers (DDD + local number) get the Brazilian country
/// code prepended; manually entered numbers usually omit it and the link
/// breaks without it.
pub fn whatsapp_link(phone: &str, template: &str, lead_name: &str) -> String {
    let mut digits = strip_non_digits(phone);
    if (10..=11).contains(&digits.len()) {
        digits = format!("55{}", digits);
    }

    let recipient = if lead_name.is_empty() {
        FALLBACK_RECIPIENT
    } else {
        lead_name
    };
    let text = NOME_TOKEN.replace_all(template, regex::NoExpand(recipient));
    let encoded = utf8_percent_encode(&text, MESSAGE_TEXT);

    format!("https://wa.me/{}?text={}", digits, encoded)
}

/// Strip leading `@`, platform prefix, query string, trailing slashes and
/// surrounding whitespace from a pasted handle.
pub fn clean_handle(raw: &str) -> String {
    let trimmed = raw.trim().trim_start_matches('@');
    let stripped = INSTAGRAM_PREFIX.replace(trimmed, "");
    let no_query = stripped.split('?').next().unwrap_or("");
    no_query.trim_end_matches('/').trim().to_string()
}

/// Build a canonical profile link for a handle.
///
/// Full URIs (common in scraper JSON) come back unchanged. An empty handle
/// after cleaning yields an empty result; callers treat that as "no link".
pub fn instagram_link(username: &str) -> String {
    let user = username.trim();
    if user.is_empty() {
        return String::new();
    }
    if user.starts_with("http") {
        return user.to_string();
    }

    let cleaned = clean_handle(user);
    if cleaned.is_empty() {
        return String::new();
    }
    format!("https://www.instagram.com/{}/", cleaned)
}
