// Centralized column alias configuration for lead ingestion.
//
// Goal: keep source header matching flexible without scattering alias lists.
// Sources covered: generic spreadsheets, CRM exports (Growman), Google Maps
// scraper JSON dumps.

/// Semantic role a source column may represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadRole {
    Name,
    Username,
    Phone,
}

// NOTE:
// - Aliases are matched against a normalized key (lowercase, underscore/
//   dash/whitespace stripped) by plain substring containment. Role aliases
//   are deliberately loose: `contact_phone_number` must hit `phone`.
// - Order matters: earlier aliases win when several match the same row.

pub const NAME_ALIASES: &[&str] = &[
    "nome",
    "name",
    "full_name",
    "fullname",
    "full name",
    "title",
    "razao",
    "cliente",
    "customer",
    "place_name",
    "business_name",
    "external_url",
];

pub const USERNAME_ALIASES: &[&str] = &[
    "usuario",
    "user",
    "username",
    "user_name",
    "instagram",
    "ig",
    "perfil",
    "profile",
    "handle",
    "instagram_url",
    "social_media",
    "social",
    "links",
    "website",
    "site",
];

pub const PHONE_ALIASES: &[&str] = &[
    "telefone",
    "celular",
    "phone",
    "mobile",
    "whatsapp",
    "wpp",
    "cel",
    "tel",
    "contato",
    "contact",
    "numero",
    "phone_number",
    "contact_phone_number",
    "public_phone_country_code",
    "whatsapp_number",
    "formatted_phone_number",
    "international_phone_number",
];

/// Scraper columns combined into a composite phone when the phone field
/// itself is empty.
pub const COUNTRY_CODE_KEY: &str = "public_phone_country_code";
pub const LOCAL_NUMBER_KEY: &str = "public_phone_number";

/// Direct lookups tried when a role resolves to no column at all.
pub const DEFAULT_NAME_KEYS: &[&str] = &["name", "nome"];
pub const DEFAULT_USERNAME_KEYS: &[&str] = &["username", "usuario"];

/// Social platform every handle is expected to reference.
pub const PLATFORM_DOMAIN: &str = "instagram.com";

/// Handle substrings that mark the value as an unrelated tracking link.
pub const GARBAGE_HANDLE_TOKENS: &[&str] = &["googleusercontent"];

pub fn role_aliases(role: LeadRole) -> &'static [&'static str] {
    match role {
        LeadRole::Name => NAME_ALIASES,
        LeadRole::Username => USERNAME_ALIASES,
        LeadRole::Phone => PHONE_ALIASES,
    }
}

pub fn normalize_key(s: &str) -> String {
    s.trim()
        .trim_matches('"')
        .chars()
        .filter(|c| !matches!(c, '_' | '-') && !c.is_whitespace())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

pub fn key_matches_alias(normalized_key: &str, alias: &str) -> bool {
    normalized_key.contains(&normalize_key(alias))
}
