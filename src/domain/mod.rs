// ============================================================
// DOMAIN LAYER
// ============================================================
// Lead types, alias catalog and heuristic thresholds
// No I/O, no async

pub mod error;
pub mod lead;
pub mod lead_schema;
pub mod normalizer_config;

pub use lead::{ImportStats, Lead, LeadStatus, MessageTemplate, RawRow};
pub use normalizer_config::NormalizerConfig;
