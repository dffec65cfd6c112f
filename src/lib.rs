pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;

pub use crate::application::{ColumnResolver, LeadIdSequence, LeadImporter, LeadNormalizer, ResolvedColumns};
pub use crate::domain::error::{AppError, Result};
pub use crate::domain::{ImportStats, Lead, LeadStatus, MessageTemplate, NormalizerConfig, RawRow};
