pub mod use_cases;

pub use use_cases::column_resolver::{ColumnResolver, ResolvedColumns};
pub use use_cases::lead_importer::LeadImporter;
pub use use_cases::lead_normalizer::{LeadIdSequence, LeadNormalizer, PhoneSignal};
