// ============================================================
// LEAD IMPORTER
// ============================================================
// Owns the imported lead set and applies presentation-layer edits

use serde_json::Value;
use uuid::Uuid;

use crate::application::use_cases::column_resolver::ColumnResolver;
use crate::application::use_cases::lead_normalizer::{LeadIdSequence, LeadNormalizer};
use crate::domain::lead::{ImportStats, Lead, LeadStatus};
use crate::domain::normalizer_config::NormalizerConfig;

/// One import session: resolve columns, normalize rows, hold the result.
///
/// Leads are created once at import and only mutated through the update
/// operations below; the normalizer never revisits them.
pub struct LeadImporter {
    normalizer: LeadNormalizer,
    leads: Vec<Lead>,
    session_id: String,
}

impl LeadImporter {
    pub fn new(config: NormalizerConfig) -> Self {
        Self {
            normalizer: LeadNormalizer::new(config),
            leads: Vec::new(),
            session_id: Uuid::new_v4().to_string(),
        }
    }

    /// Normalize a decoded row set, replacing any previously imported leads.
    pub fn import_rows(&mut self, rows: &[Value]) -> &[Lead] {
        self.import_rows_with(rows, &LeadIdSequence::new())
    }

    /// [`import_rows`](Self::import_rows) with a caller-supplied id
    /// sequence, for deterministic identifiers.
    pub fn import_rows_with(&mut self, rows: &[Value], ids: &LeadIdSequence) -> &[Lead] {
        let resolved = ColumnResolver::resolve(rows);
        self.leads = self.normalizer.normalize(rows, &resolved, ids);

        let stats = self.stats();
        tracing::info!(
            session = %self.session_id,
            total = stats.total,
            valid_phones = stats.valid_phones,
            "imported lead rows"
        );
        &self.leads
    }

    pub fn leads(&self) -> &[Lead] {
        &self.leads
    }

    /// Update a lead's workflow status. Unknown ids are ignored.
    pub fn update_status(&mut self, lead_id: &str, status: LeadStatus) -> bool {
        match self.leads.iter_mut().find(|lead| lead.id == lead_id) {
            Some(lead) => {
                lead.status = status;
                true
            }
            None => false,
        }
    }

    /// Replace a lead's phone with already-cleaned digits, or clear it.
    /// Unknown ids are ignored.
    pub fn update_phone(&mut self, lead_id: &str, phone: Option<String>) -> bool {
        match self.leads.iter_mut().find(|lead| lead.id == lead_id) {
            Some(lead) => {
                lead.phone = phone;
                true
            }
            None => false,
        }
    }

    pub fn stats(&self) -> ImportStats {
        let valid_phones = self.leads.iter().filter(|l| l.has_valid_phone()).count();
        ImportStats {
            total: self.leads.len(),
            valid_phones,
            missing_phones: self.leads.len() - valid_phones,
            contacted: self.count_status(LeadStatus::Contacted),
            prospects: self.count_status(LeadStatus::Prospect),
        }
    }

    /// Drop the imported set (the user's reset flow).
    pub fn clear(&mut self) {
        self.leads.clear();
    }

    fn count_status(&self, status: LeadStatus) -> usize {
        self.leads.iter().filter(|l| l.status == status).count()
    }
}

impl Default for LeadImporter {
    fn default() -> Self {
        Self::new(NormalizerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_rows() -> Vec<Value> {
        vec![
            json!({"Nome": "Ana", "Telefone": "(11) 98888-7777"}),
            json!({"Nome": "Bia", "Telefone": ""}),
        ]
    }

    #[test]
    fn test_import_is_idempotent_modulo_ids() {
        let mut importer = LeadImporter::default();
        let first: Vec<Lead> = importer
            .import_rows_with(&sample_rows(), &LeadIdSequence::with_epoch(1))
            .to_vec();
        let second: Vec<Lead> = importer
            .import_rows_with(&sample_rows(), &LeadIdSequence::with_epoch(2))
            .to_vec();

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_ne!(a.id, b.id);
            assert_eq!(a.name, b.name);
            assert_eq!(a.username, b.username);
            assert_eq!(a.phone, b.phone);
            assert_eq!(a.original_phone, b.original_phone);
        }
    }

    #[test]
    fn test_reimport_replaces_previous_set() {
        let mut importer = LeadImporter::default();
        importer.import_rows(&sample_rows());
        importer.import_rows(&[json!({"Nome": "Carla"})]);

        assert_eq!(importer.leads().len(), 1);
        assert_eq!(importer.leads()[0].name, "Carla");
    }

    #[test]
    fn test_update_status_and_phone() {
        let mut importer = LeadImporter::default();
        importer.import_rows(&sample_rows());
        let id = importer.leads()[0].id.clone();

        assert!(importer.update_status(&id, LeadStatus::Contacted));
        assert_eq!(importer.leads()[0].status, LeadStatus::Contacted);

        assert!(importer.update_phone(&id, Some("5511900001111".into())));
        assert_eq!(importer.leads()[0].phone.as_deref(), Some("5511900001111"));

        assert!(importer.update_phone(&id, None));
        assert_eq!(importer.leads()[0].phone, None);
    }

    #[test]
    fn test_updates_ignore_unknown_ids() {
        let mut importer = LeadImporter::default();
        importer.import_rows(&sample_rows());
        let before = importer.leads().to_vec();

        assert!(!importer.update_status("lead-99-0", LeadStatus::Skipped));
        assert!(!importer.update_phone("lead-99-0", None));
        assert_eq!(importer.leads(), &before[..]);
    }

    #[test]
    fn test_stats() {
        let mut importer = LeadImporter::default();
        importer.import_rows(&sample_rows());
        let id = importer.leads()[0].id.clone();
        importer.update_status(&id, LeadStatus::Prospect);

        let stats = importer.stats();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.valid_phones, 1);
        assert_eq!(stats.missing_phones, 1);
        assert_eq!(stats.contacted, 0);
        assert_eq!(stats.prospects, 1);
    }

    #[test]
    fn test_clear() {
        let mut importer = LeadImporter::default();
        importer.import_rows(&sample_rows());
        importer.clear();
        assert!(importer.leads().is_empty());
        assert_eq!(importer.stats().total, 0);
    }
}
