use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Weights of the scoring layers in the aggregate confidence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceWeights {
    pub embedding: f64,
    pub entailment: f64,
    pub heuristic: f64,
    pub cross_reference: f64,
    pub retrieval: f64,
}

impl ConfidenceWeights {
    pub fn total(&self) -> f64 {
        self.embedding + self.entailment + self.heuristic + self.cross_reference + self.retrieval
    }
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        Self {
            embedding: 0.30,
            entailment: 0.25,
            heuristic: 0.15,
            cross_reference: 0.15,
            retrieval: 0.15,
        }
    }
}

/// Topic keys of the contact routing table.
pub mod contact_topics {
    pub const ENROLLMENT: &str = "inscripcion";
    pub const PROJECT_MANAGEMENT: &str = "gestion_proyectos";
    pub const FINAL_PROJECT: &str = "trabajo_final";
    pub const DEFAULT: &str = "default";
}

fn default_contacts() -> BTreeMap<String, Vec<String>> {
    let mut contacts = BTreeMap::new();
    contacts.insert(
        contact_topics::ENROLLMENT.to_string(),
        vec!["inscripcion.lse@fi.uba.ar".to_string()],
    );
    contacts.insert(
        contact_topics::PROJECT_MANAGEMENT.to_string(),
        vec!["direccion.posgrado.lse@fi.uba.ar".to_string()],
    );
    contacts.insert(
        contact_topics::FINAL_PROJECT.to_string(),
        vec!["direccion.posgrado.lse@fi.uba.ar".to_string()],
    );
    contacts.insert(
        contact_topics::DEFAULT.to_string(),
        vec![defaults::DEFAULT_FALLBACK_CONTACT.to_string()],
    );
    contacts
}

/// Anti-hallucination engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationConfig {
    /// Minimum per-claim embedding similarity; the weakest claim must exceed it.
    pub faithfulness_threshold: f64,
    /// Minimum average entailment across claims.
    pub entailment_threshold: f64,
    /// Minimum weighted aggregate confidence.
    pub abstention_threshold: f64,
    pub confidence_weights: ConfidenceWeights,
    /// Cross-reference signal used when only one retriever produced evidence.
    pub cross_reference_neutral: f64,
    /// Contact routing table: topic key → emails. `default` is the catch-all.
    pub contacts: BTreeMap<String, Vec<String>>,
    pub max_contacts: usize,
    /// Segments shorter than this are not treated as claims.
    pub min_claim_chars: usize,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            faithfulness_threshold: defaults::DEFAULT_FAITHFULNESS_THRESHOLD,
            entailment_threshold: defaults::DEFAULT_ENTAILMENT_THRESHOLD,
            abstention_threshold: defaults::DEFAULT_ABSTENTION_THRESHOLD,
            confidence_weights: ConfidenceWeights::default(),
            cross_reference_neutral: defaults::DEFAULT_CROSS_REFERENCE_NEUTRAL,
            contacts: default_contacts(),
            max_contacts: defaults::DEFAULT_MAX_CONTACTS,
            min_claim_chars: defaults::DEFAULT_MIN_CLAIM_CHARS,
        }
    }
}
