pub mod defaults;
pub mod embedding_config;
pub mod expansion_config;
pub mod fusion_config;
pub mod graph_config;
pub mod memory_config;
pub mod observability_config;
pub mod retrieval_config;
pub mod verification_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use embedding_config::EmbeddingConfig;
pub use expansion_config::ExpansionConfig;
pub use fusion_config::{FusionConfig, SourceWeights};
pub use graph_config::GraphConfig;
pub use memory_config::MemoryConfig;
pub use observability_config::ObservabilityConfig;
pub use retrieval_config::{RetrievalConfig, RetrievalMode};
pub use verification_config::{contact_topics, ConfidenceWeights, VerificationConfig};

use crate::errors::{AulaResult, ConfigError};

/// Top-level configuration aggregating all subsystem configs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AulaConfig {
    pub embedding: EmbeddingConfig,
    pub retrieval: RetrievalConfig,
    pub graph: GraphConfig,
    pub expansion: ExpansionConfig,
    pub fusion: FusionConfig,
    pub memory: MemoryConfig,
    pub verification: VerificationConfig,
    pub observability: ObservabilityConfig,
}

impl AulaConfig {
    /// Parse a TOML document. Missing sections and fields take their defaults.
    pub fn from_toml(source: &str) -> AulaResult<Self> {
        let config: Self = toml::from_str(source).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> AulaResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&source)
    }

    /// Check ranges of every threshold and coefficient.
    pub fn validate(&self) -> AulaResult<()> {
        unit_range("expansion.hyde_alpha", self.expansion.hyde_alpha)?;
        unit_range("retrieval.mmr_lambda", self.retrieval.mmr_lambda)?;
        unit_range("retrieval.min_similarity", self.retrieval.min_similarity)?;
        unit_range("graph.hop_decay", self.graph.hop_decay)?;
        unit_range(
            "verification.faithfulness_threshold",
            self.verification.faithfulness_threshold,
        )?;
        unit_range(
            "verification.entailment_threshold",
            self.verification.entailment_threshold,
        )?;
        unit_range(
            "verification.abstention_threshold",
            self.verification.abstention_threshold,
        )?;
        unit_range(
            "verification.cross_reference_neutral",
            self.verification.cross_reference_neutral,
        )?;

        if self.retrieval.top_k == 0 {
            return Err(invalid("retrieval.top_k", "must be at least 1"));
        }
        if self.retrieval.overfetch_factor == 0 {
            return Err(invalid("retrieval.overfetch_factor", "must be at least 1"));
        }
        if self.memory.window_size == 0 {
            return Err(invalid("memory.window_size", "must be at least 1"));
        }
        if self.fusion.rrf_k == 0 {
            return Err(invalid("fusion.rrf_k", "must be positive"));
        }
        if self.graph.same_community_bonus <= 0.0 || self.graph.cross_community_penalty <= 0.0 {
            return Err(invalid("graph", "community multipliers must be positive"));
        }

        let weights = [
            ("fusion.factual", self.fusion.factual),
            ("fusion.procedural", self.fusion.procedural),
            ("fusion.comparative", self.fusion.comparative),
            ("fusion.out_of_domain", self.fusion.out_of_domain),
            ("fusion.unclassified", self.fusion.unclassified),
        ];
        for (field, w) in weights {
            if w.vector <= 0.0 || w.graph <= 0.0 {
                return Err(invalid(field, "source weights must be positive"));
            }
        }

        if self.verification.confidence_weights.total() <= 0.0 {
            return Err(invalid(
                "verification.confidence_weights",
                "weights must sum to a positive value",
            ));
        }
        if !self.verification.contacts.contains_key(contact_topics::DEFAULT) {
            return Err(invalid(
                "verification.contacts",
                "a `default` contact entry is required",
            ));
        }
        Ok(())
    }
}

fn unit_range(field: &str, value: f64) -> AulaResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, &format!("{value} is outside [0, 1]")))
    }
}

fn invalid(field: &str, reason: &str) -> crate::errors::AulaError {
    ConfigError::Invalid {
        field: field.to_string(),
        reason: reason.to_string(),
    }
    .into()
}
