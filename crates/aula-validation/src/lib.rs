//! # aula-validation
//!
//! Anti-hallucination verification of drafted answers against fused evidence.
//!
//! ## Layers
//! 1. **Embedding faithfulness**: weakest claim vs closest evidence sentence
//! 2. **Entailment faithfulness**: average NLI support per claim, fail-closed
//! 3. **Heuristic verification**: numbers, codes, emails, dates appear literally
//! 4. **Cross-reference**: vector- and graph-sourced facts agree
//! 5. **Confidence gate**: weighted aggregate of the signals above
//! 6. **Fallback suggestion**: ranked contacts for abstentions
//! 7. **Citation enforcement**: every claim cites fused evidence
//!
//! Every layer always runs; the verdict carries the full ordered check list.

pub mod claims;
pub mod contacts;
pub mod engine;
pub mod layers;
pub mod verdict;

pub use contacts::ContactTable;
pub use engine::AntiHallucinationEngine;
pub use verdict::VerdictBuilder;
