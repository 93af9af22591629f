use serde::{Deserialize, Serialize};

/// Query categories driving fusion weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryType {
    /// Single-fact lookups ("¿cuál es la asistencia mínima?").
    Factual,
    /// How-to and process questions.
    Procedural,
    /// Relational, comparative, and multi-hop questions.
    Comparative,
    /// Outside the corpus domain (prices, opinions, other institutions).
    OutOfDomain,
    #[default]
    Unclassified,
}

impl QueryType {
    pub const ALL: [QueryType; 5] = [
        Self::Factual,
        Self::Procedural,
        Self::Comparative,
        Self::OutOfDomain,
        Self::Unclassified,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Factual => "factual",
            Self::Procedural => "procedural",
            Self::Comparative => "comparative",
            Self::OutOfDomain => "out_of_domain",
            Self::Unclassified => "unclassified",
        }
    }
}

impl std::fmt::Display for QueryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
