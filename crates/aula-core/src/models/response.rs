use serde::{Deserialize, Serialize};

use super::verdict::Citation;

/// Public answer status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Approved,
    Abstained,
}

/// The exposed answer shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub status: ResponseStatus,
    pub text: String,
    pub citations: Vec<Citation>,
    pub confidence: f64,
    /// Number of cross-reference conflicts found.
    pub conflicts: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contacts: Option<Vec<String>>,
}

impl AnswerResponse {
    pub fn is_approved(&self) -> bool {
        self.status == ResponseStatus::Approved
    }
}
