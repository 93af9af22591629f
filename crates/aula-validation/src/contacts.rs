//! Fallback contact routing for abstentions.
//!
//! Ranking: emails for the topics detected in the query, then emails found
//! in FAQ evidence, then the catch-all contact.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use aula_core::config::defaults::DEFAULT_FALLBACK_CONTACT;
use aula_core::config::{contact_topics, VerificationConfig};
use aula_core::models::FusedEvidence;
use aula_core::text;
use aula_core::traits::IContactDirectory;
use regex::Regex;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)+").expect("valid email regex")
});

/// Topic key → stems that route a query to it. Checked in order.
const TOPIC_STEMS: &[(&str, &[&str])] = &[
    (contact_topics::ENROLLMENT, &["inscripci", "inscribi", "matricul"]),
    (contact_topics::PROJECT_MANAGEMENT, &["proyecto", "gdp", "gti"]),
    (contact_topics::FINAL_PROJECT, &["trabajo final", "tesis", "ttf", "defensa"]),
];

/// The configured routing table as a contact directory.
#[derive(Debug, Clone, Default)]
pub struct ContactTable {
    entries: BTreeMap<String, Vec<String>>,
}

impl ContactTable {
    pub fn from_config(config: &VerificationConfig) -> Self {
        Self {
            entries: config.contacts.clone(),
        }
    }
}

impl IContactDirectory for ContactTable {
    fn lookup(&self, topic: &str) -> Vec<String> {
        self.entries.get(topic).cloned().unwrap_or_default()
    }
}

/// Contact topics a query touches, in routing order.
pub fn topics_for(query: &str) -> Vec<&'static str> {
    let folded = text::fold(query);
    TOPIC_STEMS
        .iter()
        .filter(|(_, stems)| stems.iter().any(|s| folded.contains(s)))
        .map(|(topic, _)| *topic)
        .collect()
}

/// Emails mentioned in FAQ-type evidence, in evidence order.
pub fn faq_emails(evidence: &FusedEvidence) -> Vec<String> {
    evidence
        .iter()
        .filter(|item| item.chunk.is_faq())
        .flat_map(|item| {
            EMAIL
                .find_iter(&item.chunk.text)
                .map(|m| m.as_str().trim_end_matches('.').to_lowercase())
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Ranked, deduplicated contacts. Never empty when `max >= 1`.
pub fn suggest(
    query: &str,
    evidence: &FusedEvidence,
    directory: &dyn IContactDirectory,
    max: usize,
) -> Vec<String> {
    let mut ranked: Vec<String> = Vec::new();
    let mut push = |email: String| {
        if !ranked.contains(&email) {
            ranked.push(email);
        }
    };

    for topic in topics_for(query) {
        directory.lookup(topic).into_iter().for_each(&mut push);
    }
    faq_emails(evidence).into_iter().for_each(&mut push);
    directory
        .lookup(contact_topics::DEFAULT)
        .into_iter()
        .for_each(&mut push);
    if ranked.is_empty() {
        ranked.push(DEFAULT_FALLBACK_CONTACT.to_string());
    }

    ranked.truncate(max.max(1));
    ranked
}
