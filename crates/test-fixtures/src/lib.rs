//! Test fixture loader and deterministic collaborator doubles shared by the
//! workspace's integration tests.
//!
//! The academic corpus lives in `corpus/lse_corpus.json`; chunk embeddings are
//! computed at load time with the same hashing embedder the doubles use, so
//! vector search and verification agree on one vector space.

pub mod corpus;
pub mod doubles;

use serde::de::DeserializeOwned;
use std::path::PathBuf;

pub use corpus::{load_corpus, CorpusFixture};
pub use doubles::{
    FailingEmbedder, FailingGenerator, FailingNli, FailingSynthesizer, HashingEmbedder,
    LexicalNli, ScriptedGenerator, ScriptedSynthesizer, StaticContacts,
};

/// Embedding dimension of the fixture corpus. Matches the default config.
pub const FIXTURE_DIMENSIONS: usize = aula_core::config::defaults::DEFAULT_EMBEDDING_DIMENSIONS;

/// Root directory of the test-fixtures crate.
fn fixtures_root() -> PathBuf {
    // Works from any crate in the workspace: walk up to find test-fixtures.
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let mut path = PathBuf::from(&manifest_dir);

    if path.ends_with("test-fixtures") {
        return path;
    }
    while !path.join("test-fixtures").exists() {
        if !path.pop() {
            panic!(
                "Could not find test-fixtures directory from CARGO_MANIFEST_DIR={}",
                manifest_dir
            );
        }
    }
    path.join("test-fixtures")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Load a fixture file as raw JSON Value.
pub fn load_fixture_value(relative_path: &str) -> serde_json::Value {
    load_fixture(relative_path)
}

/// Check that a fixture file exists.
pub fn fixture_exists(relative_path: &str) -> bool {
    fixtures_root().join(relative_path).exists()
}
