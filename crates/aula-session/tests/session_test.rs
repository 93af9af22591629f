use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use aula_core::config::MemoryConfig;
use aula_core::errors::AulaResult;
use aula_core::traits::ITextGenerator;
use aula_session::summary::HEURISTIC_PREFIX;
use aula_session::SessionManager;
use proptest::prelude::*;
use test_fixtures::{FailingGenerator, ScriptedGenerator};

fn manager_with_window(window_size: usize) -> SessionManager {
    SessionManager::new(MemoryConfig {
        window_size,
        ..Default::default()
    })
}

/// Summarizer that never answers in time.
struct StalledSummarizer;

#[async_trait]
impl ITextGenerator for StalledSummarizer {
    async fn generate(&self, _prompt: &str, _max_tokens: usize) -> AulaResult<String> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok("nunca".to_string())
    }

    fn name(&self) -> &str {
        "stalled"
    }
}

// ── Window and progressive summary ────────────────────────────────────────

#[tokio::test]
async fn oldest_turn_leaves_the_window_but_its_marker_survives() {
    let manager = SessionManager::default();
    let window = MemoryConfig::default().window_size;

    manager
        .record_turn("s1", "¿Qué significa la palabra ZAFIRO en el reglamento?", "No figura.")
        .await;
    for i in 0..window {
        manager.record_turn("s1", &format!("pregunta {i}"), "respuesta").await;
    }

    let state = manager.get("s1").unwrap();
    assert_eq!(state.turns.len(), window);
    assert!(state.turns.iter().all(|t| !t.query.contains("ZAFIRO")));
    assert!(state.summary.contains("ZAFIRO"), "summary: {}", state.summary);
    assert!(state.summary.starts_with(HEURISTIC_PREFIX));
    assert_eq!(state.summary_version, 1);
}

#[tokio::test]
async fn summarizer_output_is_folded_in() {
    let summarizer = ScriptedGenerator::new()
        .on_contains("Resumí brevemente", "El estudiante preguntó por el código ZAFIRO.");
    let manager = manager_with_window(2).with_summarizer(Arc::new(summarizer));

    manager.record_turn("s", "¿Qué es ZAFIRO?", "No está en el corpus.").await;
    manager.record_turn("s", "¿Cuánto dura la CEIA?", "8 bimestres.").await;
    let record = manager.record_turn("s", "¿Y la MIA?", "4 bimestres más.").await;

    assert_eq!(record.folded, 1);
    assert_eq!(record.summary_version, 1);
    assert!(record.degradation.is_none());
    let history = manager.history("s");
    assert_eq!(history.summary, "El estudiante preguntó por el código ZAFIRO.");
    assert_eq!(history.turns.len(), 2);
    assert_eq!(history.turns[0].query, "¿Cuánto dura la CEIA?");
}

#[tokio::test]
async fn summarizer_failure_degrades_to_heuristic_summary() {
    let manager = manager_with_window(1).with_summarizer(Arc::new(FailingGenerator));
    manager.record_turn("s", "¿Qué es ZAFIRO?", "No sé.").await;
    let record = manager.record_turn("s", "¿Y la tesis?", "...").await;

    let event = record.degradation.expect("degradation recorded");
    assert_eq!(event.component, "summarizer");
    assert_eq!(event.fallback_used, "heuristic_summary");
    assert_eq!(manager.history("s").summary, "Temas consultados: ¿Qué es ZAFIRO?");
}

#[tokio::test]
async fn summary_is_capped_keeping_recent_content() {
    let manager = SessionManager::new(MemoryConfig {
        window_size: 1,
        max_summary_chars: 60,
        ..Default::default()
    });
    for i in 0..20 {
        manager.record_turn("s", &format!("consulta número {i}"), "ok").await;
    }
    let summary = manager.history("s").summary;
    assert!(summary.chars().count() <= 60);
    assert!(summary.ends_with("consulta número 18"), "{summary}");
}

#[tokio::test]
async fn cancelled_fold_leaves_the_session_untouched() {
    let manager = manager_with_window(1).with_summarizer(Arc::new(StalledSummarizer));
    manager.record_turn("s", "¿Cuánto dura la CEIA?", "8 bimestres.").await;
    let before = manager.get("s").unwrap();

    let outcome = tokio::time::timeout(
        Duration::from_millis(50),
        manager.record_turn("s", "¿Y la MIA?", "..."),
    )
    .await;
    assert!(outcome.is_err());

    let after = manager.get("s").unwrap();
    assert_eq!(after.turns, before.turns);
    assert_eq!(after.summary, before.summary);
    assert_eq!(after.summary_version, 0);
}

// ── Contextualization ─────────────────────────────────────────────────────

#[tokio::test]
async fn follow_up_is_rewritten_with_the_last_topic() {
    let manager = SessionManager::default();
    manager.record_turn("s", "¿Cuánto dura la CEIA?", "Dura 8 bimestres.").await;

    let q = manager.contextualize("s", "¿Y la modalidad?");
    assert_eq!(q.original, "¿Y la modalidad?");
    assert_eq!(q.rewritten, "¿Y la modalidad? (en relación a CEIA)");
    assert_eq!(q.topic.as_deref(), Some("CEIA"));

    let q = manager.contextualize("s", "¿Eso es presencial?");
    assert_eq!(q.rewritten, "¿CEIA es presencial?");
}

#[tokio::test]
async fn most_recent_topic_wins() {
    let manager = SessionManager::default();
    manager.record_turn("s", "¿Cuánto dura la CEIA?", "8 bimestres.").await;
    manager.record_turn("s", "¿Qué pide la MIA?", "Haber egresado de la CEIA.").await;

    // The answer mentions CEIA but the query's own topic is more recent.
    assert_eq!(manager.topics("s").last().map(String::as_str), Some("MIA"));
    let q = manager.contextualize("s", "¿Y además qué necesito?");
    assert_eq!(q.topic.as_deref(), Some("MIA"));
}

#[test]
fn empty_history_returns_the_query_verbatim() {
    let manager = SessionManager::default();
    manager.track_topics("s", "CEIA");
    // Topics alone are not history.
    let q = manager.contextualize("s", "¿Y eso?");
    assert_eq!(q.rewritten, "¿Y eso?");
    assert!(!q.was_rewritten());
}

#[tokio::test]
async fn query_already_naming_the_topic_is_kept() {
    let manager = SessionManager::default();
    manager.record_turn("s", "¿Cuánto dura la CEIA?", "8 bimestres.").await;
    let q = manager.contextualize("s", "¿Y la CEIA es virtual?");
    assert!(!q.was_rewritten());
}

const PLAIN_WORDS: &[&str] = &[
    "cuál", "es", "la", "asistencia", "mínima", "de", "CEIA", "cuántos", "bimestres", "dura",
    "inscripción", "plazo", "nota", "trabajo", "final", "requisitos", "para", "MIA", "cómo",
    "me", "anoto", "modalidad",
];

const ANAPHORIC_WORDS: &[&str] = &[
    "eso", "esto", "y", "también", "además", "misma", "sobre", "qué", "más",
];

fn query_from(words: &'static [&'static str]) -> impl Strategy<Value = String> {
    proptest::collection::vec(proptest::sample::select(words), 1..8)
        .prop_map(|w| format!("¿{}?", w.join(" ")))
}

fn seeded_manager() -> SessionManager {
    let manager = SessionManager::default();
    block_on(manager.record_turn("s", "¿Cuánto dura la CEIA?", "8 bimestres."));
    manager
}

fn block_on<F: std::future::Future>(f: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap()
        .block_on(f)
}

proptest! {
    #[test]
    fn contextualize_keeps_queries_without_anaphora(query in query_from(PLAIN_WORDS)) {
        let manager = seeded_manager();
        let q = manager.contextualize("s", &query);
        prop_assert_eq!(q.rewritten, query);
    }

    #[test]
    fn contextualize_twice_equals_once(
        plain in query_from(PLAIN_WORDS),
        anaphoric in query_from(ANAPHORIC_WORDS),
    ) {
        let manager = seeded_manager();
        let query = format!("{anaphoric} {plain}");
        let once = manager.contextualize("s", &query).rewritten;
        let twice = manager.contextualize("s", &once).rewritten;
        prop_assert_eq!(twice, once);
    }
}

// ── Lifecycle ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn reset_forgets_the_session() {
    let manager = SessionManager::default();
    manager.record_turn("s", "¿Cuánto dura la CEIA?", "8 bimestres.").await;
    assert!(manager.reset("s"));
    assert!(!manager.reset("s"));
    assert!(manager.history("s").is_empty());
    assert!(manager.topics("s").is_empty());
}

#[tokio::test]
async fn cleanup_removes_only_idle_sessions() {
    let manager = SessionManager::default();
    manager.record_turn("idle", "hola", "hola").await;
    tokio::time::sleep(Duration::from_millis(60)).await;
    manager.record_turn("active", "hola", "hola").await;

    assert_eq!(manager.cleanup_idle_sessions(chrono::Duration::hours(1)), 0);
    assert_eq!(manager.cleanup_idle_sessions(chrono::Duration::milliseconds(30)), 1);
    assert!(manager.get("idle").is_none());
    assert!(manager.get("active").is_some());
}

#[tokio::test]
async fn sessions_are_independent_under_concurrency() {
    let manager = Arc::new(manager_with_window(3));
    let mut handles = Vec::new();
    for s in 0..8 {
        let manager = Arc::clone(&manager);
        handles.push(tokio::spawn(async move {
            let id = format!("sesion-{s}");
            for t in 0..10 {
                manager
                    .record_turn(&id, &format!("{id} pregunta {t}"), "respuesta")
                    .await;
            }
        }));
    }
    for h in handles {
        h.await.unwrap();
    }

    assert_eq!(manager.session_count(), 8);
    for s in 0..8 {
        let id = format!("sesion-{s}");
        let state = manager.get(&id).unwrap();
        assert_eq!(state.turns.len(), 3);
        assert_eq!(state.summary_version, 7);
        assert!(state.turns.iter().all(|t| t.query.starts_with(&id)));
        assert!(state.summary.contains(&format!("{id} pregunta 0")));
    }
}
