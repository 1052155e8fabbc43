// tests/engine_scenarios.rs

use campus_core::{EntityFocus, EventRecord, Intent};
use campus_engine::{DegradeReason, Engine, EngineConfig, Outcome};
use campus_knowledge::KnowledgeBase;
use campus_live_data::{InMemoryStore, LiveDataBridge, NO_ACTIVE_EVENTS};
use campus_nlu::{IntentResolver, ResolverConfig};
use campus_observability::{MetricType, MetricsCollector};
use campus_responder::{GREETING_VARIANTS, HELP_MENU};
use chrono::{Duration, Utc};
use std::sync::Arc;

fn knowledge() -> Arc<KnowledgeBase> {
    Arc::new(KnowledgeBase::embedded().expect("embedded knowledge base"))
}

fn engine_with(store: Arc<InMemoryStore>, max_history: usize) -> Engine {
    let resolver = Arc::new(IntentResolver::bootstrap(
        knowledge(),
        ResolverConfig::default(),
    ));
    Engine::new(
        resolver,
        LiveDataBridge::new(store),
        Arc::new(MetricsCollector::new()),
        EngineConfig {
            max_history,
            ..EngineConfig::default()
        },
    )
}

fn engine() -> Engine {
    engine_with(Arc::new(InMemoryStore::new()), 20)
}

fn event(id: &str, start_min: i64, end_min: Option<i64>) -> EventRecord {
    let now = Utc::now();
    EventRecord {
        id: id.to_string(),
        name: id.to_string(),
        description: String::new(),
        venue: None,
        starts_at: now + Duration::minutes(start_min),
        ends_at: end_min.map(|m| now + Duration::minutes(m)),
        active: true,
        registration_open: false,
    }
}

#[tokio::test]
async fn hello_greets_from_the_candidate_set() {
    let engine = engine();
    let session = engine.sessions().get_or_create("alice");
    let reply = engine.respond_in(&session, "hello", "alice").await;

    assert_eq!(reply.intent, Some(Intent::Greeting));
    assert!(GREETING_VARIANTS.contains(&reply.text.as_str()));
    assert!(reply.outcome.is_resolved());
}

#[tokio::test]
async fn what_is_sac_names_the_council() {
    let kb = knowledge();
    let answer = engine().respond("what is sac", "alice").await;
    assert!(answer.contains(&kb.council.name));
}

#[tokio::test]
async fn vsc_achievements_lists_every_achievement_in_order() {
    let kb = knowledge();
    let vsc = kb.organization("vsc").expect("vsc in knowledge base");

    let engine = engine();
    let session = engine.sessions().get_or_create("bob");
    let reply = engine.respond_in(&session, "vsc achievements", "bob").await;

    assert_eq!(
        reply.intent,
        Some(Intent::organization("vsc", EntityFocus::Achievements))
    );
    let mut cursor = 0;
    for (i, achievement) in vsc.achievements.iter().enumerate() {
        let line = format!("{}. {}", i + 1, achievement);
        let at = reply.text[cursor..]
            .find(&line)
            .unwrap_or_else(|| panic!("missing '{}'", line));
        cursor += at + line.len();
    }
}

#[tokio::test]
async fn gibberish_degrades_to_the_help_menu() {
    let engine = engine();
    let session = engine.sessions().get_or_create("carol");
    let reply = engine.respond_in(&session, "asdkjiqwe", "carol").await;

    assert_eq!(reply.intent, Some(Intent::Unknown));
    assert_eq!(reply.text, HELP_MENU);
    assert!(matches!(
        reply.outcome,
        Outcome::Degraded {
            reason: DegradeReason::Unresolved
        }
    ));
    assert_eq!(engine.metrics().get(MetricType::UnknownIntents), 1);
}

#[tokio::test]
async fn events_now_without_rows_is_verbatim() {
    let store = Arc::new(InMemoryStore::new());
    store.add_event(event("later", 60, Some(120)));
    let engine = engine_with(store, 20);

    assert_eq!(engine.respond("events now", "dave").await, NO_ACTIVE_EVENTS);
}

#[tokio::test]
async fn events_now_honors_the_live_window() {
    let store = Arc::new(InMemoryStore::new());
    store.add_event(event("running", -30, Some(30)));
    store.add_event(event("not-started", 30, Some(90)));
    store.add_event(event("open-ended", -10, None));
    let engine = engine_with(store, 20);

    let answer = engine.respond("events now", "erin").await;
    assert!(answer.contains("running"));
    assert!(answer.contains("open-ended"));
    assert!(!answer.contains("not-started"));
}

#[tokio::test]
async fn callers_keep_separate_bounded_histories() {
    let engine = engine_with(Arc::new(InMemoryStore::new()), 2);
    for i in 0..10 {
        engine.respond(&format!("hello {}", i), "frank").await;
    }
    engine.respond("thanks", "grace").await;

    let frank = engine.history("frank");
    assert!(frank.len() <= 4);
    assert_eq!(
        frank.last().map(|m| m.is_from_engine()),
        Some(true)
    );
    assert_eq!(engine.history("grace").len(), 2);
    assert_eq!(engine.metrics().get(MetricType::TotalRequests), 11);
}
