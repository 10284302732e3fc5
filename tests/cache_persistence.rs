//! Durable tier behaviour across orchestrator instances

mod integration;

use integration::scripted::{happy_backend, orchestrator_with};
use market_potential::cache::{
    Clock, DurableStore, FileStore, ManualClock, MemoryStore, ANALYSIS_BUCKET, DEFAULT_TTL_DAYS,
};
use market_potential::RequestStatus;
use std::sync::Arc;
use std::time::Duration;

const START_MILLIS: u64 = 1_700_000_000_000;

fn ttl() -> Duration {
    Duration::from_secs(DEFAULT_TTL_DAYS * 24 * 60 * 60)
}

#[tokio::test]
async fn test_results_survive_a_restart() {
    let store: Arc<dyn DurableStore> = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(START_MILLIS));

    let first_backend = Arc::new(happy_backend());
    let first = orchestrator_with(first_backend.clone(), store.clone(), Some(clock.clone() as Arc<dyn Clock>)).await;
    let id = first.submit("Pune", "Baner").unwrap().id;
    let original = first.fetch(&id).await.unwrap();
    assert_eq!(first_backend.total_calls(), 3);

    let second_backend = Arc::new(happy_backend());
    let second = orchestrator_with(second_backend.clone(), store.clone(), Some(clock.clone() as Arc<dyn Clock>)).await;
    assert_eq!(second.caches().analysis.len(), 1);

    let id = second.submit("pune", "baner").unwrap().id;
    let restored = second.fetch(&id).await.unwrap();
    assert_eq!(restored.status, RequestStatus::Done);
    assert_eq!(restored.result, original.result);
    assert_eq!(second_backend.total_calls(), 0);
}

#[tokio::test]
async fn test_expired_entries_are_regenerated() {
    let store: Arc<dyn DurableStore> = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(START_MILLIS));

    let first = orchestrator_with(Arc::new(happy_backend()), store.clone(), Some(clock.clone() as Arc<dyn Clock>)).await;
    let id = first.submit("Pune", "Baner").unwrap().id;
    first.fetch(&id).await.unwrap();

    // Exactly at the TTL the entry is still visible.
    clock.advance(ttl());
    let at_edge = Arc::new(happy_backend());
    let orchestrator = orchestrator_with(at_edge.clone(), store.clone(), Some(clock.clone() as Arc<dyn Clock>)).await;
    let id = orchestrator.submit("Pune", "Baner").unwrap().id;
    orchestrator.fetch(&id).await.unwrap();
    assert_eq!(at_edge.total_calls(), 0);

    clock.advance(Duration::from_millis(1));
    let expired = Arc::new(happy_backend());
    let orchestrator = orchestrator_with(expired.clone(), store, Some(clock.clone() as Arc<dyn Clock>)).await;
    assert!(orchestrator.caches().analysis.is_empty());
    let id = orchestrator.submit("Pune", "Baner").unwrap().id;
    orchestrator.fetch(&id).await.unwrap();
    assert_eq!(expired.total_calls(), 3);
}

#[tokio::test]
async fn test_file_store_writes_one_snapshot_per_bucket() {
    let dir = std::env::temp_dir().join(format!("market-potential-it-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    let store: Arc<dyn DurableStore> = Arc::new(FileStore::new(&dir));

    let backend = Arc::new(happy_backend());
    let orchestrator = orchestrator_with(backend, store.clone(), None).await;
    let id = orchestrator.submit("Pune", "Baner").unwrap().id;
    orchestrator.fetch(&id).await.unwrap();

    for bucket in ["validation", "ambiguity", ANALYSIS_BUCKET] {
        assert!(dir.join(format!("{bucket}.json")).exists(), "missing {bucket}");
    }
    let snapshot: serde_json::Value =
        serde_json::from_slice(&store.load(ANALYSIS_BUCKET).await.unwrap().unwrap()).unwrap();
    let entry = &snapshot["pune::baner"];
    assert!(entry["savedAt"].is_u64());
    assert_eq!(entry["value"]["city"], "Pune");

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_extreme_distances_do_not_corrupt_the_analysis_bucket() {
    use market_potential::analysis::{normalize_analysis, AnalysisResult, MAX_DISTANCE_KM};
    use market_potential::cache::{CacheConfig, RequestKey, TieredCache};
    use serde_json::json;

    let store: Arc<dyn DurableStore> = Arc::new(MemoryStore::new());
    let far = normalize_analysis(
        "Pune",
        "Baner",
        &json!({
            "breakdown": {"connectivity": 80},
            "infrastructure": [{"name": "Far Tower", "category": "office", "distance": 1e307}],
        }),
    );
    let near = normalize_analysis("Delhi", "Saket", &json!({"breakdown": {"retail": 90}}));

    let cache: TieredCache<AnalysisResult> =
        TieredCache::new(ANALYSIS_BUCKET, CacheConfig::new(), store.clone());
    cache.set(&RequestKey::new("Delhi", "Saket"), near.clone()).await;
    cache.set(&RequestKey::new("Pune", "Baner"), far.clone()).await;

    let reopened: TieredCache<AnalysisResult> =
        TieredCache::new(ANALYSIS_BUCKET, CacheConfig::new(), store);
    assert_eq!(reopened.load_all().await, 2);
    assert_eq!(reopened.stats().errors, 0);
    assert_eq!(reopened.get(&RequestKey::new("Delhi", "Saket")).await, Some(near));

    let restored = reopened.get(&RequestKey::new("Pune", "Baner")).await.unwrap();
    assert_eq!(restored, far);
    assert!(restored
        .infrastructure
        .iter()
        .any(|i| i.name == "Far Tower" && i.distance == MAX_DISTANCE_KM));
}
