//! Integration tests for the journal over a real file-backed store

use sentinel_journal::{EventRecord, Journal, DEFAULT_CAPACITY};
use sentinel_store::KvStore;
use sentinel_types::{AlertKind, AlertStatus, SafetyAlert, Severity};

const KEY: &str = "access_scan_history";

fn scratch_store() -> (tempfile::TempDir, KvStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = KvStore::new(dir.path().to_path_buf());
    (dir, store)
}

fn alert(status: AlertStatus) -> SafetyAlert {
    SafetyAlert {
        zone: "Welding Station".into(),
        worker_id: "W102".into(),
        worker_name: "Vijay B".into(),
        alert_type: AlertKind::NoHelmet,
        severity: Severity::High,
        status,
        confidence: 94,
    }
}

#[tokio::test]
async fn opens_empty_without_prior_state() {
    let (_dir, store) = scratch_store();
    store.init().await.unwrap();
    let journal: Journal<u32> = Journal::open(store, KEY, DEFAULT_CAPACITY).await.unwrap();
    assert!(journal.is_empty());
}

#[tokio::test]
async fn zero_capacity_is_rejected() {
    let (_dir, store) = scratch_store();
    store.init().await.unwrap();
    assert!(Journal::<u32>::open(store, KEY, 0).await.is_err());
}

#[tokio::test]
async fn append_puts_record_first() {
    let (_dir, store) = scratch_store();
    store.init().await.unwrap();
    let mut journal = Journal::open(store, KEY, DEFAULT_CAPACITY).await.unwrap();
    journal.append(EventRecord::new("W101-1", 1u32)).await.unwrap();
    journal.append(EventRecord::new("W101-2", 2u32)).await.unwrap();
    assert_eq!(journal.entries()[0].id, "W101-2");
    assert_eq!(journal.len(), 2);
}

#[tokio::test]
async fn durability_round_trip_across_reopen() {
    let (_dir, store) = scratch_store();
    store.init().await.unwrap();

    let mut journal = Journal::open(store.clone(), KEY, DEFAULT_CAPACITY)
        .await
        .unwrap();
    journal
        .append(EventRecord::new("A001", alert(AlertStatus::Active)))
        .await
        .unwrap();
    drop(journal);

    // Simulated process restart: fresh journal over the same store.
    let reopened: Journal<SafetyAlert> =
        Journal::open(store, KEY, DEFAULT_CAPACITY).await.unwrap();
    assert_eq!(reopened.len(), 1);
    assert_eq!(reopened.entries()[0].id, "A001");
    assert_eq!(reopened.entries()[0].payload.status, AlertStatus::Active);
}

#[tokio::test]
async fn fifty_one_appends_evict_only_the_first() {
    let (_dir, store) = scratch_store();
    store.init().await.unwrap();
    let mut journal = Journal::open(store, KEY, 50).await.unwrap();

    for seq in 0..51u32 {
        journal
            .append(EventRecord::new(format!("W101-{seq}"), seq))
            .await
            .unwrap();
        assert!(journal.len() <= 50);
    }

    assert_eq!(journal.len(), 50);
    assert!(journal.entries().iter().all(|r| r.id != "W101-0"));
    assert_eq!(journal.entries()[0].id, "W101-50");
    assert_eq!(journal.entries()[49].id, "W101-1");
}

#[tokio::test]
async fn corrupt_slot_hydrates_empty() {
    let (_dir, store) = scratch_store();
    store.init().await.unwrap();
    store.write(KEY, "{not json at all").await.unwrap();

    let journal: Journal<u32> = Journal::open(store, KEY, DEFAULT_CAPACITY).await.unwrap();
    assert!(journal.is_empty());
}

#[tokio::test]
async fn wrong_shape_slot_hydrates_empty() {
    let (_dir, store) = scratch_store();
    store.init().await.unwrap();
    store.write(KEY, r#"{"this": "is not an array"}"#).await.unwrap();

    let journal: Journal<u32> = Journal::open(store, KEY, DEFAULT_CAPACITY).await.unwrap();
    assert!(journal.is_empty());
}

#[tokio::test]
async fn clear_removes_the_key_entirely() {
    let (_dir, store) = scratch_store();
    store.init().await.unwrap();

    let mut journal = Journal::open(store.clone(), KEY, DEFAULT_CAPACITY)
        .await
        .unwrap();
    journal.append(EventRecord::new("W101-1", 1u32)).await.unwrap();
    journal.clear().await.unwrap();

    assert!(journal.is_empty());
    assert!(!store.contains(KEY).await.unwrap());
    assert_eq!(store.read(KEY).await.unwrap(), None);

    let reopened: Journal<u32> = Journal::open(store, KEY, DEFAULT_CAPACITY).await.unwrap();
    assert!(reopened.is_empty());
}

#[tokio::test]
async fn retain_drops_matching_records_but_keeps_the_key() {
    let (_dir, store) = scratch_store();
    store.init().await.unwrap();

    let mut journal = Journal::open(store.clone(), "safety_alerts", DEFAULT_CAPACITY)
        .await
        .unwrap();
    journal
        .append(EventRecord::new("A001", alert(AlertStatus::Resolved)))
        .await
        .unwrap();
    journal
        .append(EventRecord::new("A002", alert(AlertStatus::Active)))
        .await
        .unwrap();
    journal
        .append(EventRecord::new("A003", alert(AlertStatus::Resolved)))
        .await
        .unwrap();

    let dropped = journal
        .retain(|r| r.payload.status != AlertStatus::Resolved)
        .await
        .unwrap();
    assert_eq!(dropped, 2);
    assert_eq!(journal.len(), 1);
    assert_eq!(journal.entries()[0].id, "A002");
    assert!(store.contains("safety_alerts").await.unwrap());

    let reopened: Journal<SafetyAlert> =
        Journal::open(store, "safety_alerts", DEFAULT_CAPACITY)
            .await
            .unwrap();
    assert_eq!(reopened.len(), 1);
}

#[tokio::test]
async fn update_rewrites_one_record_and_mirrors_it() {
    let (_dir, store) = scratch_store();
    store.init().await.unwrap();

    let mut journal = Journal::open(store.clone(), "safety_alerts", DEFAULT_CAPACITY)
        .await
        .unwrap();
    journal
        .append(EventRecord::new("A001", alert(AlertStatus::Active)))
        .await
        .unwrap();

    let touched = journal.update("A001", SafetyAlert::acknowledge).await.unwrap();
    assert!(touched);
    assert_eq!(
        journal.entries()[0].payload.status,
        AlertStatus::Acknowledged
    );

    let missing = journal.update("A999", SafetyAlert::resolve).await.unwrap();
    assert!(!missing);

    let reopened: Journal<SafetyAlert> =
        Journal::open(store, "safety_alerts", DEFAULT_CAPACITY)
            .await
            .unwrap();
    assert_eq!(
        reopened.entries()[0].payload.status,
        AlertStatus::Acknowledged
    );
}

#[tokio::test]
async fn lowered_capacity_truncates_on_hydration() {
    let (_dir, store) = scratch_store();
    store.init().await.unwrap();

    let mut journal = Journal::open(store.clone(), KEY, 10).await.unwrap();
    for seq in 0..10u32 {
        journal
            .append(EventRecord::new(format!("W101-{seq}"), seq))
            .await
            .unwrap();
    }
    drop(journal);

    let reopened: Journal<u32> = Journal::open(store, KEY, 3).await.unwrap();
    assert_eq!(reopened.len(), 3);
    assert_eq!(reopened.entries()[0].id, "W101-9");
}
