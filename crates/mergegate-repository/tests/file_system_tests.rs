//! Integration tests for the file system store

use futures::future::join_all;
use mergegate_core::TaggedPayload;
use mergegate_repository::{
    ConfigurationStore, FileSystemStore, Scope, StoreConfig, StoreError, StoreFormat,
    StoredAppliedRule, StoredRuleset,
};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::fs;

fn sample_ruleset() -> StoredRuleset {
    StoredRuleset::new(
        vec![
            StoredAppliedRule::new(
                "ApprovedByXReviewers",
                Some(TaggedPayload::new(
                    "approved-by-x-reviewers",
                    br#"{"numberOfReviewers":2}"#.to_vec(),
                )),
            ),
            StoredAppliedRule::new("AllTasksDone", None),
        ],
        true,
    )
}

#[tokio::test]
async fn test_round_trip_in_both_formats() {
    for format in [StoreFormat::Json, StoreFormat::Yaml] {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSystemStore::new(temp_dir.path(), format).unwrap();
        let scope = Scope::repository("heart-of-gold");

        store.set(&scope, sample_ruleset()).await.unwrap();

        let loaded = store.get(&scope).await.unwrap();
        assert_eq!(loaded, Some(sample_ruleset()), "format {:?}", format);
    }
}

#[tokio::test]
async fn test_missing_file_is_absent() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileSystemStore::new(temp_dir.path().join("not-yet"), StoreFormat::Json).unwrap();

    assert!(store.get(&Scope::Global).await.unwrap().is_none());
    assert!(store.get(&Scope::repository("r1")).await.unwrap().is_none());
}

#[tokio::test]
async fn test_files_follow_layout() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileSystemStore::new(temp_dir.path(), StoreFormat::Yaml).unwrap();

    store
        .set(
            &Scope::Global,
            StoredRuleset::new(vec![], true).with_disable_repository_configuration(true),
        )
        .await
        .unwrap();
    store
        .set(&Scope::repository("r1"), sample_ruleset())
        .await
        .unwrap();

    let global = fs::read_to_string(temp_dir.path().join("global.yaml"))
        .await
        .unwrap();
    assert!(global.contains("disableRepositoryConfiguration: true"));
    assert!(temp_dir.path().join("repositories/r1.yaml").exists());

    let mut entries = fs::read_dir(temp_dir.path().join("repositories")).await.unwrap();
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await.unwrap() {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    assert_eq!(names, vec!["r1.yaml"]);
}

#[tokio::test]
async fn test_last_write_wins() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileSystemStore::new(temp_dir.path(), StoreFormat::Json).unwrap();

    store.set(&Scope::Global, sample_ruleset()).await.unwrap();
    store
        .set(&Scope::Global, StoredRuleset::new(vec![], false))
        .await
        .unwrap();

    let loaded = store.get(&Scope::Global).await.unwrap().unwrap();
    assert!(loaded.rules.is_empty());
    assert!(!loaded.enabled);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_writes_to_one_scope() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(FileSystemStore::new(temp_dir.path(), StoreFormat::Json).unwrap());
    let scope = Scope::repository("r1");

    let candidates: Vec<StoredRuleset> = (0..8)
        .map(|i| {
            let rules = (0..=i)
                .map(|n| StoredAppliedRule::new(format!("Rule{}", n), None))
                .collect();
            StoredRuleset::new(rules, i % 2 == 0)
        })
        .collect();

    for _ in 0..25 {
        let writes = candidates.iter().cloned().map(|ruleset| {
            let store = Arc::clone(&store);
            let scope = scope.clone();
            tokio::spawn(async move { store.set(&scope, ruleset).await })
        });

        for outcome in join_all(writes).await {
            outcome.unwrap().unwrap();
        }

        let loaded = store.get(&scope).await.unwrap().unwrap();
        assert!(candidates.contains(&loaded));
    }

    let mut entries = fs::read_dir(temp_dir.path().join("repositories")).await.unwrap();
    let mut count = 0;
    while entries.next_entry().await.unwrap().is_some() {
        count += 1;
    }
    assert_eq!(count, 1, "temporary files must not be left behind");
}

#[tokio::test]
async fn test_corrupt_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("global.json"), "{ not json")
        .await
        .unwrap();
    let store = FileSystemStore::new(temp_dir.path(), StoreFormat::Json).unwrap();

    assert!(matches!(
        store.get(&Scope::Global).await,
        Err(StoreError::Json(_))
    ));
}

#[tokio::test]
async fn test_traversal_rejected_before_touching_disk() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileSystemStore::new(temp_dir.path(), StoreFormat::Json).unwrap();

    let result = store
        .set(&Scope::repository("../outside"), sample_ruleset())
        .await;

    assert!(matches!(result, Err(StoreError::InvalidScope { .. })));
    assert!(!temp_dir.path().join("repositories").exists());
}

#[tokio::test]
async fn test_open_from_config() {
    let temp_dir = TempDir::new().unwrap();
    let store = StoreConfig::file_system(temp_dir.path())
        .with_format(StoreFormat::Yaml)
        .open()
        .unwrap();

    store.set(&Scope::Global, sample_ruleset()).await.unwrap();
    assert!(temp_dir.path().join("global.yaml").exists());
}
