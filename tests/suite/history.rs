//! Result history persisted through finalized sessions.

use std::fs;

use moneymaker_core::{HISTORY_CAPACITY, JsonFileStore, ResultHistory};
use moneymaker_types::{StoredResult, Tier};

use crate::common::{balanced_state, file_session, league_heavy_state, play};

#[test]
fn finalized_results_land_in_the_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("results.json");

    let mut session = file_session(&path);
    let outcome = session.finalize().unwrap();
    assert!(outcome.stored);

    let raw = fs::read_to_string(&path).unwrap();
    let entries: Vec<StoredResult> = serde_json::from_str(&raw).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].result, outcome.result);

    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let first = &value[0];
    assert_eq!(first["success"], true);
    assert_eq!(first["tier"], "bronze");
    assert_eq!(first["code"], "MLB-BRONZE-JT4XJV-2023");
    assert_eq!(first["satisfactions"]["players"], 58);
    assert!(first["storedAt"].is_string());
}

#[test]
fn history_keeps_the_newest_ten_across_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.json");

    for round in 0..=HISTORY_CAPACITY {
        let mut session = file_session(&path);
        if round == 0 {
            play(&mut session, &league_heavy_state());
        }
        session.finalize().unwrap();
    }

    let history = ResultHistory::new(JsonFileStore::new(&path)).history();
    assert_eq!(history.len(), HISTORY_CAPACITY);
    assert!(history.iter().all(|entry| entry.result.success()));
}

#[test]
fn best_result_survives_reopening() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.json");

    let mut session = file_session(&path);
    session.finalize().unwrap();

    play(&mut session, &balanced_state());
    session.add_bonus(5);
    session.finalize().unwrap();

    session.restart();
    play(&mut session, &league_heavy_state());
    session.finalize().unwrap();

    let reopened = ResultHistory::new(JsonFileStore::new(&path));
    assert_eq!(reopened.history().len(), 3);
    let best = reopened.best_result().unwrap();
    assert_eq!(best.result.tier(), Tier::Silver);
    assert_eq!(best.result.overall(), 82);
}

#[test]
fn unwritable_history_does_not_block_finalize() {
    let dir = tempfile::tempdir().unwrap();
    // A plain file where the parent directory should be.
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "").unwrap();
    let path = blocker.join("results.json");

    let mut session = file_session(&path);
    let outcome = session.finalize().unwrap();
    assert!(!outcome.stored);
    assert_eq!(outcome.tier.tier, Tier::Bronze);
    assert!(session.history().history().is_empty());
}

#[test]
fn clear_then_store_starts_fresh() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.json");

    let mut session = file_session(&path);
    session.finalize().unwrap();
    session.finalize().unwrap();
    assert!(session.history_mut().clear());
    assert!(!path.exists());

    session.finalize().unwrap();
    assert_eq!(session.history().history().len(), 1);
}
