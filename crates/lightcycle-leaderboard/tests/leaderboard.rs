use lightcycle_core::score_store::{HighScore, HighScoreStore, StoreError, ranking_lines};
use lightcycle_leaderboard::SqliteLeaderboard;

fn store_in(dir: &tempfile::TempDir) -> SqliteLeaderboard {
    SqliteLeaderboard::new(dir.path().join("leaderboard.db"))
}

fn entry(name: &str, total: i64) -> HighScore {
    HighScore {
        name: name.to_string(),
        total,
    }
}

#[test]
fn repeated_wins_accumulate() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = store_in(&dir);
    store.store_high_score("Flynn", 1).unwrap();
    store.store_high_score("Flynn", 1).unwrap();
    store.store_high_score("Tron", 1).unwrap();

    let top = store.top_high_scores(10).unwrap();
    assert_eq!(top, vec![entry("Flynn", 2), entry("Tron", 1)]);
    assert_eq!(ranking_lines(&top), vec!["1. Flynn: 2", "2. Tron: 1"]);
}

#[test]
fn ties_order_by_name_and_limit_applies() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = store_in(&dir);
    for name in ["Ram", "Clu", "Yori", "Sark"] {
        store.store_high_score(name, 1).unwrap();
    }
    store.store_high_score("Yori", 1).unwrap();

    let top = store.top_high_scores(3).unwrap();
    assert_eq!(top, vec![entry("Yori", 2), entry("Clu", 1), entry("Ram", 1)]);
}

#[test]
fn scores_survive_a_new_handle() {
    let dir = tempfile::tempdir().unwrap();
    store_in(&dir).store_high_score("Flynn", 3).unwrap();

    let mut reopened = store_in(&dir);
    assert_eq!(reopened.top_high_scores(10).unwrap(), vec![entry("Flynn", 3)]);
}

#[test]
fn two_handles_share_one_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut a = store_in(&dir);
    let mut b = store_in(&dir);
    a.store_high_score("Flynn", 1).unwrap();
    b.store_high_score("Flynn", 1).unwrap();
    assert_eq!(a.top_high_scores(1).unwrap(), vec![entry("Flynn", 2)]);
}

#[test]
fn clear_empties_the_board() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = store_in(&dir);
    store.store_high_score("Flynn", 1).unwrap();
    store.clear().unwrap();
    assert!(store.top_high_scores(10).unwrap().is_empty());
    store.clear().unwrap();
}

#[test]
fn unreachable_path_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = SqliteLeaderboard::new(dir.path().join("missing").join("scores.db"));
    let err = store.store_high_score("Flynn", 1).unwrap_err();
    assert!(matches!(err, StoreError::Unavailable(_)), "got {err}");
    assert!(matches!(
        store.top_high_scores(10),
        Err(StoreError::Unavailable(_))
    ));
}
