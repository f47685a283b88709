use std::fs;

use guessr::leaderboard::LeaderboardStore;
use guessr::storage::{KvStore, SqliteStore};
use tempfile::tempdir;

fn board_at(path: &std::path::Path) -> LeaderboardStore {
    LeaderboardStore::new(Box::new(SqliteStore::open(path).unwrap()))
}

#[test]
fn scores_survive_reopening_the_database() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("nested").join("leaderboard.db");

    {
        let mut board = board_at(&db);
        assert_eq!(board.save("Ann", 120.0).unwrap(), 0);
        assert_eq!(board.save("Bob", 300.0).unwrap(), 1);
    }

    let mut board = board_at(&db);
    // the counter continues where the last process stopped
    assert_eq!(board.save("Cid", 120.0).unwrap(), 2);

    let standings = board.list().unwrap();
    let rows: Vec<(&str, f64)> = standings
        .iter()
        .map(|e| (e.name.as_str(), e.points))
        .collect();
    assert_eq!(rows, vec![("Bob", 300.0), ("Ann", 120.0), ("Cid", 120.0)]);
    assert!(standings.iter().all(|e| e.saved_at.is_some()));
}

#[test]
fn foreign_keys_in_the_store_are_ignored() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("leaderboard.db");

    {
        let mut store = SqliteStore::open(&db).unwrap();
        store.set("settings/theme", "dark").unwrap();
    }

    let mut board = board_at(&db);
    board.save("Ann", 10.0).unwrap();
    assert_eq!(board.list().unwrap().len(), 1);
}

#[test]
fn export_writes_ranked_csv() {
    let dir = tempdir().unwrap();
    let mut board = board_at(&dir.path().join("leaderboard.db"));
    board.save("low", 10.2).unwrap();
    board.save("high", 99.7).unwrap();

    let out = dir.path().join("scores.csv");
    board
        .list()
        .unwrap()
        .export_csv(fs::File::create(&out).unwrap())
        .unwrap();

    let text = fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "place,name,points,saved_at");
    assert!(lines[1].starts_with("1,high,100,"));
    assert!(lines[2].starts_with("2,low,10,"));
}

#[test]
fn binary_prints_and_exports_leaderboard() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("leaderboard.db");
    {
        let mut board = board_at(&db);
        board.save("Ann", 42.0).unwrap();
    }

    let output = assert_cmd::Command::cargo_bin("guessr")
        .unwrap()
        .env("HOME", dir.path())
        .arg("--db")
        .arg(&db)
        .arg("--leaderboard")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("1. Ann"));
    assert!(stdout.contains("42"));

    let csv_path = dir.path().join("out.csv");
    assert_cmd::Command::cargo_bin("guessr")
        .unwrap()
        .env("HOME", dir.path())
        .arg("--db")
        .arg(&db)
        .arg("--export")
        .arg(&csv_path)
        .assert()
        .success();
    assert!(fs::read_to_string(&csv_path).unwrap().contains("1,Ann,42,"));
}

#[test]
fn binary_rejects_out_of_order_range() {
    let dir = tempdir().unwrap();
    assert_cmd::Command::cargo_bin("guessr")
        .unwrap()
        .env("HOME", dir.path())
        .args(["--min", "10", "--max", "1"])
        .assert()
        .failure();
}
