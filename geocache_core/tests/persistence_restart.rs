// Restart tests against the on-disk store.
//
// Each test plays against a `FileStore` in a temporary directory, drops the
// game, reopens the same directory, and checks that what comes back is
// exactly what was left behind.

use geocache_core::GameState;
use geocache_core::cache::spawn_tokens;
use geocache_core::config::GameConfig;
use geocache_core::persistence::{FileStore, MEMENTOS_KEY, Persistence, SCORE_KEY};
use geocache_core::player::Direction;
use geocache_core::types::Cell;

fn dense_config() -> GameConfig {
    GameConfig {
        spawn_probability: 1.0,
        ..GameConfig::default()
    }
}

fn open(dir: &std::path::Path) -> GameState<FileStore> {
    GameState::load(dense_config(), FileStore::open(dir).unwrap()).unwrap()
}

#[test]
fn collected_tokens_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let cell = (0..)
        .map(|j| Cell::new(5, j))
        .find(|&c| !spawn_tokens(c, 10).is_empty())
        .unwrap();

    let (cache_before, inventory_before, score_before) = {
        let mut game = open(dir.path());
        let mut cache = game.get(cell).unwrap();
        game.collect(&mut cache).unwrap();
        game.move_player(Direction::West);
        (cache, game.inventory().clone(), game.score())
    };

    let mut game = open(dir.path());
    assert_eq!(game.get(cell).unwrap(), cache_before);
    assert_eq!(game.inventory(), &inventory_before);
    assert_eq!(game.score(), score_before);
    assert_eq!(game.trail().history.len(), 2);
}

#[test]
fn untouched_discovery_survives_restart_identically() {
    let dir = tempfile::tempdir().unwrap();
    let cell = Cell::new(-3, 17);
    let first = {
        let mut game = open(dir.path());
        game.get(cell).unwrap()
    };
    let memento_on_disk = FileStore::open(dir.path())
        .unwrap()
        .load(MEMENTOS_KEY)
        .unwrap()
        .unwrap();
    assert!(memento_on_disk.contains("-3,17"));

    let mut game = open(dir.path());
    assert_eq!(game.get(cell).unwrap(), first);
    assert_eq!(first.tokens, spawn_tokens(cell, 10));
}

#[test]
fn reset_clears_disk_and_respawns_fresh() {
    let dir = tempfile::tempdir().unwrap();
    let cell = (0..)
        .map(|i| Cell::new(i, 2))
        .find(|&c| !spawn_tokens(c, 10).is_empty())
        .unwrap();
    {
        let mut game = open(dir.path());
        let mut cache = game.get(cell).unwrap();
        while game.collect(&mut cache).is_some() {}
        assert!(game.score() > 0);
        game.reset();
    }
    let store = FileStore::open(dir.path()).unwrap();
    assert!(store.load(SCORE_KEY).unwrap().is_none());
    assert!(store.load(MEMENTOS_KEY).unwrap().is_none());

    let mut game = open(dir.path());
    assert_eq!(game.score(), 0);
    assert_eq!(game.get(cell).unwrap().tokens, spawn_tokens(cell, 10));
}

#[test]
fn corrupt_file_does_not_prevent_loading() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("momentos.json"), "garbage{").unwrap();
    std::fs::write(dir.path().join("playerPoints.json"), "12").unwrap();
    let game = open(dir.path());
    assert!(game.caches().mementos().is_empty());
    assert_eq!(game.score(), 12);
}
