// Durable key/value store boundary.
//
// The core reads every persisted value once at startup and writes each one
// back whenever it changes. Values are strings; the encodings live next to
// the key constants below and are produced/consumed only by `game.rs`.
//
// Two backends:
// - `MemoryStore`: a `BTreeMap`, cloneable so tests can simulate a restart by
//   handing the same contents to a fresh `GameState`.
// - `FileStore`: one file per key in a directory. Writes go to a temporary
//   sibling that is flushed to disk and then renamed into place, so a crash
//   mid-write leaves the old value rather than half a new one. A write that
//   fails removes its temporary file.

use crate::error::{GeocacheError, GeocacheResult};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Memento map: JSON object of cell key to memento string.
pub const MEMENTOS_KEY: &str = "momentos";
/// Inventory: JSON array of `{identity, originCell}` records.
pub const INVENTORY_KEY: &str = "coinInventory";
/// Score: decimal integer string.
pub const SCORE_KEY: &str = "playerPoints";
/// Last known player position: `{"lat":..,"lng":..}`.
pub const POSITION_KEY: &str = "tempMarker";
/// Position history: JSON array of positions.
pub const MOVEMENT_KEY: &str = "movement";

/// Every key the game writes. A full reset removes all of them.
pub const ALL_KEYS: [&str; 5] = [
    MEMENTOS_KEY,
    INVENTORY_KEY,
    SCORE_KEY,
    POSITION_KEY,
    MOVEMENT_KEY,
];

/// A durable string key/value store.
pub trait Persistence {
    /// Read `key`, or `None` if it has never been written (or was removed).
    fn load(&self, key: &str) -> GeocacheResult<Option<String>>;

    /// Write `value` under `key`, replacing any previous value.
    fn save(&mut self, key: &str, value: &str) -> GeocacheResult<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> GeocacheResult<()>;
}

// ---------------------------------------------------------------------------
// In-memory backend
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }
}

impl Persistence for MemoryStore {
    fn load(&self, key: &str) -> GeocacheResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> GeocacheResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> GeocacheResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Directory backend
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> GeocacheResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .map_err(|e| GeocacheError::io(format!("creating {}", dir.display()), e))?;
        if !dir.is_dir() {
            return Err(GeocacheError::StoreDir(dir));
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> GeocacheResult<PathBuf> {
        // Keys are fixed identifiers; refuse anything that could escape the
        // directory.
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(GeocacheError::Config(format!("unusable store key {key:?}")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl Persistence for FileStore {
    fn load(&self, key: &str) -> GeocacheResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(GeocacheError::io(format!("reading {}", path.display()), e)),
        }
    }

    fn save(&mut self, key: &str, value: &str) -> GeocacheResult<()> {
        let path = self.path_for(key)?;
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        let result = write_synced(&tmp, value)
            .map_err(|e| GeocacheError::io(format!("writing {}", tmp.display()), e))
            .and_then(|()| {
                fs::rename(&tmp, &path)
                    .map_err(|e| GeocacheError::io(format!("replacing {}", path.display()), e))
            });
        if result.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        result
    }

    fn remove(&mut self, key: &str) -> GeocacheResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(GeocacheError::io(format!("removing {}", path.display()), e)),
        }
    }
}

fn write_synced(path: &Path, value: &str) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(value.as_bytes())?;
    file.sync_all()
}
