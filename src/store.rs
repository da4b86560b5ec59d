//! Persisted calibration: `"id,dx,dy"` entries relative to the view centre.

use crate::error::{PadError, PadResult};
use crate::geometry::Point;
use crate::layout::Key;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Key-value store of string sets.
pub trait CalibrationStore {
    fn get(&self, key: &str) -> Option<BTreeSet<String>>;
    fn put(&mut self, key: &str, entries: BTreeSet<String>) -> PadResult<()>;
}

pub fn encode_point(key: &Key, centre: Point) -> String {
    let offset = key.position() - centre;
    format!("{},{},{}", key.id, offset.dx, offset.dy)
}

pub fn decode_point(entry: &str, centre: Point) -> PadResult<Key> {
    let fields: Vec<&str> = entry.split(',').collect();
    let [id, dx, dy] = fields.as_slice() else {
        return Err(PadError::InvalidPoint(entry.to_string()));
    };
    let parse = |field: &str| {
        field
            .trim()
            .parse::<i32>()
            .map_err(|_| PadError::InvalidPoint(entry.to_string()))
    };
    Ok(Key::new(
        parse(*id)?,
        Point::new(centre.x + parse(*dx)?, centre.y + parse(*dy)?),
    ))
}

pub fn encode_keys(keys: &[Key], centre: Point) -> BTreeSet<String> {
    keys.iter().map(|k| encode_point(k, centre)).collect()
}

pub fn decode_keys(entries: &BTreeSet<String>, centre: Point) -> PadResult<Vec<Key>> {
    entries.iter().map(|e| decode_point(e, centre)).collect()
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, BTreeSet<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl CalibrationStore for MemoryStore {
    fn get(&self, key: &str) -> Option<BTreeSet<String>> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: &str, entries: BTreeSet<String>) -> PadResult<()> {
        self.entries.insert(key.to_string(), entries);
        Ok(())
    }
}

/// All store keys in one JSON object, rewritten on every put.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, BTreeSet<String>>,
}

impl JsonFileStore {
    /// Opens `path`, starting empty if the file does not exist yet.
    pub fn open<P: AsRef<Path>>(path: P) -> PadResult<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            debug!("Calibration store {} not found, starting empty", path.display());
            BTreeMap::new()
        };
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CalibrationStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<BTreeSet<String>> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: &str, entries: BTreeSet<String>) -> PadResult<()> {
        self.entries.insert(key.to_string(), entries);
        let content = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, content)?;
        info!("Saved calibration '{}' to {}", key, self.path.display());
        Ok(())
    }
}
