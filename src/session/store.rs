//! Profile snapshot persistence.
//!
//! [`JsonProfileStore`] keeps one JSON file per player under `<data_dir>/profiles/`.
//! Writes go to a temp file that is renamed over the target while an exclusive `fs2`
//! lock is held on a sidecar `.lock` file, so readers never see a torn snapshot.

use super::stats::ProfileSnapshot;
use crate::errors::StoreError;
use fs2::FileExt;
use log::{debug, warn};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub trait ProfileStore: Send + Sync {
    /// Load a snapshot. `Ok(None)` when the player has never been saved.
    fn load(&self, username: &str) -> Result<Option<ProfileSnapshot>, StoreError>;
    fn save(&self, snapshot: &ProfileSnapshot) -> Result<(), StoreError>;
}

/// Filesystem-safe encoding of a username.
pub fn safe_filename(username: &str) -> String {
    utf8_percent_encode(username, NON_ALPHANUMERIC).to_string()
}

#[derive(Debug, Clone)]
pub struct JsonProfileStore {
    dir: PathBuf,
}

impl JsonProfileStore {
    /// Store rooted at `<data_dir>/profiles`. The directory is created on first save.
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            dir: data_dir.as_ref().join("profiles"),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, username: &str) -> PathBuf {
        self.dir.join(format!("{}.json", safe_filename(username)))
    }

    fn lock_path_for(&self, username: &str) -> PathBuf {
        self.dir.join(format!(".{}.lock", safe_filename(username)))
    }

    fn open_lock(&self, username: &str) -> Result<File, StoreError> {
        fs::create_dir_all(&self.dir)?;
        Ok(OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(self.lock_path_for(username))?)
    }
}

impl ProfileStore for JsonProfileStore {
    fn load(&self, username: &str) -> Result<Option<ProfileSnapshot>, StoreError> {
        let path = self.path_for(username);
        if !path.exists() {
            return Ok(None);
        }
        let lock = self.open_lock(username)?;
        lock.lock_shared()?;
        let contents = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        drop(lock);
        let snapshot: ProfileSnapshot = serde_json::from_str(&contents)?;
        if snapshot.username != username {
            warn!(
                "profile file {} names '{}', expected '{}'",
                path.display(),
                snapshot.username,
                username
            );
        }
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &ProfileSnapshot) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(snapshot)?;
        let lock = self.open_lock(&snapshot.username)?;
        lock.lock_exclusive()?;
        let path = self.path_for(&snapshot.username);
        write_atomic(&self.dir, &path, &content)?;
        drop(lock);
        debug!("profile '{}' saved to {}", snapshot.username, path.display());
        Ok(())
    }
}

fn write_atomic(dir: &Path, path: &Path, content: &str) -> std::io::Result<()> {
    let base = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("profile.json");
    let mut counter = 0u32;
    let tmp_path = loop {
        let candidate = dir.join(format!(".{}.tmp-{}-{}", base, std::process::id(), counter));
        match OpenOptions::new().write(true).create_new(true).open(&candidate) {
            Ok(mut tmp) => {
                tmp.write_all(content.as_bytes())?;
                tmp.flush()?;
                let _ = tmp.sync_all();
                break candidate;
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                counter = counter.saturating_add(1);
            }
            Err(e) => return Err(e),
        }
    };
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }
    if let Ok(d) = File::open(dir) {
        let _ = d.sync_all();
    }
    Ok(())
}

/// In-process store for tests and `--ephemeral` play.
#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    profiles: Mutex<HashMap<String, ProfileSnapshot>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.profiles.lock().map(|p| p.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ProfileStore for MemoryProfileStore {
    fn load(&self, username: &str) -> Result<Option<ProfileSnapshot>, StoreError> {
        let profiles = self
            .profiles
            .lock()
            .map_err(|_| StoreError::Internal("profile map poisoned".into()))?;
        Ok(profiles.get(username).cloned())
    }

    fn save(&self, snapshot: &ProfileSnapshot) -> Result<(), StoreError> {
        let mut profiles = self
            .profiles
            .lock()
            .map_err(|_| StoreError::Internal("profile map poisoned".into()))?;
        profiles.insert(snapshot.username.clone(), snapshot.clone());
        Ok(())
    }
}
