//! Persistence of the per-root state record.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use treeload_core::{TreeState, WorkloadError, state_path};

/// Loads, saves and clears the state record of one root.
///
/// Assumes a single writer per root; there is no locking.
#[derive(Debug, Clone)]
pub struct StateStore {
    root: PathBuf,
    path: PathBuf,
}

impl StateStore {
    /// Create a store for the record under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let path = state_path(&root);
        Self { root, path }
    }

    /// Path of the record file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the record, or the empty record if none exists.
    pub fn load(&self) -> Result<TreeState, WorkloadError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no state record, treating root as empty");
                return Ok(TreeState::empty());
            }
            Err(e) => return Err(WorkloadError::io(&self.path, e)),
        };

        serde_json::from_slice(&bytes).map_err(|source| WorkloadError::CorruptState {
            path: self.path.clone(),
            source,
        })
    }

    /// Replace the record.
    ///
    /// The record is written to a temporary file next to the target and
    /// renamed over it, so readers see either the old or the new record.
    pub fn save(&self, state: &TreeState) -> Result<(), WorkloadError> {
        let encoded = serde_json::to_vec(state).map_err(|e| WorkloadError::io(&self.path, e.into()))?;

        let mut tmp = NamedTempFile::new_in(&self.root).map_err(|e| WorkloadError::io(&self.root, e))?;
        tmp.write_all(&encoded)
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| WorkloadError::io(tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| WorkloadError::io(&self.path, e.error))?;

        debug!(
            path = %self.path.display(),
            shape = %state.shape,
            in_progress = state.in_progress,
            "saved state record"
        );
        Ok(())
    }

    /// Remove the record. Succeeds if there is none.
    pub fn clear(&self) -> Result<(), WorkloadError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "cleared state record");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(WorkloadError::io(&self.path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use treeload_core::{ErrorKind, TreeShape};

    #[test]
    fn test_load_absent_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = StateStore::new(temp.path());

        let state = store.load().unwrap();
        assert_eq!(state.shape, TreeShape::EMPTY);
        assert!(!state.in_progress);
    }

    #[test]
    fn test_save_then_load() {
        let temp = TempDir::new().unwrap();
        let store = StateStore::new(temp.path());

        let state = TreeState::in_progress(TreeShape::new(2, 3, 4)).with_test_dir(temp.path());
        store.save(&state).unwrap();

        assert_eq!(store.load().unwrap(), state);
    }

    #[test]
    fn test_save_overwrites_and_leaves_no_temp_files() {
        let temp = TempDir::new().unwrap();
        let store = StateStore::new(temp.path());

        store.save(&TreeState::in_progress(TreeShape::new(1, 1, 1))).unwrap();
        store.save(&TreeState::completed(TreeShape::new(1, 1, 1))).unwrap();

        assert!(!store.load().unwrap().in_progress);
        let entries: Vec<_> = fs::read_dir(temp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_load_corrupt() {
        let temp = TempDir::new().unwrap();
        let store = StateStore::new(temp.path());
        fs::write(store.path(), b"{not json").unwrap();

        let err = store.load().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorruptState);
    }

    #[test]
    fn test_load_unreadable_is_io() {
        let temp = TempDir::new().unwrap();
        let store = StateStore::new(temp.path());
        fs::create_dir(store.path()).unwrap();

        let err = store.load().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_save_missing_root_is_io() {
        let temp = TempDir::new().unwrap();
        let store = StateStore::new(temp.path().join("missing"));

        let err = store.save(&TreeState::empty()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_clear() {
        let temp = TempDir::new().unwrap();
        let store = StateStore::new(temp.path());

        // Nothing to clear
        store.clear().unwrap();

        store.save(&TreeState::completed(TreeShape::new(1, 2, 3))).unwrap();
        store.clear().unwrap();
        assert!(!store.path().exists());
        assert_eq!(store.load().unwrap(), TreeState::empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_record_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let store = StateStore::new(temp.path());
        store.save(&TreeState::empty()).unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
