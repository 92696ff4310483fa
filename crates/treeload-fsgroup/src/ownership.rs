//! Walking a tree and applying group ownership.

use std::fs::{self, Metadata, Permissions};
use std::os::unix::fs::{MetadataExt, PermissionsExt, chown};
use std::path::{Path, PathBuf};

use jwalk::{Parallelism, WalkDir};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Group read/write, added to every entry.
const RW_MASK: u32 = 0o660;
/// Group and owner search, added to directories.
const EXEC_MASK: u32 = 0o110;
/// Set-group-id, added to directories.
const SETGID: u32 = 0o2000;

/// Errors that abort an ownership walk.
#[derive(Debug, Error)]
pub enum FsGroupError {
    /// The root could not be inspected.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Root path is not a directory.
    #[error("Root path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Traversal failed part way.
    #[error("Traversal failed on {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: jwalk::Error,
    },
}

/// Summary of an ownership walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnershipReport {
    /// Entries whose group and mode were both updated.
    pub entries_updated: u64,
    /// Symbolic links left alone.
    pub symlinks_skipped: u64,
    /// Entries where chown or chmod failed.
    pub failures: u64,
}

/// Give every entry under `root` (including `root`) to group `gid`.
///
/// Symbolic links are neither followed nor modified. A failed chown or
/// chmod on one entry is logged and counted, the walk carries on. Failing
/// to read a directory aborts the walk.
pub fn set_group_ownership(root: &Path, gid: u32) -> Result<OwnershipReport, FsGroupError> {
    let root_metadata = fs::metadata(root).map_err(|source| FsGroupError::Io {
        path: root.to_path_buf(),
        source,
    })?;
    if !root_metadata.is_dir() {
        return Err(FsGroupError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    let walker = WalkDir::new(root)
        .parallelism(Parallelism::Serial)
        .skip_hidden(false)
        .follow_links(false);

    let mut report = OwnershipReport::default();
    for entry in walker {
        let entry = entry.map_err(|source| FsGroupError::Walk {
            path: source.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf()),
            source,
        })?;

        if entry.file_type().is_symlink() {
            report.symlinks_skipped += 1;
            continue;
        }

        let path = entry.path();
        let metadata = entry.metadata().map_err(|source| FsGroupError::Walk {
            path: path.clone(),
            source,
        })?;

        if apply(&path, &metadata, gid) {
            report.entries_updated += 1;
        } else {
            report.failures += 1;
        }
    }

    info!(
        root = %root.display(),
        gid,
        updated = report.entries_updated,
        skipped = report.symlinks_skipped,
        failed = report.failures,
        "group ownership applied"
    );
    Ok(report)
}

/// Mode bits an entry should end up with.
fn target_mode(metadata: &Metadata) -> u32 {
    let mut mask = RW_MASK;
    if metadata.is_dir() {
        mask |= EXEC_MASK | SETGID;
    }
    (metadata.permissions().mode() & 0o7777) | mask
}

fn apply(path: &Path, metadata: &Metadata, gid: u32) -> bool {
    let mut ok = true;

    // chown first: it may clear setgid.
    if let Err(e) = chown(path, Some(metadata.uid()), Some(gid)) {
        warn!(path = %path.display(), error = %e, "chown failed");
        ok = false;
    }

    let mode = target_mode(metadata);
    if let Err(e) = fs::set_permissions(path, Permissions::from_mode(mode)) {
        warn!(path = %path.display(), error = %e, "chmod failed");
        ok = false;
    }

    debug!(path = %path.display(), gid, mode = %format!("{mode:o}"), "updated");
    ok
}
