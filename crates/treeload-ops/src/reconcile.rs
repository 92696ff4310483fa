//! Growing an on-disk tree to a desired shape.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info};

use treeload_core::{TreeShape, WorkloadError, data_root, dir_name, file_name};

use crate::stats::ReconcileStats;

/// A directory whose children at `level` still have to be visited.
#[derive(Debug)]
struct Branch {
    /// Parent directory of the level being grown.
    path: PathBuf,
    /// Level of the children (1-based).
    level: u32,
    /// Nothing below `path` is accounted for by the on-disk shape.
    is_new: bool,
}

/// Creates the directories and files a desired shape adds to an on-disk shape.
///
/// The on-disk shape is trusted as recorded; the tree is not walked. Every
/// entry implied by the on-disk shape is left alone, every entry implied
/// only by the desired shape is created. The first filesystem error aborts
/// the walk and nothing already created is rolled back.
#[derive(Debug, Clone)]
pub struct TreeReconciler {
    data_root: PathBuf,
}

impl TreeReconciler {
    /// Create a reconciler for the tree under the workload `root`.
    pub fn new(root: &Path) -> Self {
        Self {
            data_root: data_root(root),
        }
    }

    /// Directory the generated tree lives in.
    pub fn data_root(&self) -> &Path {
        &self.data_root
    }

    /// Grow the tree from `on_disk` to `desired`.
    ///
    /// Fails with [`WorkloadError::ShrinkUnsupported`] before touching the
    /// filesystem if `desired` is smaller than `on_disk` in any dimension.
    pub fn reconcile(
        &self,
        on_disk: &TreeShape,
        desired: &TreeShape,
    ) -> Result<ReconcileStats, WorkloadError> {
        if !desired.covers(on_disk) {
            return Err(WorkloadError::ShrinkUnsupported {
                on_disk: *on_disk,
                desired: *desired,
            });
        }

        let start = Instant::now();
        let mut stats = ReconcileStats::new();

        fs::create_dir_all(&self.data_root).map_err(|e| WorkloadError::io(&self.data_root, e))?;

        // Depth-first, in ascending index order.
        let mut pending = vec![Branch {
            path: self.data_root.clone(),
            level: 1,
            is_new: 1 > on_disk.depth,
        }];
        while let Some(branch) = pending.pop() {
            self.grow_level(branch, on_disk, desired, &mut stats, &mut pending)?;
        }

        stats.elapsed = start.elapsed();
        info!(
            root = %self.data_root.display(),
            dirs = stats.dirs_created,
            files = stats.files_created,
            "reconciliation finished"
        );
        Ok(stats)
    }

    /// Create the missing directories and files of one level under a branch
    /// and queue the branches one level further down.
    fn grow_level(
        &self,
        branch: Branch,
        on_disk: &TreeShape,
        desired: &TreeShape,
        stats: &mut ReconcileStats,
        pending: &mut Vec<Branch>,
    ) -> Result<(), WorkloadError> {
        let level = branch.level;
        if level > desired.depth {
            return Ok(());
        }

        let existing = if branch.is_new { 0 } else { on_disk.breadth };
        if existing < desired.breadth {
            debug!(
                parent = %branch.path.display(),
                level,
                first = existing + 1,
                last = desired.breadth,
                "creating directories"
            );
            for index in existing + 1..=desired.breadth {
                create_dir(&branch.path.join(dir_name(level, index)), stats)?;
            }
        }

        let mut children = Vec::new();
        for index in 1..=desired.breadth {
            let dir = branch.path.join(dir_name(level, index));
            let dir_is_new = branch.is_new || index > on_disk.breadth;

            // Pre-existing directories only get the files past the recorded count.
            let present = if dir_is_new { 0 } else { on_disk.files_per_dir };
            create_files(&dir, present, desired.files_per_dir, stats)?;

            if level < desired.depth {
                children.push(Branch {
                    path: dir,
                    level: level + 1,
                    is_new: dir_is_new || level + 1 > on_disk.depth,
                });
            }
        }

        pending.extend(children.into_iter().rev());
        Ok(())
    }
}

fn create_dir(path: &Path, stats: &mut ReconcileStats) -> Result<(), WorkloadError> {
    fs::create_dir_all(path).map_err(|e| WorkloadError::io(path, e))?;
    stats.dirs_created += 1;
    Ok(())
}

/// Create files `present + 1..=last` in `dir`, truncating any that already exist.
fn create_files(
    dir: &Path,
    present: u32,
    last: u32,
    stats: &mut ReconcileStats,
) -> Result<(), WorkloadError> {
    if present >= last {
        return Ok(());
    }

    debug!(dir = %dir.display(), first = present + 1, last, "creating files");
    for index in present + 1..=last {
        let path = dir.join(file_name(index));
        File::create(&path).map_err(|e| WorkloadError::io(&path, e))?;
        stats.files_created += 1;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use treeload_core::ErrorKind;

    #[test]
    fn test_empty_shape_creates_only_data_root() {
        let temp = TempDir::new().unwrap();
        let reconciler = TreeReconciler::new(temp.path());

        let stats = reconciler.reconcile(&TreeShape::EMPTY, &TreeShape::EMPTY).unwrap();

        assert_eq!(stats.total_created(), 0);
        assert!(reconciler.data_root().is_dir());
        assert_eq!(fs::read_dir(reconciler.data_root()).unwrap().count(), 0);
    }

    #[test]
    fn test_shrink_rejected_without_mutation() {
        let temp = TempDir::new().unwrap();
        let reconciler = TreeReconciler::new(temp.path());

        let err = reconciler
            .reconcile(&TreeShape::new(2, 2, 2), &TreeShape::new(2, 1, 3))
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ShrinkUnsupported);
        assert!(!reconciler.data_root().exists());
    }

    #[test]
    fn test_breadth_without_depth_creates_nothing() {
        let temp = TempDir::new().unwrap();
        let reconciler = TreeReconciler::new(temp.path());

        let stats = reconciler.reconcile(&TreeShape::EMPTY, &TreeShape::new(0, 4, 4)).unwrap();
        assert_eq!(stats.total_created(), 0);
    }

    #[test]
    fn test_first_error_aborts() {
        let temp = TempDir::new().unwrap();
        let reconciler = TreeReconciler::new(temp.path());
        fs::create_dir_all(reconciler.data_root()).unwrap();
        // A regular file where the second directory should go.
        fs::write(reconciler.data_root().join("dir_1_2"), b"").unwrap();

        let err = reconciler
            .reconcile(&TreeShape::EMPTY, &TreeShape::new(1, 3, 1))
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(reconciler.data_root().join("dir_1_1").is_dir());
        assert!(!reconciler.data_root().join("dir_1_3").exists());
    }
}
