//! Uniform tree shapes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Shape of a uniform directory tree.
///
/// Every directory at levels `1..=depth` has exactly `breadth` child
/// directories below it (except at the deepest level), and every one of
/// those directories holds `files_per_dir` files. The data root itself is
/// level 0 and never holds files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeShape {
    /// Number of directory levels below the data root.
    #[serde(rename = "DirDepth")]
    pub depth: u32,
    /// Number of child directories per directory.
    #[serde(rename = "DirCount")]
    pub breadth: u32,
    /// Number of files in each directory.
    #[serde(rename = "FileCount")]
    pub files_per_dir: u32,
}

impl TreeShape {
    /// The empty shape: a bare data root.
    pub const EMPTY: Self = Self::new(0, 0, 0);

    /// Create a new shape.
    pub const fn new(depth: u32, breadth: u32, files_per_dir: u32) -> Self {
        Self {
            depth,
            breadth,
            files_per_dir,
        }
    }

    /// Check whether this is the empty shape.
    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }

    /// Check whether this shape is componentwise at least as large as `other`.
    ///
    /// A tree can only be grown from `other` to `self` when this holds.
    pub fn covers(&self, other: &TreeShape) -> bool {
        self.depth >= other.depth
            && self.breadth >= other.breadth
            && self.files_per_dir >= other.files_per_dir
    }

    /// Number of directories at a given level (1-based).
    pub fn dirs_at_level(&self, level: u32) -> u64 {
        if level == 0 || level > self.depth {
            return 0;
        }
        u64::from(self.breadth).saturating_pow(level)
    }

    /// Total number of directories implied by this shape, excluding the data root.
    pub fn total_dirs(&self) -> u64 {
        (1..=self.depth).fold(0u64, |acc, level| {
            acc.saturating_add(self.dirs_at_level(level))
        })
    }

    /// Total number of files implied by this shape.
    pub fn total_files(&self) -> u64 {
        self.total_dirs()
            .saturating_mul(u64::from(self.files_per_dir))
    }
}

impl fmt::Display for TreeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "depth={} breadth={} files={}",
            self.depth, self.breadth, self.files_per_dir
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_covers() {
        let small = TreeShape::new(1, 2, 2);
        let large = TreeShape::new(1, 2, 5);

        assert!(large.covers(&small));
        assert!(small.covers(&small));
        assert!(!small.covers(&large));
        assert!(!TreeShape::new(2, 1, 5).covers(&large));
    }

    #[test]
    fn test_totals() {
        let shape = TreeShape::new(2, 3, 4);
        assert_eq!(shape.dirs_at_level(1), 3);
        assert_eq!(shape.dirs_at_level(2), 9);
        assert_eq!(shape.dirs_at_level(3), 0);
        assert_eq!(shape.total_dirs(), 12);
        assert_eq!(shape.total_files(), 48);
    }

    #[test]
    fn test_totals_saturate() {
        let shape = TreeShape::new(u32::MAX, u32::MAX, u32::MAX);
        assert_eq!(shape.dirs_at_level(3), u64::MAX);
        assert_eq!(shape.total_files(), u64::MAX);
    }

    #[test]
    fn test_empty() {
        assert!(TreeShape::default().is_empty());
        assert_eq!(TreeShape::EMPTY.total_dirs(), 0);
        assert!(!TreeShape::new(0, 1, 0).is_empty());
    }
}
