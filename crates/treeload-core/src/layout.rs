//! On-disk naming of the generated tree.

use std::path::{Path, PathBuf};

/// Name of the record file stored directly under a workload root.
pub const STATE_FILE_NAME: &str = "teststate-meta.json";

/// Name of the directory under a workload root that holds the generated tree.
pub const DATA_DIR_NAME: &str = "testdata";

/// Path of the record file for a root.
pub fn state_path(root: &Path) -> PathBuf {
    root.join(STATE_FILE_NAME)
}

/// Path of the generated tree for a root.
pub fn data_root(root: &Path) -> PathBuf {
    root.join(DATA_DIR_NAME)
}

/// Name of the `index`-th directory (1-based) at `level` (1-based).
pub fn dir_name(level: u32, index: u32) -> String {
    format!("dir_{level}_{index}")
}

/// Name of the `index`-th file (1-based) in a directory.
pub fn file_name(index: u32) -> String {
    format!("file_{index}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        assert_eq!(dir_name(1, 2), "dir_1_2");
        assert_eq!(file_name(4), "file_4");
    }

    #[test]
    fn test_paths() {
        let root = Path::new("/testdir");
        assert_eq!(state_path(root), PathBuf::from("/testdir/teststate-meta.json"));
        assert_eq!(data_root(root), PathBuf::from("/testdir/testdata"));
    }
}
