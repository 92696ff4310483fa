//! The record persisted at each workload root.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::shape::TreeShape;

/// Shape of the tree at a root plus a progress marker.
///
/// While `in_progress` is set, a reconciliation towards `shape` is running or
/// was interrupted, and the actual tree is somewhere between the previous
/// shape and `shape`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeState {
    /// The shape the tree has, or is being grown to.
    #[serde(flatten)]
    pub shape: TreeShape,

    /// Set while a reconciliation is underway.
    #[serde(rename = "InProgress", default)]
    pub in_progress: bool,

    /// Root the record was written for. Informational only.
    #[serde(rename = "TestDir", default, skip_serializing_if = "Option::is_none")]
    pub test_dir: Option<PathBuf>,
}

impl TreeState {
    /// A record for a root that has never been populated.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A record marking a reconciliation towards `shape` as underway.
    pub fn in_progress(shape: TreeShape) -> Self {
        Self {
            shape,
            in_progress: true,
            test_dir: None,
        }
    }

    /// A record marking `shape` as fully present on disk.
    pub fn completed(shape: TreeShape) -> Self {
        Self {
            shape,
            in_progress: false,
            test_dir: None,
        }
    }

    /// Attach the root path to the record.
    pub fn with_test_dir(mut self, root: impl Into<PathBuf>) -> Self {
        self.test_dir = Some(root.into());
        self
    }
}
