//! Workload configuration.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::WorkloadError;
use crate::shape::TreeShape;

/// Configuration for one reconciliation run against a root.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct WorkloadConfig {
    /// Root holding the state record and the generated tree.
    pub root: PathBuf,

    /// Shape to grow the tree to.
    #[builder(default)]
    #[serde(default)]
    pub desired: TreeShape,
}

impl WorkloadConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.root {
            Some(ref root) if root.as_os_str().is_empty() => {
                Err("Root path cannot be empty".to_string())
            }
            Some(_) => Ok(()),
            None => Err("Root path is required".to_string()),
        }
    }
}

impl WorkloadConfig {
    /// Create a new workload config builder.
    pub fn builder() -> WorkloadConfigBuilder {
        WorkloadConfigBuilder::default()
    }

    /// Create a config growing `root` to `desired`.
    pub fn new(root: impl Into<PathBuf>, desired: TreeShape) -> Self {
        Self {
            root: root.into(),
            desired,
        }
    }

    /// Check the config for values no run can work with.
    pub fn validate(&self) -> Result<(), WorkloadError> {
        if self.root.as_os_str().is_empty() {
            return Err(WorkloadError::InvalidConfig {
                message: "Root path cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = WorkloadConfig::builder()
            .root("/testdir")
            .desired(TreeShape::new(5, 100, 100))
            .build()
            .unwrap();

        assert_eq!(config.root, PathBuf::from("/testdir"));
        assert_eq!(config.desired, TreeShape::new(5, 100, 100));
    }

    #[test]
    fn test_config_builder_requires_root() {
        assert!(WorkloadConfig::builder().build().is_err());
        assert!(WorkloadConfig::builder().root("").build().is_err());
    }

    #[test]
    fn test_validate_empty_root() {
        let config = WorkloadConfig::new("", TreeShape::EMPTY);
        assert!(config.validate().is_err());
        assert!(WorkloadConfig::new("/testdir", TreeShape::EMPTY).validate().is_ok());
    }
}
