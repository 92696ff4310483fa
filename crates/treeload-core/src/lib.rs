//! Core types for treeload.
//!
//! This crate provides the data structures shared by the reconciliation
//! engine and the command line: the uniform tree shape, the record persisted
//! at each workload root, configuration, and the error type.

mod config;
mod error;
mod layout;
mod shape;
mod state;

pub use config::{WorkloadConfig, WorkloadConfigBuilder};
pub use error::{ErrorKind, WorkloadError};
pub use layout::{DATA_DIR_NAME, STATE_FILE_NAME, data_root, dir_name, file_name, state_path};
pub use shape::TreeShape;
pub use state::TreeState;
