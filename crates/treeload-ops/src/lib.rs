//! State persistence and tree reconciliation engine for treeload.
//!
//! This crate grows a uniform directory tree towards a desired
//! [`TreeShape`](treeload_core::TreeShape) without redoing work already
//! recorded at the root, and brackets every run with a persisted progress
//! marker so an interrupted run is detected by the next one.
//!
//! # Example
//!
//! ```rust,no_run
//! use treeload_core::{TreeShape, WorkloadConfig};
//! use treeload_ops::{Orchestrator, RunOutcome};
//!
//! let config = WorkloadConfig::new("/testdir", TreeShape::new(2, 3, 4));
//! match Orchestrator::new(config).run().unwrap() {
//!     RunOutcome::Unchanged => println!("already at the desired shape"),
//!     RunOutcome::Grown(stats) => println!("{}", stats.summary()),
//! }
//! ```

mod orchestrator;
mod reconcile;
mod stats;
mod store;

pub use orchestrator::{Orchestrator, RunOutcome};
pub use reconcile::TreeReconciler;
pub use stats::ReconcileStats;
pub use store::StateStore;

// Re-export core types for convenience
pub use treeload_core::{ErrorKind, TreeShape, TreeState, WorkloadConfig, WorkloadError};
