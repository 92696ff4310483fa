//! Validating and running one reconciliation request.

use std::fs;

use tracing::{info, warn};

use treeload_core::{TreeState, WorkloadConfig, WorkloadError};

use crate::reconcile::TreeReconciler;
use crate::stats::ReconcileStats;
use crate::store::StateStore;

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The recorded shape already matched the desired one.
    Unchanged,
    /// The tree was grown.
    Grown(ReconcileStats),
}

/// Grows the tree at a root to the configured shape, bracketing the work
/// with progress-marker writes.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    config: WorkloadConfig,
    store: StateStore,
    reconciler: TreeReconciler,
}

impl Orchestrator {
    /// Create an orchestrator for a config.
    pub fn new(config: WorkloadConfig) -> Self {
        let store = StateStore::new(&config.root);
        let reconciler = TreeReconciler::new(&config.root);
        Self {
            config,
            store,
            reconciler,
        }
    }

    /// The config this orchestrator runs.
    pub fn config(&self) -> &WorkloadConfig {
        &self.config
    }

    /// The state store of the configured root.
    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// Run the request.
    ///
    /// Nothing is written unless the recorded state has no progress marker
    /// set and the desired shape covers the recorded one. If reconciliation
    /// fails, the record is left marked in progress.
    pub fn run(&self) -> Result<RunOutcome, WorkloadError> {
        self.config.validate()?;
        let root = &self.config.root;
        let desired = self.config.desired;

        let recorded = self.store.load()?;
        if recorded.in_progress {
            return Err(WorkloadError::InterruptedPriorRun {
                path: self.store.path().to_path_buf(),
            });
        }

        if !desired.covers(&recorded.shape) {
            return Err(WorkloadError::ShrinkUnsupported {
                on_disk: recorded.shape,
                desired,
            });
        }

        if desired == recorded.shape {
            info!(root = %root.display(), shape = %desired, "tree already at desired shape");
            return Ok(RunOutcome::Unchanged);
        }

        info!(
            root = %root.display(),
            from = %recorded.shape,
            to = %desired,
            dirs = desired.total_dirs().saturating_sub(recorded.shape.total_dirs()),
            files = desired.total_files().saturating_sub(recorded.shape.total_files()),
            "growing tree"
        );

        fs::create_dir_all(root).map_err(|e| WorkloadError::io(root, e))?;
        self.store
            .save(&TreeState::in_progress(desired).with_test_dir(root))?;

        let stats = match self.reconciler.reconcile(&recorded.shape, &desired) {
            Ok(stats) => stats,
            Err(e) => {
                warn!(root = %root.display(), "reconciliation failed, leaving state marked in progress");
                return Err(e);
            }
        };

        self.store
            .save(&TreeState::completed(desired).with_test_dir(root))?;
        info!(root = %root.display(), "{}", stats.summary());

        Ok(RunOutcome::Grown(stats))
    }
}
