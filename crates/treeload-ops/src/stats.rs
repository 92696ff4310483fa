//! Reconciliation statistics.

use std::time::Duration;

/// Counts of what a reconciliation created.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    /// Number of directories created.
    pub dirs_created: u64,
    /// Number of files created.
    pub files_created: u64,
    /// Wall time spent creating entries.
    pub elapsed: Duration,
}

impl ReconcileStats {
    /// Create empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total entries created.
    pub fn total_created(&self) -> u64 {
        self.dirs_created + self.files_created
    }

    /// Entries created per second.
    pub fn entries_per_second(&self) -> f64 {
        if self.elapsed.as_secs_f64() > 0.0 {
            self.total_created() as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Get a human-readable summary.
    pub fn summary(&self) -> String {
        format!(
            "Created {} directories and {} files in {:.2}s",
            self.dirs_created,
            self.files_created,
            self.elapsed.as_secs_f64()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary() {
        let stats = ReconcileStats {
            dirs_created: 3,
            files_created: 12,
            elapsed: Duration::from_millis(1500),
        };
        assert_eq!(stats.total_created(), 15);
        assert_eq!(stats.summary(), "Created 3 directories and 12 files in 1.50s");
        assert!((stats.entries_per_second() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rate_without_elapsed() {
        assert_eq!(ReconcileStats::new().entries_per_second(), 0.0);
    }
}
