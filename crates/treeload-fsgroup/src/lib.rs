//! Recursive group ownership and permission fixing.
//!
//! Storage benchmarks often mount generated trees into workloads running
//! under a different user, with only a shared supplementary group. This
//! crate hands a tree over to such a group: every entry gets the group,
//! group read/write, and directories additionally get group search and the
//! setgid bit so entries created later inherit the group.
//!
//! It is a standalone post-processing step and is never invoked while a
//! tree is being grown.

#[cfg(unix)]
mod ownership;

#[cfg(unix)]
pub use ownership::{FsGroupError, OwnershipReport, set_group_ownership};

/// Group id used when none is given.
pub const DEFAULT_GROUP: u32 = 853254;
