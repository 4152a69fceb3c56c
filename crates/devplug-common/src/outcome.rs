//! Status values for best-effort lifecycle operations.

use std::fmt;

/// Result of a best-effort lifecycle operation.
///
/// Deletion, attach and detach are deliberately infallible at the call
/// site: downstream orchestration depends on teardown never raising, so
/// their failures are written to the log and summarized here instead of
/// being returned as errors. Callers that care can still branch on the
/// status; callers that do not can drop it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The operation ran to completion.
    Completed,
    /// The target resource was already gone; treated as success.
    AlreadyAbsent,
    /// There was nothing to operate on, so no action was taken.
    Skipped,
    /// The operation failed and was given up on; details are in the log.
    Abandoned,
}

impl Outcome {
    /// Returns true if the operation ended in an acceptable state.
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            Outcome::Completed | Outcome::AlreadyAbsent | Outcome::Skipped
        )
    }

    /// Returns true if the operation failed and was abandoned.
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Abandoned)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Outcome::Completed => "completed",
            Outcome::AlreadyAbsent => "already-absent",
            Outcome::Skipped => "skipped",
            Outcome::Abandoned => "abandoned",
        };
        f.write_str(s)
    }
}
