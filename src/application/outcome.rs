// ============================================================
// Layer 2 — Split Outcome
// ============================================================
// A stage either finishes a split or skips it because its
// source file is missing. Anything else stops the stage.

/// What happened to one split in one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitOutcome<R> {
    Done(R),
    Skipped { split: String, reason: String },
}

impl<R> SplitOutcome<R> {
    /// True when the split's source file was missing.
    pub fn is_skipped(&self) -> bool {
        matches!(self, SplitOutcome::Skipped { .. })
    }

    /// The split's report, if it was processed.
    pub fn done(&self) -> Option<&R> {
        match self {
            SplitOutcome::Done(r) => Some(r),
            SplitOutcome::Skipped { .. } => None,
        }
    }
}
