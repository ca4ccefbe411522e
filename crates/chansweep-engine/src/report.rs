//! Run report: accumulates per-channel outcomes and renders the summary
//! sent back to the requester.

use std::fmt;

use serde::Serialize;

use chansweep_core::types::{DispositionOutcome, DispositionPolicy};

/// A stale-check that could not finish because a remote call failed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChannelFailure {
    pub channel: String,
    pub reason: String,
}

/// Outcome of one sweep. Appended to while the scan runs, rendered once.
#[derive(Clone, Debug, Serialize)]
pub struct RunReport {
    pub policy: DispositionPolicy,
    pub dry_run: bool,
    outcomes: Vec<DispositionOutcome>,
    failures: Vec<ChannelFailure>,
    /// Channels never looked at because the run deadline expired.
    unchecked: usize,
}

impl RunReport {
    pub fn new(policy: DispositionPolicy, dry_run: bool) -> Self {
        Self {
            policy,
            dry_run,
            outcomes: Vec::new(),
            failures: Vec::new(),
            unchecked: 0,
        }
    }

    pub fn record(&mut self, outcome: DispositionOutcome) {
        debug_assert_eq!(
            outcome.is_hypothetical(),
            self.dry_run,
            "dry-run reports hold only hypothetical outcomes"
        );
        self.outcomes.push(outcome);
    }

    pub fn record_failure(&mut self, channel: impl Into<String>, reason: impl Into<String>) {
        self.failures.push(ChannelFailure {
            channel: channel.into(),
            reason: reason.into(),
        });
    }

    pub fn mark_unchecked(&mut self, count: usize) {
        self.unchecked = count;
    }

    pub fn outcomes(&self) -> &[DispositionOutcome] {
        &self.outcomes
    }

    pub fn failures(&self) -> &[ChannelFailure] {
        &self.failures
    }

    pub fn unchecked(&self) -> usize {
        self.unchecked
    }

    /// Channels archived (or that would be).
    pub fn archived(&self) -> Vec<&str> {
        self.names(|o| {
            matches!(
                o,
                DispositionOutcome::Archived(_) | DispositionOutcome::WouldArchive(_)
            )
        })
    }

    /// Channels left (or that would be).
    pub fn left(&self) -> Vec<&str> {
        self.names(|o| {
            matches!(
                o,
                DispositionOutcome::Left(_) | DispositionOutcome::WouldLeave(_)
            )
        })
    }

    /// Channels closed (or that would be).
    pub fn closed(&self) -> Vec<&str> {
        self.names(|o| {
            matches!(
                o,
                DispositionOutcome::Closed(_) | DispositionOutcome::WouldClose(_)
            )
        })
    }

    fn names(&self, pick: impl Fn(&DispositionOutcome) -> bool) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| pick(o))
            .map(DispositionOutcome::channel_name)
            .collect()
    }

    /// Render the human-readable summary.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.policy, self.dry_run) {
            (DispositionPolicy::ArchiveOrLeave, true) => {
                let (archived, left) = (self.archived(), self.left());
                write!(
                    f,
                    "🧪 Dry-run complete.\n{} channels would be archived: {}\nLeft {} channels would be left: {}",
                    archived.len(),
                    archived.join(", "),
                    left.len(),
                    left.join(", ")
                )?;
            }
            (DispositionPolicy::ArchiveOrLeave, false) => {
                let (archived, left) = (self.archived(), self.left());
                write!(
                    f,
                    "✅ Done\n{} archived: {}\nLeft {} left: {}",
                    archived.len(),
                    archived.join(", "),
                    left.len(),
                    left.join(", ")
                )?;
            }
            (DispositionPolicy::Close, true) => {
                let closed = self.closed();
                write!(
                    f,
                    "🧪 Dry-run complete. {} channels would be closed: {}",
                    closed.len(),
                    closed.join(", ")
                )?;
            }
            (DispositionPolicy::Close, false) => {
                let closed = self.closed();
                write!(f, "✅ Closed {} channels: {}", closed.len(), closed.join(", "))?;
            }
        }

        if !self.failures.is_empty() {
            let names: Vec<&str> = self.failures.iter().map(|fail| fail.channel.as_str()).collect();
            write!(
                f,
                "\n⚠️ {} channels skipped due to errors: {}",
                names.len(),
                names.join(", ")
            )?;
        }

        if self.unchecked > 0 {
            write!(
                f,
                "\n⏱️ Time limit reached; {} channels were not checked.",
                self.unchecked
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_or_leave_live() {
        let mut report = RunReport::new(DispositionPolicy::ArchiveOrLeave, false);
        report.record(DispositionOutcome::Archived("C1".into()));
        report.record(DispositionOutcome::Left("C2".into()));
        assert_eq!(report.render(), "✅ Done\n1 archived: C1\nLeft 1 left: C2");
    }

    #[test]
    fn test_archive_or_leave_dry_run() {
        let mut report = RunReport::new(DispositionPolicy::ArchiveOrLeave, true);
        report.record(DispositionOutcome::WouldArchive("a".into()));
        report.record(DispositionOutcome::WouldLeave("b".into()));
        report.record(DispositionOutcome::WouldArchive("c".into()));
        assert_eq!(
            report.render(),
            "🧪 Dry-run complete.\n2 channels would be archived: a, c\nLeft 1 channels would be left: b"
        );
    }

    #[test]
    fn test_empty_report() {
        let report = RunReport::new(DispositionPolicy::ArchiveOrLeave, false);
        assert_eq!(report.render(), "✅ Done\n0 archived: \nLeft 0 left: ");
    }

    #[test]
    fn test_close_dry_run() {
        let mut report = RunReport::new(DispositionPolicy::Close, true);
        report.record(DispositionOutcome::WouldClose("old-project".into()));
        assert_eq!(
            report.render(),
            "🧪 Dry-run complete. 1 channels would be closed: old-project"
        );
    }

    #[test]
    fn test_close_live() {
        let mut report = RunReport::new(DispositionPolicy::Close, false);
        report.record(DispositionOutcome::Closed("x".into()));
        report.record(DispositionOutcome::Closed("y".into()));
        assert_eq!(report.render(), "✅ Closed 2 channels: x, y");
    }

    #[test]
    fn test_failures_and_unchecked_lines() {
        let mut report = RunReport::new(DispositionPolicy::Close, false);
        report.record_failure("broken", "conversations.history: HTTP 500");
        report.mark_unchecked(3);
        assert_eq!(
            report.render(),
            "✅ Closed 0 channels: \n⚠️ 1 channels skipped due to errors: broken\n⏱️ Time limit reached; 3 channels were not checked."
        );
        assert_eq!(report.failures()[0].reason, "conversations.history: HTTP 500");
    }

    #[test]
    fn test_category_lists_are_disjoint() {
        let mut report = RunReport::new(DispositionPolicy::ArchiveOrLeave, false);
        report.record(DispositionOutcome::Archived("a".into()));
        report.record(DispositionOutcome::Left("b".into()));
        report.record(DispositionOutcome::Archived("c".into()));
        assert_eq!(report.archived(), vec!["a", "c"]);
        assert_eq!(report.left(), vec!["b"]);
        assert!(report.closed().is_empty());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "hypothetical")]
    fn test_dry_run_report_rejects_live_outcome() {
        let mut report = RunReport::new(DispositionPolicy::Close, true);
        report.record(DispositionOutcome::Closed("x".into()));
    }

    #[test]
    fn test_serializes_for_json_output() {
        let mut report = RunReport::new(DispositionPolicy::Close, true);
        report.record(DispositionOutcome::WouldClose("x".into()));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["policy"], "close");
        assert_eq!(json["dry_run"], true);
        assert_eq!(json["outcomes"][0]["outcome"], "would_close");
    }
}
