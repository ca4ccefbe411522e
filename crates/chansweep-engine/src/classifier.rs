//! Staleness classifier.
//!
//! Works on a bounded sample of a channel's most recent messages, never the
//! full history, so a verdict only reflects what the sample shows.

use chansweep_core::types::{HistoryMessage, StalenessRule};

/// Decide whether a channel is stale from its sampled history.
///
/// `AnyOld`: stale iff any sampled message is older than `cutoff` and was
/// not written by `requester`. One such message is enough, even when newer
/// messages sit in the same sample.
///
/// `NoRecentActivity`: stale iff the sample has at least one message not
/// written by `requester` and all of those are older than `cutoff`.
///
/// An empty sample is never stale.
pub fn is_stale(
    messages: &[HistoryMessage],
    requester: &str,
    cutoff: f64,
    rule: StalenessRule,
) -> bool {
    let mut others = messages.iter().filter(|m| m.is_by_other_than(requester));

    match rule {
        StalenessRule::AnyOld => others.any(|m| m.ts < cutoff),
        StalenessRule::NoRecentActivity => {
            let mut seen = false;
            for m in others {
                if m.ts >= cutoff {
                    return false;
                }
                seen = true;
            }
            seen
        }
    }
}
