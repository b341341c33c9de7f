//! Request tokens for last-issued-wins reconciliation
//!
//! Every user-triggered request takes a token from its trigger point before
//! it is sent. When the response arrives, it is applied only if its token is
//! still the latest one issued for that trigger point; anything older has been
//! superseded and is dropped.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Places in the interface that issue requests independently
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerPoint {
    Run,
    Compare,
    /// Generation into the single-run data field
    GenerateSingle,
    /// Generation into the comparison data field
    GenerateComparison,
    Catalog,
    History,
}

impl TriggerPoint {
    fn slot(self) -> usize {
        match self {
            TriggerPoint::Run => 0,
            TriggerPoint::Compare => 1,
            TriggerPoint::GenerateSingle => 2,
            TriggerPoint::GenerateComparison => 3,
            TriggerPoint::Catalog => 4,
            TriggerPoint::History => 5,
        }
    }
}

/// Proof that a request was issued, checked when its response arrives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken {
    trigger: TriggerPoint,
    sequence: u64,
}

impl RequestToken {
    pub fn trigger(&self) -> TriggerPoint {
        self.trigger
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// Monotonic token counters, one per trigger point
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: [AtomicU64; 6],
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a token newer than every token issued before for `trigger`
    pub fn issue(&self, trigger: TriggerPoint) -> RequestToken {
        let sequence = self.latest[trigger.slot()].fetch_add(1, Ordering::SeqCst) + 1;
        RequestToken { trigger, sequence }
    }

    /// Whether no newer request has been issued since `token`
    pub fn is_current(&self, token: RequestToken) -> bool {
        self.latest[token.trigger.slot()].load(Ordering::SeqCst) == token.sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_token_supersedes_older() {
        let sequencer = RequestSequencer::new();
        let first = sequencer.issue(TriggerPoint::Run);
        assert!(sequencer.is_current(first));

        let second = sequencer.issue(TriggerPoint::Run);
        assert!(!sequencer.is_current(first));
        assert!(sequencer.is_current(second));
        assert!(second.sequence() > first.sequence());
    }

    #[test]
    fn trigger_points_are_independent() {
        let sequencer = RequestSequencer::new();
        let run = sequencer.issue(TriggerPoint::Run);
        let compare = sequencer.issue(TriggerPoint::Compare);
        sequencer.issue(TriggerPoint::GenerateSingle);
        assert!(sequencer.is_current(run));
        assert!(sequencer.is_current(compare));
        assert_eq!(compare.trigger(), TriggerPoint::Compare);
    }

    #[test]
    fn generation_is_sequenced_per_data_field() {
        let sequencer = RequestSequencer::new();
        let single = sequencer.issue(TriggerPoint::GenerateSingle);
        let comparison = sequencer.issue(TriggerPoint::GenerateComparison);
        assert!(sequencer.is_current(single));
        assert!(sequencer.is_current(comparison));

        let newer = sequencer.issue(TriggerPoint::GenerateSingle);
        assert!(!sequencer.is_current(single));
        assert!(sequencer.is_current(newer));
        assert!(sequencer.is_current(comparison));
    }
}
