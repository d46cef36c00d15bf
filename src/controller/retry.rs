//! Bounded attempt sequence and the ledger threaded through it

use std::time::Duration;

use crate::record::{AttemptOutcome, RetryAttempt};

/// One planned attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptDescriptor {
    /// 1-based
    pub index: u32,
    /// Delay before the attempt starts
    pub backoff: Duration,
}

/// Attempt `index` waits `base * index`; the first attempt never waits.
pub fn backoff_for(index: u32, base: Duration) -> Duration {
    if index <= 1 {
        Duration::ZERO
    } else {
        base.saturating_mul(index)
    }
}

/// The finite, ordered sequence of attempts a run may make
#[derive(Debug, Clone)]
pub struct AttemptPlan {
    next: u64,
    max_attempts: u64,
    base_backoff: Duration,
}

impl AttemptPlan {
    pub fn new(max_attempts: u32, base_backoff: Duration) -> Self {
        Self {
            next: 1,
            max_attempts: u64::from(max_attempts.max(1)),
            base_backoff,
        }
    }
}

impl Iterator for AttemptPlan {
    type Item = AttemptDescriptor;

    fn next(&mut self) -> Option<AttemptDescriptor> {
        if self.next > self.max_attempts {
            return None;
        }
        let index = u32::try_from(self.next).ok()?;
        self.next += 1;
        Some(AttemptDescriptor {
            index,
            backoff: backoff_for(index, self.base_backoff),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.max_attempts + 1).saturating_sub(self.next);
        let remaining = usize::try_from(remaining).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for AttemptPlan {}

/// Outcomes of the attempts made so far
#[derive(Debug, Clone, Default)]
pub struct RetryLedger {
    attempts: Vec<RetryAttempt>,
}

impl RetryLedger {
    pub fn record(mut self, descriptor: AttemptDescriptor, outcome: AttemptOutcome) -> Self {
        self.attempts.push(RetryAttempt {
            attempt_index: descriptor.index,
            outcome,
            elapsed_backoff: descriptor.backoff,
        });
        self
    }

    pub fn attempts(&self) -> &[RetryAttempt] {
        &self.attempts
    }

    /// Failed attempts recorded before a success
    pub fn failures(&self) -> u32 {
        self.attempts
            .iter()
            .filter(|a| a.outcome != AttemptOutcome::Success)
            .count() as u32
    }

    pub fn total_backoff(&self) -> Duration {
        self.attempts.iter().map(|a| a.elapsed_backoff).sum()
    }

    pub fn into_attempts(self) -> Vec<RetryAttempt> {
        self.attempts
    }
}
