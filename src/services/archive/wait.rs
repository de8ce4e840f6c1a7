//! Bounded polling for the firmware artifact.

use std::path::Path;
use std::thread;
use std::time::Duration;

const DEFAULT_INTERVAL: Duration = Duration::from_millis(100);
const DEFAULT_MAX_ATTEMPTS: u32 = 100;

/// Fixed-step polling bound: `interval * max_attempts` is the longest wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl WaitPolicy {
    /// Policy covering roughly `total` in steps of the default interval.
    #[must_use]
    pub fn for_total(total: Duration) -> Self {
        let steps = total.as_millis().div_ceil(DEFAULT_INTERVAL.as_millis());
        Self {
            interval: DEFAULT_INTERVAL,
            max_attempts: u32::try_from(steps).unwrap_or(u32::MAX),
        }
    }

    /// Longest time the poll may block.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.interval.saturating_mul(self.max_attempts)
    }
}

/// Poll until `path` exists, sleeping `policy.interval` between checks.
#[must_use]
pub fn wait_for_artifact(path: &Path, policy: &WaitPolicy) -> bool {
    wait_for_artifact_with(path, policy, |_| thread::sleep(policy.interval))
}

/// Poll until `path` exists, calling `pause` with the attempt number
/// (starting at 1) between checks. Returns `false` once the bound is spent.
pub fn wait_for_artifact_with(
    path: &Path,
    policy: &WaitPolicy,
    mut pause: impl FnMut(u32),
) -> bool {
    if path.exists() {
        return true;
    }
    for attempt in 1..=policy.max_attempts {
        pause(attempt);
        if path.exists() {
            return true;
        }
    }
    false
}
