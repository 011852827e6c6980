//! Scheduling variants and their elapsed-time arithmetic.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;

/// Selects how a wrapper measures time since its last effective execution.
///
/// The three variants share one scheduling algorithm; they differ only in
/// the elapsed-time formula and the seed of the last-execution timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Executes on the leading edge, then at most once per delay.
    Throttle,
    /// Never executes on the leading edge; fires once the delay has passed
    /// since the last effective execution.
    Debounce,
    /// Always defers; only the most recent call of a burst executes, one
    /// full delay after that call.
    WaitLast,
}

impl Variant {
    /// Seed for the last-execution timestamp of a fresh wrapper.
    ///
    /// `Throttle` starts with no recorded execution so its first call runs
    /// immediately; the other two start as if they had just executed.
    pub(crate) fn seed(&self, now: Instant) -> Option<Instant> {
        match self {
            Variant::Throttle => None,
            Variant::Debounce | Variant::WaitLast => Some(now),
        }
    }

    /// Time elapsed since the last effective execution, as seen by this
    /// variant.
    ///
    /// `WaitLast` always reports zero, forcing the deferred branch. A
    /// missing timestamp counts as infinitely long ago.
    pub(crate) fn elapsed(&self, now: Instant, last_exec: Option<Instant>) -> Duration {
        match self {
            Variant::WaitLast => Duration::ZERO,
            Variant::Throttle | Variant::Debounce => match last_exec {
                Some(at) => now.duration_since(at),
                None => Duration::MAX,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throttle_seeds_empty() {
        let now = Instant::now();
        assert_eq!(Variant::Throttle.seed(now), None);
        assert_eq!(Variant::Debounce.seed(now), Some(now));
        assert_eq!(Variant::WaitLast.seed(now), Some(now));
    }

    #[test]
    fn test_elapsed_without_execution_is_infinite() {
        let now = Instant::now();
        assert_eq!(Variant::Throttle.elapsed(now, None), Duration::MAX);
        assert_eq!(Variant::Debounce.elapsed(now, None), Duration::MAX);
    }

    #[test]
    fn test_elapsed_measures_since_last_execution() {
        let start = Instant::now();
        let now = start + Duration::from_millis(70);
        assert_eq!(
            Variant::Throttle.elapsed(now, Some(start)),
            Duration::from_millis(70)
        );
        assert_eq!(
            Variant::Debounce.elapsed(now, Some(start)),
            Duration::from_millis(70)
        );
    }

    #[test]
    fn test_wait_last_elapsed_is_always_zero() {
        let start = Instant::now();
        let now = start + Duration::from_secs(3600);
        assert_eq!(Variant::WaitLast.elapsed(now, Some(start)), Duration::ZERO);
        assert_eq!(Variant::WaitLast.elapsed(now, None), Duration::ZERO);
    }

    #[test]
    fn test_variant_serde_names() {
        assert_eq!(serde_yaml::to_string(&Variant::Throttle).unwrap().trim(), "throttle");
        assert_eq!(serde_yaml::to_string(&Variant::Debounce).unwrap().trim(), "debounce");
        assert_eq!(serde_yaml::to_string(&Variant::WaitLast).unwrap().trim(), "wait_last");

        let parsed: Variant = serde_yaml::from_str("wait_last").unwrap();
        assert_eq!(parsed, Variant::WaitLast);
    }
}
