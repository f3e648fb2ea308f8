//! Bounded polling for page elements that may not exist yet.

use std::future::Future;
use std::time::Duration;

/// How long to keep probing for something that has not appeared yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Probes made after the first one.
    pub attempts: u32,
    /// Pause before each retry.
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self { attempts, delay }
    }

    /// Worst-case time spent waiting.
    pub fn budget(&self) -> Duration {
        self.delay.saturating_mul(self.attempts)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 60,
            delay: Duration::from_millis(500),
        }
    }
}

/// Result of [`poll_until`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<T> {
    Found(T),
    Exhausted,
}

impl<T> PollOutcome<T> {
    pub fn found(self) -> Option<T> {
        match self {
            PollOutcome::Found(value) => Some(value),
            PollOutcome::Exhausted => None,
        }
    }
}

/// Run `probe` until it yields a value or the policy runs out.
///
/// The first probe runs immediately. A probe error aborts polling.
pub async fn poll_until<T, E, F, Fut>(policy: &RetryPolicy, mut probe: F) -> Result<PollOutcome<T>, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
{
    if let Some(value) = probe().await? {
        return Ok(PollOutcome::Found(value));
    }

    for _ in 0..policy.attempts {
        tokio::time::sleep(policy.delay).await;
        if let Some(value) = probe().await? {
            return Ok(PollOutcome::Found(value));
        }
    }

    Ok(PollOutcome::Exhausted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn quick(attempts: u32) -> RetryPolicy {
        RetryPolicy::new(attempts, Duration::ZERO)
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts, 60);
        assert_eq!(policy.delay, Duration::from_millis(500));
        assert_eq!(policy.budget(), Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_found_immediately() {
        let calls = AtomicU32::new(0);
        let outcome: Result<_, ()> = poll_until(&quick(5), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some("link"))
        })
        .await;
        assert_eq!(outcome, Ok(PollOutcome::Found("link")));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_found_after_retries() {
        let calls = AtomicU32::new(0);
        let outcome: Result<_, ()> = poll_until(&quick(5), || async {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok((n == 3).then_some(n))
        })
        .await;
        assert_eq!(outcome, Ok(PollOutcome::Found(3)));
    }

    #[tokio::test]
    async fn test_exhausted_after_all_attempts() {
        let calls = AtomicU32::new(0);
        let outcome: Result<PollOutcome<()>, ()> = poll_until(&quick(4), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(None)
        })
        .await;
        assert_eq!(outcome, Ok(PollOutcome::Exhausted));
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_probe_error_stops_polling() {
        let calls = AtomicU32::new(0);
        let outcome: Result<PollOutcome<()>, &str> = poll_until(&quick(10), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err("page gone")
        })
        .await;
        assert_eq!(outcome, Err("page gone"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_outcome_found() {
        assert_eq!(PollOutcome::Found(1).found(), Some(1));
        assert_eq!(PollOutcome::<i32>::Exhausted.found(), None);
    }
}
