//! Close-once signal shared by the completion counter and the timeout
//! watcher.

use std::sync::atomic::{AtomicU8, Ordering};
use tokio::sync::Notify;

const OPEN: u8 = 0;
const COMPLETED: u8 = 1;
const TIMED_OUT: u8 = 2;

/// Why a resolution stopped collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// Every fetch task finished.
    Completed,
    /// The deadline passed first.
    TimedOut,
}

impl CloseReason {
    fn as_u8(self) -> u8 {
        match self {
            CloseReason::Completed => COMPLETED,
            CloseReason::TimedOut => TIMED_OUT,
        }
    }
}

/// A termination signal that fires at most once.
///
/// Any number of parties may race to call [`close`]; exactly one wins and
/// its reason sticks. Waiters on [`closed`] are released when that happens.
///
/// [`close`]: CloseOnce::close
/// [`closed`]: CloseOnce::closed
#[derive(Debug, Default)]
pub struct CloseOnce {
    state: AtomicU8,
    notify: Notify,
}

impl CloseOnce {
    pub fn new() -> Self {
        Self::default()
    }

    /// Close with `reason`. Returns true only for the call that closed it.
    pub fn close(&self, reason: CloseReason) -> bool {
        let won = self
            .state
            .compare_exchange(OPEN, reason.as_u8(), Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if won {
            self.notify.notify_waiters();
        }
        won
    }

    pub fn is_closed(&self) -> bool {
        self.state.load(Ordering::Acquire) != OPEN
    }

    pub fn reason(&self) -> Option<CloseReason> {
        match self.state.load(Ordering::Acquire) {
            COMPLETED => Some(CloseReason::Completed),
            TIMED_OUT => Some(CloseReason::TimedOut),
            _ => None,
        }
    }

    /// Wait until closed and return the winning reason.
    pub async fn closed(&self) -> CloseReason {
        loop {
            // Register before checking so a close in between is not missed.
            let notified = self.notify.notified();
            if let Some(reason) = self.reason() {
                return reason;
            }
            notified.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_first_close_wins() {
        let guard = CloseOnce::new();
        assert!(!guard.is_closed());
        assert_eq!(guard.reason(), None);

        assert!(guard.close(CloseReason::TimedOut));
        assert!(!guard.close(CloseReason::Completed));
        assert!(!guard.close(CloseReason::TimedOut));

        assert!(guard.is_closed());
        assert_eq!(guard.reason(), Some(CloseReason::TimedOut));
    }

    #[tokio::test]
    async fn test_closed_returns_immediately_when_already_closed() {
        let guard = CloseOnce::new();
        guard.close(CloseReason::Completed);
        assert_eq!(guard.closed().await, CloseReason::Completed);
    }

    #[tokio::test]
    async fn test_closed_wakes_waiter() {
        let guard = Arc::new(CloseOnce::new());
        let waiter = {
            let guard = guard.clone();
            tokio::spawn(async move { guard.closed().await })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        guard.close(CloseReason::TimedOut);

        let reason = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reason, CloseReason::TimedOut);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_racing_closers_have_one_winner() {
        for _ in 0..200 {
            let guard = Arc::new(CloseOnce::new());
            let winners = Arc::new(AtomicUsize::new(0));

            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let guard = guard.clone();
                    let winners = winners.clone();
                    tokio::spawn(async move {
                        let reason = if i % 2 == 0 {
                            CloseReason::Completed
                        } else {
                            CloseReason::TimedOut
                        };
                        if guard.close(reason) {
                            winners.fetch_add(1, Ordering::SeqCst);
                        }
                    })
                })
                .collect();

            for h in handles {
                h.await.unwrap();
            }
            assert_eq!(winners.load(Ordering::SeqCst), 1);
        }
    }
}
