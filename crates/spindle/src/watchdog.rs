use std::{
    io,
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{self, RecvTimeoutError},
        Arc,
    },
    thread,
    time::Duration,
};

use tracing::debug;

/// Background observer enforcing a wall-clock deadline on one evaluation.
///
/// Armed immediately before evaluation starts and disarmed immediately after
/// it returns, exactly once per invocation. The observer blocks on a channel
/// for up to the timeout: if the driver signals completion first it exits
/// quietly; otherwise it fires, storing into the shared interrupt cell the
/// session's engine observes at its next safe point. That store is the only
/// cross-thread write the watchdog ever performs.
pub(crate) struct Watchdog {
    cancel: mpsc::Sender<()>,
    handle: Option<thread::JoinHandle<()>>,
}

impl Watchdog {
    pub(crate) fn arm(timeout: Duration, interrupt: Arc<AtomicBool>) -> io::Result<Self> {
        let (cancel, armed) = mpsc::channel::<()>();
        let handle = thread::Builder::new()
            .name("spindle-watchdog".to_string())
            .spawn(move || {
                if let Err(RecvTimeoutError::Timeout) = armed.recv_timeout(timeout) {
                    debug!(timeout_ms = timeout.as_millis() as u64, "watchdog fired");
                    interrupt.store(true, Ordering::Relaxed);
                }
            })?;
        Ok(Self {
            cancel,
            handle: Some(handle),
        })
    }

    /// Wake the observer early and wait for it to finish.
    pub(crate) fn disarm(self) {
        // All the work happens in Drop so the observer is joined even when
        // the handle unwinds out of scope instead of being disarmed.
    }
}

impl Drop for Watchdog {
    fn drop(&mut self) {
        // Send fails only if the observer already timed out and exited;
        // either way the join below is what guarantees no thread outlives
        // the evaluation call.
        let _ = self.cancel.send(());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{atomic::AtomicBool, atomic::Ordering, Arc},
        thread,
        time::{Duration, Instant},
    };

    use super::Watchdog;

    #[test]
    fn fires_after_the_deadline() {
        let interrupt = Arc::new(AtomicBool::new(false));
        let wd = Watchdog::arm(Duration::from_millis(20), interrupt.clone()).unwrap();
        thread::sleep(Duration::from_millis(200));
        assert!(interrupt.load(Ordering::Relaxed));
        wd.disarm();
    }

    #[test]
    fn disarming_early_prevents_the_interrupt() {
        let interrupt = Arc::new(AtomicBool::new(false));
        let wd = Watchdog::arm(Duration::from_secs(60), interrupt.clone()).unwrap();
        wd.disarm();
        assert!(!interrupt.load(Ordering::Relaxed));
    }

    #[test]
    fn dropping_joins_the_observer_promptly() {
        let interrupt = Arc::new(AtomicBool::new(false));
        let wd = Watchdog::arm(Duration::from_secs(60), interrupt.clone()).unwrap();
        let start = Instant::now();
        drop(wd);
        // Drop must not wait out the full timeout.
        assert!(start.elapsed() < Duration::from_secs(5));
        assert!(!interrupt.load(Ordering::Relaxed));
    }
}
