use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds-resolution time source shared by tables and queries.
///
/// Page expiry, per-record expiry and the `max_lifetime_sec` filter all
/// read the same clock, so tests can drive them with [`ManualClock`].
pub trait Clock: Send + Sync {
    fn now_sec(&self) -> u32;
}

/// Wall clock, seconds since the Unix epoch
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_sec(&self) -> u32 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as u32)
            .unwrap_or(0)
    }
}

/// Settable clock for tests and simulations
#[derive(Debug)]
pub struct ManualClock {
    now: AtomicU32,
}

impl ManualClock {
    pub fn new(start: u32) -> Self {
        ManualClock {
            now: AtomicU32::new(start),
        }
    }

    pub fn advance(&self, secs: u32) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }

    pub fn set(&self, now: u32) {
        self.now.store(now, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_sec(&self) -> u32 {
        self.now.load(Ordering::SeqCst)
    }
}
