//! Time source for expiration checks and ledger timestamps.

use chrono::{DateTime, TimeZone, Utc};

/// Current wall-clock time.
pub trait Clock: Send {
    fn now(&self) -> DateTime<Utc>;

    /// Unix seconds.
    fn unix_now(&self) -> i64 {
        self.now().timestamp()
    }
}

/// System clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to one instant. Tests advance it with [`FixedClock::set`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    at: DateTime<Utc>,
}

impl FixedClock {
    /// Clock at `unix` seconds. Out-of-range values clamp to the epoch.
    #[must_use]
    pub fn at_unix(unix: i64) -> Self {
        let at = Utc
            .timestamp_opt(unix, 0)
            .single()
            .unwrap_or_default();
        Self { at }
    }

    pub fn set(&mut self, unix: i64) {
        *self = Self::at_unix(unix);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.at
    }
}
