use chrono::{DateTime, Duration, Utc};

/// A simple clock abstraction for deterministic timestamps in services and tests.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// Returns a clock that uses the current system time.
    #[must_use]
    pub fn default_clock() -> Self {
        Self::Default
    }

    /// Returns a clock fixed at the given timestamp.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    /// Returns the current time according to the clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::Default => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// If this is a fixed clock, advance it by the given duration.
    ///
    /// Has no effect on `Clock::Default`.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(t) = self {
            *t += delta;
        }
    }

    /// Returns true if this clock is fixed.
    #[must_use]
    pub fn is_fixed(&self) -> bool {
        matches!(self, Clock::Fixed(_))
    }
}

/// Outcome of one countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Remaining seconds after the decrement.
    Remaining(u32),
    /// The budget was already exhausted; the countdown stopped itself.
    Expired,
}

/// Second-granularity countdown for the timed section budget.
///
/// This is a pure tick consumer, not a wall-clock timer: whoever drives the
/// session delivers one tick per second (tests deliver them synthetically).
/// It holds no domain knowledge beyond the remaining budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
    running: bool,
}

impl Countdown {
    /// A stopped countdown holding the given budget.
    #[must_use]
    pub fn new(seconds: u32) -> Self {
        Self {
            remaining: seconds,
            running: false,
        }
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Start the countdown. Starting an already-running countdown is a no-op.
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Stop the countdown. Stopping an already-stopped countdown is a no-op.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Replace the budget and stop, as if freshly constructed.
    pub fn reset(&mut self, seconds: u32) {
        self.remaining = seconds;
        self.running = false;
    }

    /// Consume one tick.
    ///
    /// Returns `None` while stopped; ticks cannot double-fire across
    /// start/stop cycles because a stopped countdown swallows them. A tick
    /// with no budget left emits `Tick::Expired` exactly once and stops the
    /// countdown itself.
    pub fn tick(&mut self) -> Option<Tick> {
        if !self.running {
            return None;
        }
        if self.remaining == 0 {
            self.running = false;
            return Some(Tick::Expired);
        }
        self.remaining -= 1;
        Some(Tick::Remaining(self.remaining))
    }
}

/// Deterministic timestamp for tests and examples (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests and doc examples.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// Returns a `Clock` fixed at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}
