//! Random outcomes and artificial delays used to exercise client retry logic.
//!
//! # Design
//! The random draw is behind the `RandomSource` trait so the handlers never
//! reach for a global generator. Production uses `ThreadRandom`; tests can
//! inject `SeededRandom` for reproducible distributions or a fixed draw.

use std::time::Duration;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Draws above this value succeed.
pub const SUCCESS_THRESHOLD: f64 = 0.3;
/// Draws above this value (and not above `SUCCESS_THRESHOLD`) fail with a 500.
pub const SERVER_ERROR_THRESHOLD: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    ServerError,
    Timeout,
}

impl Outcome {
    /// Maps a uniform draw in `[0, 1)` to an outcome: 70% success,
    /// 15% server error, 15% timeout.
    pub fn from_draw(draw: f64) -> Self {
        if draw > SUCCESS_THRESHOLD {
            Outcome::Success
        } else if draw > SERVER_ERROR_THRESHOLD {
            Outcome::ServerError
        } else {
            Outcome::Timeout
        }
    }
}

/// Source of randomness for the simulated endpoints.
pub trait RandomSource: Send + Sync {
    /// A uniform value in `[0, 1)`.
    fn next_f64(&self) -> f64;

    /// A uniform value in `[0, upper)`. Returns 0 when `upper` is 0.
    fn below(&self, upper: u64) -> u64;
}

/// Thread-local generator seeded from the OS.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_f64(&self) -> f64 {
        rand::rng().random()
    }

    fn below(&self, upper: u64) -> u64 {
        if upper == 0 {
            return 0;
        }
        rand::rng().random_range(0..upper)
    }
}

/// Deterministic generator for reproducible runs.
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&self) -> f64 {
        self.rng.lock().random()
    }

    fn below(&self, upper: u64) -> u64 {
        if upper == 0 {
            return 0;
        }
        self.rng.lock().random_range(0..upper)
    }
}

/// Artificial delays applied by the handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delays {
    /// Exclusive upper bound of the list endpoint's random latency.
    pub max_latency: Duration,
    /// How long the simulated timeout holds the request before answering 408.
    pub timeout: Duration,
}

impl Delays {
    pub const NONE: Delays = Delays {
        max_latency: Duration::ZERO,
        timeout: Duration::ZERO,
    };

    /// Picks a latency in `[0, max_latency)` at millisecond granularity.
    pub fn sample_latency(&self, random: &dyn RandomSource) -> Duration {
        Duration::from_millis(random.below(whole_millis(self.max_latency)))
    }
}

impl Default for Delays {
    fn default() -> Self {
        Self {
            max_latency: Duration::from_millis(1000),
            timeout: Duration::from_millis(15_000),
        }
    }
}

/// `duration` in whole milliseconds, saturating at `u64::MAX`.
pub fn whole_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Sleeps for `duration` without holding anything shared; zero returns at once.
pub async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}
