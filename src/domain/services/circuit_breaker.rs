use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Clone)]
pub struct BreakerConfig {
    /// Number of most recent call outcomes kept in the rolling window.
    pub window: usize,
    /// Failure ratio over a full window that trips the breaker.
    pub failure_ratio: f64,
    /// Time spent Open before a single trial request is admitted.
    pub cooldown: Duration,
}

struct Inner {
    state: BreakerState,
    outcomes: VecDeque<bool>, // true = failure
    opened_at: Instant,
    trial_in_flight: bool,
}

/// Per-target circuit breaker. Upstream 5xx and transport failures are
/// recorded; 4xx responses are not counted against the target.
pub struct CircuitBreaker {
    config: BreakerConfig,
    inner: Mutex<Inner>,
}

impl CircuitBreaker {
    pub fn new(config: BreakerConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(Inner {
                state: BreakerState::Closed,
                outcomes: VecDeque::new(),
                opened_at: Instant::now(),
                trial_in_flight: false,
            }),
        }
    }

    pub fn state(&self) -> BreakerState {
        self.inner.lock().unwrap().state
    }

    /// Returns false when the call must be short-circuited to the fallback.
    /// While HalfOpen only one trial call is admitted at a time.
    pub fn try_acquire(&self) -> bool {
        let mut inner = self.inner.lock().unwrap();
        match inner.state {
            BreakerState::Closed => true,
            BreakerState::Open => {
                if inner.opened_at.elapsed() >= self.config.cooldown {
                    inner.state = BreakerState::HalfOpen;
                    inner.trial_in_flight = true;
                    true
                } else {
                    false
                }
            }
            BreakerState::HalfOpen => {
                if inner.trial_in_flight {
                    false
                } else {
                    inner.trial_in_flight = true;
                    true
                }
            }
        }
    }

    pub fn record_success(&self) {
        let mut inner = self.inner.lock().unwrap();
        match inner.state {
            BreakerState::HalfOpen => {
                inner.state = BreakerState::Closed;
                inner.trial_in_flight = false;
                inner.outcomes.clear();
            }
            _ => self.push_outcome(&mut inner, false),
        }
    }

    pub fn record_failure(&self) {
        let mut inner = self.inner.lock().unwrap();
        match inner.state {
            BreakerState::HalfOpen => {
                inner.state = BreakerState::Open;
                inner.trial_in_flight = false;
                inner.opened_at = Instant::now();
            }
            _ => {
                self.push_outcome(&mut inner, true);
                if self.should_trip(&inner) {
                    inner.state = BreakerState::Open;
                    inner.opened_at = Instant::now();
                    inner.outcomes.clear();
                }
            }
        }
    }

    fn push_outcome(&self, inner: &mut Inner, failed: bool) {
        if inner.outcomes.len() == self.config.window {
            inner.outcomes.pop_front();
        }
        inner.outcomes.push_back(failed);
    }

    fn should_trip(&self, inner: &Inner) -> bool {
        if inner.outcomes.len() < self.config.window {
            return false;
        }
        let failures = inner.outcomes.iter().filter(|f| **f).count();
        failures as f64 / inner.outcomes.len() as f64 >= self.config.failure_ratio
    }
}
