//! # Circuit Breaker Module
//!
//! This module implements the circuit breaker pattern for translation gateway calls.
//! When the provider fails repeatedly, further calls fail fast instead of making every
//! user wait for another timeout.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::config::GatewayConfig;

/// Circuit breaker for translation gateway calls
///
/// # State Machine
///
/// - **Closed**: Normal operation, calls pass through
/// - **Open**: Failure threshold reached, calls fail fast
/// - **Half-Open**: Reset window elapsed, calls are let through again; one more failure
///   reopens the circuit and a success closes it
///
/// # Configuration
///
/// Uses `GatewayConfig` for:
/// - `circuit_breaker_threshold`: Consecutive failures before opening (default: 5)
/// - `circuit_breaker_reset_secs`: Time before attempting reset (default: 60s)
#[derive(Debug)]
pub struct CircuitBreaker {
    state: Mutex<BreakerState>,
    threshold: u32,
    reset_after: Duration,
}

#[derive(Debug, Default)]
struct BreakerState {
    failure_count: u32,
    last_failure_time: Option<Instant>,
}

impl CircuitBreaker {
    /// Create a new circuit breaker from gateway settings
    ///
    /// # Examples
    ///
    /// ```rust
    /// use vocab_trainer::config::GatewayConfig;
    /// use vocab_trainer::circuit_breaker::CircuitBreaker;
    ///
    /// let circuit_breaker = CircuitBreaker::new(&GatewayConfig::default());
    /// assert!(!circuit_breaker.is_open());
    /// ```
    pub fn new(config: &GatewayConfig) -> Self {
        Self::with_reset(
            config.circuit_breaker_threshold,
            Duration::from_secs(config.circuit_breaker_reset_secs),
        )
    }

    fn with_reset(threshold: u32, reset_after: Duration) -> Self {
        Self {
            state: Mutex::new(BreakerState::default()),
            threshold,
            reset_after,
        }
    }

    /// Check if the circuit is open (blocking calls)
    ///
    /// After the reset window the circuit is half-open: calls pass, but the failure count
    /// is kept until a success, so the next failure opens it again.
    pub fn is_open(&self) -> bool {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        match state.last_failure_time {
            Some(last_time) if state.failure_count >= self.threshold => {
                last_time.elapsed() < self.reset_after
            }
            _ => false,
        }
    }

    /// Record a failed gateway call
    pub fn record_failure(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.failure_count += 1;
        state.last_failure_time = Some(Instant::now());
    }

    /// Record a successful gateway call
    pub fn record_success(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        *state = BreakerState::default();
    }
}
