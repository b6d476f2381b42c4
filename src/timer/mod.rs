//! Periodic hardware timer service
//!
//! This module describes the timer collaborator the clock engine is built on:
//! - [`HardwareTimer`] schedules a periodic callback with microsecond resolution
//! - [`PendingFlag`] hands a timing event from the callback to the main loop
//!
//! The concrete implementations are:
//! - [`ThreadTimer`] which fires the callback from a dedicated host thread
//! - [`ManualTimer`] which fires only when a test asks it to
//!
mod manual_timer;
mod thread_timer;

pub use manual_timer::{ManualTimer, ManualTimerHandle};
pub use thread_timer::ThreadTimer;

use crate::tempo::ClockInterval;
use std::error::Error;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// Callback run on every timer period. Runs in interrupt-like context: it must
/// not block, log or perform I/O.
pub type TimerCallback = Box<dyn Fn() + Send + 'static>;

#[derive(Debug, Clone, PartialEq)]
pub enum TimerError {
    /// The timer could not start its periodic source
    Spawn(String),
    /// `update` was called on a timer that was never started
    NotRunning,
}

impl fmt::Display for TimerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerError::Spawn(msg) => write!(f, "timer start error: {}", msg),
            TimerError::NotRunning => write!(f, "timer is not running"),
        }
    }
}

impl Error for TimerError {}

pub type Result<T> = std::result::Result<T, TimerError>;

/// A periodic interrupt source.
pub trait HardwareTimer: Send {
    /// Starts calling `callback` every `interval`.
    fn begin(&mut self, callback: TimerCallback, interval: ClockInterval) -> Result<()>;

    /// Changes the period of a running timer. The pulse already scheduled is
    /// kept; the new period applies from the one after it.
    fn update(&mut self, interval: ClockInterval) -> Result<()>;

    /// Stops the timer. Calling it on a stopped timer does nothing.
    fn end(&mut self);
}

/// Single-slot "event pending" cell shared between one producer and one consumer.
///
/// Raising an already raised flag coalesces: the consumer sees one event.
#[derive(Debug, Default)]
pub struct PendingFlag {
    raised: AtomicBool,
}

impl PendingFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.raised.store(true, Ordering::Release);
    }

    /// Clears the flag, returning whether it was raised.
    pub fn take(&self) -> bool {
        self.raised.swap(false, Ordering::AcqRel)
    }

    pub fn clear(&self) {
        self.raised.store(false, Ordering::Release);
    }

    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }
}
