//! Day-local time sources. The engine reads `now` once per action.
use std::cell::Cell;

use chrono::NaiveDateTime;

use crate::quest::minutes;

pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Wall clock in the host's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// Hand-driven clock for simulations and tests.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Cell<NaiveDateTime>,
}

impl ManualClock {
    #[must_use]
    pub const fn new(start: NaiveDateTime) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn set(&self, at: NaiveDateTime) {
        self.now.set(at);
    }

    pub fn advance_minutes(&self, value: u32) {
        self.now.set(self.now.get() + minutes(value));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}
