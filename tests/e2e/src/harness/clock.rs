//! Clock that tests move forward by hand

use std::sync::Mutex;

use chrono::{Days, NaiveDate};
use lexicon_core::Clock;

/// A [`Clock`] starting at a fixed date that tests can advance
#[derive(Debug)]
pub struct ManualClock {
    today: Mutex<NaiveDate>,
}

impl ManualClock {
    pub fn new(start: NaiveDate) -> Self {
        Self {
            today: Mutex::new(start),
        }
    }

    pub fn set(&self, date: NaiveDate) {
        *self.today.lock().expect("clock lock poisoned") = date;
    }

    pub fn advance(&self, days: u64) -> NaiveDate {
        let mut today = self.today.lock().expect("clock lock poisoned");
        *today = *today + Days::new(days);
        *today
    }
}

impl Clock for ManualClock {
    fn today(&self) -> NaiveDate {
        *self.today.lock().expect("clock lock poisoned")
    }
}
