use chrono::{Local, NaiveDate};

/// Source of "now" for timestamps and the local calendar day
pub trait Clock {
    /// Current time in epoch milliseconds
    fn now_millis(&self) -> i64;
    /// Current local calendar date
    fn today(&self) -> NaiveDate;
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn now_millis(&self) -> i64 {
        (**self).now_millis()
    }

    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Local::now().timestamp_millis()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock frozen at a given instant, for tests
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub now_millis: i64,
    pub today: NaiveDate,
}

#[cfg(test)]
impl FixedClock {
    pub fn on(today: &str) -> Self {
        Self {
            now_millis: 1_757_462_400_000,
            today: today.parse().expect("valid test date"),
        }
    }
}

#[cfg(test)]
impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.now_millis
    }

    fn today(&self) -> NaiveDate {
        self.today
    }
}
