use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Sub};

const MINUTES_PER_DAY: i64 = 1440;

/// Minutes since midnight, signed and never wrapped at 24:00.
#[derive(Debug, Clone, Copy, Ord, Eq, PartialEq, Hash, Serialize, Deserialize, PartialOrd)]
pub struct Time(pub i64);

impl Time {
    pub fn hm(hours: i64, minutes: i64) -> Time {
        Time(hours * 60 + minutes)
    }

    pub fn until(self, later: Time) -> i64 {
        later.0 - self.0
    }

    pub(crate) fn is_overlapping(time: &(Time, Time), window: &(Time, Time)) -> bool {
        time.0 < window.1 && time.1 > window.0
    }
}

impl From<NaiveTime> for Time {
    fn from(t: NaiveTime) -> Self {
        Time(t.hour() as i64 * 60 + t.minute() as i64)
    }
}

impl std::fmt::Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let days = self.0.div_euclid(MINUTES_PER_DAY);
        let remaining = self.0.rem_euclid(MINUTES_PER_DAY);
        let hours = remaining / 60;
        let mins = remaining % 60;
        write!(f, "{:02}:{:02}", hours, mins)?;
        if days != 0 {
            write!(f, " ({:+}d)", days)?;
        }
        Ok(())
    }
}

impl Add<i64> for Time {
    type Output = Self;

    fn add(self, rhs: i64) -> Self::Output {
        Time(self.0 + rhs)
    }
}

impl Sub<i64> for Time {
    type Output = Self;

    fn sub(self, rhs: i64) -> Self::Output {
        Time(self.0 - rhs)
    }
}

impl Sub<Time> for Time {
    type Output = i64;

    fn sub(self, rhs: Time) -> Self::Output {
        self.0 - rhs.0
    }
}

impl AddAssign<i64> for Time {
    fn add_assign(&mut self, rhs: i64) {
        self.0 += rhs;
    }
}
