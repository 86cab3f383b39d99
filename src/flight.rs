use crate::time::Time;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub type AirlineCode = Arc<str>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    pub flight_number: Arc<str>,
    pub airline: AirlineCode,
    pub departure_time: Time,
    pub days_of_operation: Vec<u8>,
    pub valid_from: NaiveDate,
    pub valid_to: NaiveDate,
}

impl Flight {
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.valid_from <= date && date <= self.valid_to
    }

    pub fn window_start(&self, time_allowed: i64, grace_period: i64) -> Time {
        self.departure_time - (time_allowed + grace_period)
    }

    pub fn window_end(&self, grace_period: i64) -> Time {
        self.departure_time + grace_period
    }
}

impl fmt::Display for Flight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let days: String = self.days_of_operation.iter().map(|d| d.to_string()).collect();
        write!(
            f,
            "{} | {} | {} | {} | {} | {}",
            self.flight_number, self.airline, days, self.departure_time, self.valid_from, self.valid_to
        )
    }
}
