use crate::flight::AirlineCode;
use crate::time::Time;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LoginSession {
    pub workstation: Arc<str>,
    pub counter: Arc<str>,
    pub airline: AirlineCode,
    pub date: NaiveDate,
    pub login: Time,
    pub logout: Time,
}

impl LoginSession {
    pub fn duration(&self) -> i64 {
        self.login.until(self.logout)
    }

    pub fn weekday(&self) -> u8 {
        self.date.weekday().number_from_monday() as u8
    }

    pub fn is_gate(&self) -> bool {
        self.counter.starts_with('G')
    }
}
