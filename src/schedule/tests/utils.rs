use crate::config::ChargePolicy;
use crate::flight::Flight;
use crate::session::LoginSession;
use crate::time::Time;
use chrono::NaiveDate;
use proptest::prelude::Strategy;
use proptest::prop_oneof;
use proptest::strategy::Just;
use std::sync::Arc;

pub fn id(s: &str) -> Arc<str> {
    Arc::from(s)
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn tuesday() -> NaiveDate {
    date(2024, 3, 12)
}

pub fn wednesday() -> NaiveDate {
    date(2024, 3, 13)
}

pub fn policy() -> ChargePolicy {
    ChargePolicy::default()
}

pub fn add_flight(flights: &mut Vec<Flight>, flight_number: &str, departure_time: Time, days: &[u8]) {
    add_seasonal_flight(
        flights,
        flight_number,
        departure_time,
        days,
        date(2024, 3, 1),
        date(2024, 3, 31),
    );
}

pub fn add_seasonal_flight(
    flights: &mut Vec<Flight>,
    flight_number: &str,
    departure_time: Time,
    days: &[u8],
    valid_from: NaiveDate,
    valid_to: NaiveDate,
) {
    let airline = flight_number.split_whitespace().next().unwrap_or(flight_number);
    flights.push(Flight {
        flight_number: id(flight_number),
        airline: id(airline),
        departure_time,
        days_of_operation: days.to_vec(),
        valid_from,
        valid_to,
    });
}

pub fn session(airline: &str, date: NaiveDate, login: Time, logout: Time) -> LoginSession {
    LoginSession {
        workstation: id("GND1CKB001"),
        counter: id("Counter 1"),
        airline: id(airline),
        date,
        login,
        logout,
    }
}

pub fn arb_airline() -> impl Strategy<Value = Arc<str>> {
    prop_oneof![Just(id("BW")), Just(id("LI")), Just(id("DL")),]
}

pub fn arb_flight() -> impl Strategy<Value = Flight> {
    (arb_airline(), 0..1440i64, 0..3u8).prop_map(|(airline, dep, season)| {
        // season 0 does not cover the evaluated dates
        let (valid_from, valid_to) = match season {
            0 => (date(2024, 4, 1), date(2024, 4, 30)),
            _ => (date(2024, 3, 1), date(2024, 3, 31)),
        };
        Flight {
            flight_number: id(&format!("{} {}", airline, dep)),
            airline,
            departure_time: Time(dep),
            days_of_operation: vec![3],
            valid_from,
            valid_to,
        }
    })
}
