use crate::error::BillingError;
use crate::flight::Flight;
use crate::session::LoginSession;
use crate::time::Time;
use crate::workstation::counter_name;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use csv::{ReaderBuilder, StringRecord};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

const ROW_KIND_COL: usize = 0;
const FLIGHT_NUMBER_COL: usize = 42;
const ARR_DEP_COL: usize = 43;
const DAYS_OF_WEEK_COL: usize = 45;
const DEPARTURE_TIME_COL: usize = 46;
const VALID_FROM_COL: usize = 47;
const VALID_TO_COL: usize = 48;

const WORKSTATION_COL: usize = 0;
const AIRLINE_COL: usize = 1;
const TIMESTAMP_COL: usize = 2;
const DURATION_COL: usize = 3;

pub fn load_schedule<P: AsRef<Path>>(path: P) -> Result<Vec<Flight>, BillingError> {
    let path = path.as_ref();
    let flights = schedule_from_reader(std::fs::File::open(path)?)?;
    info!(path = %path.display(), departures = flights.len(), "loaded schedule");
    Ok(flights)
}

pub fn schedule_from_reader<R: Read>(r: R) -> Result<Vec<Flight>, BillingError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(r);

    let mut flights = Vec::new();
    for record in reader.records() {
        let record = record?;
        if !is_departure_row(&record) {
            continue;
        }
        let flight = parse_flight(&record).map_err(|reason| BillingError::Schedule {
            line: line_of(&record),
            reason,
        })?;
        flights.push(flight);
    }
    Ok(flights)
}

pub fn load_logins<P: AsRef<Path>>(path: P) -> Result<Vec<LoginSession>, BillingError> {
    let path = path.as_ref();
    let sessions = logins_from_reader(std::fs::File::open(path)?)?;
    info!(path = %path.display(), sessions = sessions.len(), "loaded login records");
    Ok(sessions)
}

pub fn logins_from_reader<R: Read>(r: R) -> Result<Vec<LoginSession>, BillingError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(r);

    let mut sessions = Vec::new();
    for record in reader.records() {
        let record = record?;
        let workstation = field(&record, WORKSTATION_COL).unwrap_or_default();
        if !(workstation.starts_with('W') || workstation.starts_with('G')) {
            debug!(line = line_of(&record), "skipping non-login row");
            continue;
        }
        let session = parse_login(&record).map_err(|reason| BillingError::Login {
            line: line_of(&record),
            reason,
        })?;
        sessions.push(session);
    }
    Ok(sessions)
}

pub fn session_from_fields(
    workstation: &str,
    airline: &str,
    timestamp: &str,
    duration: &str,
) -> Result<LoginSession, String> {
    if airline.is_empty() {
        return Err("missing airline code".to_string());
    }
    let logged_in = parse_timestamp(timestamp)?;
    let duration: i64 = duration
        .parse()
        .map_err(|_| format!("bad duration `{duration}`"))?;
    if duration < 0 {
        return Err(format!("negative duration `{duration}`"));
    }

    let login = Time::from(logged_in.time());
    Ok(LoginSession {
        workstation: Arc::from(workstation),
        counter: counter_name(workstation),
        airline: Arc::from(airline),
        date: logged_in.date(),
        login,
        logout: login + duration,
    })
}

/// `M/d/yyyy H:mm`, falling back to `M/d/yy H:mm` for two-digit years.
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, String> {
    let year = s
        .split_whitespace()
        .next()
        .and_then(|date| date.rsplit('/').next())
        .unwrap_or_default();
    let format = if year.len() == 2 {
        "%m/%d/%y %H:%M"
    } else {
        "%m/%d/%Y %H:%M"
    };
    NaiveDateTime::parse_from_str(s, format).map_err(|e| format!("bad timestamp `{s}`: {e}"))
}

fn is_departure_row(record: &StringRecord) -> bool {
    field(record, ROW_KIND_COL).is_some_and(|kind| kind.starts_with('M'))
        && field(record, ARR_DEP_COL) == Some("D")
}

fn parse_flight(record: &StringRecord) -> Result<Flight, String> {
    let flight_number = required(record, FLIGHT_NUMBER_COL)?;
    let airline = flight_number
        .split_whitespace()
        .next()
        .ok_or_else(|| "empty flight number".to_string())?;

    let days_of_operation = required(record, DAYS_OF_WEEK_COL)?
        .chars()
        .map(|c| {
            c.to_digit(10)
                .filter(|d| (1..=7).contains(d))
                .map(|d| d as u8)
                .ok_or_else(|| format!("bad day of operation `{c}`"))
        })
        .collect::<Result<Vec<u8>, String>>()?;

    let departure = required(record, DEPARTURE_TIME_COL)?;
    let departure_time = NaiveTime::parse_from_str(departure, "%H:%M:%S")
        .map_err(|e| format!("bad departure time `{departure}`: {e}"))?;

    let valid_from = parse_date(required(record, VALID_FROM_COL)?)?;
    let valid_to = parse_date(required(record, VALID_TO_COL)?)?;
    if valid_from > valid_to {
        return Err(format!("season ends {valid_to} before it starts {valid_from}"));
    }

    Ok(Flight {
        flight_number: Arc::from(flight_number),
        airline: Arc::from(airline),
        departure_time: Time::from(departure_time),
        days_of_operation,
        valid_from,
        valid_to,
    })
}

fn parse_login(record: &StringRecord) -> Result<LoginSession, String> {
    session_from_fields(
        required(record, WORKSTATION_COL)?,
        required(record, AIRLINE_COL)?,
        required(record, TIMESTAMP_COL)?,
        required(record, DURATION_COL)?,
    )
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%m/%d/%Y").map_err(|e| format!("bad date `{s}`: {e}"))
}

fn field(record: &StringRecord, col: usize) -> Option<&str> {
    record.get(col).map(str::trim)
}

fn required(record: &StringRecord, col: usize) -> Result<&str, String> {
    field(record, col)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("missing column {col}"))
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}
