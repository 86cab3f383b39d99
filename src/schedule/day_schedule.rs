use crate::error::BillingError;
use crate::flight::{AirlineCode, Flight};
use crate::time::Time;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Default)]
pub struct DaySchedule {
    chains: HashMap<AirlineCode, Vec<Flight>>,
    last_departure: Option<Time>,
    len: usize,
}

impl DaySchedule {
    pub fn build<I: IntoIterator<Item = Flight>>(flights: I) -> Result<DaySchedule, BillingError> {
        let mut schedule = DaySchedule::default();
        for flight in flights {
            schedule.add(flight)?;
        }
        debug!(
            flights = schedule.len,
            airlines = schedule.chains.len(),
            "built day schedule"
        );
        Ok(schedule)
    }

    fn add(&mut self, flight: Flight) -> Result<(), BillingError> {
        if let Some(previous) = self.last_departure {
            if flight.departure_time < previous {
                return Err(BillingError::InvalidIndexConstruction {
                    flight: flight.flight_number.to_string(),
                    departure: flight.departure_time,
                    previous,
                });
            }
        }
        self.last_departure = Some(flight.departure_time);
        self.len += 1;
        self.chains
            .entry(flight.airline.clone())
            .or_default()
            .push(flight);
        Ok(())
    }

    pub fn has_airline(&self, code: &str) -> bool {
        self.chains.contains_key(code)
    }

    pub fn entries_for(&self, code: &str) -> &[Flight] {
        self.chains.get(code).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
