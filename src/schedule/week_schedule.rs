use crate::config::ChargePolicy;
use crate::error::BillingError;
use crate::flight::Flight;
use crate::schedule::{DaySchedule, Evaluation};
use crate::session::LoginSession;
use tracing::{info, warn};

const DAYS_PER_WEEK: usize = 7;

#[derive(Debug)]
pub struct WeekSchedule {
    days: Vec<DaySchedule>,
}

impl WeekSchedule {
    pub fn build(mut flights: Vec<Flight>) -> Result<WeekSchedule, BillingError> {
        // stable: departures at the same minute keep their file order
        flights.sort_by_key(|f| f.departure_time);

        let mut per_day: Vec<Vec<Flight>> = vec![Vec::new(); DAYS_PER_WEEK];
        for flight in &flights {
            for &day in &flight.days_of_operation {
                match per_day.get_mut((day as usize).wrapping_sub(1)) {
                    Some(entries) => entries.push(flight.clone()),
                    None => warn!(flight = %flight.flight_number, day, "ignoring unknown weekday"),
                }
            }
        }

        let days = per_day
            .into_iter()
            .map(DaySchedule::build)
            .collect::<Result<Vec<_>, _>>()?;
        info!(
            departures = flights.len(),
            entries = days.iter().map(DaySchedule::len).sum::<usize>(),
            "built weekly schedule"
        );
        Ok(WeekSchedule { days })
    }

    pub fn day(&self, weekday: u8) -> Option<&DaySchedule> {
        (weekday as usize)
            .checked_sub(1)
            .and_then(|i| self.days.get(i))
    }

    pub fn evaluate(
        &self,
        session: &LoginSession,
        policy: &ChargePolicy,
    ) -> Result<Evaluation, BillingError> {
        match self.day(session.weekday()) {
            Some(day) => day.evaluate(session, policy),
            None => Ok(Evaluation::NoSchedule),
        }
    }
}
