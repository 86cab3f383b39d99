use crate::config::ChargePolicy;
use crate::error::BillingError;
use crate::flight::{AirlineCode, Flight};
use crate::schedule::DaySchedule;
use crate::session::LoginSession;
use crate::time::Time;
use serde::Serialize;
use std::sync::Arc;
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChargeOutcome {
    pub counter: Arc<str>,
    pub airline: AirlineCode,
    pub login: Time,
    pub logout: Time,
    pub chargeable_minutes: i64,
    pub chargeable_hours: i64,
    pub charge: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation {
    Charged(ChargeOutcome),
    NoSchedule,
}

impl Evaluation {
    pub fn outcome(&self) -> Option<&ChargeOutcome> {
        match self {
            Evaluation::Charged(outcome) => Some(outcome),
            Evaluation::NoSchedule => None,
        }
    }
}

/// Any started hour is billed in full, and a full hour also rolls over:
/// 60 minutes bill as 2 hours.
pub fn chargeable_hours(minutes: i64) -> i64 {
    if minutes == 0 { 0 } else { minutes / 60 + 1 }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    start: Time,
    end: Time,
}

impl Window {
    fn of(flight: &Flight, policy: &ChargePolicy) -> Window {
        Window {
            start: flight.window_start(policy.time_allowed, policy.grace_period),
            end: flight.window_end(policy.grace_period),
        }
    }

    fn overlaps(&self, session: &LoginSession) -> bool {
        Time::is_overlapping(&(session.login, session.logout), &(self.start, self.end))
    }

    fn contains(&self, session: &LoginSession) -> bool {
        session.login > self.start && session.logout < self.end
    }

    fn entered_early(&self, session: &LoginSession) -> bool {
        session.login < self.start
    }

    fn left_late(&self, session: &LoginSession) -> bool {
        session.logout > self.end
    }
}

impl DaySchedule {
    pub fn evaluate(
        &self,
        session: &LoginSession,
        policy: &ChargePolicy,
    ) -> Result<Evaluation, BillingError> {
        if session.logout < session.login {
            return Err(BillingError::MalformedInput {
                login: session.login,
                logout: session.logout,
            });
        }

        if !self.has_airline(&session.airline) {
            return Ok(Evaluation::NoSchedule);
        }
        let chain = self.entries_for(&session.airline);

        let windows: Vec<Window> = chain.iter().map(|f| Window::of(f, policy)).collect();
        let active: Vec<bool> = chain.iter().map(|f| f.is_active_on(session.date)).collect();

        let overlaps_any = windows
            .iter()
            .zip(&active)
            .any(|(window, active)| *active && window.overlaps(session));

        let chargeable_minutes = if overlaps_any {
            Self::edge_minutes(session, &windows, &active, policy.time_allowed)
        } else {
            session.duration()
        };

        let chargeable_hours = chargeable_hours(chargeable_minutes);
        trace!(
            airline = %session.airline,
            login = %session.login,
            logout = %session.logout,
            chargeable_minutes,
            "evaluated session"
        );

        Ok(Evaluation::Charged(ChargeOutcome {
            counter: session.counter.clone(),
            airline: session.airline.clone(),
            login: session.login,
            logout: session.logout,
            chargeable_minutes,
            chargeable_hours,
            charge: chargeable_hours * policy.hourly_rate,
        }))
    }

    fn edge_minutes(
        session: &LoginSession,
        windows: &[Window],
        active: &[bool],
        time_allowed: i64,
    ) -> i64 {
        let mut charged = 0;
        for (i, window) in windows.iter().enumerate() {
            if !active[i] || !window.overlaps(session) || window.contains(session) {
                continue;
            }
            let previous = i.checked_sub(1).map(|p| &windows[p]);
            let next = windows.get(i + 1);

            if window.entered_early(session) {
                let login = Self::effective_login(session.login, window, previous, charged, time_allowed);
                charged += login.until(window.start).max(0);
            }
            if window.left_late(session) {
                let logout = Self::effective_logout(session.logout, next);
                charged += window.end.until(logout).max(0);
            }
        }
        charged
    }

    /// Collapses the early edge when it would re-bill minutes already charged
    /// in this session or belonging to the previous departure's window.
    fn effective_login(
        login: Time,
        window: &Window,
        previous: Option<&Window>,
        charged: i64,
        time_allowed: i64,
    ) -> Time {
        match previous {
            Some(previous) if charged != 0 || previous.end.until(window.start) <= time_allowed => {
                window.start
            }
            _ => login,
        }
    }

    /// Stops the late edge where the next departure's window opens.
    fn effective_logout(logout: Time, next: Option<&Window>) -> Time {
        match next {
            Some(next) if logout > next.start => next.start,
            _ => logout,
        }
    }
}
