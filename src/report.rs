use crate::config::BillingConfig;
use crate::error::BillingError;
use crate::flight::AirlineCode;
use crate::schedule::{Evaluation, WeekSchedule};
use crate::session::LoginSession;
use crate::time::Time;
use chrono::NaiveDate;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tabled::Tabled;
use tracing::{debug, info, warn};

// Longer codes in the login file are not airlines.
const MAX_AIRLINE_CODE_LEN: usize = 3;

const HEADER: [&str; 9] = [
    "DATE",
    "COUNTER",
    "AIRLINE",
    "LOGIN",
    "LOGOUT",
    "DURATION",
    "BILLED MINUTES",
    "BILLED HOURS",
    "CHARGE",
];

#[derive(Debug, Clone, PartialEq, Tabled)]
pub struct ReportLine {
    #[tabled(rename = "Date")]
    pub date: NaiveDate,
    #[tabled(rename = "Counter")]
    pub counter: Arc<str>,
    #[tabled(rename = "Airline")]
    pub airline: AirlineCode,
    #[tabled(rename = "Login")]
    pub login: Time,
    #[tabled(rename = "Logout")]
    pub logout: Time,
    #[tabled(rename = "Duration")]
    pub duration: i64,
    #[tabled(rename = "Billed min")]
    pub billed_minutes: i64,
    #[tabled(rename = "Billed h")]
    pub billed_hours: i64,
    #[tabled(rename = "Charge")]
    pub charge: i64,
}

impl ReportLine {
    fn record(&self) -> [String; 9] {
        [
            self.date.to_string(),
            self.counter.to_string(),
            self.airline.to_string(),
            self.login.to_string(),
            self.logout.to_string(),
            self.duration.to_string(),
            self.billed_minutes.to_string(),
            self.billed_hours.to_string(),
            self.charge.to_string(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AirlineBill {
    pub airline: AirlineCode,
    pub lines: Vec<ReportLine>,
    pub total: i64,
    pub no_schedule: usize,
    pub rejected: usize,
}

#[derive(Debug, Clone, PartialEq, Tabled)]
pub struct AirlineTotal {
    #[tabled(rename = "Airline")]
    pub airline: AirlineCode,
    #[tabled(rename = "Billed lines")]
    pub lines: usize,
    #[tabled(rename = "No schedule")]
    pub no_schedule: usize,
    #[tabled(rename = "Rejected")]
    pub rejected: usize,
    #[tabled(rename = "Total charge")]
    pub total: i64,
}

#[derive(Debug, Default)]
pub struct BillingReport {
    pub airlines: Vec<AirlineBill>,
}

impl BillingReport {
    pub fn build(
        week: &WeekSchedule,
        sessions: &[LoginSession],
        config: &BillingConfig,
    ) -> BillingReport {
        let mut by_airline = BTreeMap::<&AirlineCode, Vec<&LoginSession>>::new();
        sessions
            .iter()
            .filter(|s| s.airline.len() <= MAX_AIRLINE_CODE_LEN)
            .for_each(|s| by_airline.entry(&s.airline).or_default().push(s));
        let by_airline: Vec<_> = by_airline.into_iter().collect();

        let airlines: Vec<AirlineBill> = by_airline
            .par_iter()
            .map(|(airline, sessions)| Self::bill_airline(week, airline, sessions, config))
            .collect();

        let report = BillingReport { airlines };
        info!(
            airlines = report.airlines.len(),
            lines = report.lines().count(),
            total = report.grand_total(),
            "built billing report"
        );
        report
    }

    fn bill_airline(
        week: &WeekSchedule,
        airline: &AirlineCode,
        sessions: &[&LoginSession],
        config: &BillingConfig,
    ) -> AirlineBill {
        let mut bill = AirlineBill {
            airline: airline.clone(),
            lines: Vec::new(),
            total: 0,
            no_schedule: 0,
            rejected: 0,
        };

        for session in sessions {
            let policy = config.policy_for(&session.workstation);
            match week.evaluate(session, &policy) {
                Ok(Evaluation::Charged(outcome)) => {
                    if outcome.charge <= 0 || (session.is_gate() && !config.bill_gates) {
                        continue;
                    }
                    bill.total += outcome.charge;
                    bill.lines.push(ReportLine {
                        date: session.date,
                        counter: outcome.counter,
                        airline: outcome.airline,
                        login: outcome.login,
                        logout: outcome.logout,
                        duration: session.duration(),
                        billed_minutes: outcome.chargeable_minutes,
                        billed_hours: outcome.chargeable_hours,
                        charge: outcome.charge,
                    });
                }
                Ok(Evaluation::NoSchedule) => {
                    debug!(%airline, date = %session.date, "no schedule for session");
                    bill.no_schedule += 1;
                }
                Err(err) => {
                    warn!(%airline, workstation = %session.workstation, date = %session.date, "{}", err);
                    bill.rejected += 1;
                }
            }
        }
        bill
    }

    pub fn lines(&self) -> impl Iterator<Item = &ReportLine> {
        self.airlines.iter().flat_map(|a| a.lines.iter())
    }

    pub fn bill_for(&self, airline: &str) -> Option<&AirlineBill> {
        self.airlines.iter().find(|a| &*a.airline == airline)
    }

    pub fn totals(&self) -> Vec<AirlineTotal> {
        self.airlines
            .iter()
            .map(|a| AirlineTotal {
                airline: a.airline.clone(),
                lines: a.lines.len(),
                no_schedule: a.no_schedule,
                rejected: a.rejected,
                total: a.total,
            })
            .collect()
    }

    pub fn grand_total(&self) -> i64 {
        self.airlines.iter().map(|a| a.total).sum()
    }

    pub fn write_csv<W: Write>(&self, w: W) -> Result<(), BillingError> {
        let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(w);
        writer.write_record(HEADER)?;
        for bill in &self.airlines {
            for line in &bill.lines {
                writer.write_record(line.record())?;
            }
            let mut total = vec![String::new(); HEADER.len() - 2];
            total.push(format!("TOTAL CHARGE FOR {}:", bill.airline));
            total.push(bill.total.to_string());
            writer.write_record(&total)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), BillingError> {
        let path = path.as_ref();
        let file = std::fs::File::create(path)?;
        self.write_csv(file)?;
        info!(path = %path.display(), "wrote billing report");
        Ok(())
    }
}
