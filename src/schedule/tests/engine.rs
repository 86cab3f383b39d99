use crate::config::{BillingConfig, ChargePolicy};
use crate::error::BillingError;
use crate::schedule::charge::ChargeOutcome;
use crate::schedule::{DaySchedule, Evaluation};
use crate::schedule::tests::utils::{
    add_flight, add_seasonal_flight, date, id, policy, session, tuesday, wednesday,
};
use crate::schedule::week_schedule::WeekSchedule;
use crate::time::Time;

fn single_departure() -> DaySchedule {
    let mut flights = Vec::new();
    add_flight(&mut flights, "BW 417", Time::hm(14, 0), &[3]);
    DaySchedule::build(flights).unwrap()
}

fn outcome(evaluation: Evaluation) -> ChargeOutcome {
    match evaluation {
        Evaluation::Charged(outcome) => outcome,
        Evaluation::NoSchedule => panic!("expected a charge outcome"),
    }
}

fn minutes(schedule: &DaySchedule, login: Time, logout: Time) -> i64 {
    let s = session("BW", wednesday(), login, logout);
    outcome(schedule.evaluate(&s, &policy()).unwrap()).chargeable_minutes
}

#[test]
fn test_login_before_window_only() {
    let schedule = single_departure();
    let s = session("BW", wednesday(), Time::hm(9, 0), Time::hm(10, 50));

    let result = outcome(schedule.evaluate(&s, &policy()).unwrap());

    assert_eq!(110, result.chargeable_minutes);
    assert_eq!(2, result.chargeable_hours);
    assert_eq!(200, result.charge);
    assert_eq!(id("Counter 1"), result.counter);
    assert_eq!(id("BW"), result.airline);
    assert_eq!(Time::hm(9, 0), result.login);
    assert_eq!(Time::hm(10, 50), result.logout);
}

#[test]
fn test_logged_in_early() {
    let schedule = single_departure();
    assert_eq!(110, minutes(&schedule, Time::hm(9, 0), Time::hm(12, 0)));
}

#[test]
fn test_logged_out_late() {
    let schedule = single_departure();
    let s = session("BW", wednesday(), Time::hm(12, 0), Time::hm(15, 0));

    let result = outcome(schedule.evaluate(&s, &policy()).unwrap());

    assert_eq!(50, result.chargeable_minutes);
    assert_eq!(1, result.chargeable_hours);
    assert_eq!(100, result.charge);
}

#[test]
fn test_early_and_late() {
    let schedule = single_departure();
    let s = session("BW", wednesday(), Time::hm(10, 0), Time::hm(15, 0));

    let result = outcome(schedule.evaluate(&s, &policy()).unwrap());

    assert_eq!(100, result.chargeable_minutes);
    assert_eq!(2, result.chargeable_hours);
    assert_eq!(200, result.charge);
}

#[test]
fn test_within_window_is_free() {
    let schedule = single_departure();
    let s = session("BW", wednesday(), Time::hm(11, 0), Time::hm(14, 0));

    let result = outcome(schedule.evaluate(&s, &policy()).unwrap());

    assert_eq!(0, result.chargeable_minutes);
    assert_eq!(0, result.chargeable_hours);
    assert_eq!(0, result.charge);
}

#[test]
fn test_exact_window_is_free() {
    let schedule = single_departure();
    assert_eq!(0, minutes(&schedule, Time::hm(10, 50), Time::hm(14, 10)));
}

#[test]
fn test_no_overlap_bills_whole_session() {
    let schedule = single_departure();
    let s = session("BW", wednesday(), Time::hm(15, 0), Time::hm(16, 30));

    let result = outcome(schedule.evaluate(&s, &policy()).unwrap());

    assert_eq!(90, result.chargeable_minutes);
    assert_eq!(2, result.chargeable_hours);
    assert_eq!(200, result.charge);
}

#[test]
fn test_empty_session_without_overlap_is_free() {
    let schedule = single_departure();
    assert_eq!(0, minutes(&schedule, Time::hm(20, 0), Time::hm(20, 0)));
}

#[test]
fn test_unknown_airline() {
    let schedule = single_departure();
    let s = session("LI", wednesday(), Time::hm(9, 0), Time::hm(12, 0));

    assert_eq!(Evaluation::NoSchedule, schedule.evaluate(&s, &policy()).unwrap());
}

#[test]
fn test_other_airlines_do_not_protect() {
    let mut flights = Vec::new();
    add_flight(&mut flights, "LI 300", Time::hm(11, 0), &[3]);
    add_flight(&mut flights, "BW 417", Time::hm(14, 0), &[3]);
    let schedule = DaySchedule::build(flights).unwrap();

    // inside LI's window, before BW's
    assert_eq!(100, minutes(&schedule, Time::hm(9, 0), Time::hm(10, 40)));
}

#[test]
fn test_weekday_indexes_are_independent() {
    let mut flights = Vec::new();
    add_flight(&mut flights, "BW 417", Time::hm(14, 0), &[2]);
    let week = WeekSchedule::build(flights).unwrap();

    let on_tuesday = session("BW", tuesday(), Time::hm(11, 0), Time::hm(14, 0));
    let on_wednesday = session("BW", wednesday(), Time::hm(11, 0), Time::hm(14, 0));

    assert!(week.day(2).unwrap().has_airline("BW"));
    assert!(!week.day(3).unwrap().has_airline("BW"));
    assert_eq!(
        0,
        outcome(week.evaluate(&on_tuesday, &policy()).unwrap()).chargeable_minutes
    );
    assert_eq!(
        Evaluation::NoSchedule,
        week.evaluate(&on_wednesday, &policy()).unwrap()
    );
}

#[test]
fn test_adjacent_windows_share_boundary() {
    let mut flights = Vec::new();
    add_flight(&mut flights, "BW 417", Time::hm(12, 0), &[3]);
    add_flight(&mut flights, "BW 419", Time::hm(15, 20), &[3]);
    let schedule = DaySchedule::build(flights).unwrap();

    // windows are 08:50-12:10 and 12:10-15:30
    assert_eq!(0, minutes(&schedule, Time::hm(11, 0), Time::hm(13, 0)));
    assert_eq!(0, minutes(&schedule, Time::hm(12, 0), Time::hm(12, 20)));
}

#[test]
fn test_gap_between_close_departures_billed_once() {
    let mut flights = Vec::new();
    add_flight(&mut flights, "BW 417", Time::hm(12, 0), &[3]);
    add_flight(&mut flights, "BW 419", Time::hm(18, 0), &[3]);
    let schedule = DaySchedule::build(flights).unwrap();
    let s = session("BW", wednesday(), Time::hm(11, 0), Time::hm(16, 0));

    let result = outcome(schedule.evaluate(&s, &policy()).unwrap());

    // 12:10 until the next window opens at 14:50
    assert_eq!(160, result.chargeable_minutes);
    assert_eq!(3, result.chargeable_hours);
    assert_eq!(300, result.charge);
}

#[test]
fn test_distant_departures() {
    let mut flights = Vec::new();
    add_flight(&mut flights, "BW 101", Time::hm(8, 0), &[3]);
    add_flight(&mut flights, "BW 103", Time::hm(20, 0), &[3]);
    let schedule = DaySchedule::build(flights).unwrap();

    // late edge of the first departure runs up to 16:50, the second's early edge collapses
    assert_eq!(520, minutes(&schedule, Time::hm(7, 0), Time::hm(17, 0)));
    // only the second departure is overlapped, its early edge stands
    assert_eq!(470, minutes(&schedule, Time::hm(9, 0), Time::hm(17, 0)));
    // session covering both windows fully
    assert_eq!(
        60 + 520 + 50,
        minutes(&schedule, Time::hm(3, 50), Time::hm(21, 0))
    );
}

#[test]
fn test_out_of_season_departure_does_not_protect() {
    let mut flights = Vec::new();
    add_seasonal_flight(
        &mut flights,
        "BW 417",
        Time::hm(14, 0),
        &[3],
        date(2024, 4, 1),
        date(2024, 4, 30),
    );
    let schedule = DaySchedule::build(flights).unwrap();

    assert_eq!(180, minutes(&schedule, Time::hm(11, 0), Time::hm(14, 0)));

    let in_season = session("BW", date(2024, 4, 3), Time::hm(11, 0), Time::hm(14, 0));
    assert_eq!(
        0,
        outcome(schedule.evaluate(&in_season, &policy()).unwrap()).chargeable_minutes
    );
}

#[test]
fn test_window_opening_before_midnight() {
    let mut flights = Vec::new();
    add_flight(&mut flights, "BW 7", Time::hm(1, 0), &[3]);
    let schedule = DaySchedule::build(flights).unwrap();

    assert_eq!(0, minutes(&schedule, Time::hm(0, 0), Time::hm(1, 5)));
    assert_eq!(20, minutes(&schedule, Time::hm(0, 0), Time::hm(1, 30)));
}

#[test]
fn test_workstation_allowance() {
    let schedule = single_departure();
    let mut config = BillingConfig::default();
    config.workstation_time_allowed.insert("GND1GTG001".to_string(), 45);
    let gate_policy = config.policy_for("GND1GTG001");
    let s = session("BW", wednesday(), Time::hm(12, 0), Time::hm(14, 0));

    let result = outcome(schedule.evaluate(&s, &gate_policy).unwrap());

    // gate window opens at 13:05
    assert_eq!(65, result.chargeable_minutes);
    assert_eq!(2, result.chargeable_hours);
}

#[test]
fn test_hourly_rate() {
    let schedule = single_departure();
    let s = session("BW", wednesday(), Time::hm(12, 0), Time::hm(15, 0));
    let expensive = ChargePolicy {
        hourly_rate: 250,
        ..policy()
    };

    assert_eq!(250, outcome(schedule.evaluate(&s, &expensive).unwrap()).charge);
}

#[test]
fn test_logout_before_login() {
    let schedule = single_departure();
    let s = session("BW", wednesday(), Time::hm(12, 0), Time::hm(11, 0));

    assert!(matches!(
        schedule.evaluate(&s, &policy()),
        Err(BillingError::MalformedInput { .. })
    ));
}

#[test]
fn test_evaluation_is_idempotent() {
    let mut flights = Vec::new();
    add_flight(&mut flights, "BW 417", Time::hm(12, 0), &[3]);
    add_flight(&mut flights, "BW 419", Time::hm(18, 0), &[3]);
    let schedule = DaySchedule::build(flights).unwrap();
    let s = session("BW", wednesday(), Time::hm(6, 0), Time::hm(19, 0));

    let first = schedule.evaluate(&s, &policy()).unwrap();
    let second = schedule.evaluate(&s, &policy()).unwrap();

    assert_eq!(first, second);
}
