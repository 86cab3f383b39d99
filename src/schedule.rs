pub mod charge;
pub mod day_schedule;
pub mod week_schedule;

pub use charge::Evaluation;
pub use day_schedule::DaySchedule;
pub use week_schedule::WeekSchedule;
