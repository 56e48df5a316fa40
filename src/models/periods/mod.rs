pub mod entities;
pub mod requests;

pub use entities::{AcademicPeriod, PeriodSummary, PeriodType};
