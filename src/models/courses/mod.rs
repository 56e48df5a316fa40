pub mod entities;
pub mod requests;

pub use entities::{Competency, CompetencySummary, Course, CourseSummary};
