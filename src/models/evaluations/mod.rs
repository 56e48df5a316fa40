pub mod entities;
pub mod requests;

pub use entities::{Evaluation, EvaluationDetail, GradeLevel, WorkContext};
