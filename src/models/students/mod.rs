pub mod entities;
pub mod requests;

pub use entities::{Enrollment, GuardianLink, GuardianLinkDetail, Student, StudentSummary};
