pub mod entities;
pub mod requests;
pub mod responses;

pub use entities::{CurrentUser, RoleAssignment, User, UserRole, UserStatus, UserSummary};
