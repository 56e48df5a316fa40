pub mod assignments;

pub mod auth;

pub mod classrooms;

pub mod courses;

pub mod evaluations;

pub mod guardians;

pub mod periods;

pub mod schools;

pub mod students;

pub mod system;

pub mod users;

pub use assignments::configure_assignment_routes;
pub use auth::configure_auth_routes;
pub use classrooms::configure_classroom_routes;
pub use courses::configure_course_routes;
pub use evaluations::configure_evaluation_routes;
pub use guardians::configure_guardian_routes;
pub use periods::configure_period_routes;
pub use schools::configure_school_routes;
pub use students::configure_student_routes;
pub use system::configure_system_routes;
pub use users::configure_user_routes;
