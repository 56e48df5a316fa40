//! 预导入模块，方便使用

pub use super::academic_periods::{
    ActiveModel as AcademicPeriodActiveModel, Entity as AcademicPeriods,
    Model as AcademicPeriodModel,
};
pub use super::classrooms::{
    ActiveModel as ClassroomActiveModel, Entity as Classrooms, Model as ClassroomModel,
};
pub use super::competencies::{
    ActiveModel as CompetencyActiveModel, Entity as Competencies, Model as CompetencyModel,
};
pub use super::courses::{ActiveModel as CourseActiveModel, Entity as Courses, Model as CourseModel};
pub use super::enrollments::{
    ActiveModel as EnrollmentActiveModel, Entity as Enrollments, Model as EnrollmentModel,
};
pub use super::evaluations::{
    ActiveModel as EvaluationActiveModel, Entity as Evaluations, Model as EvaluationModel,
};
pub use super::schools::{ActiveModel as SchoolActiveModel, Entity as Schools, Model as SchoolModel};
pub use super::student_guardians::{
    ActiveModel as StudentGuardianActiveModel, Entity as StudentGuardians,
    Model as StudentGuardianModel,
};
pub use super::students::{
    ActiveModel as StudentActiveModel, Entity as Students, Model as StudentModel,
};
pub use super::teacher_assignments::{
    ActiveModel as TeacherAssignmentActiveModel, Entity as TeacherAssignments,
    Model as TeacherAssignmentModel,
};
pub use super::user_roles::{
    ActiveModel as UserRoleActiveModel, Entity as UserRoles, Model as UserRoleModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
