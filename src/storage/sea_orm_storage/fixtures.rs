//! 测试数据：一个学校、一个班级 "5 A"、一门课程 "Math" 和它的教师

use super::SeaOrmStorage;
use crate::models::{
    assignments::requests::CreateAssignmentRequest,
    classrooms::requests::CreateClassroomRequest,
    courses::requests::{CreateCompetencyRequest, CreateCourseRequest, UpdateCompetencyRequest},
    periods::{entities::PeriodType, requests::CreatePeriodRequest},
    schools::requests::CreateSchoolRequest,
    students::requests::CreateStudentRequest,
    users::{entities::UserRole, requests::CreateUserRequest},
};

pub(crate) struct Scenario {
    pub storage: SeaOrmStorage,
    pub school_id: i64,
    pub teacher_id: i64,
    pub other_teacher_id: i64,
    pub course_id: i64,
    pub classroom_id: i64,
    pub period_id: i64,
    pub assignment_id: i64,
    /// 启用的能力项，按 display_order 排列
    pub competency_ids: Vec<i64>,
    pub inactive_competency_id: i64,
    /// 注册学生，按姓、名排列
    pub student_ids: Vec<i64>,
    /// 同校但未注册到该班级
    pub outsider_student_id: i64,
}

pub(crate) async fn create_user(
    storage: &SeaOrmStorage,
    email: &str,
    school_id: Option<i64>,
    role: UserRole,
) -> i64 {
    let user = storage
        .create_user_impl(CreateUserRequest {
            email: email.to_string(),
            password: "not-a-real-hash".to_string(),
            first_name: "Test".to_string(),
            last_name: email.to_string(),
            document_number: None,
            phone: None,
            school_id,
            role: Some(role),
        })
        .await
        .expect("create user");
    storage
        .assign_role_impl(user.id, school_id, role)
        .await
        .expect("assign role");
    user.id
}

async fn create_student(
    storage: &SeaOrmStorage,
    school_id: i64,
    first_name: &str,
    last_name: &str,
) -> i64 {
    storage
        .create_student_impl(CreateStudentRequest {
            school_id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            document_number: None,
            birth_date: None,
        })
        .await
        .expect("create student")
        .id
}

async fn create_competency(
    storage: &SeaOrmStorage,
    course_id: i64,
    name: &str,
    display_order: i32,
) -> i64 {
    storage
        .create_competency_impl(CreateCompetencyRequest {
            course_id,
            name: name.to_string(),
            description: None,
            display_order,
        })
        .await
        .expect("create competency")
        .id
}

pub(crate) async fn scenario() -> Scenario {
    let storage = SeaOrmStorage::new_in_memory()
        .await
        .expect("in-memory database");

    let school_id = storage
        .create_school_impl(CreateSchoolRequest {
            name: "Colegio San Martin".to_string(),
            code: Some("CSM".to_string()),
            address: None,
        })
        .await
        .expect("create school")
        .id;

    let teacher_id = create_user(
        &storage,
        "teacher.x@school.test",
        Some(school_id),
        UserRole::Teacher,
    )
    .await;
    let other_teacher_id = create_user(
        &storage,
        "teacher.y@school.test",
        Some(school_id),
        UserRole::Teacher,
    )
    .await;

    let course_id = storage
        .create_course_impl(CreateCourseRequest {
            school_id,
            name: "Math".to_string(),
            code: Some("MAT".to_string()),
            description: None,
        })
        .await
        .expect("create course")
        .id;

    // 故意乱序插入
    let geometry = create_competency(&storage, course_id, "Geometry", 3).await;
    let numbers = create_competency(&storage, course_id, "Numbers", 1).await;
    let algebra = create_competency(&storage, course_id, "Algebra", 2).await;
    let inactive_competency_id = create_competency(&storage, course_id, "Statistics", 0).await;
    storage
        .update_competency_impl(
            inactive_competency_id,
            UpdateCompetencyRequest {
                active: Some(false),
                ..Default::default()
            },
        )
        .await
        .expect("deactivate competency");

    let classroom_id = storage
        .create_classroom_impl(CreateClassroomRequest {
            school_id,
            name: None,
            grade_level: "5".to_string(),
            section: "A".to_string(),
            academic_year: 2025,
        })
        .await
        .expect("create classroom")
        .id;

    let torres = create_student(&storage, school_id, "Lucia", "Torres").await;
    let alvarez = create_student(&storage, school_id, "Mateo", "Alvarez").await;
    let mendoza_b = create_student(&storage, school_id, "Bruno", "Mendoza").await;
    let mendoza_a = create_student(&storage, school_id, "Ana", "Mendoza").await;
    let outsider_student_id = create_student(&storage, school_id, "Diego", "Rojas").await;
    for student_id in [torres, alvarez, mendoza_b, mendoza_a] {
        storage
            .create_enrollment_impl(student_id, classroom_id)
            .await
            .expect("enroll student");
    }

    let period_id = storage
        .create_period_impl(CreatePeriodRequest {
            school_id,
            name: "Bimester 1".to_string(),
            academic_year: 2025,
            period_type: PeriodType::Bimester,
            display_order: 1,
            start_date: None,
            end_date: None,
        })
        .await
        .expect("create period")
        .id;

    let assignment_id = storage
        .create_assignment_impl(CreateAssignmentRequest {
            teacher_id,
            course_id,
            classroom_id,
        })
        .await
        .expect("create assignment")
        .id;

    Scenario {
        storage,
        school_id,
        teacher_id,
        other_teacher_id,
        course_id,
        classroom_id,
        period_id,
        assignment_id,
        competency_ids: vec![numbers, algebra, geometry],
        inactive_competency_id,
        student_ids: vec![alvarez, mendoza_a, mendoza_b, torres],
        outsider_student_id,
    }
}
