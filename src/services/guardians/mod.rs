//! 监护人门户：只读查看自己关联的学生及其评价

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{current_user, respond};
use crate::errors::{Result, SchoolError};
use crate::models::{
    evaluations::{EvaluationDetail, requests::StudentEvaluationsQuery},
    students::Student,
    users::entities::CurrentUser,
};
use crate::storage::Storage;

define_service!(GuardianService);

impl GuardianService {
    pub async fn my_students(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let current = match current_user(request) {
            Ok(current) => current,
            Err(resp) => return Ok(resp),
        };
        respond(
            my_students(storage.as_ref(), &current).await,
            "Students retrieved successfully",
        )
    }

    pub async fn student_evaluations(
        &self,
        student_id: i64,
        query: StudentEvaluationsQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let current = match current_user(request) {
            Ok(current) => current,
            Err(resp) => return Ok(resp),
        };
        respond(
            student_evaluations(storage.as_ref(), &current, student_id, query.period_id).await,
            "Evaluations retrieved successfully",
        )
    }
}

pub async fn my_students(storage: &dyn Storage, current: &CurrentUser) -> Result<Vec<Student>> {
    storage.list_guardian_students(current.id()).await
}

/// 未关联的学生一律 403，不区分学生是否存在
pub async fn student_evaluations(
    storage: &dyn Storage,
    current: &CurrentUser,
    student_id: i64,
    period_id: Option<i64>,
) -> Result<Vec<EvaluationDetail>> {
    if storage
        .get_guardian_link(student_id, current.id())
        .await?
        .is_none()
    {
        return Err(SchoolError::authorization(
            "You are not a guardian of this student",
        ));
    }
    storage.list_student_evaluations(student_id, period_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::evaluations::{GradeLevel, requests::CreateEvaluationRequest};
    use crate::models::students::requests::LinkGuardianRequest;
    use crate::models::users::UserRole;
    use crate::services::testing::{load_current_user, shared};
    use crate::storage::sea_orm_storage::fixtures::{create_user, scenario};

    #[tokio::test]
    async fn test_guardian_sees_only_linked_students() {
        let (storage, s) = shared(scenario().await);
        let guardian_id = create_user(
            &s.storage,
            "parent@school.test",
            Some(s.school_id),
            UserRole::Guardian,
        )
        .await;
        let guardian = load_current_user(&storage, guardian_id).await;
        let child = s.student_ids[1];

        storage
            .link_guardian(
                child,
                LinkGuardianRequest {
                    guardian_id,
                    relationship: None,
                },
            )
            .await
            .expect("link");
        storage
            .create_evaluation(
                s.teacher_id,
                CreateEvaluationRequest {
                    teacher_assignment_id: s.assignment_id,
                    academic_period_id: s.period_id,
                    competency_id: s.competency_ids[0],
                    student_id: child,
                    grade: GradeLevel::A,
                    comment: None,
                },
            )
            .await
            .expect("evaluate");

        let students = my_students(storage.as_ref(), &guardian).await.expect("list");
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].id, child);

        let evaluations = student_evaluations(storage.as_ref(), &guardian, child, Some(s.period_id))
            .await
            .expect("evaluations");
        assert_eq!(evaluations.len(), 1);
        assert_eq!(evaluations[0].evaluation.grade, GradeLevel::A);

        let err = student_evaluations(storage.as_ref(), &guardian, s.student_ids[0], None)
            .await
            .expect_err("not linked");
        assert!(matches!(err, SchoolError::Authorization(_)));
    }
}
