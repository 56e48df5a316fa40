use super::{EVALUATION_NOT_FOUND, get::load_owned_evaluation};
use crate::errors::{Result, SchoolError};
use crate::models::users::entities::CurrentUser;
use crate::storage::Storage;

pub async fn delete_evaluation(storage: &dyn Storage, current: &CurrentUser, id: i64) -> Result<()> {
    load_owned_evaluation(storage, current, id).await?;

    if storage.delete_evaluation(id).await? {
        tracing::info!("Evaluation {} deleted by user {}", id, current.id());
        Ok(())
    } else {
        Err(SchoolError::missing(EVALUATION_NOT_FOUND))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::evaluations::{
        entities::GradeLevel,
        requests::{ByContextQuery, CreateEvaluationRequest},
    };
    use crate::services::evaluations::get::get_evaluation;
    use crate::services::testing::{load_current_user, shared};
    use crate::storage::sea_orm_storage::fixtures::scenario;

    #[tokio::test]
    async fn test_delete_removes_exactly_one_row() {
        let (storage, s) = shared(scenario().await);
        let teacher = load_current_user(&storage, s.teacher_id).await;

        let mut ids = Vec::new();
        for student_id in &s.student_ids {
            let created = storage
                .create_evaluation(
                    s.teacher_id,
                    CreateEvaluationRequest {
                        teacher_assignment_id: s.assignment_id,
                        academic_period_id: s.period_id,
                        competency_id: s.competency_ids[0],
                        student_id: *student_id,
                        grade: GradeLevel::A,
                        comment: None,
                    },
                )
                .await
                .expect("create");
            ids.push(created.id);
        }

        delete_evaluation(storage.as_ref(), &teacher, ids[1])
            .await
            .expect("delete");

        let remaining: Vec<i64> = storage
            .list_evaluations_by_context(ByContextQuery {
                assignment_id: s.assignment_id,
                period_id: s.period_id,
                competency_id: None,
                student_id: None,
            })
            .await
            .expect("list")
            .iter()
            .map(|d| d.evaluation.id)
            .collect();
        assert_eq!(remaining.len(), ids.len() - 1);
        assert!(!remaining.contains(&ids[1]));

        let err = get_evaluation(storage.as_ref(), &teacher, ids[1])
            .await
            .expect_err("deleted");
        assert_eq!(err, SchoolError::missing(EVALUATION_NOT_FOUND));

        let err = delete_evaluation(storage.as_ref(), &teacher, ids[1])
            .await
            .expect_err("already deleted");
        assert_eq!(err.status_code(), actix_web::http::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_non_owner_cannot_delete() {
        let (storage, s) = shared(scenario().await);
        let other = load_current_user(&storage, s.other_teacher_id).await;
        let created = storage
            .create_evaluation(
                s.teacher_id,
                CreateEvaluationRequest {
                    teacher_assignment_id: s.assignment_id,
                    academic_period_id: s.period_id,
                    competency_id: s.competency_ids[2],
                    student_id: s.student_ids[2],
                    grade: GradeLevel::B,
                    comment: None,
                },
            )
            .await
            .expect("create");

        let err = delete_evaluation(storage.as_ref(), &other, created.id)
            .await
            .expect_err("not the owner");
        assert!(matches!(err, SchoolError::Authorization(_)));
        assert!(
            storage
                .get_evaluation_by_id(created.id)
                .await
                .expect("query")
                .is_some()
        );
    }
}
