use super::{EVALUATION_NOT_FOUND, get::load_owned_evaluation};
use crate::errors::{Result, SchoolError};
use crate::models::{
    evaluations::{entities::Evaluation, requests::UpdateEvaluationRequest},
    users::entities::CurrentUser,
};
use crate::storage::Storage;

/// 修改成绩或评语，未提供的字段保持不变；并发修改时最后写入者生效
pub async fn update_evaluation(
    storage: &dyn Storage,
    current: &CurrentUser,
    id: i64,
    update: UpdateEvaluationRequest,
) -> Result<Evaluation> {
    load_owned_evaluation(storage, current, id).await?;

    // 检查与写入之间可能被删除
    storage
        .update_evaluation(id, update)
        .await?
        .ok_or_else(|| SchoolError::missing(EVALUATION_NOT_FOUND))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::evaluations::{entities::GradeLevel, requests::CreateEvaluationRequest};
    use crate::services::testing::{load_current_user, shared};
    use crate::storage::sea_orm_storage::fixtures::scenario;

    #[tokio::test]
    async fn test_update_missing_leaves_store_unchanged() {
        let (storage, s) = shared(scenario().await);
        let teacher = load_current_user(&storage, s.teacher_id).await;
        let existing = storage
            .create_evaluation(
                s.teacher_id,
                CreateEvaluationRequest {
                    teacher_assignment_id: s.assignment_id,
                    academic_period_id: s.period_id,
                    competency_id: s.competency_ids[0],
                    student_id: s.student_ids[0],
                    grade: GradeLevel::B,
                    comment: None,
                },
            )
            .await
            .expect("create");

        let err = update_evaluation(
            storage.as_ref(),
            &teacher,
            existing.id + 100,
            UpdateEvaluationRequest {
                grade: Some(GradeLevel::C),
                comment: None,
            },
        )
        .await
        .expect_err("missing evaluation");
        assert_eq!(err, SchoolError::missing(EVALUATION_NOT_FOUND));

        let unchanged = storage
            .get_evaluation_by_id(existing.id)
            .await
            .expect("query")
            .expect("still there");
        assert_eq!(unchanged.grade, GradeLevel::B);
    }

    #[tokio::test]
    async fn test_owner_updates_grade_other_teacher_refused() {
        let (storage, s) = shared(scenario().await);
        let teacher = load_current_user(&storage, s.teacher_id).await;
        let other = load_current_user(&storage, s.other_teacher_id).await;
        let existing = storage
            .create_evaluation(
                s.teacher_id,
                CreateEvaluationRequest {
                    teacher_assignment_id: s.assignment_id,
                    academic_period_id: s.period_id,
                    competency_id: s.competency_ids[1],
                    student_id: s.student_ids[1],
                    grade: GradeLevel::C,
                    comment: Some("Needs support".to_string()),
                },
            )
            .await
            .expect("create");

        let err = update_evaluation(
            storage.as_ref(),
            &other,
            existing.id,
            UpdateEvaluationRequest {
                grade: Some(GradeLevel::Ad),
                comment: None,
            },
        )
        .await
        .expect_err("not the owner");
        assert!(matches!(err, SchoolError::Authorization(_)));

        let updated = update_evaluation(
            storage.as_ref(),
            &teacher,
            existing.id,
            UpdateEvaluationRequest {
                grade: Some(GradeLevel::A),
                comment: None,
            },
        )
        .await
        .expect("update");
        assert_eq!(updated.grade, GradeLevel::A);
        assert_eq!(updated.comment.as_deref(), Some("Needs support"));
    }
}
