use super::{
    ASSIGNMENT_NOT_FOUND, COMPETENCY_NOT_FOUND, PERIOD_NOT_FOUND, STUDENT_NOT_FOUND,
    ensure_assignment_owner,
};
use crate::errors::{Result, SchoolError};
use crate::models::{
    evaluations::{entities::Evaluation, requests::CreateEvaluationRequest},
    users::entities::CurrentUser,
};
use crate::storage::Storage;

/// 创建评价
///
/// 引用的分配、学期、能力项、学生按此顺序检查存在性，然后检查分配归属，
/// 全部通过后才写入。同一学生同一能力项可以有多条评价。
pub async fn create_evaluation(
    storage: &dyn Storage,
    current: &CurrentUser,
    req: CreateEvaluationRequest,
) -> Result<Evaluation> {
    let assignment = storage
        .get_assignment_detail(req.teacher_assignment_id)
        .await?
        .ok_or_else(|| SchoolError::missing(ASSIGNMENT_NOT_FOUND))?;

    if storage
        .get_period_by_id(req.academic_period_id)
        .await?
        .is_none()
    {
        return Err(SchoolError::missing(PERIOD_NOT_FOUND));
    }
    if storage
        .get_competency_by_id(req.competency_id)
        .await?
        .is_none()
    {
        return Err(SchoolError::missing(COMPETENCY_NOT_FOUND));
    }
    if storage.get_student_by_id(req.student_id).await?.is_none() {
        return Err(SchoolError::missing(STUDENT_NOT_FOUND));
    }

    ensure_assignment_owner(&assignment, current)?;

    let evaluation = storage.create_evaluation(current.id(), req).await?;
    tracing::info!(
        "Evaluation {} created by user {} for student {}",
        evaluation.id,
        current.id(),
        evaluation.student_id
    );
    Ok(evaluation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::evaluations::{entities::GradeLevel, requests::ByContextQuery};
    use crate::services::testing::{load_current_user, shared};
    use crate::storage::sea_orm_storage::fixtures::scenario;

    fn request(assignment_id: i64, period_id: i64, competency_id: i64, student_id: i64) -> CreateEvaluationRequest {
        CreateEvaluationRequest {
            teacher_assignment_id: assignment_id,
            academic_period_id: period_id,
            competency_id,
            student_id,
            grade: GradeLevel::Ad,
            comment: Some("Excelente".to_string()),
        }
    }

    async fn stored_count(storage: &dyn Storage, assignment_id: i64, period_id: i64) -> usize {
        storage
            .list_evaluations_by_context(ByContextQuery {
                assignment_id,
                period_id,
                competency_id: None,
                student_id: None,
            })
            .await
            .expect("list")
            .len()
    }

    #[tokio::test]
    async fn test_create_records_author() {
        let (storage, s) = shared(scenario().await);
        let teacher = load_current_user(&storage, s.teacher_id).await;

        let created = create_evaluation(
            storage.as_ref(),
            &teacher,
            request(s.assignment_id, s.period_id, s.competency_ids[0], s.student_ids[0]),
        )
        .await
        .expect("create");

        assert_eq!(created.created_by, s.teacher_id);
        assert_eq!(created.grade, GradeLevel::Ad);
        assert_eq!(created.comment.as_deref(), Some("Excelente"));
        assert_eq!(stored_count(storage.as_ref(), s.assignment_id, s.period_id).await, 1);
    }

    #[tokio::test]
    async fn test_missing_competency_writes_nothing() {
        let (storage, s) = shared(scenario().await);
        let teacher = load_current_user(&storage, s.teacher_id).await;

        let err = create_evaluation(
            storage.as_ref(),
            &teacher,
            request(s.assignment_id, s.period_id, 9999, s.student_ids[0]),
        )
        .await
        .expect_err("missing competency");

        assert_eq!(err, SchoolError::missing(COMPETENCY_NOT_FOUND));
        assert_eq!(stored_count(storage.as_ref(), s.assignment_id, s.period_id).await, 0);
    }

    #[tokio::test]
    async fn test_reference_checks_run_in_order() {
        let (storage, s) = shared(scenario().await);
        let teacher = load_current_user(&storage, s.teacher_id).await;

        let err = create_evaluation(storage.as_ref(), &teacher, request(9999, 9999, 9999, 9999))
            .await
            .expect_err("all missing");
        assert_eq!(err.message(), "Assignment not found");

        let err = create_evaluation(
            storage.as_ref(),
            &teacher,
            request(s.assignment_id, 9999, 9999, 9999),
        )
        .await
        .expect_err("period missing");
        assert_eq!(err.message(), "Academic period not found");

        let err = create_evaluation(
            storage.as_ref(),
            &teacher,
            request(s.assignment_id, s.period_id, s.competency_ids[0], 9999),
        )
        .await
        .expect_err("student missing");
        assert_eq!(err.message(), "Student not found");
    }

    #[tokio::test]
    async fn test_non_owner_cannot_create() {
        let (storage, s) = shared(scenario().await);
        let other = load_current_user(&storage, s.other_teacher_id).await;

        let err = create_evaluation(
            storage.as_ref(),
            &other,
            request(s.assignment_id, s.period_id, s.competency_ids[0], s.student_ids[0]),
        )
        .await
        .expect_err("not the owner");

        assert!(matches!(err, SchoolError::Authorization(_)));
        assert_eq!(stored_count(storage.as_ref(), s.assignment_id, s.period_id).await, 0);
    }
}
