use super::{ASSIGNMENT_NOT_FOUND, PERIOD_NOT_FOUND, ensure_assignment_owner};
use crate::errors::{Result, SchoolError};
use crate::models::{
    evaluations::{
        entities::WorkContext,
        requests::{ByContextQuery, ContextQuery},
    },
    periods::PeriodSummary,
    students::StudentSummary,
    users::entities::CurrentUser,
};
use crate::storage::Storage;

/// 组装教师的工作上下文（contexto de trabajo）
///
/// 依次检查：分配存在（404）、学期存在（404）、调用者是分配的教师（403）。
/// 之后读取课程的启用能力项、班级全部注册学生（无论是否已有评价）以及
/// 该分配 + 学期下已有的评价。只读，任何一步失败都直接返回，不返回部分结果。
pub async fn resolve_work_context(
    storage: &dyn Storage,
    current: &CurrentUser,
    query: &ContextQuery,
) -> Result<WorkContext> {
    let assignment = storage
        .get_assignment_detail(query.assignment_id)
        .await?
        .ok_or_else(|| SchoolError::missing(ASSIGNMENT_NOT_FOUND))?;

    let period = storage
        .get_period_by_id(query.period_id)
        .await?
        .ok_or_else(|| SchoolError::missing(PERIOD_NOT_FOUND))?;

    ensure_assignment_owner(&assignment, current)?;

    let competencies = storage
        .list_competencies(assignment.course.id, true)
        .await?;

    let students = storage
        .list_classroom_students(assignment.classroom.id)
        .await?
        .iter()
        .map(StudentSummary::from)
        .collect();

    let evaluations = storage
        .list_evaluations_by_context(ByContextQuery {
            assignment_id: assignment.assignment.id,
            period_id: period.id,
            competency_id: None,
            student_id: None,
        })
        .await?;

    tracing::debug!(
        "Resolved work context for assignment {} period {}",
        assignment.assignment.id,
        period.id
    );

    Ok(WorkContext {
        assignment,
        period: PeriodSummary::from(&period),
        competencies,
        students,
        evaluations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::evaluations::{entities::GradeLevel, requests::CreateEvaluationRequest};
    use crate::services::testing::{load_current_user, shared};
    use crate::storage::sea_orm_storage::fixtures::scenario;

    #[tokio::test]
    async fn test_context_lists_every_enrolled_student() {
        let (storage, s) = shared(scenario().await);
        let teacher = load_current_user(&storage, s.teacher_id).await;

        // 只有一个学生已经有评价
        storage
            .create_evaluation(
                s.teacher_id,
                CreateEvaluationRequest {
                    teacher_assignment_id: s.assignment_id,
                    academic_period_id: s.period_id,
                    competency_id: s.competency_ids[1],
                    student_id: s.student_ids[3],
                    grade: GradeLevel::A,
                    comment: None,
                },
            )
            .await
            .expect("create evaluation");

        let ctx = resolve_work_context(
            storage.as_ref(),
            &teacher,
            &ContextQuery {
                assignment_id: s.assignment_id,
                period_id: s.period_id,
            },
        )
        .await
        .expect("context");

        assert_eq!(ctx.assignment.assignment.id, s.assignment_id);
        assert_eq!(ctx.assignment.classroom.name, "5 A");
        assert_eq!(ctx.assignment.course.name, "Math");
        assert_eq!(ctx.period.name, "Bimester 1");

        let student_ids: Vec<i64> = ctx.students.iter().map(|st| st.id).collect();
        assert_eq!(student_ids, s.student_ids);

        assert_eq!(ctx.evaluations.len(), 1);
        assert_eq!(ctx.evaluations[0].student.id, s.student_ids[3]);
    }

    #[tokio::test]
    async fn test_context_competencies_are_active_and_ordered() {
        let (storage, s) = shared(scenario().await);
        let teacher = load_current_user(&storage, s.teacher_id).await;

        for competency_id in s.competency_ids.iter().rev() {
            storage
                .create_evaluation(
                    s.teacher_id,
                    CreateEvaluationRequest {
                        teacher_assignment_id: s.assignment_id,
                        academic_period_id: s.period_id,
                        competency_id: *competency_id,
                        student_id: s.student_ids[0],
                        grade: GradeLevel::B,
                        comment: None,
                    },
                )
                .await
                .expect("create evaluation");
        }

        let ctx = resolve_work_context(
            storage.as_ref(),
            &teacher,
            &ContextQuery {
                assignment_id: s.assignment_id,
                period_id: s.period_id,
            },
        )
        .await
        .expect("context");

        let competency_ids: Vec<i64> = ctx.competencies.iter().map(|c| c.id).collect();
        assert_eq!(competency_ids, s.competency_ids);
        assert!(!competency_ids.contains(&s.inactive_competency_id));
        assert!(
            ctx.competencies
                .windows(2)
                .all(|w| w[0].display_order <= w[1].display_order)
        );

        let evaluated: Vec<i64> = ctx.evaluations.iter().map(|e| e.competency.id).collect();
        assert_eq!(evaluated, s.competency_ids);
    }

    #[tokio::test]
    async fn test_missing_entities_are_reported_distinctly() {
        let (storage, s) = shared(scenario().await);
        let teacher = load_current_user(&storage, s.teacher_id).await;

        let err = resolve_work_context(
            storage.as_ref(),
            &teacher,
            &ContextQuery {
                assignment_id: 9999,
                period_id: s.period_id,
            },
        )
        .await
        .expect_err("missing assignment");
        assert_eq!(err, SchoolError::missing(ASSIGNMENT_NOT_FOUND));

        let err = resolve_work_context(
            storage.as_ref(),
            &teacher,
            &ContextQuery {
                assignment_id: s.assignment_id,
                period_id: 9999,
            },
        )
        .await
        .expect_err("missing period");
        assert_eq!(err, SchoolError::missing(PERIOD_NOT_FOUND));

        // 两者都缺失时先报告分配
        let err = resolve_work_context(
            storage.as_ref(),
            &teacher,
            &ContextQuery {
                assignment_id: 9999,
                period_id: 9999,
            },
        )
        .await
        .expect_err("both missing");
        assert_eq!(err, SchoolError::missing(ASSIGNMENT_NOT_FOUND));
    }

    #[tokio::test]
    async fn test_other_teacher_is_forbidden() {
        let (storage, s) = shared(scenario().await);
        let other = load_current_user(&storage, s.other_teacher_id).await;

        let err = resolve_work_context(
            storage.as_ref(),
            &other,
            &ContextQuery {
                assignment_id: s.assignment_id,
                period_id: s.period_id,
            },
        )
        .await
        .expect_err("not the owner");
        assert!(matches!(err, SchoolError::Authorization(_)));
        assert_eq!(err.status_code(), actix_web::http::StatusCode::FORBIDDEN);
    }
}
