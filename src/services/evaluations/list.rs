use super::load_owned_assignment;
use crate::errors::Result;
use crate::models::{
    evaluations::{entities::EvaluationDetail, requests::ByContextQuery},
    users::entities::CurrentUser,
};
use crate::storage::Storage;

/// 分配 + 学期下的评价（por-contexto），按能力项顺序、创建时间、ID 排序
pub async fn list_by_context(
    storage: &dyn Storage,
    current: &CurrentUser,
    query: ByContextQuery,
) -> Result<Vec<EvaluationDetail>> {
    load_owned_assignment(storage, current, query.assignment_id).await?;
    storage.list_evaluations_by_context(query).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SchoolError;
    use crate::services::testing::{load_current_user, shared};
    use crate::storage::sea_orm_storage::fixtures::scenario;

    #[tokio::test]
    async fn test_listing_requires_ownership() {
        let (storage, s) = shared(scenario().await);
        let teacher = load_current_user(&storage, s.teacher_id).await;
        let other = load_current_user(&storage, s.other_teacher_id).await;
        let query = ByContextQuery {
            assignment_id: s.assignment_id,
            period_id: s.period_id,
            competency_id: None,
            student_id: None,
        };

        assert!(
            list_by_context(storage.as_ref(), &teacher, query.clone())
                .await
                .expect("owner lists")
                .is_empty()
        );
        let err = list_by_context(storage.as_ref(), &other, query)
            .await
            .expect_err("not the owner");
        assert!(matches!(err, SchoolError::Authorization(_)));
    }
}
