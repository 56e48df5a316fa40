use super::{EVALUATION_NOT_FOUND, load_owned_assignment};
use crate::errors::{Result, SchoolError};
use crate::models::{evaluations::entities::Evaluation, users::entities::CurrentUser};
use crate::storage::Storage;

/// 读取评价并确认调用者是其分配的教师
pub(crate) async fn load_owned_evaluation(
    storage: &dyn Storage,
    current: &CurrentUser,
    id: i64,
) -> Result<Evaluation> {
    let evaluation = storage
        .get_evaluation_by_id(id)
        .await?
        .ok_or_else(|| SchoolError::missing(EVALUATION_NOT_FOUND))?;
    load_owned_assignment(storage, current, evaluation.teacher_assignment_id).await?;
    Ok(evaluation)
}

pub async fn get_evaluation(
    storage: &dyn Storage,
    current: &CurrentUser,
    id: i64,
) -> Result<Evaluation> {
    load_owned_evaluation(storage, current, id).await
}
