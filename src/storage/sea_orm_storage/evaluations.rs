//! 评价存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::competencies::{self, Entity as Competencies};
use crate::entity::evaluations::{ActiveModel, Column, Entity as Evaluations, Model};
use crate::entity::students::{self, Entity as Students};
use crate::errors::{Result, SchoolError};
use crate::models::{
    evaluations::{
        entities::{Evaluation, EvaluationDetail},
        requests::{ByContextQuery, CreateEvaluationRequest, UpdateEvaluationRequest},
    },
    students::entities::StudentSummary,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Select, Set,
};

impl SeaOrmStorage {
    /// 创建评价，引用的实体由服务层预先校验
    pub async fn create_evaluation_impl(
        &self,
        created_by: i64,
        req: CreateEvaluationRequest,
    ) -> Result<Evaluation> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            teacher_assignment_id: Set(req.teacher_assignment_id),
            academic_period_id: Set(req.academic_period_id),
            competency_id: Set(req.competency_id),
            student_id: Set(req.student_id),
            grade: Set(req.grade.to_string()),
            comment: Set(req.comment),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolError::from_db_err("创建评价失败", e))?;

        Ok(result.into_evaluation())
    }

    pub async fn get_evaluation_by_id_impl(&self, id: i64) -> Result<Option<Evaluation>> {
        let result = Evaluations::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询评价失败: {e}")))?;

        Ok(result.map(|m| m.into_evaluation()))
    }

    /// 分配 + 学期下的评价，可按能力项、学生过滤
    pub async fn list_evaluations_by_context_impl(
        &self,
        query: ByContextQuery,
    ) -> Result<Vec<EvaluationDetail>> {
        let mut select = Evaluations::find()
            .filter(Column::TeacherAssignmentId.eq(query.assignment_id))
            .filter(Column::AcademicPeriodId.eq(query.period_id));

        if let Some(competency_id) = query.competency_id {
            select = select.filter(Column::CompetencyId.eq(competency_id));
        }
        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }

        self.fetch_evaluation_details(select).await
    }

    /// 学生的全部评价，监护人查看用
    pub async fn list_student_evaluations_impl(
        &self,
        student_id: i64,
        period_id: Option<i64>,
    ) -> Result<Vec<EvaluationDetail>> {
        let mut select = Evaluations::find().filter(Column::StudentId.eq(student_id));
        if let Some(period_id) = period_id {
            select = select.filter(Column::AcademicPeriodId.eq(period_id));
        }

        self.fetch_evaluation_details(select).await
    }

    /// 只修改提供的字段，最后写入者生效
    pub async fn update_evaluation_impl(
        &self,
        id: i64,
        update: UpdateEvaluationRequest,
    ) -> Result<Option<Evaluation>> {
        if self.get_evaluation_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(grade) = update.grade {
            model.grade = Set(grade.to_string());
        }
        if let Some(comment) = update.comment {
            model.comment = Set(comment);
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("更新评价失败: {e}")))?;

        Ok(Some(result.into_evaluation()))
    }

    pub async fn delete_evaluation_impl(&self, id: i64) -> Result<bool> {
        let result = Evaluations::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("删除评价失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 按能力项 display_order、创建时间、ID 排序，并附上能力项与学生摘要
    async fn fetch_evaluation_details(
        &self,
        select: Select<Evaluations>,
    ) -> Result<Vec<EvaluationDetail>> {
        let rows: Vec<(Model, Option<competencies::Model>)> = select
            .find_also_related(Competencies)
            .order_by_asc(competencies::Column::DisplayOrder)
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询评价列表失败: {e}")))?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let student_ids: Vec<i64> = rows.iter().map(|(e, _)| e.student_id).collect();
        let students: HashMap<i64, StudentSummary> = Students::find()
            .filter(students::Column::Id.is_in(student_ids))
            .all(&self.db)
            .await
            .map_err(|e| SchoolError::database_operation(format!("查询评价学生失败: {e}")))?
            .into_iter()
            .map(|m| (m.id, m.summary()))
            .collect();

        Ok(rows
            .into_iter()
            .filter_map(|(evaluation, competency)| {
                let competency = competency?.summary();
                let student = students.get(&evaluation.student_id)?.clone();
                Some(EvaluationDetail {
                    evaluation: evaluation.into_evaluation(),
                    competency,
                    student,
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::scenario;
    use super::*;
    use crate::models::evaluations::entities::GradeLevel;
    use sea_orm::PaginatorTrait;

    fn new_evaluation(
        assignment_id: i64,
        period_id: i64,
        competency_id: i64,
        student_id: i64,
        grade: GradeLevel,
    ) -> CreateEvaluationRequest {
        CreateEvaluationRequest {
            teacher_assignment_id: assignment_id,
            academic_period_id: period_id,
            competency_id,
            student_id,
            grade,
            comment: None,
        }
    }

    #[tokio::test]
    async fn test_context_listing_orders_by_competency_then_creation() {
        let s = scenario().await;
        let [numbers, algebra, geometry] = [
            s.competency_ids[0],
            s.competency_ids[1],
            s.competency_ids[2],
        ];

        // 按与期望顺序不同的顺序写入
        let plan = [
            (geometry, s.student_ids[0]),
            (numbers, s.student_ids[1]),
            (algebra, s.student_ids[0]),
            (numbers, s.student_ids[0]),
        ];
        for (competency_id, student_id) in plan {
            s.storage
                .create_evaluation_impl(
                    s.teacher_id,
                    new_evaluation(
                        s.assignment_id,
                        s.period_id,
                        competency_id,
                        student_id,
                        GradeLevel::A,
                    ),
                )
                .await
                .expect("create evaluation");
        }

        let listed = s
            .storage
            .list_evaluations_by_context_impl(ByContextQuery {
                assignment_id: s.assignment_id,
                period_id: s.period_id,
                competency_id: None,
                student_id: None,
            })
            .await
            .expect("list evaluations");

        let order: Vec<(i64, i64)> = listed
            .iter()
            .map(|d| (d.competency.id, d.student.id))
            .collect();
        assert_eq!(
            order,
            vec![
                (numbers, s.student_ids[1]),
                (numbers, s.student_ids[0]),
                (algebra, s.student_ids[0]),
                (geometry, s.student_ids[0]),
            ]
        );
        let display_orders: Vec<i32> = listed.iter().map(|d| d.competency.display_order).collect();
        assert!(display_orders.windows(2).all(|w| w[0] <= w[1]));
    }

    #[tokio::test]
    async fn test_context_listing_filters() {
        let s = scenario().await;
        for student_id in &s.student_ids {
            for competency_id in &s.competency_ids {
                s.storage
                    .create_evaluation_impl(
                        s.teacher_id,
                        new_evaluation(
                            s.assignment_id,
                            s.period_id,
                            *competency_id,
                            *student_id,
                            GradeLevel::B,
                        ),
                    )
                    .await
                    .expect("create evaluation");
            }
        }

        let by_student = s
            .storage
            .list_evaluations_by_context_impl(ByContextQuery {
                assignment_id: s.assignment_id,
                period_id: s.period_id,
                competency_id: None,
                student_id: Some(s.student_ids[2]),
            })
            .await
            .expect("filter by student");
        assert_eq!(by_student.len(), s.competency_ids.len());
        assert!(by_student.iter().all(|d| d.student.id == s.student_ids[2]));

        let by_both = s
            .storage
            .list_evaluations_by_context_impl(ByContextQuery {
                assignment_id: s.assignment_id,
                period_id: s.period_id,
                competency_id: Some(s.competency_ids[1]),
                student_id: Some(s.student_ids[2]),
            })
            .await
            .expect("filter by both");
        assert_eq!(by_both.len(), 1);

        let other_period = s
            .storage
            .list_evaluations_by_context_impl(ByContextQuery {
                assignment_id: s.assignment_id,
                period_id: s.period_id + 100,
                competency_id: None,
                student_id: None,
            })
            .await
            .expect("other period");
        assert!(other_period.is_empty());
    }

    #[tokio::test]
    async fn test_update_touches_only_provided_fields() {
        let s = scenario().await;
        let mut req = new_evaluation(
            s.assignment_id,
            s.period_id,
            s.competency_ids[0],
            s.student_ids[0],
            GradeLevel::C,
        );
        req.comment = Some("needs practice".to_string());
        let created = s
            .storage
            .create_evaluation_impl(s.teacher_id, req)
            .await
            .expect("create evaluation");

        let updated = s
            .storage
            .update_evaluation_impl(
                created.id,
                UpdateEvaluationRequest {
                    grade: Some(GradeLevel::Ad),
                    comment: None,
                },
            )
            .await
            .expect("update evaluation")
            .expect("evaluation exists");
        assert_eq!(updated.grade, GradeLevel::Ad);
        assert_eq!(updated.comment.as_deref(), Some("needs practice"));
        assert_eq!(updated.created_by, s.teacher_id);

        let missing = s
            .storage
            .update_evaluation_impl(created.id + 999, UpdateEvaluationRequest::default())
            .await
            .expect("update missing");
        assert!(missing.is_none());
        let total = Evaluations::find()
            .count(&s.storage.db)
            .await
            .expect("count");
        assert_eq!(total, 1);
    }

    #[tokio::test]
    async fn test_update_with_null_comment_clears_it() {
        let s = scenario().await;
        let mut req = new_evaluation(
            s.assignment_id,
            s.period_id,
            s.competency_ids[1],
            s.student_ids[1],
            GradeLevel::B,
        );
        req.comment = Some("revisar tarea".to_string());
        let created = s
            .storage
            .create_evaluation_impl(s.teacher_id, req)
            .await
            .expect("create evaluation");

        let update: UpdateEvaluationRequest =
            serde_json::from_str(r#"{"comment":null}"#).expect("patch body");
        let cleared = s
            .storage
            .update_evaluation_impl(created.id, update)
            .await
            .expect("update evaluation")
            .expect("evaluation exists");
        assert_eq!(cleared.comment, None);
        assert_eq!(cleared.grade, GradeLevel::B);

        let stored = s
            .storage
            .get_evaluation_by_id_impl(created.id)
            .await
            .expect("query")
            .expect("still there");
        assert_eq!(stored.comment, None);
    }

    #[tokio::test]
    async fn test_student_evaluations_across_periods() {
        let s = scenario().await;
        s.storage
            .create_evaluation_impl(
                s.teacher_id,
                new_evaluation(
                    s.assignment_id,
                    s.period_id,
                    s.competency_ids[0],
                    s.student_ids[0],
                    GradeLevel::A,
                ),
            )
            .await
            .expect("create evaluation");

        let all = s
            .storage
            .list_student_evaluations_impl(s.student_ids[0], None)
            .await
            .expect("list");
        assert_eq!(all.len(), 1);
        let none = s
            .storage
            .list_student_evaluations_impl(s.student_ids[1], Some(s.period_id))
            .await
            .expect("list");
        assert!(none.is_empty());
    }
}
