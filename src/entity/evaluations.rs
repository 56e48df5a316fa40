//! 评价实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "evaluations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub teacher_assignment_id: i64,
    pub academic_period_id: i64,
    pub competency_id: i64,
    pub student_id: i64,
    pub grade: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub comment: Option<String>,
    pub created_by: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::teacher_assignments::Entity",
        from = "Column::TeacherAssignmentId",
        to = "super::teacher_assignments::Column::Id"
    )]
    TeacherAssignment,
    #[sea_orm(
        belongs_to = "super::academic_periods::Entity",
        from = "Column::AcademicPeriodId",
        to = "super::academic_periods::Column::Id"
    )]
    AcademicPeriod,
    #[sea_orm(
        belongs_to = "super::competencies::Entity",
        from = "Column::CompetencyId",
        to = "super::competencies::Column::Id"
    )]
    Competency,
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id"
    )]
    Student,
}

impl Related<super::teacher_assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeacherAssignment.def()
    }
}

impl Related<super::academic_periods::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AcademicPeriod.def()
    }
}

impl Related<super::competencies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Competency.def()
    }
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_evaluation(self) -> crate::models::evaluations::entities::Evaluation {
        use crate::models::evaluations::entities::{Evaluation, GradeLevel};
        use chrono::{DateTime, Utc};

        Evaluation {
            id: self.id,
            teacher_assignment_id: self.teacher_assignment_id,
            academic_period_id: self.academic_period_id,
            competency_id: self.competency_id,
            student_id: self.student_id,
            grade: self.grade.parse::<GradeLevel>().unwrap_or(GradeLevel::C),
            comment: self.comment,
            created_by: self.created_by,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
