//! 学期实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "academic_periods")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub name: String,
    pub academic_year: i32,
    pub period_type: String,
    pub display_order: i32,
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
    pub active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::schools::Entity",
        from = "Column::SchoolId",
        to = "super::schools::Column::Id"
    )]
    School,
    #[sea_orm(has_many = "super::evaluations::Entity")]
    Evaluations,
}

impl Related<super::schools::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::School.def()
    }
}

impl Related<super::evaluations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Evaluations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_period(self) -> crate::models::periods::entities::AcademicPeriod {
        use crate::models::periods::entities::{AcademicPeriod, PeriodType};
        use chrono::{DateTime, Utc};

        AcademicPeriod {
            id: self.id,
            school_id: self.school_id,
            name: self.name,
            academic_year: self.academic_year,
            period_type: self
                .period_type
                .parse::<PeriodType>()
                .unwrap_or(PeriodType::Bimester),
            display_order: self.display_order,
            start_date: self
                .start_date
                .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
            end_date: self
                .end_date
                .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
            active: self.active,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
