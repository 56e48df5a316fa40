use serde::Deserialize;

use super::entities::PeriodType;

#[derive(Debug, Deserialize)]
pub struct PeriodListQuery {
    pub school_id: i64,
    pub academic_year: Option<i32>,
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePeriodRequest {
    pub school_id: i64,
    pub name: String,
    pub academic_year: i32,
    pub period_type: PeriodType,
    #[serde(default)]
    pub display_order: i32,
    pub start_date: Option<chrono::DateTime<chrono::Utc>>,
    pub end_date: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePeriodRequest {
    pub name: Option<String>,
    pub academic_year: Option<i32>,
    pub period_type: Option<PeriodType>,
    pub display_order: Option<i32>,
    pub start_date: Option<chrono::DateTime<chrono::Utc>>,
    pub end_date: Option<chrono::DateTime<chrono::Utc>>,
    pub active: Option<bool>,
}
