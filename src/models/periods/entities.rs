use serde::{Deserialize, Serialize};

// 学期类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PeriodType {
    Bimester,
    Trimester,
    Semester,
}

impl std::fmt::Display for PeriodType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PeriodType::Bimester => write!(f, "bimester"),
            PeriodType::Trimester => write!(f, "trimester"),
            PeriodType::Semester => write!(f, "semester"),
        }
    }
}

impl std::str::FromStr for PeriodType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bimester" => Ok(PeriodType::Bimester),
            "trimester" => Ok(PeriodType::Trimester),
            "semester" => Ok(PeriodType::Semester),
            _ => Err(format!("Invalid period type: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcademicPeriod {
    pub id: i64,
    pub school_id: i64,
    pub name: String,
    pub academic_year: i32,
    pub period_type: PeriodType,
    pub display_order: i32,
    pub start_date: Option<chrono::DateTime<chrono::Utc>>,
    pub end_date: Option<chrono::DateTime<chrono::Utc>>,
    pub active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 评价上下文中的学期摘要
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub id: i64,
    pub name: String,
    pub academic_year: i32,
    pub period_type: PeriodType,
    pub display_order: i32,
}

impl From<&AcademicPeriod> for PeriodSummary {
    fn from(period: &AcademicPeriod) -> Self {
        Self {
            id: period.id,
            name: period.name.clone(),
            academic_year: period.academic_year,
            period_type: period.period_type,
            display_order: period.display_order,
        }
    }
}
