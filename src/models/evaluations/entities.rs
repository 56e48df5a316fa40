use serde::{Deserialize, Serialize};

use crate::models::assignments::AssignmentDetail;
use crate::models::courses::{Competency, CompetencySummary};
use crate::models::periods::PeriodSummary;
use crate::models::students::StudentSummary;

/// 成绩等级：AD 优秀，A 达到预期，B 进行中，C 起步
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum GradeLevel {
    #[serde(rename = "AD")]
    Ad,
    A,
    B,
    C,
}

impl GradeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            GradeLevel::Ad => "AD",
            GradeLevel::A => "A",
            GradeLevel::B => "B",
            GradeLevel::C => "C",
        }
    }
}

impl<'de> Deserialize<'de> for GradeLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for GradeLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GradeLevel {
    type Err = String;

    // 前端有时传小写
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AD" => Ok(GradeLevel::Ad),
            "A" => Ok(GradeLevel::A),
            "B" => Ok(GradeLevel::B),
            "C" => Ok(GradeLevel::C),
            _ => Err(format!("Invalid grade: '{s}'. Supported grades: AD, A, B, C")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    pub id: i64,
    pub teacher_assignment_id: i64,
    pub academic_period_id: i64,
    pub competency_id: i64,
    pub student_id: i64,
    pub grade: GradeLevel,
    pub comment: Option<String>,
    pub created_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 带能力项与学生摘要的评价
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationDetail {
    #[serde(flatten)]
    pub evaluation: Evaluation,
    pub competency: CompetencySummary,
    pub student: StudentSummary,
}

/// 教师为某个班级某门课程在某个学期打分所需的全部数据
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkContext {
    pub assignment: AssignmentDetail,
    pub period: PeriodSummary,
    pub competencies: Vec<Competency>,
    pub students: Vec<StudentSummary>,
    pub evaluations: Vec<EvaluationDetail>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_level_wire_format() {
        assert_eq!(serde_json::to_string(&GradeLevel::Ad).expect("ok"), "\"AD\"");
        assert_eq!(serde_json::to_string(&GradeLevel::B).expect("ok"), "\"B\"");
        let parsed: GradeLevel = serde_json::from_str("\"ad\"").expect("lowercase accepted");
        assert_eq!(parsed, GradeLevel::Ad);
        assert!(serde_json::from_str::<GradeLevel>("\"D\"").is_err());
        assert!(serde_json::from_str::<GradeLevel>("\"18\"").is_err());
    }
}
