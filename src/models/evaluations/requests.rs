use serde::Deserialize;

use super::entities::GradeLevel;

// GET contexto-trabajo
#[derive(Debug, Deserialize)]
pub struct ContextQuery {
    #[serde(rename = "profesorAsignacionId")]
    pub assignment_id: i64,
    #[serde(rename = "periodoId")]
    pub period_id: i64,
}

// GET por-contexto
#[derive(Debug, Clone, Deserialize)]
pub struct ByContextQuery {
    #[serde(rename = "profesorAsignacionId")]
    pub assignment_id: i64,
    #[serde(rename = "periodoId")]
    pub period_id: i64,
    #[serde(rename = "competenciaId")]
    pub competency_id: Option<i64>,
    #[serde(rename = "estudianteId")]
    pub student_id: Option<i64>,
}

// GET periodos-activos
#[derive(Debug, Deserialize)]
pub struct ActivePeriodsQuery {
    #[serde(rename = "colegioId")]
    pub school_id: i64,
}

// GET /api/guardians/me/students/{id}/evaluations
#[derive(Debug, Deserialize)]
pub struct StudentEvaluationsQuery {
    #[serde(rename = "periodoId")]
    pub period_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateEvaluationRequest {
    #[serde(alias = "profesorAsignacionId")]
    pub teacher_assignment_id: i64,
    #[serde(alias = "periodoId")]
    pub academic_period_id: i64,
    #[serde(alias = "competenciaId")]
    pub competency_id: i64,
    #[serde(alias = "estudianteId")]
    pub student_id: i64,
    #[serde(alias = "calificacion")]
    pub grade: GradeLevel,
    #[serde(alias = "comentario")]
    pub comment: Option<String>,
}

// 只修改提供的字段，comment 传 null 表示清空
#[derive(Debug, Default, Deserialize)]
pub struct UpdateEvaluationRequest {
    #[serde(alias = "calificacion")]
    pub grade: Option<GradeLevel>,
    #[serde(
        default,
        alias = "comentario",
        deserialize_with = "crate::models::common::deserialize_nullable"
    )]
    pub comment: Option<Option<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_accepts_both_field_names() {
        let english: CreateEvaluationRequest = serde_json::from_str(
            r#"{"teacher_assignment_id":1,"academic_period_id":2,"competency_id":3,"student_id":4,"grade":"A"}"#,
        )
        .expect("english names");
        assert_eq!(english.competency_id, 3);
        assert!(english.comment.is_none());

        let spanish: CreateEvaluationRequest = serde_json::from_str(
            r#"{"profesorAsignacionId":1,"periodoId":2,"competenciaId":3,"estudianteId":4,"calificacion":"AD","comentario":"bien"}"#,
        )
        .expect("spanish names");
        assert_eq!(spanish.grade, GradeLevel::Ad);
        assert_eq!(spanish.comment.as_deref(), Some("bien"));
    }

    #[test]
    fn test_update_request_tells_null_comment_from_absent() {
        let absent: UpdateEvaluationRequest =
            serde_json::from_str(r#"{"grade":"B"}"#).expect("absent comment");
        assert_eq!(absent.comment, None);

        let cleared: UpdateEvaluationRequest =
            serde_json::from_str(r#"{"comment":null}"#).expect("null comment");
        assert_eq!(cleared.comment, Some(None));
        assert!(cleared.grade.is_none());

        let set: UpdateEvaluationRequest =
            serde_json::from_str(r#"{"comentario":"mejoro"}"#).expect("spanish comment");
        assert_eq!(set.comment, Some(Some("mejoro".to_string())));
    }
}
