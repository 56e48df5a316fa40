//! 评价（evaluaciones）服务
//!
//! 核心是 [`context::resolve_work_context`]：教师为某个班级的某门课程在某个
//! 学期打分时需要的全部数据。其余操作都是对评价的增删改查，全部要求调用者
//! 是对应教师分配的教师本人。
//!
//! 每个操作的业务逻辑返回 [`crate::errors::Result`]，HTTP 处理函数只负责把
//! 结果包装成响应。

pub mod assignments;
pub mod context;
pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{current_user, respond, respond_created, respond_empty};
use crate::errors::{Resource, Result, SchoolError};
use crate::models::{
    assignments::AssignmentDetail,
    evaluations::requests::{
        ActivePeriodsQuery, ByContextQuery, ContextQuery, CreateEvaluationRequest,
        UpdateEvaluationRequest,
    },
    users::entities::CurrentUser,
};
use crate::storage::Storage;

pub(crate) const ASSIGNMENT_NOT_FOUND: Resource = Resource::Assignment;
pub(crate) const PERIOD_NOT_FOUND: Resource = Resource::Period;
pub(crate) const COMPETENCY_NOT_FOUND: Resource = Resource::Competency;
pub(crate) const STUDENT_NOT_FOUND: Resource = Resource::Student;
pub(crate) const EVALUATION_NOT_FOUND: Resource = Resource::Evaluation;
pub(crate) const NOT_ASSIGNMENT_OWNER: &str = "You are not the teacher of this assignment";

define_service!(EvaluationService);

impl EvaluationService {
    pub async fn my_assignments(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let current = match current_user(request) {
            Ok(current) => current,
            Err(resp) => return Ok(resp),
        };
        respond(
            assignments::my_assignments(storage.as_ref(), &current).await,
            "Assignments retrieved successfully",
        )
    }

    pub async fn active_periods(
        &self,
        query: ActivePeriodsQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let current = match current_user(request) {
            Ok(current) => current,
            Err(resp) => return Ok(resp),
        };
        respond(
            assignments::active_periods(storage.as_ref(), &current, query.school_id).await,
            "Active periods retrieved successfully",
        )
    }

    pub async fn work_context(
        &self,
        query: ContextQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let current = match current_user(request) {
            Ok(current) => current,
            Err(resp) => return Ok(resp),
        };
        respond(
            context::resolve_work_context(storage.as_ref(), &current, &query).await,
            "Work context retrieved successfully",
        )
    }

    pub async fn list_by_context(
        &self,
        query: ByContextQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let current = match current_user(request) {
            Ok(current) => current,
            Err(resp) => return Ok(resp),
        };
        respond(
            list::list_by_context(storage.as_ref(), &current, query).await,
            "Evaluations retrieved successfully",
        )
    }

    pub async fn create_evaluation(
        &self,
        req: CreateEvaluationRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let current = match current_user(request) {
            Ok(current) => current,
            Err(resp) => return Ok(resp),
        };
        respond_created(
            create::create_evaluation(storage.as_ref(), &current, req).await,
            "Evaluation created successfully",
        )
    }

    pub async fn get_evaluation(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let current = match current_user(request) {
            Ok(current) => current,
            Err(resp) => return Ok(resp),
        };
        respond(
            get::get_evaluation(storage.as_ref(), &current, id).await,
            "Evaluation retrieved successfully",
        )
    }

    pub async fn update_evaluation(
        &self,
        id: i64,
        update: UpdateEvaluationRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let current = match current_user(request) {
            Ok(current) => current,
            Err(resp) => return Ok(resp),
        };
        respond(
            update::update_evaluation(storage.as_ref(), &current, id, update).await,
            "Evaluation updated successfully",
        )
    }

    pub async fn delete_evaluation(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let current = match current_user(request) {
            Ok(current) => current,
            Err(resp) => return Ok(resp),
        };
        respond_empty(
            delete::delete_evaluation(storage.as_ref(), &current, id).await,
            "Evaluation deleted successfully",
        )
    }
}

/// 读取教师分配并确认调用者是该分配的教师，先 404 后 403
pub(crate) async fn load_owned_assignment(
    storage: &dyn Storage,
    current: &CurrentUser,
    assignment_id: i64,
) -> Result<AssignmentDetail> {
    let assignment = storage
        .get_assignment_detail(assignment_id)
        .await?
        .ok_or_else(|| SchoolError::missing(ASSIGNMENT_NOT_FOUND))?;
    ensure_assignment_owner(&assignment, current)?;
    Ok(assignment)
}

pub(crate) fn ensure_assignment_owner(
    assignment: &AssignmentDetail,
    current: &CurrentUser,
) -> Result<()> {
    if assignment.is_owned_by(current.id()) {
        Ok(())
    } else {
        tracing::info!(
            "User {} refused on assignment {} owned by {}",
            current.id(),
            assignment.assignment.id,
            assignment.teacher.id
        );
        Err(SchoolError::authorization(NOT_ASSIGNMENT_OWNER))
    }
}
