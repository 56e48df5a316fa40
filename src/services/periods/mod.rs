//! 学期服务

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::evaluations::PERIOD_NOT_FOUND;
use super::{
    SCHOOL_NOT_FOUND, current_user, ensure_school_role, found, respond, respond_created,
    respond_empty,
};
use crate::errors::{Result, SchoolError};
use crate::models::{
    periods::{
        AcademicPeriod,
        requests::{CreatePeriodRequest, PeriodListQuery, UpdatePeriodRequest},
    },
    users::entities::{CurrentUser, UserRole},
};
use crate::storage::Storage;
use crate::utils::validate::{require_text, validate_academic_year};

define_service!(PeriodService);

impl PeriodService {
    pub async fn list_periods(
        &self,
        query: PeriodListQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let current = match current_user(request) {
            Ok(current) => current,
            Err(resp) => return Ok(resp),
        };
        respond(
            list_periods(storage.as_ref(), &current, query).await,
            "Academic periods retrieved successfully",
        )
    }

    pub async fn create_period(
        &self,
        req: CreatePeriodRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let current = match current_user(request) {
            Ok(current) => current,
            Err(resp) => return Ok(resp),
        };
        respond_created(
            create_period(storage.as_ref(), &current, req).await,
            "Academic period created successfully",
        )
    }

    pub async fn get_period(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let current = match current_user(request) {
            Ok(current) => current,
            Err(resp) => return Ok(resp),
        };
        respond(
            get_period(storage.as_ref(), &current, id).await,
            "Academic period retrieved successfully",
        )
    }

    pub async fn update_period(
        &self,
        id: i64,
        update: UpdatePeriodRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let current = match current_user(request) {
            Ok(current) => current,
            Err(resp) => return Ok(resp),
        };
        respond(
            update_period(storage.as_ref(), &current, id, update).await,
            "Academic period updated successfully",
        )
    }

    pub async fn delete_period(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let current = match current_user(request) {
            Ok(current) => current,
            Err(resp) => return Ok(resp),
        };
        respond_empty(
            delete_period(storage.as_ref(), &current, id).await,
            "Academic period deleted successfully",
        )
    }
}

fn validate_range(
    start: Option<chrono::DateTime<chrono::Utc>>,
    end: Option<chrono::DateTime<chrono::Utc>>,
) -> Result<()> {
    match (start, end) {
        (Some(start), Some(end)) if start > end => Err(SchoolError::validation(
            "start_date must not be later than end_date",
        )),
        _ => Ok(()),
    }
}

pub async fn list_periods(
    storage: &dyn Storage,
    current: &CurrentUser,
    query: PeriodListQuery,
) -> Result<Vec<AcademicPeriod>> {
    ensure_school_role(current, query.school_id, UserRole::all_roles())?;
    storage.list_periods(query).await
}

pub async fn create_period(
    storage: &dyn Storage,
    current: &CurrentUser,
    req: CreatePeriodRequest,
) -> Result<AcademicPeriod> {
    found(storage.get_school_by_id(req.school_id).await?, SCHOOL_NOT_FOUND)?;
    ensure_school_role(current, req.school_id, UserRole::school_admin_roles())?;
    require_text("name", &req.name)?;
    validate_academic_year(req.academic_year)?;
    validate_range(req.start_date, req.end_date)?;
    storage.create_period(req).await
}

pub async fn get_period(
    storage: &dyn Storage,
    current: &CurrentUser,
    id: i64,
) -> Result<AcademicPeriod> {
    let period = found(storage.get_period_by_id(id).await?, PERIOD_NOT_FOUND)?;
    ensure_school_role(current, period.school_id, UserRole::all_roles())?;
    Ok(period)
}

pub async fn update_period(
    storage: &dyn Storage,
    current: &CurrentUser,
    id: i64,
    update: UpdatePeriodRequest,
) -> Result<AcademicPeriod> {
    let period = found(storage.get_period_by_id(id).await?, PERIOD_NOT_FOUND)?;
    ensure_school_role(current, period.school_id, UserRole::school_admin_roles())?;
    if let Some(year) = update.academic_year {
        validate_academic_year(year)?;
    }
    validate_range(
        update.start_date.or(period.start_date),
        update.end_date.or(period.end_date),
    )?;
    found(storage.update_period(id, update).await?, PERIOD_NOT_FOUND)
}

pub async fn delete_period(storage: &dyn Storage, current: &CurrentUser, id: i64) -> Result<()> {
    let period = found(storage.get_period_by_id(id).await?, PERIOD_NOT_FOUND)?;
    ensure_school_role(current, period.school_id, UserRole::school_admin_roles())?;
    if storage.delete_period(id).await? {
        Ok(())
    } else {
        Err(SchoolError::missing(PERIOD_NOT_FOUND))
    }
}
