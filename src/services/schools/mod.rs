//! 学校服务

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SCHOOL_NOT_FOUND, current_user, ensure_school_role, found, respond, respond_created};
use crate::errors::{Result, SchoolError};
use crate::models::{
    schools::{
        School,
        requests::{CreateSchoolRequest, UpdateSchoolRequest},
    },
    users::entities::{CurrentUser, UserRole},
};
use crate::storage::Storage;
use crate::utils::validate::require_text;

define_service!(SchoolService);

impl SchoolService {
    pub async fn list_schools(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let current = match current_user(request) {
            Ok(current) => current,
            Err(resp) => return Ok(resp),
        };
        respond(
            list_schools(storage.as_ref(), &current).await,
            "Schools retrieved successfully",
        )
    }

    pub async fn create_school(
        &self,
        req: CreateSchoolRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let current = match current_user(request) {
            Ok(current) => current,
            Err(resp) => return Ok(resp),
        };
        respond_created(
            create_school(storage.as_ref(), &current, req).await,
            "School created successfully",
        )
    }

    pub async fn get_school(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let current = match current_user(request) {
            Ok(current) => current,
            Err(resp) => return Ok(resp),
        };
        respond(
            get_school(storage.as_ref(), &current, id).await,
            "School retrieved successfully",
        )
    }

    pub async fn update_school(
        &self,
        id: i64,
        update: UpdateSchoolRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let current = match current_user(request) {
            Ok(current) => current,
            Err(resp) => return Ok(resp),
        };
        respond(
            update_school(storage.as_ref(), &current, id, update).await,
            "School updated successfully",
        )
    }
}

/// owner 看到全部学校，其他人只看到自己持有角色的学校
pub async fn list_schools(storage: &dyn Storage, current: &CurrentUser) -> Result<Vec<School>> {
    if current.is_owner() {
        storage.list_schools(None).await
    } else {
        storage.list_schools(Some(current.school_ids())).await
    }
}

pub async fn create_school(
    storage: &dyn Storage,
    current: &CurrentUser,
    req: CreateSchoolRequest,
) -> Result<School> {
    if !current.is_owner() {
        return Err(SchoolError::authorization("Only owners can create schools"));
    }
    require_text("name", &req.name)?;
    let school = storage.create_school(req).await?;
    tracing::info!("School {} created by {}", school.id, current.id());
    Ok(school)
}

pub async fn get_school(storage: &dyn Storage, current: &CurrentUser, id: i64) -> Result<School> {
    let school = found(storage.get_school_by_id(id).await?, SCHOOL_NOT_FOUND)?;
    ensure_school_role(current, id, UserRole::all_roles())?;
    Ok(school)
}

/// owner 或该学校的校长
pub async fn update_school(
    storage: &dyn Storage,
    current: &CurrentUser,
    id: i64,
    update: UpdateSchoolRequest,
) -> Result<School> {
    found(storage.get_school_by_id(id).await?, SCHOOL_NOT_FOUND)?;
    ensure_school_role(current, id, UserRole::school_admin_roles())?;
    if let Some(ref name) = update.name {
        require_text("name", name)?;
    }
    found(storage.update_school(id, update).await?, SCHOOL_NOT_FOUND)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{load_current_user, shared};
    use crate::storage::sea_orm_storage::fixtures::{create_user, scenario};

    fn new_school(name: &str) -> CreateSchoolRequest {
        CreateSchoolRequest {
            name: name.to_string(),
            code: None,
            address: None,
        }
    }

    #[tokio::test]
    async fn test_owner_sees_all_schools_others_their_own() {
        let (storage, s) = shared(scenario().await);
        let owner_id = create_user(&s.storage, "owner@school.test", None, UserRole::Owner).await;
        let owner = load_current_user(&storage, owner_id).await;
        let teacher = load_current_user(&storage, s.teacher_id).await;

        let other = create_school(storage.as_ref(), &owner, new_school("Colegio Grau"))
            .await
            .expect("owner creates");

        let all = list_schools(storage.as_ref(), &owner).await.expect("list");
        assert_eq!(all.len(), 2);
        let own = list_schools(storage.as_ref(), &teacher).await.expect("list");
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].id, s.school_id);

        let err = get_school(storage.as_ref(), &teacher, other.id)
            .await
            .expect_err("foreign school");
        assert!(matches!(err, SchoolError::Authorization(_)));
        let err = get_school(storage.as_ref(), &teacher, other.id + 100)
            .await
            .expect_err("missing school");
        assert_eq!(err, SchoolError::missing(SCHOOL_NOT_FOUND));
    }

    #[tokio::test]
    async fn test_only_owner_creates_and_director_updates() {
        let (storage, s) = shared(scenario().await);
        let director_id = create_user(
            &s.storage,
            "director@school.test",
            Some(s.school_id),
            UserRole::Director,
        )
        .await;
        let director = load_current_user(&storage, director_id).await;
        let teacher = load_current_user(&storage, s.teacher_id).await;

        let err = create_school(storage.as_ref(), &director, new_school("Nuevo"))
            .await
            .expect_err("director cannot create");
        assert!(matches!(err, SchoolError::Authorization(_)));

        let rename = || UpdateSchoolRequest {
            name: Some("Colegio San Martin de Porres".to_string()),
            ..Default::default()
        };
        let err = update_school(storage.as_ref(), &teacher, s.school_id, rename())
            .await
            .expect_err("teacher cannot update");
        assert!(matches!(err, SchoolError::Authorization(_)));

        let updated = update_school(storage.as_ref(), &director, s.school_id, rename())
            .await
            .expect("director updates");
        assert_eq!(updated.name, "Colegio San Martin de Porres");
        assert_eq!(updated.code.as_deref(), Some("CSM"));
    }
}
