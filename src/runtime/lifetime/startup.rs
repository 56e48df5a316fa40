use crate::cache::{ObjectCache, create_cache};
use crate::errors::Result;
use crate::models::users::entities::UserRole;
use crate::models::users::requests::CreateUserRequest;
use crate::storage::Storage;
use crate::utils::password::{generate_password, hash_password};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const DEFAULT_OWNER_EMAIL: &str = "owner@localhost";

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

/// 初始化默认 owner 账号
/// 如果数据库中没有任何用户，则创建一个 owner 账号；返回是否创建
pub(crate) async fn seed_owner(storage: &Arc<dyn Storage>, password: Option<String>) -> bool {
    // 检查是否已有用户
    match storage.count_users().await {
        Ok(count) if count > 0 => {
            debug!(
                "Database already has {} user(s), skipping owner seed",
                count
            );
            return false;
        }
        Ok(_) => {
            info!("No users found in database, creating default owner account...");
        }
        Err(e) => {
            warn!("Failed to count users: {}, skipping owner seed", e);
            return false;
        }
    }

    // 获取密码：优先使用 ADMIN_PASSWORD，否则生成随机密码
    let password = password.unwrap_or_else(|| {
        let pwd = generate_password(16);
        warn!("==========================================================");
        warn!("  ADMIN PASSWORD NOT SET - USING GENERATED PASSWORD");
        warn!("  Generated owner password: {}", pwd);
        warn!("  Please save this password or set ADMIN_PASSWORD env var");
        warn!("==========================================================");
        pwd
    });

    let password_hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Failed to hash owner password: {}, skipping owner seed", e);
            return false;
        }
    };

    let owner_request = CreateUserRequest {
        email: DEFAULT_OWNER_EMAIL.to_string(),
        password: password_hash,
        first_name: "System".to_string(),
        last_name: "Owner".to_string(),
        document_number: None,
        phone: None,
        school_id: None,
        role: Some(UserRole::Owner),
    };

    let user = match storage.create_user(owner_request).await {
        Ok(user) => user,
        Err(e) => {
            warn!("Failed to create owner account: {}", e);
            return false;
        }
    };

    match storage.assign_role(user.id, None, UserRole::Owner).await {
        Ok(_) => {
            info!(
                "Default owner account created successfully (ID: {}, email: {})",
                user.id, user.email
            );
            true
        }
        Err(e) => {
            warn!("Failed to grant owner role: {}", e);
            false
        }
    }
}

/// 准备服务器启动的上下文
/// 包括存储（含迁移）、缓存与初始账号
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    // 初始化默认 owner 账号（如果需要）
    seed_owner(&storage, std::env::var("ADMIN_PASSWORD").ok()).await;

    let cache = create_cache();
    warn!("Cache backend initialized");

    Ok(StartupContext { storage, cache })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use crate::utils::password::verify_password;

    #[tokio::test]
    async fn test_owner_seeded_once() {
        let storage: Arc<dyn Storage> =
            Arc::new(SeaOrmStorage::new_in_memory().await.expect("database"));

        assert!(seed_owner(&storage, Some("Owner#2025pass".to_string())).await);
        assert!(!seed_owner(&storage, Some("ignored".to_string())).await);
        assert_eq!(storage.count_users().await.expect("count"), 1);

        let owner = storage
            .get_user_by_email(DEFAULT_OWNER_EMAIL)
            .await
            .expect("query")
            .expect("owner exists");
        assert!(verify_password("Owner#2025pass", &owner.password_hash));
        let roles = storage.list_user_roles(owner.id).await.expect("roles");
        assert_eq!(roles.len(), 1);
        assert_eq!(roles[0].role, UserRole::Owner);
        assert_eq!(roles[0].school_id, None);
    }
}
