use serde::{Deserialize, Serialize};

// 角色种类
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Owner,          // 系统所有者，不属于任何学校
    Director,       // 校长
    Teacher,        // 教师
    Administrative, // 行政人员
    Guardian,       // 监护人
}

impl UserRole {
    pub const OWNER: &'static str = "owner";
    pub const DIRECTOR: &'static str = "director";
    pub const TEACHER: &'static str = "teacher";
    pub const ADMINISTRATIVE: &'static str = "administrative";
    pub const GUARDIAN: &'static str = "guardian";

    /// 可以管理用户与学生的角色
    pub fn management_roles() -> &'static [UserRole] {
        &[Self::Owner, Self::Director, Self::Administrative]
    }
    /// 可以维护学校目录的角色
    pub fn school_admin_roles() -> &'static [UserRole] {
        &[Self::Owner, Self::Director]
    }
    pub fn teacher_roles() -> &'static [UserRole] {
        &[Self::Teacher]
    }
    pub fn guardian_roles() -> &'static [UserRole] {
        &[Self::Guardian]
    }
    /// 学校内部员工
    pub fn staff_roles() -> &'static [UserRole] {
        &[
            Self::Owner,
            Self::Director,
            Self::Teacher,
            Self::Administrative,
        ]
    }
    pub fn all_roles() -> &'static [UserRole] {
        &[
            Self::Owner,
            Self::Director,
            Self::Teacher,
            Self::Administrative,
            Self::Guardian,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Owner => Self::OWNER,
            UserRole::Director => Self::DIRECTOR,
            UserRole::Teacher => Self::TEACHER,
            UserRole::Administrative => Self::ADMINISTRATIVE,
            UserRole::Guardian => Self::GUARDIAN,
        }
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "Invalid role: '{s}'. Supported roles: owner, director, teacher, administrative, guardian"
            ))
        })
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            UserRole::OWNER => Ok(UserRole::Owner),
            UserRole::DIRECTOR => Ok(UserRole::Director),
            UserRole::TEACHER => Ok(UserRole::Teacher),
            UserRole::ADMINISTRATIVE => Ok(UserRole::Administrative),
            UserRole::GUARDIAN => Ok(UserRole::Guardian),
            _ => Err(format!("Invalid user role: {s}")),
        }
    }
}

// 用户状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Active,
    Inactive,
}

impl<'de> Deserialize<'de> for UserStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "Invalid user status: '{s}'. Supported: active, inactive"
            ))
        })
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserStatus::Active => write!(f, "active"),
            UserStatus::Inactive => write!(f, "inactive"),
        }
    }
}

impl std::str::FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(UserStatus::Active),
            "inactive" => Ok(UserStatus::Inactive),
            _ => Err(format!("Invalid user status: {s}")),
        }
    }
}

// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub document_number: Option<String>,
    pub phone: Option<String>,
    pub status: UserStatus,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

// 嵌入在其他实体中的用户摘要
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
        }
    }
}

// 用户在某个学校的角色
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoleAssignment {
    pub id: i64,
    pub user_id: i64,
    /// owner 角色没有学校
    pub school_id: Option<i64>,
    pub role: UserRole,
    pub active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 当前请求的用户，由 RequireJWT 中间件放入请求扩展
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub user: User,
    pub roles: Vec<RoleAssignment>,
}

impl CurrentUser {
    pub fn id(&self) -> i64 {
        self.user.id
    }

    pub fn is_owner(&self) -> bool {
        self.roles
            .iter()
            .any(|r| r.active && r.role == UserRole::Owner)
    }

    pub fn has_any_role(&self, roles: &[UserRole]) -> bool {
        self.roles
            .iter()
            .any(|r| r.active && roles.contains(&r.role))
    }

    /// owner 在所有学校都通过
    pub fn has_role_in_school(&self, school_id: i64, roles: &[UserRole]) -> bool {
        if self.is_owner() && roles.contains(&UserRole::Owner) {
            return true;
        }
        self.roles
            .iter()
            .any(|r| r.active && r.school_id == Some(school_id) && roles.contains(&r.role))
    }

    /// 当前用户持有有效角色的学校
    pub fn school_ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self
            .roles
            .iter()
            .filter(|r| r.active)
            .filter_map(|r| r.school_id)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64) -> User {
        let now = chrono::Utc::now();
        User {
            id,
            email: format!("user{id}@school.test"),
            password_hash: String::new(),
            first_name: "Ana".to_string(),
            last_name: "Quispe".to_string(),
            document_number: None,
            phone: None,
            status: UserStatus::Active,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn role(school_id: Option<i64>, role: UserRole, active: bool) -> RoleAssignment {
        RoleAssignment {
            id: 1,
            user_id: 1,
            school_id,
            role,
            active,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_role_parse_and_display() {
        for r in UserRole::all_roles() {
            assert_eq!(r.to_string().parse::<UserRole>(), Ok(*r));
        }
        assert!("admin".parse::<UserRole>().is_err());
        let parsed: UserRole = serde_json::from_str("\"administrative\"").expect("valid role");
        assert_eq!(parsed, UserRole::Administrative);
        assert!(serde_json::from_str::<UserRole>("\"root\"").is_err());
    }

    #[test]
    fn test_school_scoped_role_checks() {
        let current = CurrentUser {
            user: user(1),
            roles: vec![
                role(Some(10), UserRole::Director, true),
                role(Some(20), UserRole::Teacher, false),
            ],
        };
        assert!(current.has_role_in_school(10, UserRole::school_admin_roles()));
        assert!(!current.has_role_in_school(11, UserRole::school_admin_roles()));
        // 停用的角色不算
        assert!(!current.has_role_in_school(20, UserRole::teacher_roles()));
        assert_eq!(current.school_ids(), vec![10]);
        assert!(!current.is_owner());
    }

    #[test]
    fn test_owner_passes_every_school() {
        let current = CurrentUser {
            user: user(1),
            roles: vec![role(None, UserRole::Owner, true)],
        };
        assert!(current.is_owner());
        assert!(current.has_role_in_school(99, UserRole::management_roles()));
        assert!(!current.has_role_in_school(99, UserRole::teacher_roles()));
    }
}
