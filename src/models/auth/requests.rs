use serde::Deserialize;

// 登录请求
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// 是否记住我，延长 refresh token 有效期
    #[serde(default)]
    pub remember_me: bool,
}

// 修改自己的密码
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}
