use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateSchoolRequest {
    pub name: String,
    pub code: Option<String>,
    pub address: Option<String>,
}

// 更新学校，只修改提供的字段
#[derive(Debug, Default, Deserialize)]
pub struct UpdateSchoolRequest {
    pub name: Option<String>,
    pub code: Option<String>,
    pub address: Option<String>,
    pub active: Option<bool>,
}
