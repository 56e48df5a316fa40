pub mod pagination;
pub mod response;

pub use pagination::{PaginatedResponse, PaginationInfo, PaginationQuery};
pub use response::ApiResponse;

use serde::{Deserialize, Deserializer};

/// 可置空字段的反序列化：字段缺省为 `None`，显式 `null` 为 `Some(None)`
///
/// 需要配合 `#[serde(default)]` 使用。
pub fn deserialize_nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
