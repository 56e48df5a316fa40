use serde::{Deserialize, Serialize};

pub const MAX_PAGE_SIZE: i64 = 100;

// 分页查询参数，page 从 1 开始
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationQuery {
    #[serde(
        default = "default_page",
        deserialize_with = "deserialize_string_to_i64"
    )]
    pub page: i64,
    #[serde(
        default = "default_size",
        deserialize_with = "deserialize_string_to_i64"
    )]
    pub size: i64,
}

impl PaginationQuery {
    /// 规范化页码与页大小
    pub fn normalized(&self) -> (u64, u64) {
        normalize_page(Some(self.page), Some(self.size))
    }
}

/// page < 1 视为 1，size 限制在 1..=MAX_PAGE_SIZE
pub fn normalize_page(page: Option<i64>, size: Option<i64>) -> (u64, u64) {
    let page = page.unwrap_or(1).max(1) as u64;
    let size = size.unwrap_or(default_size()).clamp(1, MAX_PAGE_SIZE) as u64;
    (page, size)
}

// 分页响应信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationInfo {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl PaginationInfo {
    pub fn new(page: u64, page_size: u64, total: u64, total_pages: u64) -> Self {
        Self {
            page: page as i64,
            page_size: page_size as i64,
            total: total as i64,
            total_pages: total_pages as i64,
        }
    }
}

// 分页列表响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub pagination: PaginationInfo,
}

// 查询字符串里的数字都是字符串，这里两种都接受
pub(crate) fn deserialize_string_to_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{Error, Unexpected, Visitor};
    use std::fmt;

    struct I64Visitor;

    impl<'de> Visitor<'de> for I64Visitor {
        type Value = i64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an integer or a string containing an integer")
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(value)
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            if value <= i64::MAX as u64 {
                Ok(value as i64)
            } else {
                Err(Error::invalid_value(Unexpected::Unsigned(value), &self))
            }
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: Error,
        {
            value
                .trim()
                .parse()
                .map_err(|_| Error::invalid_value(Unexpected::Str(value), &self))
        }
    }

    deserializer.deserialize_any(I64Visitor)
}

/// flatten 之后查询字符串里的值全部是字符串，可选数字、布尔字段用这个解析，空串视为未提供
pub(crate) fn deserialize_optional_from_str<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de> + std::str::FromStr,
    T::Err: std::fmt::Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw<T> {
        Value(T),
        Text(String),
    }

    match Option::<Raw<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Value(value)) => Ok(Some(value)),
        Some(Raw::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(Raw::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

fn default_page() -> i64 {
    1
}

fn default_size() -> i64 {
    20
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            size: default_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_page_clamps_values() {
        assert_eq!(normalize_page(None, None), (1, 20));
        assert_eq!(normalize_page(Some(0), Some(0)), (1, 1));
        assert_eq!(normalize_page(Some(-3), Some(1000)), (1, MAX_PAGE_SIZE as u64));
        assert_eq!(normalize_page(Some(4), Some(15)), (4, 15));
    }

    #[test]
    fn test_pagination_query_accepts_strings_and_numbers() {
        let query: PaginationQuery =
            serde_json::from_str(r#"{"page": "2", "size": 5}"#).expect("valid query");
        assert_eq!(query.page, 2);
        assert_eq!(query.size, 5);

        let query: PaginationQuery = serde_json::from_str("{}").expect("defaults");
        assert_eq!(query.normalized(), (1, 20));

        assert!(serde_json::from_str::<PaginationQuery>(r#"{"page": "abc"}"#).is_err());
    }

    #[derive(Debug, Deserialize)]
    struct Filters {
        #[serde(flatten)]
        pagination: PaginationQuery,
        #[serde(default, deserialize_with = "deserialize_optional_from_str")]
        school_id: Option<i64>,
        #[serde(default, deserialize_with = "deserialize_optional_from_str")]
        active: Option<bool>,
    }

    #[test]
    fn test_flattened_query_string_filters() {
        use actix_web::web::Query;

        let filters = Query::<Filters>::from_query("page=2&school_id=7&active=false")
            .expect("valid query")
            .into_inner();
        assert_eq!(filters.pagination.page, 2);
        assert_eq!(filters.school_id, Some(7));
        assert_eq!(filters.active, Some(false));

        let empty = Query::<Filters>::from_query("school_id=")
            .expect("valid query")
            .into_inner();
        assert_eq!(empty.school_id, None);
        assert_eq!(empty.active, None);

        assert!(Query::<Filters>::from_query("school_id=x").is_err());
    }
}
