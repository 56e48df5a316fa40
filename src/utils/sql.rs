use sea_orm::ColumnTrait;
use sea_orm::sea_query::{IntoCondition, LikeExpr};

/// 转义 LIKE 通配符，配合 ESCAPE '\' 使用
pub fn escape_like_pattern(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// `column LIKE '%search%' ESCAPE '\'`，search 中的通配符按字面匹配
pub fn contains_escaped<C: ColumnTrait>(column: C, search: &str) -> impl IntoCondition {
    let pattern = format!("%{}%", escape_like_pattern(search));
    column.like(LikeExpr::new(pattern).escape('\\'))
}
