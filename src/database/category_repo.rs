use sqlx::SqlitePool;

use crate::models::CategoryRow;

const SQL_LIST_CATEGORIES: &str = r#"
SELECT id, name, description, icon
FROM categories
ORDER BY name ASC
"#;

pub async fn list_categories(pool: &SqlitePool) -> sqlx::Result<Vec<CategoryRow>> {
    sqlx::query_as::<_, CategoryRow>(SQL_LIST_CATEGORIES)
        .fetch_all(pool)
        .await
}

const SQL_COUNT_CATEGORIES: &str = "SELECT COUNT(*) FROM categories";

pub async fn count_categories(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar(SQL_COUNT_CATEGORIES)
        .fetch_one(pool)
        .await
}
