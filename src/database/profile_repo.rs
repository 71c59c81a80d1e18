use sqlx::SqlitePool;

use crate::models::ProfileRow;

pub const SQL_LOAD_PROFILE: &str = r#"
SELECT
    id,
    full_name,
    role,
    profile_image,
    phone,
    created_at
FROM profiles
WHERE id = ?1
LIMIT 1
"#;

pub async fn load_profile(pool: &SqlitePool, user_id: &str) -> sqlx::Result<Option<ProfileRow>> {
    sqlx::query_as::<_, ProfileRow>(SQL_LOAD_PROFILE)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

const SQL_INSERT_PROFILE: &str = r#"
INSERT INTO profiles (id, full_name, role)
VALUES (?, ?, ?)
"#;

pub async fn insert_profile(
    pool: &SqlitePool,
    user_id: &str,
    full_name: &str,
    role: &str,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_PROFILE)
        .bind(user_id)
        .bind(full_name)
        .bind(role)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

const SQL_UPDATE_PROFILE: &str = r#"
UPDATE profiles
SET full_name = ?,
    phone = ?,
    profile_image = ?
WHERE id = ?
"#;

pub async fn update_profile(
    pool: &SqlitePool,
    user_id: &str,
    full_name: &str,
    phone: Option<&str>,
    profile_image: Option<&str>,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_UPDATE_PROFILE)
        .bind(full_name)
        .bind(phone)
        .bind(profile_image)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

const SQL_COUNT_PROFILES: &str = "SELECT COUNT(*) FROM profiles";

pub async fn count_profiles(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar(SQL_COUNT_PROFILES).fetch_one(pool).await
}
