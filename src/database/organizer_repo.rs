use sqlx::SqlitePool;

use crate::models::OrganizerRow;

const SQL_INSERT_ORGANIZER: &str = r#"
INSERT INTO organizers (
  id,
  user_id,
  organization_name,
  description,
  contact_email
) VALUES (?, ?, ?, ?, ?)
"#;

pub struct NewOrganizer<'a> {
    pub id: &'a str,
    pub user_id: &'a str,
    pub organization_name: &'a str,
    pub description: Option<&'a str>,
    pub contact_email: &'a str,
}

pub async fn insert_organizer(pool: &SqlitePool, org: NewOrganizer<'_>) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_ORGANIZER)
        .bind(org.id)
        .bind(org.user_id)
        .bind(org.organization_name)
        .bind(org.description)
        .bind(org.contact_email)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

pub const SQL_LOAD_ORGANIZER_BY_USER: &str = r#"
SELECT
    id,
    user_id,
    organization_name,
    description,
    contact_email,
    verification_status,
    verified_at,
    verified_by,
    created_at
FROM organizers
WHERE user_id = ?1
LIMIT 1
"#;

pub async fn load_by_user_id(
    pool: &SqlitePool,
    user_id: &str,
) -> sqlx::Result<Option<OrganizerRow>> {
    sqlx::query_as::<_, OrganizerRow>(SQL_LOAD_ORGANIZER_BY_USER)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PendingOrganizerRow {
    pub id: String,
    pub organization_name: String,
    pub description: Option<String>,
    pub contact_email: String,
    pub created_at: String,
    pub applicant_name: String,
}

const SQL_LIST_PENDING: &str = r#"
SELECT
  o.id,
  o.organization_name,
  o.description,
  o.contact_email,
  o.created_at,
  p.full_name AS applicant_name
FROM organizers o
JOIN profiles p ON p.id = o.user_id
WHERE o.verification_status = 'pending'
ORDER BY o.created_at DESC
"#;

pub async fn list_pending(pool: &SqlitePool) -> sqlx::Result<Vec<PendingOrganizerRow>> {
    sqlx::query_as::<_, PendingOrganizerRow>(SQL_LIST_PENDING)
        .fetch_all(pool)
        .await
}

// Single-statement status transition. Deliberately no WHERE on the current
// status: any state can be overwritten and a repeated decision only refreshes
// the timestamp/reviewer pair.
const SQL_SET_VERIFICATION_STATUS: &str = r#"
UPDATE organizers
SET verification_status = ?,
    verified_at = strftime('%Y-%m-%dT%H:%M:%f', 'now'),
    verified_by = ?
WHERE id = ?
"#;

pub async fn set_verification_status(
    pool: &SqlitePool,
    organizer_id: &str,
    status: &str,
    admin_id: &str,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_SET_VERIFICATION_STATUS)
        .bind(status)
        .bind(admin_id)
        .bind(organizer_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

const SQL_COUNT_ORGANIZERS: &str = "SELECT COUNT(*) FROM organizers";

pub async fn count_organizers(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar(SQL_COUNT_ORGANIZERS)
        .fetch_one(pool)
        .await
}
