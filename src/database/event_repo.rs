use sqlx::SqlitePool;

// Catalog rows carry the category and organizer (plus the organizer's
// profile) the way the public listing renders them.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CatalogEventRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub event_date: String,
    pub location: String,
    pub image_url: Option<String>,
    pub volunteers_needed: i64,
    pub category_id: String,
    pub category_name: String,
    pub organization_name: String,
    pub organizer_contact_email: String,
    pub organizer_profile_name: String,
    pub organizer_profile_image: Option<String>,
}

const SQL_LIST_CATALOG: &str = r#"
SELECT
  e.id,
  e.title,
  e.description,
  e.event_date,
  e.location,
  e.image_url,
  e.volunteers_needed,
  e.category_id,
  c.name AS category_name,
  o.organization_name,
  o.contact_email AS organizer_contact_email,
  p.full_name AS organizer_profile_name,
  p.profile_image AS organizer_profile_image
FROM events e
JOIN categories c ON c.id = e.category_id
JOIN organizers o ON o.id = e.organizer_id
JOIN profiles p ON p.id = o.user_id
WHERE e.status = 'approved'
  AND datetime(e.event_date) >= datetime('now')
  AND (? IS NULL OR e.category_id = ?)
ORDER BY datetime(e.event_date) ASC
"#;

pub async fn list_catalog(
    pool: &SqlitePool,
    category_id: Option<&str>,
) -> sqlx::Result<Vec<CatalogEventRow>> {
    sqlx::query_as::<_, CatalogEventRow>(SQL_LIST_CATALOG)
        .bind(category_id)
        .bind(category_id)
        .fetch_all(pool)
        .await
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EventDetailRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub event_date: String,
    pub location: String,
    pub image_url: Option<String>,
    pub volunteers_needed: i64,
    pub status: String,
    pub category_name: String,
    pub organization_name: String,
    pub organizer_description: Option<String>,
    pub organizer_contact_email: String,
    pub organizer_profile_image: Option<String>,
}

const SQL_LOAD_DETAIL: &str = r#"
SELECT
  e.id,
  e.title,
  e.description,
  e.event_date,
  e.location,
  e.image_url,
  e.volunteers_needed,
  e.status,
  c.name AS category_name,
  o.organization_name,
  o.description AS organizer_description,
  o.contact_email AS organizer_contact_email,
  p.profile_image AS organizer_profile_image
FROM events e
JOIN categories c ON c.id = e.category_id
JOIN organizers o ON o.id = e.organizer_id
JOIN profiles p ON p.id = o.user_id
WHERE e.id = ?1
LIMIT 1
"#;

pub async fn load_detail(
    pool: &SqlitePool,
    event_id: &str,
) -> sqlx::Result<Option<EventDetailRow>> {
    sqlx::query_as::<_, EventDetailRow>(SQL_LOAD_DETAIL)
        .bind(event_id)
        .fetch_optional(pool)
        .await
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PendingEventRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub event_date: String,
    pub location: String,
    pub created_at: String,
    pub organization_name: String,
    pub category_name: String,
}

const SQL_LIST_PENDING: &str = r#"
SELECT
  e.id,
  e.title,
  e.description,
  e.event_date,
  e.location,
  e.created_at,
  o.organization_name,
  c.name AS category_name
FROM events e
JOIN organizers o ON o.id = e.organizer_id
JOIN categories c ON c.id = e.category_id
WHERE e.status = 'pending'
ORDER BY e.created_at DESC
"#;

pub async fn list_pending(pool: &SqlitePool) -> sqlx::Result<Vec<PendingEventRow>> {
    sqlx::query_as::<_, PendingEventRow>(SQL_LIST_PENDING)
        .fetch_all(pool)
        .await
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrganizerEventRow {
    pub id: String,
    pub title: String,
    pub event_date: String,
    pub location: String,
    pub volunteers_needed: i64,
    pub status: String,
    pub category_name: String,
    pub joined_count: i64,
}

const SQL_LIST_FOR_ORGANIZER: &str = r#"
SELECT
  e.id,
  e.title,
  e.event_date,
  e.location,
  e.volunteers_needed,
  e.status,
  c.name AS category_name,
  (
    SELECT COUNT(*)
    FROM event_participants ep
    WHERE ep.event_id = e.id
      AND ep.status = 'joined'
  ) AS joined_count
FROM events e
JOIN categories c ON c.id = e.category_id
WHERE e.organizer_id = ?1
ORDER BY datetime(e.event_date) ASC
"#;

pub async fn list_for_organizer(
    pool: &SqlitePool,
    organizer_id: &str,
) -> sqlx::Result<Vec<OrganizerEventRow>> {
    sqlx::query_as::<_, OrganizerEventRow>(SQL_LIST_FOR_ORGANIZER)
        .bind(organizer_id)
        .fetch_all(pool)
        .await
}

const SQL_INSERT_EVENT: &str = r#"
INSERT INTO events (
  id,
  organizer_id,
  category_id,
  title,
  description,
  event_date,
  location,
  image_url,
  volunteers_needed
) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

pub struct NewEvent<'a> {
    pub id: &'a str,
    pub organizer_id: &'a str,
    pub category_id: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub event_date: &'a str,
    pub location: &'a str,
    pub image_url: Option<&'a str>,
    pub volunteers_needed: i64,
}

pub async fn insert_event(pool: &SqlitePool, event: NewEvent<'_>) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_EVENT)
        .bind(event.id)
        .bind(event.organizer_id)
        .bind(event.category_id)
        .bind(event.title)
        .bind(event.description)
        .bind(event.event_date)
        .bind(event.location)
        .bind(event.image_url)
        .bind(event.volunteers_needed)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

// Same transition shape as the organizer review: one UPDATE, no guard on the
// prior status.
const SQL_SET_STATUS: &str = r#"
UPDATE events
SET status = ?,
    approved_at = strftime('%Y-%m-%dT%H:%M:%f', 'now'),
    approved_by = ?,
    updated_at = strftime('%Y-%m-%dT%H:%M:%f', 'now')
WHERE id = ?
"#;

pub async fn set_status(
    pool: &SqlitePool,
    event_id: &str,
    status: &str,
    admin_id: &str,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_SET_STATUS)
        .bind(status)
        .bind(admin_id)
        .bind(event_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

const SQL_COUNT_EVENTS: &str = "SELECT COUNT(*) FROM events";

pub async fn count_events(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar(SQL_COUNT_EVENTS).fetch_one(pool).await
}
