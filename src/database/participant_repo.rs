use sqlx::SqlitePool;

const SQL_COUNT_JOINED: &str = r#"
SELECT COUNT(*)
FROM event_participants
WHERE event_id = ?1
  AND status = 'joined'
"#;

pub async fn count_joined(pool: &SqlitePool, event_id: &str) -> sqlx::Result<i64> {
    sqlx::query_scalar(SQL_COUNT_JOINED)
        .bind(event_id)
        .fetch_one(pool)
        .await
}

const SQL_HAS_JOINED: &str = r#"
SELECT COUNT(*)
FROM event_participants
WHERE event_id = ?1
  AND user_id = ?2
  AND status = 'joined'
"#;

pub async fn has_joined(pool: &SqlitePool, event_id: &str, user_id: &str) -> sqlx::Result<bool> {
    let n: i64 = sqlx::query_scalar(SQL_HAS_JOINED)
        .bind(event_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
    Ok(n > 0)
}

const SQL_INSERT_JOINED: &str = r#"
INSERT INTO event_participants (id, event_id, user_id, status)
VALUES (?, ?, ?, 'joined')
"#;

pub async fn insert_joined(
    pool: &SqlitePool,
    id: &str,
    event_id: &str,
    user_id: &str,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_JOINED)
        .bind(id)
        .bind(event_id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

// Dashboard rows: a participation joined with its event and category.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserEventRow {
    pub event_id: String,
    pub title: String,
    pub event_date: String,
    pub location: String,
    pub category_name: String,
    pub participation_status: String,
}

const SQL_LIST_UPCOMING_FOR_USER: &str = r#"
SELECT
  e.id AS event_id,
  e.title,
  e.event_date,
  e.location,
  c.name AS category_name,
  ep.status AS participation_status
FROM event_participants ep
JOIN events e ON e.id = ep.event_id
JOIN categories c ON c.id = e.category_id
WHERE ep.user_id = ?1
  AND ep.status = 'joined'
  AND datetime(e.event_date) >= datetime('now')
ORDER BY datetime(e.event_date) ASC
"#;

pub async fn list_upcoming_for_user(
    pool: &SqlitePool,
    user_id: &str,
) -> sqlx::Result<Vec<UserEventRow>> {
    sqlx::query_as::<_, UserEventRow>(SQL_LIST_UPCOMING_FOR_USER)
        .bind(user_id)
        .fetch_all(pool)
        .await
}

const SQL_LIST_PAST_FOR_USER: &str = r#"
SELECT
  e.id AS event_id,
  e.title,
  e.event_date,
  e.location,
  c.name AS category_name,
  ep.status AS participation_status
FROM event_participants ep
JOIN events e ON e.id = ep.event_id
JOIN categories c ON c.id = e.category_id
WHERE ep.user_id = ?1
  AND ep.status IN ('joined', 'completed')
  AND datetime(e.event_date) < datetime('now')
ORDER BY datetime(e.event_date) DESC
LIMIT 5
"#;

pub async fn list_past_for_user(
    pool: &SqlitePool,
    user_id: &str,
) -> sqlx::Result<Vec<UserEventRow>> {
    sqlx::query_as::<_, UserEventRow>(SQL_LIST_PAST_FOR_USER)
        .bind(user_id)
        .fetch_all(pool)
        .await
}
