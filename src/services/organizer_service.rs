use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::{category_repo, event_repo, organizer_repo};
use crate::models::events::{EVENT_APPROVED, EVENT_PENDING};
use crate::models::organizers::VERIFICATION_APPROVED;
use crate::models::CategoryRow;
use crate::services::catalog_service::format_event_labels;

#[derive(Clone)]
pub struct OrganizerEventView {
    pub event_id: String,
    pub title: String,
    pub date_label: String,
    pub time_label: String,
    pub location: String,
    pub category_name: String,
    pub status: String,
    pub volunteers_needed: i64,
    pub joined_count: i64,
}

pub struct OrganizerDashboardData {
    pub organization_name: String,
    pub verification_status: String,
    pub can_create_events: bool,
    pub events: Vec<OrganizerEventView>,
    pub pending_count: usize,
    pub approved_count: usize,
    pub total_volunteers: i64,
    pub categories: Vec<CategoryRow>,
}

/// None means the profile exists but the organizer row does not — the signup
/// partial-failure window. The page then offers the retry-completion form
/// instead of a dashboard.
pub async fn build_organizer_dashboard(
    pool: &SqlitePool,
    user_id: &str,
) -> sqlx::Result<Option<OrganizerDashboardData>> {
    let Some(organizer) = organizer_repo::load_by_user_id(pool, user_id).await? else {
        return Ok(None);
    };

    let rows = event_repo::list_for_organizer(pool, &organizer.id).await?;
    let categories = category_repo::list_categories(pool).await.unwrap_or_default();

    let events: Vec<OrganizerEventView> = rows
        .into_iter()
        .map(|row| {
            let (date_label, time_label) = format_event_labels(&row.event_date);
            OrganizerEventView {
                event_id: row.id,
                title: row.title,
                date_label,
                time_label,
                location: row.location,
                category_name: row.category_name,
                status: row.status,
                volunteers_needed: row.volunteers_needed,
                joined_count: row.joined_count,
            }
        })
        .collect();

    let pending_count = events.iter().filter(|e| e.status == EVENT_PENDING).count();
    let approved_count = events.iter().filter(|e| e.status == EVENT_APPROVED).count();
    let total_volunteers = events.iter().map(|e| e.joined_count).sum();

    Ok(Some(OrganizerDashboardData {
        organization_name: organizer.organization_name,
        can_create_events: organizer.verification_status == VERIFICATION_APPROVED,
        verification_status: organizer.verification_status,
        events,
        pending_count,
        approved_count,
        total_volunteers,
        categories,
    }))
}

pub struct EventInput {
    pub category_id: String,
    pub title: String,
    pub description: String,
    pub event_date: String,
    pub location: String,
    pub image_url: Option<String>,
    pub volunteers_needed: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateEventOutcome {
    Created,
    NotVerified,
    MissingOrganizer,
}

/// Events may only be proposed while the organizer is approved; they always
/// enter the catalog pipeline as pending and wait for an admin review.
pub async fn create_event(
    pool: &SqlitePool,
    user_id: &str,
    input: &EventInput,
) -> sqlx::Result<CreateEventOutcome> {
    let Some(organizer) = organizer_repo::load_by_user_id(pool, user_id).await? else {
        return Ok(CreateEventOutcome::MissingOrganizer);
    };
    if organizer.verification_status != VERIFICATION_APPROVED {
        return Ok(CreateEventOutcome::NotVerified);
    }

    let id = Uuid::new_v4().to_string();
    event_repo::insert_event(
        pool,
        event_repo::NewEvent {
            id: &id,
            organizer_id: &organizer.id,
            category_id: &input.category_id,
            title: &input.title,
            description: &input.description,
            event_date: &input.event_date,
            location: &input.location,
            image_url: input.image_url.as_deref(),
            volunteers_needed: input.volunteers_needed,
        },
    )
    .await?;
    Ok(CreateEventOutcome::Created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::testing;

    fn sample_input() -> EventInput {
        EventInput {
            category_id: "cat1".to_string(),
            title: "Beach Cleanup".to_string(),
            description: "Bring gloves.".to_string(),
            event_date: "2199-01-01T09:00:00".to_string(),
            location: "Pier 4".to_string(),
            image_url: None,
            volunteers_needed: 10,
        }
    }

    #[tokio::test]
    async fn unverified_organizers_cannot_create_events() {
        let pool = testing::test_pool().await;
        testing::seed_profile(&pool, "u1", "Olive", "organizer").await;
        testing::seed_organizer(&pool, "org1", "u1", "Helpers").await;
        testing::seed_category(&pool, "cat1", "Environment").await;

        let outcome = create_event(&pool, "u1", &sample_input()).await.unwrap();
        assert_eq!(outcome, CreateEventOutcome::NotVerified);

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn created_events_enter_the_pipeline_as_pending() {
        let pool = testing::test_pool().await;
        testing::seed_profile(&pool, "u1", "Olive", "organizer").await;
        testing::seed_organizer(&pool, "org1", "u1", "Helpers").await;
        testing::seed_category(&pool, "cat1", "Environment").await;
        sqlx::query("UPDATE organizers SET verification_status = 'approved' WHERE id = 'org1'")
            .execute(&pool)
            .await
            .unwrap();

        let outcome = create_event(&pool, "u1", &sample_input()).await.unwrap();
        assert_eq!(outcome, CreateEventOutcome::Created);

        let status: String = sqlx::query_scalar("SELECT status FROM events LIMIT 1")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(status, "pending");
    }

    #[tokio::test]
    async fn missing_organizer_row_is_reported() {
        let pool = testing::test_pool().await;
        testing::seed_profile(&pool, "u1", "Olive", "organizer").await;

        let outcome = create_event(&pool, "u1", &sample_input()).await.unwrap();
        assert_eq!(outcome, CreateEventOutcome::MissingOrganizer);
    }

    #[tokio::test]
    async fn dashboard_tallies_events_and_volunteers() {
        let pool = testing::test_pool().await;
        testing::seed_profile(&pool, "u1", "Olive", "organizer").await;
        testing::seed_organizer(&pool, "org1", "u1", "Helpers").await;
        testing::seed_category(&pool, "cat1", "Environment").await;
        testing::seed_event(&pool, "e1", "org1", "cat1", "A", "2199-01-01T09:00:00", 5, "approved").await;
        testing::seed_event(&pool, "e2", "org1", "cat1", "B", "2199-02-01T09:00:00", 5, "pending").await;
        sqlx::query(
            "INSERT INTO event_participants (id, event_id, user_id) VALUES ('p1', 'e1', 'v1'), ('p2', 'e1', 'v2')",
        )
        .execute(&pool)
        .await
        .unwrap();

        let data = build_organizer_dashboard(&pool, "u1").await.unwrap().unwrap();
        assert_eq!(data.events.len(), 2);
        assert_eq!(data.pending_count, 1);
        assert_eq!(data.approved_count, 1);
        assert_eq!(data.total_volunteers, 2);
        assert!(!data.can_create_events);
    }

    #[tokio::test]
    async fn dashboard_reports_missing_organizer_row() {
        let pool = testing::test_pool().await;
        testing::seed_profile(&pool, "u1", "Olive", "organizer").await;
        assert!(build_organizer_dashboard(&pool, "u1").await.unwrap().is_none());
    }
}
