use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::{event_repo, participant_repo};
use crate::services::catalog_service::format_event_labels;
use crate::web::middleware::auth::CurrentUser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    Joined,
    AlreadyJoined,
    EventFull,
    EventMissing,
}

/// Join precondition is a plain count read immediately before the insert.
/// The two statements are independent round-trips with no transaction, so
/// concurrent joiners can both pass the capacity check before either insert
/// lands and push the count past volunteers_needed. That matches the system
/// this mirrors and is kept as-is; see DESIGN.md.
pub async fn join_event(
    pool: &SqlitePool,
    event_id: &str,
    user_id: &str,
) -> sqlx::Result<JoinOutcome> {
    let Some(event) = event_repo::load_detail(pool, event_id).await? else {
        return Ok(JoinOutcome::EventMissing);
    };

    let joined = participant_repo::count_joined(pool, event_id).await?;
    if joined >= event.volunteers_needed {
        return Ok(JoinOutcome::EventFull);
    }

    // Write-path uniqueness: the table itself does not constrain the pair.
    if participant_repo::has_joined(pool, event_id, user_id).await? {
        return Ok(JoinOutcome::AlreadyJoined);
    }

    let id = Uuid::new_v4().to_string();
    participant_repo::insert_joined(pool, &id, event_id, user_id).await?;
    Ok(JoinOutcome::Joined)
}

pub struct EventDetailView {
    pub event_id: String,
    pub title: String,
    pub description: String,
    pub date_label: String,
    pub time_label: String,
    pub location: String,
    pub image_url: Option<String>,
    pub category_name: String,
    pub organization_name: String,
    pub organizer_description: String,
    pub organizer_contact_email: String,
    pub volunteers_needed: i64,
    pub joined_count: i64,
    pub is_full: bool,
    pub viewer_has_joined: bool,
    pub viewer_signed_in: bool,
    pub notice: Option<String>,
}

/// Detail page data: the event joined with category/organizer, the
/// authoritative joined count (fresh read, never a cached increment) and the
/// viewer's own join state when a session is present.
pub async fn load_event_detail_view(
    pool: &SqlitePool,
    event_id: &str,
    viewer: Option<&CurrentUser>,
    notice: Option<String>,
) -> sqlx::Result<Option<EventDetailView>> {
    let Some(row) = event_repo::load_detail(pool, event_id).await? else {
        return Ok(None);
    };

    let joined_count = participant_repo::count_joined(pool, event_id).await?;
    let viewer_has_joined = match viewer {
        Some(user) => participant_repo::has_joined(pool, event_id, &user.id).await?,
        None => false,
    };

    let (date_label, time_label) = format_event_labels(&row.event_date);
    Ok(Some(EventDetailView {
        event_id: row.id,
        title: row.title,
        description: row.description,
        date_label,
        time_label,
        location: row.location,
        image_url: row.image_url,
        category_name: row.category_name,
        organization_name: row.organization_name,
        organizer_description: row.organizer_description.unwrap_or_default(),
        organizer_contact_email: row.organizer_contact_email,
        is_full: joined_count >= row.volunteers_needed,
        volunteers_needed: row.volunteers_needed,
        joined_count,
        viewer_has_joined,
        viewer_signed_in: viewer.is_some(),
        notice,
    }))
}

#[derive(Clone)]
pub struct UserEventView {
    pub event_id: String,
    pub title: String,
    pub date_label: String,
    pub time_label: String,
    pub location: String,
    pub category_name: String,
}

pub struct UserDashboardData {
    pub upcoming: Vec<UserEventView>,
    pub past: Vec<UserEventView>,
    pub upcoming_count: usize,
    pub completed_count: usize,
    pub hours_volunteered: usize,
}

pub async fn build_user_dashboard(
    pool: &SqlitePool,
    user_id: &str,
) -> sqlx::Result<UserDashboardData> {
    let upcoming = participant_repo::list_upcoming_for_user(pool, user_id).await?;
    let past = participant_repo::list_past_for_user(pool, user_id).await?;

    let upcoming: Vec<UserEventView> = upcoming.into_iter().map(user_event_view).collect();
    let past: Vec<UserEventView> = past.into_iter().map(user_event_view).collect();

    Ok(UserDashboardData {
        upcoming_count: upcoming.len(),
        completed_count: past.len(),
        // Flat estimate carried over from the platform this replaces.
        hours_volunteered: past.len() * 3,
        upcoming,
        past,
    })
}

fn user_event_view(row: participant_repo::UserEventRow) -> UserEventView {
    let (date_label, time_label) = format_event_labels(&row.event_date);
    UserEventView {
        event_id: row.event_id,
        title: row.title,
        date_label,
        time_label,
        location: row.location,
        category_name: row.category_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::testing;

    async fn seed_event_with_capacity(pool: &SqlitePool, event_id: &str, needed: i64) {
        testing::seed_profile(pool, "u-org", "Olive", "organizer").await;
        testing::seed_organizer(pool, "org1", "u-org", "Helpers").await;
        testing::seed_category(pool, "cat1", "Environment").await;
        testing::seed_event(
            pool,
            event_id,
            "org1",
            "cat1",
            "Beach Cleanup",
            "2199-01-01T09:00:00",
            needed,
            "approved",
        )
        .await;
    }

    #[tokio::test]
    async fn join_inserts_and_is_visible_in_count_and_membership() {
        let pool = testing::test_pool().await;
        seed_event_with_capacity(&pool, "e1", 3).await;
        testing::seed_profile(&pool, "vol", "Vera", "user").await;

        let before = participant_repo::count_joined(&pool, "e1").await.unwrap();
        let outcome = join_event(&pool, "e1", "vol").await.unwrap();
        assert_eq!(outcome, JoinOutcome::Joined);

        assert!(participant_repo::has_joined(&pool, "e1", "vol").await.unwrap());
        let after = participant_repo::count_joined(&pool, "e1").await.unwrap();
        assert_eq!(after, before + 1);
    }

    #[tokio::test]
    async fn join_rejects_when_capacity_reached() {
        let pool = testing::test_pool().await;
        seed_event_with_capacity(&pool, "e1", 1).await;

        assert_eq!(join_event(&pool, "e1", "a").await.unwrap(), JoinOutcome::Joined);
        assert_eq!(join_event(&pool, "e1", "b").await.unwrap(), JoinOutcome::EventFull);
        assert_eq!(participant_repo::count_joined(&pool, "e1").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn join_rejects_duplicates_via_write_path() {
        let pool = testing::test_pool().await;
        seed_event_with_capacity(&pool, "e1", 5).await;

        assert_eq!(join_event(&pool, "e1", "a").await.unwrap(), JoinOutcome::Joined);
        assert_eq!(
            join_event(&pool, "e1", "a").await.unwrap(),
            JoinOutcome::AlreadyJoined
        );
    }

    #[tokio::test]
    async fn join_reports_missing_event() {
        let pool = testing::test_pool().await;
        assert_eq!(
            join_event(&pool, "nope", "a").await.unwrap(),
            JoinOutcome::EventMissing
        );
    }

    // Documents the capacity race rather than hiding it: with the check and
    // the insert issued as separate statements, two callers that both read
    // the count before either insert can overshoot volunteers_needed.
    #[tokio::test]
    async fn interleaved_capacity_checks_can_overshoot() {
        let pool = testing::test_pool().await;
        seed_event_with_capacity(&pool, "e1", 1).await;

        let count_a = participant_repo::count_joined(&pool, "e1").await.unwrap();
        let count_b = participant_repo::count_joined(&pool, "e1").await.unwrap();
        assert!(count_a < 1 && count_b < 1);

        participant_repo::insert_joined(&pool, "p-a", "e1", "a").await.unwrap();
        participant_repo::insert_joined(&pool, "p-b", "e1", "b").await.unwrap();

        let joined = participant_repo::count_joined(&pool, "e1").await.unwrap();
        assert_eq!(joined, 2); // exceeds volunteers_needed = 1
    }

    #[tokio::test]
    async fn detail_view_reads_authoritative_count() {
        let pool = testing::test_pool().await;
        seed_event_with_capacity(&pool, "e1", 2).await;
        join_event(&pool, "e1", "a").await.unwrap();

        let view = load_event_detail_view(&pool, "e1", None, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(view.joined_count, 1);
        assert!(!view.is_full);
        assert!(!view.viewer_has_joined);
        assert!(!view.viewer_signed_in);
    }

    #[tokio::test]
    async fn user_dashboard_splits_upcoming_and_past() {
        let pool = testing::test_pool().await;
        testing::seed_profile(&pool, "u-org", "Olive", "organizer").await;
        testing::seed_organizer(&pool, "org1", "u-org", "Helpers").await;
        testing::seed_category(&pool, "cat1", "Environment").await;
        testing::seed_event(&pool, "e-f", "org1", "cat1", "Future", "2199-01-01T09:00:00", 5, "approved").await;
        testing::seed_event(&pool, "e-p", "org1", "cat1", "Past", "2001-01-01T09:00:00", 5, "approved").await;

        participant_repo::insert_joined(&pool, "p1", "e-f", "vol").await.unwrap();
        participant_repo::insert_joined(&pool, "p2", "e-p", "vol").await.unwrap();

        let data = build_user_dashboard(&pool, "vol").await.unwrap();
        assert_eq!(data.upcoming_count, 1);
        assert_eq!(data.completed_count, 1);
        assert_eq!(data.hours_volunteered, 3);
        assert_eq!(data.upcoming[0].event_id, "e-f");
        assert_eq!(data.past[0].event_id, "e-p");
    }
}
