use sqlx::SqlitePool;

use crate::database::{category_repo, event_repo, organizer_repo, profile_repo};
use crate::services::catalog_service::format_event_labels;

/// Closed set of admin review decisions. Form input that parses to neither
/// variant is a bad request, never a passthrough string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    Approved,
    Rejected,
}

impl ReviewDecision {
    pub fn parse(input: &str) -> Option<ReviewDecision> {
        match input {
            "approved" => Some(ReviewDecision::Approved),
            "rejected" => Some(ReviewDecision::Rejected),
            _ => None,
        }
    }

    pub fn as_status(self) -> &'static str {
        match self {
            ReviewDecision::Approved => "approved",
            ReviewDecision::Rejected => "rejected",
        }
    }
}

/// One UPDATE per review: status, reviewer and timestamp together. There is
/// no re-check of the prior state, so any status can be overwritten and a
/// repeated decision only refreshes the timestamp/reviewer pair.
pub async fn review_organizer(
    pool: &SqlitePool,
    organizer_id: &str,
    decision: ReviewDecision,
    admin_id: &str,
) -> sqlx::Result<u64> {
    organizer_repo::set_verification_status(pool, organizer_id, decision.as_status(), admin_id)
        .await
}

pub async fn review_event(
    pool: &SqlitePool,
    event_id: &str,
    decision: ReviewDecision,
    admin_id: &str,
) -> sqlx::Result<u64> {
    event_repo::set_status(pool, event_id, decision.as_status(), admin_id).await
}

pub struct AdminStats {
    pub users: i64,
    pub organizers: i64,
    pub events: i64,
    pub categories: i64,
    pub pending_reviews: usize,
}

pub struct PendingOrganizerView {
    pub organizer_id: String,
    pub organization_name: String,
    pub applicant_name: String,
    pub contact_email: String,
    pub description: String,
    pub applied_label: String,
}

pub struct PendingEventView {
    pub event_id: String,
    pub title: String,
    pub organization_name: String,
    pub category_name: String,
    pub date_label: String,
    pub time_label: String,
    pub location: String,
    pub description: String,
}

pub struct AdminDashboardData {
    pub stats: AdminStats,
    pub pending_organizers: Vec<PendingOrganizerView>,
    pub pending_events: Vec<PendingEventView>,
}

/// The four table counts are independent and awaited jointly; the pending
/// lists are always re-fetched in full, which is how a review makes an item
/// disappear from the dashboard.
pub async fn build_admin_dashboard(pool: &SqlitePool) -> sqlx::Result<AdminDashboardData> {
    let (users, organizers, events, categories) = tokio::try_join!(
        profile_repo::count_profiles(pool),
        organizer_repo::count_organizers(pool),
        event_repo::count_events(pool),
        category_repo::count_categories(pool),
    )?;

    let pending_orgs = organizer_repo::list_pending(pool).await?;
    let pending_evts = event_repo::list_pending(pool).await?;

    let pending_organizers: Vec<PendingOrganizerView> = pending_orgs
        .into_iter()
        .map(|row| {
            let (applied_label, _) = format_event_labels(&row.created_at);
            PendingOrganizerView {
                organizer_id: row.id,
                organization_name: row.organization_name,
                applicant_name: row.applicant_name,
                contact_email: row.contact_email,
                description: row.description.unwrap_or_default(),
                applied_label,
            }
        })
        .collect();

    let pending_events: Vec<PendingEventView> = pending_evts
        .into_iter()
        .map(|row| {
            let (date_label, time_label) = format_event_labels(&row.event_date);
            PendingEventView {
                event_id: row.id,
                title: row.title,
                organization_name: row.organization_name,
                category_name: row.category_name,
                date_label,
                time_label,
                location: row.location,
                description: row.description,
            }
        })
        .collect();

    Ok(AdminDashboardData {
        stats: AdminStats {
            users,
            organizers,
            events,
            categories,
            pending_reviews: pending_organizers.len() + pending_events.len(),
        },
        pending_organizers,
        pending_events,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::testing;
    use crate::models::OrganizerRow;

    async fn load_organizer(pool: &SqlitePool, id: &str) -> OrganizerRow {
        sqlx::query_as::<_, OrganizerRow>("SELECT * FROM organizers WHERE id = ?")
            .bind(id)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    async fn seed_moderation_fixture(pool: &SqlitePool) {
        testing::seed_profile(pool, "admin", "Ada", "admin").await;
        testing::seed_profile(pool, "u-org", "Olive", "organizer").await;
        testing::seed_organizer(pool, "org1", "u-org", "Helpers").await;
        testing::seed_category(pool, "cat1", "Environment").await;
        testing::seed_event(
            pool,
            "e1",
            "org1",
            "cat1",
            "Beach Cleanup",
            "2199-01-01T09:00:00",
            10,
            "pending",
        )
        .await;
    }

    #[test]
    fn decision_parse_is_closed() {
        assert_eq!(ReviewDecision::parse("approved"), Some(ReviewDecision::Approved));
        assert_eq!(ReviewDecision::parse("rejected"), Some(ReviewDecision::Rejected));
        assert_eq!(ReviewDecision::parse("completed"), None);
        assert_eq!(ReviewDecision::parse(""), None);
    }

    #[tokio::test]
    async fn approving_an_organizer_sets_status_reviewer_and_timestamp() {
        let pool = testing::test_pool().await;
        seed_moderation_fixture(&pool).await;

        let affected = review_organizer(&pool, "org1", ReviewDecision::Approved, "admin")
            .await
            .unwrap();
        assert_eq!(affected, 1);

        let org = load_organizer(&pool, "org1").await;
        assert_eq!(org.verification_status, "approved");
        assert_eq!(org.verified_by.as_deref(), Some("admin"));
        assert!(org.verified_at.is_some());

        // And it leaves the pending list on the next fetch.
        let dashboard = build_admin_dashboard(&pool).await.unwrap();
        assert!(dashboard.pending_organizers.is_empty());
    }

    #[tokio::test]
    async fn repeating_a_decision_is_a_state_level_no_op() {
        let pool = testing::test_pool().await;
        seed_moderation_fixture(&pool).await;

        review_organizer(&pool, "org1", ReviewDecision::Rejected, "admin")
            .await
            .unwrap();
        let first = load_organizer(&pool, "org1").await;

        review_organizer(&pool, "org1", ReviewDecision::Rejected, "admin")
            .await
            .unwrap();
        let second = load_organizer(&pool, "org1").await;

        assert_eq!(first.verification_status, "rejected");
        assert_eq!(second.verification_status, "rejected");
        assert_eq!(second.verified_by, first.verified_by);
    }

    #[tokio::test]
    async fn any_status_can_be_overwritten() {
        let pool = testing::test_pool().await;
        seed_moderation_fixture(&pool).await;

        review_event(&pool, "e1", ReviewDecision::Approved, "admin")
            .await
            .unwrap();
        review_event(&pool, "e1", ReviewDecision::Rejected, "admin")
            .await
            .unwrap();

        let status: String = sqlx::query_scalar("SELECT status FROM events WHERE id = 'e1'")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(status, "rejected");
    }

    #[tokio::test]
    async fn dashboard_counts_and_pending_lists() {
        let pool = testing::test_pool().await;
        seed_moderation_fixture(&pool).await;

        let dashboard = build_admin_dashboard(&pool).await.unwrap();
        assert_eq!(dashboard.stats.users, 2);
        assert_eq!(dashboard.stats.organizers, 1);
        assert_eq!(dashboard.stats.events, 1);
        assert_eq!(dashboard.stats.categories, 1);
        assert_eq!(dashboard.stats.pending_reviews, 2);
        assert_eq!(dashboard.pending_organizers[0].applicant_name, "Olive");
        assert_eq!(dashboard.pending_events[0].title, "Beach Cleanup");

        review_event(&pool, "e1", ReviewDecision::Approved, "admin")
            .await
            .unwrap();
        let dashboard = build_admin_dashboard(&pool).await.unwrap();
        assert!(dashboard.pending_events.is_empty());
        assert_eq!(dashboard.stats.pending_reviews, 1);
    }
}
