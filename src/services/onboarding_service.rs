use sqlx::SqlitePool;
use thiserror::Error;
use uuid::Uuid;

use crate::database::{organizer_repo, profile_repo};
use crate::models::Role;
use crate::services::identity_service::{IdentityClient, IdentityError, IdentitySession};

/// Signup spans the identity service and the datastore. The variant names
/// which step failed: anything past `Identity` means the identity account
/// already exists and is deliberately left in place (no compensating
/// rollback; see DESIGN.md).
#[derive(Debug, Error)]
pub enum OnboardingError {
    #[error("{0}")]
    Identity(#[from] IdentityError),
    #[error("failed to create profile")]
    Profile(#[source] sqlx::Error),
    #[error("failed to create organizer profile")]
    Organizer(#[source] sqlx::Error),
}

pub async fn register_volunteer(
    identity: &IdentityClient,
    pool: &SqlitePool,
    email: &str,
    password: &str,
    full_name: &str,
) -> Result<IdentitySession, OnboardingError> {
    let session = identity.sign_up(email, password).await?;

    profile_repo::insert_profile(pool, &session.user.id, full_name, Role::User.as_str())
        .await
        .map_err(OnboardingError::Profile)?;

    Ok(session)
}

pub struct OrganizerSignup {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub organization_name: String,
    pub description: Option<String>,
    pub contact_email: String,
}

pub async fn register_organizer(
    identity: &IdentityClient,
    pool: &SqlitePool,
    signup: &OrganizerSignup,
) -> Result<IdentitySession, OnboardingError> {
    let session = identity.sign_up(&signup.email, &signup.password).await?;

    // Re-fetch the identity record rather than trusting the signup echo,
    // the same sequence the platform this replaces used.
    let user = identity.current_user(&session.access_token).await?;

    profile_repo::insert_profile(pool, &user.id, &signup.full_name, Role::Organizer.as_str())
        .await
        .map_err(OnboardingError::Profile)?;

    create_organizer_record(
        pool,
        &user.id,
        &signup.organization_name,
        signup.description.as_deref(),
        &signup.contact_email,
    )
    .await?;

    Ok(session)
}

/// Creates the single organizer row (initial state pending). Idempotent so
/// the dashboard can offer a retry when signup died between the identity
/// step and this one.
pub async fn create_organizer_record(
    pool: &SqlitePool,
    user_id: &str,
    organization_name: &str,
    description: Option<&str>,
    contact_email: &str,
) -> Result<(), OnboardingError> {
    let existing = organizer_repo::load_by_user_id(pool, user_id)
        .await
        .map_err(OnboardingError::Organizer)?;
    if existing.is_some() {
        return Ok(());
    }

    let id = Uuid::new_v4().to_string();
    organizer_repo::insert_organizer(
        pool,
        organizer_repo::NewOrganizer {
            id: &id,
            user_id,
            organization_name,
            description,
            contact_email,
        },
    )
    .await
    .map_err(OnboardingError::Organizer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::testing;

    #[tokio::test]
    async fn organizer_record_starts_pending() {
        let pool = testing::test_pool().await;
        testing::seed_profile(&pool, "u1", "Olive", "organizer").await;

        create_organizer_record(&pool, "u1", "Helpers", Some("We help."), "org@example.org")
            .await
            .unwrap();

        let org = organizer_repo::load_by_user_id(&pool, "u1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(org.verification_status, "pending");
        assert!(org.verified_at.is_none());
        assert!(org.verified_by.is_none());
    }

    #[tokio::test]
    async fn organizer_record_creation_is_idempotent() {
        let pool = testing::test_pool().await;
        testing::seed_profile(&pool, "u1", "Olive", "organizer").await;

        create_organizer_record(&pool, "u1", "Helpers", None, "org@example.org")
            .await
            .unwrap();
        // Retry-completion path: a second call must not fail or duplicate.
        create_organizer_record(&pool, "u1", "Helpers Again", None, "other@example.org")
            .await
            .unwrap();

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM organizers WHERE user_id = 'u1'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(count, 1);

        let org = organizer_repo::load_by_user_id(&pool, "u1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(org.organization_name, "Helpers");
    }
}
