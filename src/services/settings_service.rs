use sqlx::SqlitePool;

use crate::database::profile_repo;
use crate::models::ProfileRow;
use crate::services::identity_service::{IdentityClient, IdentityError};

pub async fn load_settings(pool: &SqlitePool, user_id: &str) -> sqlx::Result<Option<ProfileRow>> {
    profile_repo::load_profile(pool, user_id).await
}

/// Owner-only profile mutation: name, phone and avatar reference. Empty
/// optional fields are stored as NULL rather than empty strings.
pub async fn update_profile(
    pool: &SqlitePool,
    user_id: &str,
    full_name: &str,
    phone: &str,
    profile_image: &str,
) -> sqlx::Result<u64> {
    profile_repo::update_profile(
        pool,
        user_id,
        full_name.trim(),
        non_empty(phone),
        non_empty(profile_image),
    )
    .await
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordChangeError {
    Mismatch,
    TooShort,
}

/// The same local checks the signup form applies; everything else is the
/// identity service's call.
pub fn validate_password_change(
    new_password: &str,
    confirm_password: &str,
) -> Result<(), PasswordChangeError> {
    if new_password != confirm_password {
        return Err(PasswordChangeError::Mismatch);
    }
    if new_password.len() < 6 {
        return Err(PasswordChangeError::TooShort);
    }
    Ok(())
}

pub async fn change_password(
    identity: &IdentityClient,
    access_token: &str,
    new_password: &str,
) -> Result<(), IdentityError> {
    identity.update_password(access_token, new_password).await
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::testing;

    #[test]
    fn password_change_requires_matching_pair() {
        assert_eq!(
            validate_password_change("secret1", "secret2"),
            Err(PasswordChangeError::Mismatch)
        );
        assert_eq!(
            validate_password_change("abc", "abc"),
            Err(PasswordChangeError::TooShort)
        );
        assert_eq!(validate_password_change("secret1", "secret1"), Ok(()));
    }

    #[tokio::test]
    async fn profile_update_normalizes_empty_fields() {
        let pool = testing::test_pool().await;
        testing::seed_profile(&pool, "u1", "Old Name", "user").await;

        update_profile(&pool, "u1", " New Name ", "", "   ")
            .await
            .unwrap();

        let profile = load_settings(&pool, "u1").await.unwrap().unwrap();
        assert_eq!(profile.full_name, "New Name");
        assert!(profile.phone.is_none());
        assert!(profile.profile_image.is_none());
    }
}
