use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::warn;

use crate::database::profile_repo;
use crate::models::Role;
use crate::AppState;

/// Resolved session: identity subject plus the profile's role.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: String,
    pub role: Role,
}

#[derive(Deserialize)]
struct JwtPayload {
    sub: String,
}

/// Protects a route subtree. The token signature is not verified here; the
/// identity service and the datastore are the enforcement points, this layer
/// only recovers the subject and attaches the profile role.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match resolve_session(&state.pool, request.headers()).await {
        Some(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        None => Redirect::to("/login").into_response(),
    }
}

/// Best-effort session resolution for public pages that adapt to a signed-in
/// caller without requiring one (the event detail join state).
pub async fn resolve_session(pool: &SqlitePool, headers: &HeaderMap) -> Option<CurrentUser> {
    let token = bearer_from_cookies(headers)?;
    let subject = subject_from_token(token)?;

    let profile = match profile_repo::load_profile(pool, &subject).await {
        Ok(profile) => profile?,
        Err(e) => {
            warn!("Profile lookup failed for session subject: {}", e);
            return None;
        }
    };

    let Some(role) = profile.role() else {
        warn!(
            "Profile {} carries an unknown role {:?}",
            profile.id, profile.role
        );
        return None;
    };

    Some(CurrentUser {
        id: profile.id,
        role,
    })
}

pub fn bearer_from_cookies(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::COOKIE)
        .and_then(|hv| hv.to_str().ok())
        .and_then(|cookies| {
            cookies
                .split("; ")
                .find(|c| c.starts_with("access_token="))
                .and_then(|c| c.strip_prefix("access_token="))
        })
        .filter(|t| !t.is_empty())
}

// Decode the JWT payload (middle part) without verifying the signature.
fn subject_from_token(token: &str) -> Option<String> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return None;
    }
    let payload_bytes = general_purpose::URL_SAFE_NO_PAD.decode(parts[1]).ok()?;
    let payload: JwtPayload = serde_json::from_slice(&payload_bytes).ok()?;
    Some(payload.sub)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    fn token_for(sub: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"{sub}"}}"#).as_bytes());
        format!("{header}.{payload}.sig")
    }

    fn headers_with_token(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let cookie = format!("access_token={token}");
        headers.insert(header::COOKIE, HeaderValue::from_str(&cookie).unwrap());
        headers
    }

    #[test]
    fn extracts_access_token_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; access_token=abc; refresh_token=def"),
        );
        assert_eq!(bearer_from_cookies(&headers), Some("abc"));
    }

    #[test]
    fn missing_cookie_is_none() {
        assert_eq!(bearer_from_cookies(&HeaderMap::new()), None);
    }

    #[test]
    fn subject_comes_from_payload() {
        let token = token_for("user-1");
        assert_eq!(subject_from_token(&token).as_deref(), Some("user-1"));
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        assert_eq!(subject_from_token("not-a-jwt"), None);
        assert_eq!(subject_from_token("a.b"), None);
        assert_eq!(subject_from_token("a.!!.c"), None);
    }

    #[tokio::test]
    async fn resolve_session_requires_known_role() {
        let pool = crate::database::testing::test_pool().await;
        crate::database::testing::seed_profile(&pool, "u1", "Alice", "admin").await;
        crate::database::testing::seed_profile(&pool, "u2", "Bob", "superuser").await;

        let user = resolve_session(&pool, &headers_with_token(&token_for("u1")))
            .await
            .unwrap();
        assert_eq!(user.id, "u1");
        assert_eq!(user.role, Role::Admin);

        // Unknown role string: treated as an unusable session.
        assert!(resolve_session(&pool, &headers_with_token(&token_for("u2")))
            .await
            .is_none());

        // Subject without a profile row.
        assert!(
            resolve_session(&pool, &headers_with_token(&token_for("ghost")))
                .await
                .is_none()
        );
    }
}
