use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

/// Client for the hosted identity service. The application never verifies
/// credentials itself; every auth operation is a round-trip to this backend.
#[derive(Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("identity service unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{message}")]
    Rejected { status: u16, message: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdentityUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdentitySession {
    pub access_token: String,
    pub refresh_token: String,
    pub user: IdentityUser,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    msg: Option<String>,
    error_description: Option<String>,
    message: Option<String>,
}

impl IdentityClient {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
        }
    }

    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> Result<IdentitySession, IdentityError> {
        let resp = self
            .http
            .post(format!("{}/auth/v1/signup", self.base_url))
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        Self::session_from(resp).await
    }

    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<IdentitySession, IdentityError> {
        let resp = self
            .http
            .post(format!(
                "{}/auth/v1/token?grant_type=password",
                self.base_url
            ))
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        Self::session_from(resp).await
    }

    pub async fn sign_out(&self, access_token: &str) -> Result<(), IdentityError> {
        let resp = self
            .http
            .post(format!("{}/auth/v1/logout", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;
        Self::ok_from(resp).await
    }

    pub async fn current_user(&self, access_token: &str) -> Result<IdentityUser, IdentityError> {
        let resp = self
            .http
            .get(format!("{}/auth/v1/user", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::rejection(status.as_u16(), resp.text().await.ok()));
        }
        Ok(resp.json::<IdentityUser>().await?)
    }

    pub async fn update_password(
        &self,
        access_token: &str,
        new_password: &str,
    ) -> Result<(), IdentityError> {
        let resp = self
            .http
            .put(format!("{}/auth/v1/user", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .json(&json!({ "password": new_password }))
            .send()
            .await?;
        Self::ok_from(resp).await
    }

    async fn session_from(resp: reqwest::Response) -> Result<IdentitySession, IdentityError> {
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::rejection(status.as_u16(), resp.text().await.ok()));
        }
        Ok(resp.json::<IdentitySession>().await?)
    }

    async fn ok_from(resp: reqwest::Response) -> Result<(), IdentityError> {
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::rejection(status.as_u16(), resp.text().await.ok()));
        }
        Ok(())
    }

    fn rejection(status: u16, body: Option<String>) -> IdentityError {
        IdentityError::Rejected {
            status,
            message: rejection_message(body.as_deref()),
        }
    }
}

// The backend reports errors under a handful of different keys depending on
// the endpoint; fall back to a generic message rather than leaking raw JSON.
fn rejection_message(body: Option<&str>) -> String {
    let parsed: ErrorBody = body
        .and_then(|raw| serde_json::from_str(raw).ok())
        .unwrap_or_default();
    parsed
        .msg
        .or(parsed.error_description)
        .or(parsed.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| "authentication failed".to_string())
}

#[cfg(test)]
mod tests {
    use super::rejection_message;

    #[test]
    fn rejection_message_prefers_backend_msg() {
        let body = r#"{"msg":"User already registered"}"#;
        assert_eq!(rejection_message(Some(body)), "User already registered");
    }

    #[test]
    fn rejection_message_reads_alternate_keys() {
        let body = r#"{"error_description":"Invalid login credentials"}"#;
        assert_eq!(rejection_message(Some(body)), "Invalid login credentials");
    }

    #[test]
    fn rejection_message_falls_back_on_garbage() {
        assert_eq!(rejection_message(Some("<html>")), "authentication failed");
        assert_eq!(rejection_message(None), "authentication failed");
    }
}
