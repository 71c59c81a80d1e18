use askama::Template;
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use serde::Deserialize;
use tracing::warn;

use crate::services::settings_service::{self, PasswordChangeError};
use crate::web::middleware::auth::{bearer_from_cookies, CurrentUser};
use crate::AppState;

#[derive(Template)]
#[template(path = "settings.html")]
pub struct SettingsTemplate {
    pub full_name: String,
    pub phone: String,
    pub profile_image: String,
    pub notice: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct SettingsQuery {
    pub notice: Option<String>,
}

pub async fn settings_handler(
    Extension(user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(query): Query<SettingsQuery>,
) -> Response {
    let profile = match settings_service::load_settings(&state.pool, &user.id).await {
        Ok(Some(p)) => p,
        Ok(None) => {
            warn!("Settings requested without a profile row: {}", user.id);
            return Redirect::to("/dashboard").into_response();
        }
        Err(e) => {
            warn!("Settings load failed for {}: {}", user.id, e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let notice = query.notice.as_deref().map(notice_message).unwrap_or_default();
    let template = SettingsTemplate {
        full_name: profile.full_name,
        phone: profile.phone.unwrap_or_default(),
        profile_image: profile.profile_image.unwrap_or_default(),
        notice,
    };
    Html(template.render().unwrap()).into_response()
}

#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    pub full_name: String,
    pub phone: Option<String>,
    pub profile_image: Option<String>,
}

pub async fn update_profile_handler(
    Extension(user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Form(form): Form<ProfileForm>,
) -> Response {
    if form.full_name.trim().is_empty() {
        return Redirect::to("/settings?notice=name_required").into_response();
    }

    let notice = match settings_service::update_profile(
        &state.pool,
        &user.id,
        &form.full_name,
        form.phone.as_deref().unwrap_or(""),
        form.profile_image.as_deref().unwrap_or(""),
    )
    .await
    {
        Ok(_) => "profile_saved",
        Err(e) => {
            warn!("Profile update failed for {}: {}", user.id, e);
            "error"
        }
    };

    Redirect::to(&format!("/settings?notice={}", notice)).into_response()
}

#[derive(Debug, Deserialize)]
pub struct PasswordForm {
    pub new_password: String,
    pub confirm_password: String,
}

pub async fn change_password_handler(
    Extension(user): Extension<CurrentUser>,
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<PasswordForm>,
) -> Response {
    if let Err(e) = settings_service::validate_password_change(
        &form.new_password,
        &form.confirm_password,
    ) {
        let notice = match e {
            PasswordChangeError::Mismatch => "password_mismatch",
            PasswordChangeError::TooShort => "password_too_short",
        };
        return Redirect::to(&format!("/settings?notice={}", notice)).into_response();
    }

    // The identity service authenticates the change with the caller's own
    // access token, not a service credential.
    let Some(token) = bearer_from_cookies(&headers) else {
        return Redirect::to("/login").into_response();
    };

    let notice =
        match settings_service::change_password(&state.identity, token, &form.new_password).await {
            Ok(()) => "password_changed",
            Err(e) => {
                warn!("Password change failed for {}: {}", user.id, e);
                "error"
            }
        };

    Redirect::to(&format!("/settings?notice={}", notice)).into_response()
}

fn notice_message(code: &str) -> String {
    match code {
        "profile_saved" => "Profile saved.",
        "password_changed" => "Password changed.",
        "password_mismatch" => "The passwords do not match.",
        "password_too_short" => "Passwords must be at least 6 characters.",
        "name_required" => "Your name cannot be empty.",
        "error" => "Something went wrong. Please try again.",
        other => other,
    }
    .to_string()
}
