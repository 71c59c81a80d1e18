use askama::Template;
use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use cookie::Cookie;
use serde::Deserialize;
use tracing::{error, warn};

use crate::database::profile_repo;
use crate::models::Role;
use crate::services::identity_service::IdentitySession;
use crate::services::onboarding_service::{self, OnboardingError, OrganizerSignup};
use crate::web::middleware::auth::bearer_from_cookies;
use crate::AppState;

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: String,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub error: String,
}

#[derive(Deserialize)]
pub struct LoginForm {
    email: String,
    password: String,
}

pub async fn login_page() -> Html<String> {
    let template = LoginTemplate {
        error: String::new(),
    };
    Html(template.render().unwrap())
}

pub async fn login_handler(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Response {
    let session = match state.identity.sign_in(&form.email, &form.password).await {
        Ok(session) => session,
        Err(e) => {
            warn!("Sign-in rejected for {}: {}", form.email, e);
            let template = LoginTemplate {
                error: e.to_string(),
            };
            return Html(template.render().unwrap()).into_response();
        }
    };

    // Role dispatch happens here, once, against the closed role set.
    let target = match profile_repo::load_profile(&state.pool, &session.user.id).await {
        Ok(Some(profile)) => match profile.role() {
            Some(Role::Admin) => "/admin/dashboard",
            Some(Role::Organizer) => "/organizer/dashboard",
            Some(Role::User) | None => "/events",
        },
        Ok(None) => "/events",
        Err(e) => {
            error!("Profile load failed after sign-in: {}", e);
            "/events"
        }
    };

    with_session_cookies(Redirect::to(target).into_response(), &session)
}

pub async fn register_page() -> Html<String> {
    let template = RegisterTemplate {
        error: String::new(),
    };
    Html(template.render().unwrap())
}

#[derive(Deserialize)]
pub struct VolunteerRegisterForm {
    full_name: String,
    email: String,
    password: String,
}

pub async fn register_volunteer_handler(
    State(state): State<AppState>,
    Form(form): Form<VolunteerRegisterForm>,
) -> Response {
    match onboarding_service::register_volunteer(
        &state.identity,
        &state.pool,
        &form.email,
        &form.password,
        &form.full_name,
    )
    .await
    {
        Ok(session) => {
            with_session_cookies(Redirect::to("/user/dashboard").into_response(), &session)
        }
        Err(e) => {
            warn!("Volunteer signup failed: {}", e);
            let template = RegisterTemplate {
                error: signup_error_message(&e),
            };
            Html(template.render().unwrap()).into_response()
        }
    }
}

#[derive(Deserialize)]
pub struct OrganizerRegisterForm {
    full_name: String,
    email: String,
    password: String,
    organization_name: String,
    description: Option<String>,
    contact_email: String,
}

pub async fn register_organizer_handler(
    State(state): State<AppState>,
    Form(form): Form<OrganizerRegisterForm>,
) -> Response {
    let signup = OrganizerSignup {
        email: form.email,
        password: form.password,
        full_name: form.full_name,
        organization_name: form.organization_name,
        description: form.description.filter(|d| !d.trim().is_empty()),
        contact_email: form.contact_email,
    };

    match onboarding_service::register_organizer(&state.identity, &state.pool, &signup).await {
        Ok(session) => with_session_cookies(
            Redirect::to("/organizer/dashboard").into_response(),
            &session,
        ),
        Err(e) => {
            warn!("Organizer signup failed: {}", e);
            let template = RegisterTemplate {
                error: signup_error_message(&e),
            };
            Html(template.render().unwrap()).into_response()
        }
    }
}

// The message only covers the step that failed; earlier steps are already
// committed and stay that way (no rollback of the identity account).
fn signup_error_message(e: &OnboardingError) -> String {
    match e {
        OnboardingError::Identity(inner) => inner.to_string(),
        OnboardingError::Profile(_) => {
            "Your account was created, but setting up the profile failed. Please sign in and try again.".to_string()
        }
        OnboardingError::Organizer(_) => {
            "Your account was created, but the organizer profile could not be saved. Sign in and complete it from your dashboard.".to_string()
        }
    }
}

pub async fn logout_handler(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
) -> Response {
    // Best effort; the cookies are cleared regardless.
    if let Some(token) = bearer_from_cookies(&headers) {
        if let Err(e) = state.identity.sign_out(token).await {
            warn!("Identity sign-out failed: {}", e);
        }
    }

    let mut response = Redirect::to("/login").into_response();
    for name in ["access_token", "refresh_token"] {
        let mut cleared = Cookie::new(name, "");
        cleared.set_path("/");
        cleared.set_http_only(true);
        cleared.set_same_site(cookie::SameSite::Lax);
        cleared.set_max_age(None);
        response
            .headers_mut()
            .append(header::SET_COOKIE, cleared.to_string().parse().unwrap());
    }
    response
}

fn with_session_cookies(mut response: Response, session: &IdentitySession) -> Response {
    let mut access_cookie = Cookie::new("access_token", session.access_token.clone());
    access_cookie.set_path("/");
    access_cookie.set_http_only(true);
    access_cookie.set_same_site(cookie::SameSite::Lax);

    let mut refresh_cookie = Cookie::new("refresh_token", session.refresh_token.clone());
    refresh_cookie.set_path("/");
    refresh_cookie.set_http_only(true);
    refresh_cookie.set_same_site(cookie::SameSite::Lax);

    response.headers_mut().append(
        header::SET_COOKIE,
        access_cookie.to_string().parse().unwrap(),
    );
    response.headers_mut().append(
        header::SET_COOKIE,
        refresh_cookie.to_string().parse().unwrap(),
    );
    response
}
