use askama::Template;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use serde::Deserialize;
use tracing::warn;

use crate::models::Role;
use crate::services::onboarding_service;
use crate::services::organizer_service::{
    self, CreateEventOutcome, EventInput, OrganizerDashboardData,
};
use crate::web::guard;
use crate::web::middleware::auth::CurrentUser;
use crate::AppState;

#[derive(Template)]
#[template(path = "organizer_dashboard.html")]
pub struct OrganizerDashboardTemplate {
    pub dashboard: OrganizerDashboardData,
    pub notice: String,
}

#[derive(Template)]
#[template(path = "organizer_onboarding.html")]
pub struct OrganizerOnboardingTemplate {
    pub error: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct OrganizerDashboardQuery {
    pub notice: Option<String>,
}

pub async fn organizer_dashboard_handler(
    Extension(user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(query): Query<OrganizerDashboardQuery>,
) -> Response {
    if let Err(redirect) = guard::require(&user, &[Role::Organizer]) {
        return redirect;
    }

    let dashboard = match organizer_service::build_organizer_dashboard(&state.pool, &user.id).await
    {
        Ok(d) => d,
        Err(e) => {
            warn!("Organizer dashboard load failed for {}: {}", user.id, e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    // No organizer row yet: signup stopped after the account step, so offer
    // the completion form instead of a dashboard.
    let Some(dashboard) = dashboard else {
        let template = OrganizerOnboardingTemplate {
            error: String::new(),
        };
        return Html(template.render().unwrap()).into_response();
    };

    let notice = query.notice.as_deref().map(notice_message).unwrap_or_default();
    let template = OrganizerDashboardTemplate { dashboard, notice };
    Html(template.render().unwrap()).into_response()
}

#[derive(Debug, Deserialize)]
pub struct CompleteOrganizerForm {
    pub organization_name: String,
    pub description: Option<String>,
    pub contact_email: String,
}

pub async fn complete_organizer_handler(
    Extension(user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Form(form): Form<CompleteOrganizerForm>,
) -> Response {
    if let Err(redirect) = guard::require(&user, &[Role::Organizer]) {
        return redirect;
    }

    let description = form.description.as_deref().map(str::trim).filter(|d| !d.is_empty());
    match onboarding_service::create_organizer_record(
        &state.pool,
        &user.id,
        form.organization_name.trim(),
        description,
        form.contact_email.trim(),
    )
    .await
    {
        Ok(()) => Redirect::to("/organizer/dashboard").into_response(),
        Err(e) => {
            warn!("Organizer completion failed for {}: {}", user.id, e);
            let template = OrganizerOnboardingTemplate {
                error: "Saving the organizer profile failed. Please try again.".to_string(),
            };
            Html(template.render().unwrap()).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateEventForm {
    pub category_id: String,
    pub title: String,
    pub description: String,
    pub event_date: String,
    pub location: String,
    pub image_url: Option<String>,
    pub volunteers_needed: i64,
}

pub async fn create_event_handler(
    Extension(user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Form(form): Form<CreateEventForm>,
) -> Response {
    if let Err(redirect) = guard::require(&user, &[Role::Organizer]) {
        return redirect;
    }

    if form.title.trim().is_empty() || form.volunteers_needed < 1 {
        return StatusCode::BAD_REQUEST.into_response();
    }

    let input = EventInput {
        category_id: form.category_id,
        title: form.title,
        description: form.description,
        event_date: form.event_date,
        location: form.location,
        image_url: form.image_url.filter(|u| !u.trim().is_empty()),
        volunteers_needed: form.volunteers_needed,
    };

    let notice = match organizer_service::create_event(&state.pool, &user.id, &input).await {
        Ok(CreateEventOutcome::Created) => "event_submitted",
        Ok(CreateEventOutcome::NotVerified) => "not_verified",
        Ok(CreateEventOutcome::MissingOrganizer) => {
            return Redirect::to("/organizer/dashboard").into_response();
        }
        Err(e) => {
            warn!("Event creation failed for {}: {}", user.id, e);
            "error"
        }
    };

    Redirect::to(&format!("/organizer/dashboard?notice={}", notice)).into_response()
}

fn notice_message(code: &str) -> String {
    match code {
        "event_submitted" => "Your event was submitted and is waiting for review.",
        "not_verified" => "Your organization must be approved before you can create events.",
        "error" => "Something went wrong. Please try again.",
        other => other,
    }
    .to_string()
}
