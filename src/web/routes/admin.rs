use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use serde::Deserialize;
use tracing::warn;

use crate::models::Role;
use crate::services::moderation_service::{self, AdminDashboardData, ReviewDecision};
use crate::web::guard;
use crate::web::middleware::auth::CurrentUser;
use crate::AppState;

#[derive(Template)]
#[template(path = "admin_dashboard.html")]
pub struct AdminDashboardTemplate {
    pub dashboard: AdminDashboardData,
    pub notice: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct AdminDashboardQuery {
    pub notice: Option<String>,
}

pub async fn admin_dashboard_handler(
    Extension(user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(query): Query<AdminDashboardQuery>,
) -> Response {
    if let Err(redirect) = guard::require(&user, &[Role::Admin]) {
        return redirect;
    }

    let dashboard = match moderation_service::build_admin_dashboard(&state.pool).await {
        Ok(d) => d,
        Err(e) => {
            warn!("Admin dashboard load failed: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let notice = query.notice.as_deref().map(notice_message).unwrap_or_default();
    let template = AdminDashboardTemplate { dashboard, notice };
    Html(template.render().unwrap()).into_response()
}

#[derive(Debug, Deserialize)]
pub struct ReviewForm {
    pub decision: String,
}

pub async fn review_organizer_handler(
    Extension(user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(organizer_id): Path<String>,
    Form(form): Form<ReviewForm>,
) -> Response {
    if let Err(redirect) = guard::require(&user, &[Role::Admin]) {
        return redirect;
    }

    let Some(decision) = ReviewDecision::parse(&form.decision) else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    let notice =
        match moderation_service::review_organizer(&state.pool, &organizer_id, decision, &user.id)
            .await
        {
            Ok(_) => match decision {
                ReviewDecision::Approved => "organizer_approved",
                ReviewDecision::Rejected => "organizer_rejected",
            },
            Err(e) => {
                warn!("Organizer review failed for {}: {}", organizer_id, e);
                "error"
            }
        };

    Redirect::to(&format!("/admin/dashboard?notice={}", notice)).into_response()
}

pub async fn review_event_handler(
    Extension(user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    Form(form): Form<ReviewForm>,
) -> Response {
    if let Err(redirect) = guard::require(&user, &[Role::Admin]) {
        return redirect;
    }

    let Some(decision) = ReviewDecision::parse(&form.decision) else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    let notice = match moderation_service::review_event(&state.pool, &event_id, decision, &user.id)
        .await
    {
        Ok(_) => match decision {
            ReviewDecision::Approved => "event_approved",
            ReviewDecision::Rejected => "event_rejected",
        },
        Err(e) => {
            warn!("Event review failed for {}: {}", event_id, e);
            "error"
        }
    };

    Redirect::to(&format!("/admin/dashboard?notice={}", notice)).into_response()
}

fn notice_message(code: &str) -> String {
    match code {
        "organizer_approved" => "Organization approved.",
        "organizer_rejected" => "Organization rejected.",
        "event_approved" => "Event approved and published to the catalog.",
        "event_rejected" => "Event rejected.",
        "error" => "Something went wrong. Please try again.",
        other => other,
    }
    .to_string()
}
