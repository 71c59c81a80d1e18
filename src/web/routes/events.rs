use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect},
    Extension,
};
use serde::Deserialize;
use tracing::warn;

use crate::services::catalog_service::{self, CatalogPageData, CatalogQuery};
use crate::services::participation_service::{self, EventDetailView, JoinOutcome};
use crate::web::middleware::auth::{resolve_session, CurrentUser};
use crate::AppState;

#[derive(Template)]
#[template(path = "events.html")]
pub struct EventsTemplate {
    pub page: CatalogPageData,
    pub signed_in: bool,
}

pub async fn events_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<CatalogQuery>,
) -> impl IntoResponse {
    let page = match catalog_service::build_catalog_page(&state.pool, &query).await {
        Ok(p) => p,
        Err(e) => {
            warn!("Catalog load failed: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let signed_in = resolve_session(&state.pool, &headers).await.is_some();
    let template = EventsTemplate { page, signed_in };
    Html(template.render().unwrap()).into_response()
}

#[derive(Template)]
#[template(path = "event_detail.html")]
pub struct EventDetailTemplate {
    pub event: EventDetailView,
}

#[derive(Debug, Deserialize, Default)]
pub struct EventDetailQuery {
    pub notice: Option<String>,
}

pub async fn event_detail_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(event_id): Path<String>,
    Query(query): Query<EventDetailQuery>,
) -> impl IntoResponse {
    // Optional session: the detail page is public but shows join state.
    let viewer = resolve_session(&state.pool, &headers).await;
    let notice = query.notice.as_deref().map(notice_message);

    let view = match participation_service::load_event_detail_view(
        &state.pool,
        &event_id,
        viewer.as_ref(),
        notice,
    )
    .await
    {
        Ok(v) => v,
        Err(e) => {
            warn!("Event detail load failed for {}: {}", event_id, e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let Some(view) = view else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let template = EventDetailTemplate { event: view };
    Html(template.render().unwrap()).into_response()
}

pub async fn join_event_handler(
    Extension(user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> impl IntoResponse {
    let notice = match participation_service::join_event(&state.pool, &event_id, &user.id).await {
        Ok(JoinOutcome::Joined) => "join_ok",
        Ok(JoinOutcome::AlreadyJoined) => "already_joined",
        Ok(JoinOutcome::EventFull) => "event_full",
        Ok(JoinOutcome::EventMissing) => {
            return StatusCode::NOT_FOUND.into_response();
        }
        Err(e) => {
            warn!("Join failed for event {}: {}", event_id, e);
            "error"
        }
    };

    Redirect::to(&format!("/events/{}?notice={}", event_id, notice)).into_response()
}

fn notice_message(code: &str) -> String {
    match code {
        "join_ok" => "You are signed up for this event.",
        "already_joined" => "You had already signed up for this event.",
        "event_full" => "This event is already full.",
        "error" => "Something went wrong. Please try again.",
        other => other,
    }
    .to_string()
}
