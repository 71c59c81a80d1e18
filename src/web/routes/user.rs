use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Extension,
};
use tracing::warn;

use crate::models::Role;
use crate::services::participation_service::{self, UserDashboardData};
use crate::web::guard;
use crate::web::middleware::auth::CurrentUser;
use crate::AppState;

#[derive(Template)]
#[template(path = "user_dashboard.html")]
pub struct UserDashboardTemplate {
    pub dashboard: UserDashboardData,
}

pub async fn user_dashboard_handler(
    Extension(user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> Response {
    if let Err(redirect) = guard::require(&user, &[Role::User]) {
        return redirect;
    }

    let dashboard = match participation_service::build_user_dashboard(&state.pool, &user.id).await
    {
        Ok(d) => d,
        Err(e) => {
            warn!("User dashboard load failed for {}: {}", user.id, e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let template = UserDashboardTemplate { dashboard };
    Html(template.render().unwrap()).into_response()
}
