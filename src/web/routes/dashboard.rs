use axum::{
    response::{IntoResponse, Redirect},
    Extension,
};

use crate::models::Role;
use crate::web::middleware::auth::CurrentUser;

/// One dispatch point per role; every other dashboard route enforces its own
/// role and bounces mismatches back through here.
pub async fn dashboard_handler(Extension(user): Extension<CurrentUser>) -> impl IntoResponse {
    let target = match user.role {
        Role::Admin => "/admin/dashboard",
        Role::Organizer => "/organizer/dashboard",
        Role::User => "/user/dashboard",
    };
    Redirect::to(target)
}
