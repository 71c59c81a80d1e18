use sqlx::SqlitePool;

pub mod database;
pub mod models;
pub mod services;
pub mod web;

use services::identity_service::IdentityClient;

/// Everything a handler needs, built once at startup and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub identity: IdentityClient,
}
