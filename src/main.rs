use axum::{
    middleware,
    response::Redirect,
    routing::{get, get_service, post},
    Router,
};
use dotenvy::dotenv;
use http::header::{HeaderValue, CACHE_CONTROL};
use sqlx::sqlite::SqlitePoolOptions;
use std::env;
use std::net::SocketAddr;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;

use volunteerhub::services::identity_service::IdentityClient;
use volunteerhub::web::middleware::auth as auth_middleware;
use volunteerhub::web::routes::{admin, auth, dashboard, events, organizer, settings, user};
use volunteerhub::AppState;

#[tokio::main]
async fn main() {
    dotenv().ok();

    // 1. Start logging
    tracing_subscriber::fmt::init();

    // 2. Connect to the database
    let db_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in .env");
    println!("Connecting to database: {}", db_url);

    let pool = SqlitePoolOptions::new()
        .connect(&db_url)
        .await
        .expect("Cannot connect to DB");

    // 3. Identity service client
    let identity_url = env::var("IDENTITY_URL").expect("IDENTITY_URL must be set in .env");
    let identity_anon_key =
        env::var("IDENTITY_ANON_KEY").expect("IDENTITY_ANON_KEY must be set in .env");
    let state = AppState {
        pool,
        identity: IdentityClient::new(identity_url, identity_anon_key),
    };

    // 4. Protected routes under one middleware layer
    let protected_routes = Router::new()
        .route("/dashboard", get(dashboard::dashboard_handler))
        .route("/user/dashboard", get(user::user_dashboard_handler))
        .route(
            "/organizer/dashboard",
            get(organizer::organizer_dashboard_handler),
        )
        .route(
            "/organizer/register",
            post(organizer::complete_organizer_handler),
        )
        .route("/organizer/events", post(organizer::create_event_handler))
        .route("/admin/dashboard", get(admin::admin_dashboard_handler))
        .route(
            "/admin/organizers/:organizer_id/review",
            post(admin::review_organizer_handler),
        )
        .route(
            "/admin/events/:event_id/review",
            post(admin::review_event_handler),
        )
        .route("/events/:event_id/join", post(events::join_event_handler))
        .route("/settings", get(settings::settings_handler))
        .route("/settings/profile", post(settings::update_profile_handler))
        .route(
            "/settings/password",
            post(settings::change_password_handler),
        )
        .route("/logout", post(auth::logout_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::require_session,
        ));

    // 5. Build the whole application
    let app = Router::new()
        // Public routes
        .route("/", get(|| async { Redirect::to("/events") }))
        .route("/login", get(auth::login_page).post(auth::login_handler))
        .route("/register", get(auth::register_page))
        .route(
            "/register/volunteer",
            post(auth::register_volunteer_handler),
        )
        .route(
            "/register/organizer",
            post(auth::register_organizer_handler),
        )
        .route("/events", get(events::events_handler))
        .route("/events/:event_id", get(events::event_detail_handler))
        // Protected routes
        .merge(protected_routes)
        // Static files
        .nest_service(
            "/assets",
            get_service(ServeDir::new("assets")).layer(SetResponseHeaderLayer::if_not_present(
                CACHE_CONTROL,
                HeaderValue::from_static("no-store"),
            )),
        )
        // Layers
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(CatchPanicLayer::new())
        // State
        .with_state(state);

    // 6. Start the server (with fallback port)
    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .expect("Cannot parse host/port");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!(
                "⚠️  Could not bind on {}: {}. Trying fallback {}:{}",
                addr,
                e,
                host,
                port + 1
            );
            let fallback: SocketAddr = format!("{}:{}", host, port + 1)
                .parse()
                .expect("Cannot parse fallback");
            tokio::net::TcpListener::bind(fallback)
                .await
                .expect("Cannot bind on fallback port")
        }
    };

    let bound_addr = listener.local_addr().unwrap();
    println!("🚀 Server running on http://{}", bound_addr);
    println!("📍 Open http://{}/events to get started", bound_addr);

    axum::serve(listener, app).await.unwrap();
}
