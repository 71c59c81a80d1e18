pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod events;
pub mod organizer;
pub mod settings;
pub mod user;
