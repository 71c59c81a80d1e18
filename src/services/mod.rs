pub mod catalog_service;
pub mod identity_service;
pub mod moderation_service;
pub mod onboarding_service;
pub mod organizer_service;
pub mod participation_service;
pub mod settings_service;
