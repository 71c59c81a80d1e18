pub mod categories;
pub mod event_participants;
pub mod events;
pub mod organizers;
pub mod profiles;

pub use categories::CategoryRow;
pub use organizers::OrganizerRow;
pub use profiles::{ProfileRow, Role};
