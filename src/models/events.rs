// Event lifecycle statuses. Queries read purpose-built row structs in the
// repos; these constants are the closed status vocabulary.
pub const EVENT_PENDING: &str = "pending";
pub const EVENT_APPROVED: &str = "approved";
pub const EVENT_REJECTED: &str = "rejected";
// 'completed' exists in the data model but no in-scope path writes it.
pub const EVENT_COMPLETED: &str = "completed";
