// Participation ledger statuses. At most one active 'joined' row per
// (event, user) pair; the join write path enforces this, not the table.
pub const PARTICIPATION_JOINED: &str = "joined";
pub const PARTICIPATION_COMPLETED: &str = "completed";
// 'cancelled' is modeled but has no driving action in this application.
pub const PARTICIPATION_CANCELLED: &str = "cancelled";
