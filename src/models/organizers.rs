// Organizer extension of a profile. Exactly one row per organizer account;
// verification_status starts at 'pending' and only admins move it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrganizerRow {
    pub id: String,
    pub user_id: String,
    pub organization_name: String,
    pub description: Option<String>,
    pub contact_email: String,
    pub verification_status: String,
    pub verified_at: Option<String>,
    pub verified_by: Option<String>,
    pub created_at: String,
}

pub const VERIFICATION_PENDING: &str = "pending";
pub const VERIFICATION_APPROVED: &str = "approved";
pub const VERIFICATION_REJECTED: &str = "rejected";
