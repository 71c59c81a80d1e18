/// Closed role set. Role strings coming back from the datastore are parsed
/// through this enum so every dispatch point handles all three variants;
/// unknown values are treated as an unusable session, not silently mapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Organizer,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Organizer => "organizer",
            Role::Admin => "admin",
        }
    }

    pub fn parse(input: &str) -> Option<Role> {
        match input {
            "user" => Some(Role::User),
            "organizer" => Some(Role::Organizer),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProfileRow {
    pub id: String,
    pub full_name: String,
    pub role: String,
    pub profile_image: Option<String>,
    pub phone: Option<String>,
    pub created_at: String,
}

impl ProfileRow {
    pub fn role(&self) -> Option<Role> {
        Role::parse(&self.role)
    }
}
