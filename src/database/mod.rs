pub mod category_repo;
pub mod event_repo;
pub mod organizer_repo;
pub mod participant_repo;
pub mod profile_repo;

#[cfg(test)]
pub(crate) mod testing {
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::SqlitePool;

    // Single connection so the in-memory database is shared across queries.
    pub async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool");
        sqlx::raw_sql(include_str!("../../schema.sql"))
            .execute(&pool)
            .await
            .expect("apply schema");
        pool
    }

    pub async fn seed_profile(pool: &SqlitePool, id: &str, full_name: &str, role: &str) {
        sqlx::query("INSERT INTO profiles (id, full_name, role) VALUES (?, ?, ?)")
            .bind(id)
            .bind(full_name)
            .bind(role)
            .execute(pool)
            .await
            .expect("seed profile");
    }

    pub async fn seed_organizer(pool: &SqlitePool, id: &str, user_id: &str, name: &str) {
        sqlx::query(
            "INSERT INTO organizers (id, user_id, organization_name, contact_email) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(id)
        .bind(user_id)
        .bind(name)
        .bind(format!("{name}@example.org"))
        .execute(pool)
        .await
        .expect("seed organizer");
    }

    pub async fn seed_category(pool: &SqlitePool, id: &str, name: &str) {
        sqlx::query("INSERT INTO categories (id, name) VALUES (?, ?)")
            .bind(id)
            .bind(name)
            .execute(pool)
            .await
            .expect("seed category");
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn seed_event(
        pool: &SqlitePool,
        id: &str,
        organizer_id: &str,
        category_id: &str,
        title: &str,
        event_date: &str,
        volunteers_needed: i64,
        status: &str,
    ) {
        sqlx::query(
            "INSERT INTO events (id, organizer_id, category_id, title, description, \
             event_date, location, volunteers_needed, status) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(organizer_id)
        .bind(category_id)
        .bind(title)
        .bind(format!("{title} description"))
        .bind(event_date)
        .bind("Community Center")
        .bind(volunteers_needed)
        .bind(status)
        .execute(pool)
        .await
        .expect("seed event");
    }
}
