use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

/// Creates the todo table if this database has never seen it. The title column is wider than
/// the 40 characters the domain allows so existing rows survive if that limit changes.
const TODO_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS todo (
    id SERIAL PRIMARY KEY,
    title VARCHAR(100) NOT NULL,
    complete BOOLEAN NOT NULL DEFAULT FALSE
)";

/// Opens a connection pool against the database at [db_url]
pub async fn connect_sqlx(db_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(Duration::from_secs(2))
        .connect(db_url)
        .await
}

/// Makes sure the tables this service reads and writes exist
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(TODO_SCHEMA).execute(pool).await?;

    Ok(())
}
