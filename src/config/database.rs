use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::env;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS Conversation (
    uid              TEXT NOT NULL,
    createTime       TEXT NOT NULL,
    pubTime          TEXT NOT NULL,
    ip_address       TEXT NOT NULL,
    host_name        TEXT NOT NULL,
    company_Name     TEXT NOT NULL DEFAULT '',
    freeText_summary TEXT NOT NULL,
    item_price       TEXT NOT NULL DEFAULT '',
    quantity         TEXT NOT NULL DEFAULT '',
    question_answer  TEXT NOT NULL DEFAULT '[]'
)
"#;

pub async fn connect() -> SqlitePool {
    let url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
        .expect("Failed to connect to the database");

    ensure_schema(&pool)
        .await
        .expect("Failed to initialize the Conversation table");

    pool
}

pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(SCHEMA).execute(pool).await?;
    Ok(())
}
