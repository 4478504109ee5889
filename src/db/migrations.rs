//! Database schema setup and connection pool initialization.

use sqlx::sqlite::{SqliteConnection, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use tracing::info;

/// Tables the scoring store relies on.
pub const TABLES: [&str; 4] = ["fights", "rounds", "actions", "video_replays"];

/// Open (creating if needed) the SQLite database at `db_path` and apply the
/// schema.
///
/// `:memory:` gives a private in-memory database on a single connection.
pub async fn init_db(db_path: &str) -> Result<SqlitePool, sqlx::Error> {
    let in_memory = db_path == ":memory:";
    if !in_memory {
        if let Some(parent) = Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).ok();
            }
        }
    }

    let url = if in_memory {
        "sqlite::memory:".to_string()
    } else {
        format!("sqlite:{}?mode=rwc", db_path)
    };
    let mut options = SqlitePoolOptions::new().max_connections(if in_memory { 1 } else { 5 });
    if in_memory {
        // Dropping the only connection would drop the database with it.
        options = options.idle_timeout(None).max_lifetime(None);
    }
    let pool = options
        .after_connect(move |conn, _meta| {
            Box::pin(async move { configure_connection(conn, in_memory).await })
        })
        .connect(&url)
        .await?;

    apply_schema(&pool).await?;

    info!(db_path, "Scoring store ready");
    Ok(pool)
}

/// Apply `schema.sql`; every statement is idempotent.
async fn apply_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let schema_sql = include_str!("schema.sql");
    let mut applied = 0usize;

    for statement in schema_sql.split(';') {
        let trimmed = statement.trim();
        if !trimmed.is_empty() {
            sqlx::query(trimmed).execute(pool).await?;
            applied += 1;
        }
    }

    info!(statements = applied, "Schema applied");
    Ok(())
}

async fn configure_connection(conn: &mut SqliteConnection, in_memory: bool) -> Result<(), sqlx::Error> {
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&mut *conn)
        .await?;

    if !in_memory {
        // WAL is best-effort; SQLite reports the mode it actually picked.
        let (journal_mode,): (String,) = sqlx::query_as("PRAGMA journal_mode = WAL")
            .fetch_one(&mut *conn)
            .await?;
        info!(journal_mode = %journal_mode, "SQLite journal mode");
    }

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&mut *conn)
        .await?;
    Ok(())
}
