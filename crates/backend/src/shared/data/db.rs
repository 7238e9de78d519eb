use once_cell::sync::OnceCell;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};
use std::path::Path;

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

/// Minimal schema bootstrap; reference tables are owned by the surrounding system
const BOOTSTRAP_SQL: [&str; 9] = [
    r#"CREATE TABLE IF NOT EXISTS a005_producer (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        producer_number TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL
    );"#,
    r#"CREATE TABLE IF NOT EXISTS a002_policy (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        policy_number TEXT NOT NULL UNIQUE,
        insured_name TEXT NOT NULL,
        producer_id INTEGER REFERENCES a005_producer(id)
    );"#,
    r#"CREATE TABLE IF NOT EXISTS a003_loss (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        policy_id INTEGER NOT NULL REFERENCES a002_policy(id),
        sequence INTEGER NOT NULL,
        description TEXT NOT NULL
    );"#,
    r#"CREATE TABLE IF NOT EXISTS a004_claimant (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        loss_id INTEGER NOT NULL REFERENCES a003_loss(id),
        sequence INTEGER NOT NULL,
        name TEXT NOT NULL
    );"#,
    r#"CREATE TABLE IF NOT EXISTS sys_user (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        full_name TEXT,
        is_active INTEGER NOT NULL DEFAULT 1
    );"#,
    r#"CREATE TABLE IF NOT EXISTS sys_group (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE
    );"#,
    r#"CREATE TABLE IF NOT EXISTS a001_document (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        file_name TEXT NOT NULL,
        storage_path TEXT NOT NULL,
        mime_type TEXT NOT NULL DEFAULT 'application/pdf',
        page_count INTEGER,
        is_processed INTEGER NOT NULL DEFAULT 0,
        processed_at TEXT,
        processed_by TEXT,
        policy_id INTEGER,
        loss_id INTEGER,
        claimant_id INTEGER,
        producer_id INTEGER,
        document_description TEXT,
        assigned_to_id INTEGER,
        assigned_to_type TEXT,
        is_deleted INTEGER NOT NULL DEFAULT 0,
        created_at TEXT,
        updated_at TEXT,
        version INTEGER NOT NULL DEFAULT 0
    );"#,
    r#"CREATE TABLE IF NOT EXISTS a001_document_history (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        document_id INTEGER NOT NULL REFERENCES a001_document(id),
        action TEXT NOT NULL,
        field TEXT,
        old_value TEXT,
        new_value TEXT,
        actor TEXT NOT NULL,
        created_at TEXT NOT NULL
    );"#,
    r#"CREATE INDEX IF NOT EXISTS idx_a001_document_history_document
        ON a001_document_history (document_id, id);"#,
];

/// SQLite URL for a file path (absolute, forward slashes, created on demand)
fn sqlite_url(db_file: &Path) -> anyhow::Result<String> {
    let absolute_path = if db_file.is_absolute() {
        db_file.to_path_buf()
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    Ok(format!("sqlite://{}{}?mode=rwc", prefix, normalized))
}

/// Create missing tables and indexes
pub async fn apply_schema<C: ConnectionTrait>(conn: &C) -> anyhow::Result<()> {
    for sql in BOOTSTRAP_SQL {
        conn.execute(Statement::from_string(DatabaseBackend::Sqlite, sql.to_string()))
            .await?;
    }
    Ok(())
}

/// Private in-memory database with the schema applied. One pooled connection,
/// since every SQLite memory connection is a database of its own.
#[cfg(test)]
pub async fn memory_database() -> anyhow::Result<DatabaseConnection> {
    let mut options = sea_orm::ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);
    let conn = Database::connect(options).await?;
    apply_schema(&conn).await?;
    Ok(conn)
}

pub async fn initialize_database(db_file: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let db_url = sqlite_url(db_file)?;
    tracing::info!("Opening database {}", db_url);
    let conn = Database::connect(&db_url).await?;
    apply_schema(&conn).await?;

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("database already initialized"))?;
    Ok(())
}

pub fn get_connection() -> &'static DatabaseConnection {
    DB_CONN
        .get()
        .expect("database connection is initialized in main before serving")
}
