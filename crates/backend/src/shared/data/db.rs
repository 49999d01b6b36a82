use once_cell::sync::OnceCell;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

const CREATE_LISTING_TABLE: &str = r#"
    CREATE TABLE a001_listing (
        id TEXT PRIMARY KEY NOT NULL,
        asin TEXT NOT NULL,
        jp_asin TEXT,
        us_asin TEXT,
        title TEXT NOT NULL DEFAULT '',
        jp_price REAL NOT NULL DEFAULT 0,
        us_price REAL NOT NULL DEFAULT 0,
        listing_price REAL NOT NULL DEFAULT 0,
        profit_amount REAL NOT NULL DEFAULT 0,
        profit_rate REAL NOT NULL DEFAULT 0,
        status TEXT NOT NULL DEFAULT 'draft',
        stock_status TEXT NOT NULL DEFAULT 'unknown',
        shipping_available INTEGER NOT NULL DEFAULT 1,
        last_checked TEXT,
        risk_score REAL NOT NULL DEFAULT 0,
        category TEXT,
        manufacturer TEXT,
        weight REAL,
        length REAL,
        width REAL,
        height REAL,
        international_shipping_cost REAL NOT NULL DEFAULT 0,
        domestic_shipping_cost REAL NOT NULL DEFAULT 0,
        customs_fee REAL NOT NULL DEFAULT 0,
        transfer_fee REAL NOT NULL DEFAULT 0,
        amazon_fee REAL NOT NULL DEFAULT 0,
        minimum_profit_threshold REAL NOT NULL DEFAULT 3000,
        source_url TEXT,
        notes TEXT,
        created_at TEXT,
        updated_at TEXT,
        version INTEGER NOT NULL DEFAULT 0
    );
"#;

const CREATE_BLACKLIST_TABLE: &str = r#"
    CREATE TABLE a002_blacklist_entry (
        id TEXT PRIMARY KEY NOT NULL,
        entry_type TEXT NOT NULL,
        value TEXT NOT NULL,
        reason TEXT NOT NULL DEFAULT '',
        severity TEXT NOT NULL DEFAULT 'high',
        auto_detected INTEGER NOT NULL DEFAULT 0,
        created_at TEXT
    );
"#;

const CREATE_MONITOR_SETTINGS_TABLE: &str = r#"
    CREATE TABLE sys_monitor_settings (
        key TEXT PRIMARY KEY NOT NULL,
        value_json TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
"#;

const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_a001_listing_asin ON a001_listing (asin);",
    "CREATE INDEX IF NOT EXISTS idx_a001_listing_status ON a001_listing (status);",
    "CREATE INDEX IF NOT EXISTS idx_a001_listing_category ON a001_listing (category);",
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_a002_blacklist_type_value ON a002_blacklist_entry (entry_type, value);",
];

pub async fn initialize_database(db_path: Option<&str>) -> anyhow::Result<()> {
    let db_file = db_path.unwrap_or("target/db/app.db");
    if let Some(parent) = std::path::Path::new(db_file).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if std::path::Path::new(db_file).is_absolute() {
        std::path::PathBuf::from(db_file)
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);
    tracing::info!("Connecting to database: {}", db_url);
    let conn = Database::connect(&db_url).await?;
    bootstrap_schema(&conn).await?;

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Failed to set DB_CONN"))?;
    Ok(())
}

/// Ensure required tables exist (minimal schema bootstrap)
async fn bootstrap_schema(conn: &DatabaseConnection) -> anyhow::Result<()> {
    ensure_table(conn, "a001_listing", CREATE_LISTING_TABLE).await?;
    ensure_table(conn, "a002_blacklist_entry", CREATE_BLACKLIST_TABLE).await?;
    ensure_table(conn, "sys_monitor_settings", CREATE_MONITOR_SETTINGS_TABLE).await?;

    for sql in CREATE_INDEXES {
        conn.execute(Statement::from_string(DatabaseBackend::Sqlite, sql.to_string()))
            .await?;
    }
    Ok(())
}

async fn ensure_table(conn: &DatabaseConnection, name: &str, create_sql: &str) -> anyhow::Result<()> {
    let existing = conn
        .query_all(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT name FROM sqlite_master WHERE type='table' AND name = ?;",
            vec![name.into()],
        ))
        .await?;

    if existing.is_empty() {
        tracing::info!("Creating {} table", name);
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            create_sql.to_string(),
        ))
        .await?;
    }
    Ok(())
}

pub fn get_connection() -> &'static DatabaseConnection {
    if let Some(conn) = scoped_test_connection() {
        return conn;
    }
    DB_CONN
        .get()
        .expect("Database connection has not been initialized")
}

#[cfg(not(test))]
fn scoped_test_connection() -> Option<&'static DatabaseConnection> {
    None
}

#[cfg(test)]
fn scoped_test_connection() -> Option<&'static DatabaseConnection> {
    TEST_CONN.try_with(|conn| *conn).ok()
}

#[cfg(test)]
tokio::task_local! {
    static TEST_CONN: &'static DatabaseConnection;
}

/// Выполняет `test` с отдельной базой в памяти: `get_connection()` внутри
/// задачи возвращает её, а не глобальное подключение.
#[cfg(test)]
pub async fn with_test_database<F: std::future::Future>(test: F) -> F::Output {
    let mut options = sea_orm::ConnectOptions::new("sqlite::memory:");
    // одно подключение, иначе у каждого будет своя пустая база
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let conn = Database::connect(options)
        .await
        .expect("in-memory sqlite");
    bootstrap_schema(&conn).await.expect("schema bootstrap");
    let conn: &'static DatabaseConnection = Box::leak(Box::new(conn));
    TEST_CONN.scope(conn, test).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_databases_are_isolated_per_test() {
        let count = |conn: &'static DatabaseConnection| async move {
            conn.query_all(Statement::from_string(
                DatabaseBackend::Sqlite,
                "SELECT id FROM a002_blacklist_entry".to_string(),
            ))
            .await
            .unwrap()
            .len()
        };
        with_test_database(async {
            get_connection()
                .execute(Statement::from_string(
                    DatabaseBackend::Sqlite,
                    "INSERT INTO a002_blacklist_entry (id, entry_type, value) VALUES ('1', 'brand', 'acme')"
                        .to_string(),
                ))
                .await
                .unwrap();
            assert_eq!(count(get_connection()).await, 1);
        })
        .await;
        with_test_database(async { assert_eq!(count(get_connection()).await, 0) }).await;
    }
}
