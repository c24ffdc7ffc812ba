//! Database Connection Management
//!
//! Owns the libsql database that backs both the `notes` collection and the
//! durable `kv_store` used for tab/session keys.
//!
//! # Architecture
//!
//! - **One collection**: `notes` with an auto-increment integer key
//! - **Two secondary indexes**: `title` (substring search) and `updated_at`
//!   (recency ordering), both non-unique
//! - **Durable key/value table**: `kv_store`, visible to every tab
//! - **Lazy, single-flight open**: [`DatabaseHandle`] opens the database the
//!   first time any store asks for it; concurrent first callers wait on the
//!   same initialization and every later caller reuses the live handle
//!
//! # Database Connection Patterns
//!
//! Use `connect_with_timeout()` in async functions. The busy timeout lets
//! concurrent writers from several tabs wait on each other instead of failing
//! immediately with `SQLITE_BUSY`.

use crate::db::error::StorageError;
use libsql::{Builder, Database};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Busy timeout applied to every async connection
const BUSY_TIMEOUT_PRAGMA: &str = "PRAGMA busy_timeout = 5000";

/// Database service for managing the libsql connection and schema
///
/// # Examples
///
/// ```no_run
/// use swiftnote_core::db::DatabaseService;
/// use std::path::PathBuf;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let db_service = DatabaseService::new(PathBuf::from("./data/notes.db")).await?;
///     let _conn = db_service.connect_with_timeout().await?;
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct DatabaseService {
    /// libsql database (wrapped in Arc for sharing)
    pub db: Arc<Database>,

    /// Path to the database file
    pub db_path: PathBuf,
}

impl DatabaseService {
    /// Open (or create) the database at `db_path` and ensure the schema exists
    ///
    /// Schema creation uses `IF NOT EXISTS` everywhere, so opening an existing
    /// database is a no-op beyond the connection itself.
    ///
    /// # Errors
    ///
    /// - `StorageError::PermissionDenied` / `DirectoryCreationFailed` if the
    ///   parent directory cannot be created
    /// - `StorageError::Unavailable` if libsql cannot open the file
    /// - `StorageError::InitializationFailed` if schema creation fails
    pub async fn new(db_path: PathBuf) -> Result<Self, StorageError> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    if e.kind() == std::io::ErrorKind::PermissionDenied {
                        StorageError::permission_denied(db_path.clone())
                    } else {
                        StorageError::DirectoryCreationFailed(e)
                    }
                })?;
            }
        }

        let db = Builder::new_local(&db_path)
            .build()
            .await
            .map_err(|e| StorageError::unavailable(db_path.clone(), e.to_string()))?;

        let service = Self {
            db: Arc::new(db),
            db_path,
        };

        service.initialize_schema().await?;

        tracing::info!("Database ready at {}", service.db_path.display());
        Ok(service)
    }

    /// Execute a PRAGMA statement
    ///
    /// PRAGMA statements return rows, so they go through `query()`.
    async fn execute_pragma(
        &self,
        conn: &libsql::Connection,
        pragma: &str,
    ) -> Result<(), StorageError> {
        let mut stmt = conn.prepare(pragma).await.map_err(|e| {
            StorageError::initialization_failed(format!("Failed to execute '{}': {}", pragma, e))
        })?;
        let _ = stmt.query(()).await.map_err(|e| {
            StorageError::initialization_failed(format!("Failed to execute '{}': {}", pragma, e))
        })?;
        Ok(())
    }

    /// Create tables and indexes (idempotent)
    async fn initialize_schema(&self) -> Result<(), StorageError> {
        let conn = self.connect_with_timeout().await?;

        self.execute_pragma(&conn, "PRAGMA journal_mode = WAL")
            .await?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS notes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                tags TEXT
            )",
            (),
        )
        .await
        .map_err(|e| {
            StorageError::initialization_failed(format!("Failed to create notes table: {}", e))
        })?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            (),
        )
        .await
        .map_err(|e| {
            StorageError::initialization_failed(format!("Failed to create kv_store table: {}", e))
        })?;

        self.create_indexes(&conn).await?;

        tracing::debug!("Storage schema initialized (notes, kv_store)");
        Ok(())
    }

    /// Secondary indexes on the notes collection
    async fn create_indexes(&self, conn: &libsql::Connection) -> Result<(), StorageError> {
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_notes_title ON notes(title)",
            (),
        )
        .await
        .map_err(|e| {
            StorageError::initialization_failed(format!(
                "Failed to create index 'idx_notes_title': {}",
                e
            ))
        })?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_notes_updated_at ON notes(updated_at)",
            (),
        )
        .await
        .map_err(|e| {
            StorageError::initialization_failed(format!(
                "Failed to create index 'idx_notes_updated_at': {}",
                e
            ))
        })?;

        Ok(())
    }

    /// Get a raw connection
    ///
    /// Only for synchronous contexts; async code uses `connect_with_timeout()`.
    pub fn connect(&self) -> Result<libsql::Connection, StorageError> {
        self.db
            .connect()
            .map_err(|e| StorageError::unavailable(self.db_path.clone(), e.to_string()))
    }

    /// Get an async connection with busy timeout configured
    pub async fn connect_with_timeout(&self) -> Result<libsql::Connection, StorageError> {
        let conn = self.connect()?;
        self.execute_pragma(&conn, BUSY_TIMEOUT_PRAGMA).await?;
        Ok(conn)
    }
}

/// Lazily opened, shareable database handle
///
/// Pass one handle (behind an `Arc`) to every store that needs the database.
/// The first `get()` opens the file and creates the schema; callers racing on
/// that first `get()` all await the same initialization.
#[derive(Debug)]
pub struct DatabaseHandle {
    path: PathBuf,
    cell: OnceCell<Arc<DatabaseService>>,
}

impl DatabaseHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cell: OnceCell::new(),
        }
    }

    /// Path the handle opens
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the database has been opened yet
    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }

    /// Open the database on first use, then hand out the same service
    ///
    /// A failed open leaves the handle uninitialized so a later call retries.
    pub async fn get(&self) -> Result<Arc<DatabaseService>, StorageError> {
        let service = self
            .cell
            .get_or_try_init(|| async {
                tracing::debug!("Opening database at {}", self.path.display());
                DatabaseService::new(self.path.clone()).await.map(Arc::new)
            })
            .await?;
        Ok(Arc::clone(service))
    }
}
