/*!
 * SQLite handle shared by the frame repository.
 *
 * A single connection sits behind a mutex and every query runs on tokio's
 * blocking pool, so repository methods stay async.
 */

use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use rusqlite::{Connection, Transaction};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use super::schema;

const APP_DIR: &str = "storyframe";
const DB_FILE: &str = "storyframe.db";
const MEMORY_LOCATION: &str = ":memory:";

/// Cloneable handle to the frame database
#[derive(Clone)]
pub struct DatabaseConnection {
    location: PathBuf,
    shared: Arc<Mutex<Connection>>,
}

impl DatabaseConnection {
    /// Open the database under the user's data directory
    pub fn new_default() -> Result<Self> {
        Self::new(Self::default_database_path()?)
    }

    /// Open (or create) the database file at `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create database directory: {:?}", dir))?,
            _ => {}
        }

        info!("Opening frame database at {:?}", path);
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {:?}", path))?;

        Self::prepare(conn, path.to_path_buf())
    }

    /// Throwaway database, used by tests
    pub fn new_in_memory() -> Result<Self> {
        debug!("Opening in-memory frame database");
        let conn = Connection::open_in_memory().context("Failed to create in-memory database")?;

        Self::prepare(conn, PathBuf::from(MEMORY_LOCATION))
    }

    fn prepare(conn: Connection, location: PathBuf) -> Result<Self> {
        schema::initialize_schema(&conn)?;

        Ok(Self {
            location,
            shared: Arc::new(Mutex::new(conn)),
        })
    }

    /// `<data dir>/storyframe/storyframe.db`
    pub fn default_database_path() -> Result<PathBuf> {
        dirs::data_local_dir()
            .or_else(dirs::data_dir)
            .map(|dir| dir.join(APP_DIR).join(DB_FILE))
            .ok_or_else(|| anyhow!("Could not determine a data directory for the frame database"))
    }

    pub fn path(&self) -> &Path {
        &self.location
    }

    pub fn is_in_memory(&self) -> bool {
        self.location.as_os_str() == MEMORY_LOCATION
    }

    fn lock(shared: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>> {
        shared.lock().map_err(|_| anyhow!("Frame database lock is poisoned"))
    }

    /// Run `f` against the connection on the blocking pool
    pub async fn execute_async<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let shared = Arc::clone(&self.shared);

        tokio::task::spawn_blocking(move || {
            let conn = Self::lock(&shared)?;
            f(&conn)
        })
        .await
        .context("Database task panicked")?
    }

    /// Run `f` inside a transaction; it commits only when `f` succeeds
    pub async fn transaction_async<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let shared = Arc::clone(&self.shared);

        tokio::task::spawn_blocking(move || {
            let mut conn = Self::lock(&shared)?;
            let tx = conn.transaction()?;
            let out = f(&tx)?;
            tx.commit()?;
            Ok(out)
        })
        .await
        .context("Database transaction task panicked")?
    }

    /// Row counts and on-disk size
    pub async fn stats(&self) -> Result<StorageStats> {
        let file_size_bytes = if self.is_in_memory() {
            0
        } else {
            std::fs::metadata(&self.location).map(|m| m.len()).unwrap_or(0)
        };

        self.execute_async(move |conn| {
            let (documents, frames) = conn.query_row(
                "SELECT (SELECT COUNT(*) FROM documents), (SELECT COUNT(*) FROM frames)",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )?;

            Ok(StorageStats {
                documents,
                frames,
                file_size_bytes,
            })
        })
        .await
    }
}

/// Summary shown under `storyframe list`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageStats {
    pub documents: i64,
    pub frames: i64,
    pub file_size_bytes: u64,
}

impl fmt::Display for StorageStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} document(s), {} frame(s), {} KB on disk",
            self.documents,
            self.frames,
            self.file_size_bytes / 1024
        )
    }
}
