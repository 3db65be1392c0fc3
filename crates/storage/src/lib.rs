//! SQLite-backed content-addressed key-value store for the state
//! commitment trie (SPEC_FULL.md component F, "Persistence backend").
//!
//! Grounded on the teacher's `pathfinder-storage` crate: the same
//! `Storage::migrate`/`create_pool`/`JournalMode` shape, the same
//! r2d2-pooled `Connection`/`Transaction` wrappers with `.inner()` exposing
//! the raw [`rusqlite::Connection`] (`connection/block.rs`'s
//! `tx.inner().execute(..., named_params! {...})` style). Where the teacher
//! has one relational table per concern (`block_headers`,
//! `canonical_blocks`, ...), this crate has exactly one: a single `kv`
//! table holding both content-addressed trie entries and the three
//! well-known scalar keys from spec.md §6 - there are no block headers or
//! transactions in this spec's scope.
use std::num::NonZeroU32;
use std::path::PathBuf;

use r2d2::{ManageConnection, Pool};
use r2d2_sqlite::SqliteConnectionManager;

mod connection;

pub use connection::Transaction;

/// SQLite's `PRAGMA journal_mode`, mirroring the teacher's `JournalMode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JournalMode {
    Rollback,
    WAL,
}

/// A pooled handle to the database. Cheap to clone (it wraps an `r2d2::Pool`).
#[derive(Clone)]
pub struct Storage(Pool<SqliteConnectionManager>);

const SCHEMA_VERSION: u32 = 1;

impl Storage {
    /// Opens (creating if necessary) the database at `path`, applies the
    /// schema migration, and returns a builder ready for [`Storage::create_pool`].
    pub fn migrate(path: PathBuf, journal_mode: JournalMode) -> anyhow::Result<StorageBuilder> {
        let manager = SqliteConnectionManager::file(&path);
        let conn = manager.connect()?;
        apply_journal_mode(&conn, journal_mode)?;
        migrate_schema(&conn)?;
        Ok(StorageBuilder { path, journal_mode })
    }

    /// An in-memory database, for tests.
    pub fn in_memory() -> anyhow::Result<Self> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder().max_size(1).build(manager)?;
        {
            let conn = pool.get()?;
            migrate_schema(&conn)?;
        }
        Ok(Self(pool))
    }

    pub fn connection(&self) -> anyhow::Result<Connection> {
        Ok(Connection(self.0.get()?))
    }
}

/// Deferred pool construction, mirroring the teacher's two-step
/// `migrate(..)?.create_pool(..)?`.
pub struct StorageBuilder {
    path: PathBuf,
    journal_mode: JournalMode,
}

impl StorageBuilder {
    pub fn create_pool(self, max_size: NonZeroU32) -> anyhow::Result<Storage> {
        let manager = SqliteConnectionManager::file(&self.path);
        let journal_mode = self.journal_mode;
        let pool = Pool::builder().max_size(max_size.get()).build(manager)?;
        // Every pooled connection needs the pragma applied, not just the
        // one used during `migrate`.
        {
            let conn = pool.get()?;
            apply_journal_mode(&conn, journal_mode)?;
        }
        Ok(Storage(pool))
    }
}

fn apply_journal_mode(conn: &rusqlite::Connection, mode: JournalMode) -> anyhow::Result<()> {
    let mode = match mode {
        JournalMode::Rollback => "DELETE",
        JournalMode::WAL => "WAL",
    };
    conn.pragma_update(None, "journal_mode", mode)?;
    Ok(())
}

fn migrate_schema(conn: &rusqlite::Connection) -> anyhow::Result<()> {
    conn.execute_batch(
        r"
        CREATE TABLE IF NOT EXISTS kv (
            key   BLOB PRIMARY KEY NOT NULL,
            value BLOB NOT NULL
        );
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER NOT NULL
        );
        ",
    )?;

    let version: Option<u32> = conn
        .query_row("SELECT version FROM schema_version", [], |row| row.get(0))
        .ok();
    if version.is_none() {
        conn.execute("INSERT INTO schema_version(version) VALUES (?)", [SCHEMA_VERSION])?;
    }

    Ok(())
}

/// An owned, pooled connection. Short-lived; open a [`Transaction`] to do
/// any work.
pub struct Connection(r2d2::PooledConnection<SqliteConnectionManager>);

impl Connection {
    pub fn transaction(&mut self) -> anyhow::Result<Transaction<'_>> {
        let tx = self.0.transaction()?;
        Ok(Transaction::new(tx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_storage_round_trips_a_connection() {
        let storage = Storage::in_memory().unwrap();
        let mut conn = storage.connection().unwrap();
        let tx = conn.transaction().unwrap();
        tx.commit().unwrap();
    }

    /// Exercises the on-disk path (`migrate` + `create_pool`) rather than
    /// `in_memory`, since that's what the `starkstate` binary actually uses.
    #[test_log::test]
    fn on_disk_storage_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.sqlite");

        let storage = Storage::migrate(path.clone(), JournalMode::WAL)
            .unwrap()
            .create_pool(NonZeroU32::new(1).unwrap())
            .unwrap();
        {
            let mut conn = storage.connection().unwrap();
            let tx = conn.transaction().unwrap();
            tx.put(b"k", b"v").unwrap();
            tx.commit().unwrap();
        }
        drop(storage);

        let reopened = Storage::migrate(path, JournalMode::WAL)
            .unwrap()
            .create_pool(NonZeroU32::new(1).unwrap())
            .unwrap();
        let mut conn = reopened.connection().unwrap();
        let tx = conn.transaction().unwrap();
        assert_eq!(tx.get(b"k").unwrap(), Some(b"v".to_vec()));
    }
}
