use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};

use crate::item::{Item, ItemDraft, ItemId};
use crate::schema::{Schema, SCHEMA_VERSION};
use crate::store::{ItemStore, StoreError};

const SELECT_ITEM: &str = "SELECT id, title, description, created_at FROM items";

/// SQLite-backed implementation of the ItemStore trait.
///
/// A single connection is shared behind a mutex; each operation holds the
/// lock only for its own statement or transaction.
pub struct SqliteItemStore {
    conn: Mutex<Connection>,
}

impl SqliteItemStore {
    /// Open (or create) a database at the given path.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Storage(format!("create dir: {}", e)))?;
        }
        let conn =
            Connection::open(path).map_err(|e| StoreError::Storage(format!("open: {}", e)))?;
        tracing::info!("Opened item database at {:?}", path);
        Self::init_with_connection(conn)
    }

    /// Create an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::Storage(format!("open_in_memory: {}", e)))?;
        Self::init_with_connection(conn)
    }

    fn init_with_connection(conn: Connection) -> Result<Self, StoreError> {
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_schema(conn: &Connection) -> Result<(), StoreError> {
        if Self::schema_version(conn)?.is_none() {
            conn.execute_batch(Schema::create_tables())
                .map_err(|e| StoreError::Storage(format!("init_schema: {}", e)))?;
            Self::set_schema_version(conn, SCHEMA_VERSION)?;
        }
        Ok(())
    }

    /// Recorded schema version; `None` for a database that has never been
    /// initialized.
    fn schema_version(conn: &Connection) -> Result<Option<u32>, StoreError> {
        let has_table: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master
                           WHERE type = 'table' AND name = 'schema_version')",
            [],
            |row| row.get(0),
        )?;
        if !has_table {
            return Ok(None);
        }

        let version = conn
            .query_row(
                "SELECT version FROM schema_version ORDER BY version DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| StoreError::Storage(format!("schema_version: {}", e)))?;
        Ok(version)
    }

    fn set_schema_version(conn: &Connection, version: u32) -> Result<(), StoreError> {
        conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Storage(format!("connection lock poisoned: {}", e)))
    }

    fn fetch(conn: &Connection, id: ItemId) -> Result<Option<Item>, StoreError> {
        let item = conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_ITEM),
                params![id],
                Self::row_to_item,
            )
            .optional()?;
        Ok(item)
    }

    fn row_to_item(row: &rusqlite::Row<'_>) -> rusqlite::Result<Item> {
        let created_at_str: String = row.get(3)?;
        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?
            .with_timezone(&Utc);

        Ok(Item {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            created_at,
        })
    }
}

impl ItemStore for SqliteItemStore {
    fn list_all(&self) -> Result<Vec<Item>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("{} ORDER BY id ASC", SELECT_ITEM))?;
        let items = stmt
            .query_map([], Self::row_to_item)?
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!("Listed {} items", items.len());
        Ok(items)
    }

    fn get(&self, id: ItemId) -> Result<Item, StoreError> {
        let conn = self.lock()?;
        Self::fetch(&conn, id)?.ok_or(StoreError::NotFound(id))
    }

    fn exists(&self, id: ItemId) -> Result<bool, StoreError> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM items WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn create(&self, draft: ItemDraft) -> Result<Item, StoreError> {
        // Stored at microsecond precision, so truncate before handing it back.
        let created_at = Utc::now().trunc_subsecs(6);

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO items (title, description, created_at) VALUES (?1, ?2, ?3)",
            params![
                draft.title(),
                draft.description(),
                created_at.to_rfc3339_opts(SecondsFormat::Micros, true),
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        let item = Item {
            id,
            title: draft.title().to_string(),
            description: draft.description().map(str::to_string),
            created_at,
        };
        tracing::info!("Created {}", item);
        Ok(item)
    }

    fn update(&self, id: ItemId, draft: ItemDraft) -> Result<Item, StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let rows = tx.execute(
            "UPDATE items SET title = ?1, description = ?2 WHERE id = ?3",
            params![draft.title(), draft.description(), id],
        )?;
        if rows == 0 {
            return Err(StoreError::NotFound(id));
        }

        let item = Self::fetch(&tx, id)?.ok_or(StoreError::NotFound(id))?;
        tx.commit()?;

        tracing::info!("Updated {}", item);
        Ok(item)
    }

    fn delete(&self, id: ItemId) -> Result<(), StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let rows = tx.execute("DELETE FROM items WHERE id = ?1", params![id])?;
        if rows == 0 {
            return Err(StoreError::NotFound(id));
        }
        tx.commit()?;

        tracing::info!("Deleted item {}", id);
        Ok(())
    }
}
