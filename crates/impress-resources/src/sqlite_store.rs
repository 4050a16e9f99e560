use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use crate::collection::CollectionId;
use crate::resource::Resource;
use crate::store::{CollectionRecord, CollectionStore, StoreError};

/// Schema version for migrations
pub const SCHEMA_VERSION: u32 = 1;

const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS collres_collections (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS collres_resources (
    collection_id INTEGER NOT NULL REFERENCES collres_collections(id) ON DELETE CASCADE,
    resource_type TEXT NOT NULL,
    resource_id TEXT NOT NULL,
    added_at TEXT NOT NULL,
    PRIMARY KEY (collection_id, resource_type, resource_id)
);

CREATE INDEX IF NOT EXISTS idx_collres_resources_lookup
    ON collres_resources(resource_type, resource_id);
"#;

/// SQLite-backed implementation of the CollectionStore trait.
pub struct SqliteCollectionStore {
    conn: Mutex<Connection>,
}

impl SqliteCollectionStore {
    /// Open (or create) a database at the given path.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn =
            Connection::open(path).map_err(|e| StoreError::Storage(format!("open: {}", e)))?;
        tracing::debug!("opened collection store at {:?}", path);
        Self::init_with_connection(conn)
    }

    /// Create an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::Storage(format!("open_in_memory: {}", e)))?;
        Self::init_with_connection(conn)
    }

    fn init_with_connection(conn: Connection) -> Result<Self, StoreError> {
        // Cascading membership deletes depend on this, and it is per connection.
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|e| StoreError::Storage(format!("foreign_keys: {}", e)))?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_schema(conn: &Connection) -> Result<(), StoreError> {
        let current = Self::schema_version(conn)?;
        if current == 0 {
            conn.execute_batch(CREATE_TABLES)
                .map_err(|e| StoreError::Storage(format!("init_schema: {}", e)))?;
            conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                [SCHEMA_VERSION],
            )
            .map_err(|e| StoreError::Storage(format!("schema_version: {}", e)))?;
        } else if current > SCHEMA_VERSION {
            return Err(StoreError::Storage(format!(
                "database schema version {} is newer than supported version {}",
                current, SCHEMA_VERSION
            )));
        }
        Ok(())
    }

    /// Installed schema version; 0 for a fresh database.
    fn schema_version(conn: &Connection) -> Result<u32, StoreError> {
        let has_table: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_version')",
            [],
            |row| row.get(0),
        )?;
        if !has_table {
            return Ok(0);
        }
        let version: Option<u32> =
            conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
                row.get(0)
            })?;
        Ok(version.unwrap_or(0))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Storage(format!("lock: {}", e)))
    }

    fn exists(conn: &Connection, id: CollectionId) -> Result<bool, StoreError> {
        let found = conn
            .query_row(
                "SELECT 1 FROM collres_collections WHERE id = ?1",
                [id],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }
}

impl CollectionStore for SqliteCollectionStore {
    fn insert_collection(&self, name: &str) -> Result<CollectionId, StoreError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO collres_collections (name) VALUES (?1)",
            params![name],
        )
        .map_err(|e| StoreError::Storage(format!("insert: {}", e)))?;
        Ok(conn.last_insert_rowid())
    }

    fn get_collection(&self, id: CollectionId) -> Result<Option<CollectionRecord>, StoreError> {
        let conn = self.lock()?;
        let record = conn
            .query_row(
                "SELECT id, name FROM collres_collections WHERE id = ?1",
                [id],
                |row| {
                    Ok(CollectionRecord {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    fn rename_collection(&self, id: CollectionId, name: &str) -> Result<(), StoreError> {
        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE collres_collections SET name = ?1 WHERE id = ?2",
            params![name, id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    fn delete_collection(&self, id: CollectionId) -> Result<(), StoreError> {
        let conn = self.lock()?;
        let changed = conn.execute("DELETE FROM collres_collections WHERE id = ?1", [id])?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    fn add_member(&self, id: CollectionId, resource: &Resource) -> Result<(), StoreError> {
        let conn = self.lock()?;
        if !Self::exists(&conn, id)? {
            return Err(StoreError::NotFound(id));
        }
        conn.execute(
            "INSERT INTO collres_resources (collection_id, resource_type, resource_id, added_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                id,
                resource.resource_type(),
                resource.id(),
                Utc::now().to_rfc3339()
            ],
        )
        .map_err(|e| {
            if let rusqlite::Error::SqliteFailure(ref err, _) = e {
                if err.code == rusqlite::ErrorCode::ConstraintViolation {
                    return StoreError::AlreadyMember {
                        collection: id,
                        resource: resource.clone(),
                    };
                }
            }
            StoreError::Storage(format!("add_member: {}", e))
        })?;
        Ok(())
    }

    fn remove_member(&self, id: CollectionId, resource: &Resource) -> Result<bool, StoreError> {
        let conn = self.lock()?;
        let changed = conn.execute(
            "DELETE FROM collres_resources
             WHERE collection_id = ?1 AND resource_type = ?2 AND resource_id = ?3",
            params![id, resource.resource_type(), resource.id()],
        )?;
        if changed == 0 && !Self::exists(&conn, id)? {
            return Err(StoreError::NotFound(id));
        }
        Ok(changed > 0)
    }

    fn members(&self, id: CollectionId) -> Result<Vec<Resource>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT resource_type, resource_id FROM collres_resources
             WHERE collection_id = ?1 ORDER BY rowid",
        )?;
        let members = stmt
            .query_map([id], |row| {
                Ok(Resource::new(
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(members)
    }

    fn collections_containing(
        &self,
        resource: &Resource,
    ) -> Result<Vec<CollectionRecord>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT c.id, c.name FROM collres_collections c
             JOIN collres_resources r ON r.collection_id = c.id
             WHERE r.resource_type = ?1 AND r.resource_id = ?2
             ORDER BY c.id",
        )?;
        let records = stmt
            .query_map(params![resource.resource_type(), resource.id()], |row| {
                Ok(CollectionRecord {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }
}
