//! SQLite-backed collection store implementation.

use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::collection_client::MoveStatus;

use super::types::{
    CollectionPageRecord, CollectionRecord, CollectionSummary, CompanyRecord, MoveJobRecord,
};
use super::{CollectionStore, StoreError};

/// SQLite-backed collection store.
pub struct SqliteCollectionStore {
    conn: Mutex<Connection>,
    /// Name of the collection whose membership defines the `liked` marker.
    liked_collection: String,
}

impl SqliteCollectionStore {
    /// Create a new store, creating the database file and tables if needed.
    pub fn new(path: &Path, liked_collection: impl Into<String>) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| StoreError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            liked_collection: liked_collection.into(),
        })
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory(liked_collection: impl Into<String>) -> Result<Self, StoreError> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            liked_collection: liked_collection.into(),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS settings (
                setting_name TEXT PRIMARY KEY
            );

            CREATE TABLE IF NOT EXISTS companies (
                id TEXT PRIMARY KEY,
                company_name TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS collections (
                id TEXT PRIMARY KEY,
                collection_name TEXT NOT NULL UNIQUE
            );

            -- Membership rows; the primary key makes re-adding a member a no-op.
            CREATE TABLE IF NOT EXISTS collection_members (
                collection_id TEXT NOT NULL REFERENCES collections(id) ON DELETE CASCADE,
                company_id TEXT NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
                added_at TEXT NOT NULL,
                PRIMARY KEY (collection_id, company_id)
            );

            CREATE INDEX IF NOT EXISTS idx_members_company ON collection_members(company_id);

            CREATE TABLE IF NOT EXISTS move_jobs (
                id TEXT PRIMARY KEY,
                source_collection_id TEXT NOT NULL,
                target_collection_id TEXT NOT NULL,
                total INTEGER NOT NULL,
                processed INTEGER NOT NULL DEFAULT 0,
                status TEXT NOT NULL,
                error TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn parse_uuid(value: &str) -> Result<Uuid, StoreError> {
        Uuid::parse_str(value)
            .map_err(|e| StoreError::Database(format!("invalid uuid {value}: {e}")))
    }

    fn parse_status(value: &str) -> Result<MoveStatus, StoreError> {
        match value {
            "pending" => Ok(MoveStatus::Pending),
            "in_progress" => Ok(MoveStatus::InProgress),
            "completed" => Ok(MoveStatus::Completed),
            "error" => Ok(MoveStatus::Error),
            other => Err(StoreError::Database(format!("unknown job status {other}"))),
        }
    }
}

impl CollectionStore for SqliteCollectionStore {
    fn list_collections(&self) -> Result<Vec<CollectionSummary>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                "SELECT col.id, col.collection_name, COUNT(m.company_id)
                 FROM collections col
                 LEFT JOIN collection_members m ON m.collection_id = col.id
                 GROUP BY col.id
                 ORDER BY col.rowid",
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, u64>(2)?,
                ))
            })
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut collections = Vec::new();
        for row in rows {
            let (id, collection_name, total) =
                row.map_err(|e| StoreError::Database(e.to_string()))?;
            collections.push(CollectionSummary {
                id: Self::parse_uuid(&id)?,
                collection_name,
                total,
            });
        }
        Ok(collections)
    }

    fn collection_page(
        &self,
        id: Uuid,
        offset: u64,
        limit: u64,
    ) -> Result<CollectionPageRecord, StoreError> {
        let conn = self.conn.lock().unwrap();
        let id_str = id.to_string();

        let collection_name: String = conn
            .query_row(
                "SELECT collection_name FROM collections WHERE id = ?",
                params![id_str],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| StoreError::Database(e.to_string()))?
            .ok_or(StoreError::CollectionNotFound(id))?;

        let total: u64 = conn
            .query_row(
                "SELECT COUNT(*) FROM collection_members WHERE collection_id = ?",
                params![id_str],
                |row| row.get(0),
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut stmt = conn
            .prepare(
                "SELECT c.id, c.company_name,
                        EXISTS(
                            SELECT 1 FROM collection_members lm
                            JOIN collections lc ON lc.id = lm.collection_id
                            WHERE lc.collection_name = ?1 AND lm.company_id = c.id
                        )
                 FROM collection_members m
                 JOIN companies c ON c.id = m.company_id
                 WHERE m.collection_id = ?2
                 ORDER BY m.rowid
                 LIMIT ?3 OFFSET ?4",
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(
                params![self.liked_collection, id_str, limit, offset],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, bool>(2)?,
                    ))
                },
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut companies = Vec::new();
        for row in rows {
            let (company_id, company_name, liked) =
                row.map_err(|e| StoreError::Database(e.to_string()))?;
            companies.push(CompanyRecord {
                id: Self::parse_uuid(&company_id)?,
                company_name,
                liked,
            });
        }

        Ok(CollectionPageRecord {
            id,
            collection_name,
            companies,
            total,
        })
    }

    fn collection_company_ids(&self, id: Uuid) -> Result<Vec<Uuid>, StoreError> {
        // Distinguish "empty" from "unknown".
        self.collection(id)?;

        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                "SELECT company_id FROM collection_members
                 WHERE collection_id = ? ORDER BY rowid",
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params![id.to_string()], |row| row.get::<_, String>(0))
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut ids = Vec::new();
        for row in rows {
            let value = row.map_err(|e| StoreError::Database(e.to_string()))?;
            ids.push(Self::parse_uuid(&value)?);
        }
        Ok(ids)
    }

    fn create_collection(&self, name: &str) -> Result<CollectionRecord, StoreError> {
        let conn = self.conn.lock().unwrap();
        let id = Uuid::new_v4();
        conn.execute(
            "INSERT INTO collections (id, collection_name) VALUES (?, ?)",
            params![id.to_string(), name],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(CollectionRecord {
            id,
            collection_name: name.to_string(),
        })
    }

    fn collection(&self, id: Uuid) -> Result<CollectionRecord, StoreError> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT collection_name FROM collections WHERE id = ?",
            params![id.to_string()],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .map_err(|e| StoreError::Database(e.to_string()))?
        .map(|collection_name| CollectionRecord {
            id,
            collection_name,
        })
        .ok_or(StoreError::CollectionNotFound(id))
    }

    fn create_companies(&self, names: &[String]) -> Result<Vec<Uuid>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare("INSERT INTO companies (id, company_name) VALUES (?, ?)")
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut ids = Vec::with_capacity(names.len());
        for name in names {
            let id = Uuid::new_v4();
            stmt.execute(params![id.to_string(), name])
                .map_err(|e| StoreError::Database(e.to_string()))?;
            ids.push(id);
        }
        Ok(ids)
    }

    fn insert_members(
        &self,
        collection_id: Uuid,
        company_ids: &[Uuid],
    ) -> Result<u64, StoreError> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();
        let mut stmt = conn
            .prepare(
                "INSERT OR IGNORE INTO collection_members (collection_id, company_id, added_at)
                 VALUES (?, ?, ?)",
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut inserted = 0u64;
        for company_id in company_ids {
            let changed = stmt
                .execute(params![
                    collection_id.to_string(),
                    company_id.to_string(),
                    now
                ])
                .map_err(|e| StoreError::Database(e.to_string()))?;
            inserted += changed as u64;
        }
        Ok(inserted)
    }

    fn create_job(&self, job: &MoveJobRecord) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO move_jobs
                 (id, source_collection_id, target_collection_id, total, processed,
                  status, error, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                job.id.to_string(),
                job.source_collection_id.to_string(),
                job.target_collection_id.to_string(),
                job.total,
                job.processed,
                job.status.as_str(),
                job.error,
                job.created_at.to_rfc3339(),
                job.updated_at.to_rfc3339(),
            ],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(())
    }

    fn set_job_progress(&self, id: Uuid, processed: u64) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();
        let changed = conn
            .execute(
                "UPDATE move_jobs SET processed = ?, updated_at = ? WHERE id = ?",
                params![processed, Utc::now().to_rfc3339(), id.to_string()],
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

        if changed == 0 {
            return Err(StoreError::JobNotFound(id));
        }
        Ok(())
    }

    fn set_job_status(
        &self,
        id: Uuid,
        status: MoveStatus,
        error: Option<&str>,
    ) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();
        let changed = conn
            .execute(
                "UPDATE move_jobs SET status = ?, error = ?, updated_at = ? WHERE id = ?",
                params![
                    status.as_str(),
                    error,
                    Utc::now().to_rfc3339(),
                    id.to_string()
                ],
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

        if changed == 0 {
            return Err(StoreError::JobNotFound(id));
        }
        Ok(())
    }

    fn job(&self, id: Uuid) -> Result<MoveJobRecord, StoreError> {
        let conn = self.conn.lock().unwrap();
        let row = conn
            .query_row(
                "SELECT source_collection_id, target_collection_id, total, processed,
                        status, error, created_at, updated_at
                 FROM move_jobs WHERE id = ?",
                params![id.to_string()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, u64>(2)?,
                        row.get::<_, u64>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, Option<String>>(5)?,
                        row.get::<_, String>(6)?,
                        row.get::<_, String>(7)?,
                    ))
                },
            )
            .optional()
            .map_err(|e| StoreError::Database(e.to_string()))?
            .ok_or(StoreError::JobNotFound(id))?;

        let (source, target, total, processed, status, error, created_at, updated_at) = row;

        let parse_time = |value: &str| {
            chrono::DateTime::parse_from_rfc3339(value)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| StoreError::Database(format!("invalid timestamp {value}: {e}")))
        };

        Ok(MoveJobRecord {
            id,
            source_collection_id: Self::parse_uuid(&source)?,
            target_collection_id: Self::parse_uuid(&target)?,
            total,
            processed,
            status: Self::parse_status(&status)?,
            error,
            created_at: parse_time(&created_at)?,
            updated_at: parse_time(&updated_at)?,
        })
    }

    fn is_seeded(&self) -> Result<bool, StoreError> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM settings WHERE setting_name = 'seeded')",
            [],
            |row| row.get(0),
        )
        .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn mark_seeded(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR IGNORE INTO settings (setting_name) VALUES ('seeded')",
            [],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(())
    }
}
