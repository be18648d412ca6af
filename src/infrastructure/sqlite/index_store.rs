use crate::domain::entities::index_artifact::{IndexArtifact, IndexMeta, IndexRow};
use crate::domain::error::{DomainError, IndexError};
use crate::domain::ports::index_store::IndexStore;
use crate::domain::values::document_mode::DocumentMode;
use crate::infrastructure::sqlite::migrations::run_migrations;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;

/// Index artifact kept in a SQLite file: one metadata table, one row per
/// profile vector (little-endian f32 blob) keyed by position and profile id.
pub struct SqliteIndexStore {
    conn: Mutex<Connection>,
}

impl SqliteIndexStore {
    pub fn new(conn: Connection) -> Result<Self, DomainError> {
        run_migrations(&conn).map_err(DomainError::Database)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Open (creating if needed) an artifact file for writing.
    pub fn create(path: &Path) -> Result<Self, DomainError> {
        let conn = Connection::open(path)
            .map_err(|e| DomainError::Database(format!("DB error: {e}")))?;
        Self::new(conn)
    }

    /// Open an existing artifact read-only. A missing file means no index.
    pub fn open_read_only(path: &Path) -> Result<Self, IndexError> {
        if !path.exists() {
            return Err(IndexError::IndexNotLoaded);
        }
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|e| IndexError::Corrupt(format!("cannot open {}: {e}", path.display())))?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    fn serialize_vector(v: &[f32]) -> Vec<u8> {
        v.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    fn deserialize_vector(bytes: &[u8]) -> Result<Vec<f32>, IndexError> {
        if bytes.len() % 4 != 0 {
            return Err(IndexError::Corrupt(format!(
                "vector blob of {} bytes is not a whole number of f32s",
                bytes.len()
            )));
        }
        Ok(bytes
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect())
    }

    fn read_meta(conn: &Connection, key: &str) -> Result<Option<String>, IndexError> {
        conn.query_row("SELECT value FROM index_meta WHERE key = ?1", params![key], |r| r.get(0))
            .optional()
            .map_err(|e| match e {
                rusqlite::Error::SqliteFailure(_, _) => IndexError::IndexNotLoaded,
                other => IndexError::Corrupt(other.to_string()),
            })
    }

    fn required_meta(conn: &Connection, key: &str) -> Result<String, IndexError> {
        Self::read_meta(conn, key)?
            .ok_or_else(|| IndexError::Corrupt(format!("missing metadata '{key}'")))
    }
}

impl IndexStore for SqliteIndexStore {
    fn save(&self, artifact: &IndexArtifact) -> Result<(), DomainError> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let tx = conn
            .transaction()
            .map_err(|e| DomainError::Database(format!("Failed to start transaction: {e}")))?;

        tx.execute("DELETE FROM index_vectors", [])
            .map_err(|e| DomainError::Database(format!("Failed to clear vectors: {e}")))?;
        tx.execute("DELETE FROM index_meta", [])
            .map_err(|e| DomainError::Database(format!("Failed to clear metadata: {e}")))?;

        let meta = [
            ("dimension", artifact.meta.dimension.to_string()),
            ("model", artifact.meta.model.clone()),
            ("document_mode", artifact.meta.document_mode.to_string()),
            ("built_at", artifact.meta.built_at.to_rfc3339()),
            ("profile_count", artifact.len().to_string()),
        ];
        for (key, value) in meta {
            tx.execute(
                "INSERT INTO index_meta (key, value) VALUES (?1, ?2)",
                params![key, value],
            )
            .map_err(|e| DomainError::Database(format!("Failed to store metadata: {e}")))?;
        }

        for (position, row) in artifact.rows.iter().enumerate() {
            if row.vector.len() != artifact.meta.dimension {
                return Err(DomainError::Index(format!(
                    "profile {} has {} dimensions, expected {}",
                    row.profile_id,
                    row.vector.len(),
                    artifact.meta.dimension
                )));
            }
            tx.execute(
                "INSERT INTO index_vectors (position, profile_id, vector) VALUES (?1, ?2, ?3)",
                params![position as i64, row.profile_id, Self::serialize_vector(&row.vector)],
            )
            .map_err(|e| DomainError::Database(format!("Failed to store vector: {e}")))?;
        }

        tx.commit()
            .map_err(|e| DomainError::Database(format!("Failed to commit index: {e}")))
    }

    fn load(&self) -> Result<IndexArtifact, IndexError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| IndexError::Corrupt(e.to_string()))?;

        let Some(dimension) = Self::read_meta(&conn, "dimension")? else {
            return Err(IndexError::IndexNotLoaded);
        };
        let dimension: usize = dimension
            .parse()
            .map_err(|_| IndexError::Corrupt(format!("bad dimension '{dimension}'")))?;
        let model = Self::required_meta(&conn, "model")?;
        let document_mode = Self::required_meta(&conn, "document_mode")?
            .parse::<DocumentMode>()
            .map_err(|e| IndexError::Corrupt(e.to_string()))?;
        let built_at = Self::required_meta(&conn, "built_at")?;
        let built_at = DateTime::parse_from_rfc3339(&built_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| IndexError::Corrupt(format!("bad built_at: {e}")))?;
        let expected_count: usize = Self::required_meta(&conn, "profile_count")?
            .parse()
            .map_err(|_| IndexError::Corrupt("bad profile_count".into()))?;

        let mut stmt = conn
            .prepare("SELECT position, profile_id, vector FROM index_vectors ORDER BY position")
            .map_err(|e| IndexError::Corrupt(e.to_string()))?;
        let raw: Vec<(i64, i64, Vec<u8>)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
            .map_err(|e| IndexError::Corrupt(e.to_string()))?
            .collect::<Result<_, _>>()
            .map_err(|e| IndexError::Corrupt(e.to_string()))?;

        if raw.len() != expected_count {
            return Err(IndexError::Corrupt(format!(
                "expected {expected_count} vectors, found {}",
                raw.len()
            )));
        }

        let mut rows = Vec::with_capacity(raw.len());
        for (expected_position, (position, profile_id, blob)) in raw.into_iter().enumerate() {
            if position != expected_position as i64 {
                return Err(IndexError::Corrupt(format!(
                    "gap in positions at {expected_position}"
                )));
            }
            let vector = Self::deserialize_vector(&blob)?;
            if vector.len() != dimension {
                return Err(IndexError::DimensionMismatch {
                    expected: dimension,
                    actual: vector.len(),
                });
            }
            rows.push(IndexRow { profile_id, vector });
        }

        Ok(IndexArtifact {
            meta: IndexMeta {
                dimension,
                model,
                document_mode,
                built_at,
            },
            rows,
        })
    }
}
