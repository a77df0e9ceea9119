//! libSQL backend — async `LeadStore` implementation.
//!
//! Supports local file and in-memory databases; the schema is created at
//! open time.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::{params, Connection, Database as LibSqlDatabase};
use tracing::{debug, info};

use crate::error::DatabaseError;
use crate::store::traits::{Lead, LeadStore, NewLead};

const LEAD_COLUMNS: &str = "id, name, email, business_type, needs, created_at";

/// libSQL database backend.
///
/// Stores a single connection that is reused for all operations.
/// `libsql::Connection` is `Send + Sync` and safe for concurrent async use;
/// each save is a single statement, so no cross-turn transaction is needed.
pub struct LibSqlBackend {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlBackend {
    /// Open (or create) a local database file and create the schema.
    pub async fn new_local(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::Pool(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DatabaseError::Pool(format!("Failed to open libSQL database: {e}")))?;

        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;

        let backend = Self {
            db: Arc::new(db),
            conn,
        };
        backend.init_schema().await?;
        info!(path = %path.display(), "Database opened");
        Ok(backend)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, DatabaseError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| {
                DatabaseError::Pool(format!("Failed to create in-memory database: {e}"))
            })?;

        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;

        let backend = Self {
            db: Arc::new(db),
            conn,
        };
        backend.init_schema().await?;
        Ok(backend)
    }

    async fn init_schema(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS leads (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL,
                    email TEXT NOT NULL,
                    business_type TEXT NOT NULL,
                    needs TEXT NOT NULL,
                    created_at TEXT NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_leads_created_at ON leads(created_at);",
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("init_schema: {e}")))?;
        Ok(())
    }
}

/// Parse an RFC 3339 or SQLite datetime string into DateTime<Utc>.
fn parse_datetime(s: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return ndt.and_utc();
    }
    DateTime::<Utc>::MIN_UTC
}

fn row_to_lead(row: &libsql::Row) -> Result<Lead, DatabaseError> {
    let created_str: String = row
        .get(5)
        .map_err(|e| DatabaseError::Query(format!("created_at column: {e}")))?;
    Ok(Lead {
        id: row
            .get(0)
            .map_err(|e| DatabaseError::Query(format!("id column: {e}")))?,
        name: row
            .get(1)
            .map_err(|e| DatabaseError::Query(format!("name column: {e}")))?,
        email: row
            .get(2)
            .map_err(|e| DatabaseError::Query(format!("email column: {e}")))?,
        business_type: row
            .get(3)
            .map_err(|e| DatabaseError::Query(format!("business_type column: {e}")))?,
        needs: row
            .get(4)
            .map_err(|e| DatabaseError::Query(format!("needs column: {e}")))?,
        created_at: parse_datetime(&created_str),
    })
}

#[async_trait]
impl LeadStore for LibSqlBackend {
    async fn save(&self, lead: &NewLead) -> Result<i64, DatabaseError> {
        let now = Utc::now().to_rfc3339();
        self.conn
            .execute(
                "INSERT INTO leads (name, email, business_type, needs, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    lead.name.clone(),
                    lead.email.clone(),
                    lead.business_type.clone(),
                    lead.needs.clone(),
                    now,
                ],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("save lead: {e}")))?;

        let id = self.conn.last_insert_rowid();
        debug!(lead_id = id, "Lead inserted into DB");
        Ok(id)
    }

    async fn list_all(&self) -> Result<Vec<Lead>, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT {LEAD_COLUMNS} FROM leads ORDER BY created_at DESC, id DESC"),
                (),
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("list leads: {e}")))?;

        let mut leads = Vec::new();
        while let Ok(Some(row)) = rows.next().await {
            match row_to_lead(&row) {
                Ok(lead) => leads.push(lead),
                Err(e) => {
                    tracing::warn!("Skipping lead row: {e}");
                }
            }
        }
        Ok(leads)
    }
}
