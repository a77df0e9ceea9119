//! `LeadStore` trait — the persistence boundary of the conversation core.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::DatabaseError;

/// A lead ready to be persisted. All fields are required non-empty at insert
/// time; the state machine substitutes a marker for empty needs.
#[derive(Debug, Clone)]
pub struct NewLead {
    pub name: String,
    pub email: String,
    pub business_type: String,
    pub needs: String,
}

/// A persisted lead.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Lead {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub business_type: String,
    pub needs: String,
    pub created_at: DateTime<Utc>,
}

/// Backend-agnostic lead persistence.
#[async_trait]
pub trait LeadStore: Send + Sync {
    /// Insert one lead as a single statement. Returns the generated id,
    /// which is monotonically increasing within a store.
    async fn save(&self, lead: &NewLead) -> Result<i64, DatabaseError>;

    /// All persisted leads, newest first. Used by the offline inspection
    /// utility, not the live conversation path.
    async fn list_all(&self) -> Result<Vec<Lead>, DatabaseError>;
}
