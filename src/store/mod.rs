//! Persistence layer — libSQL-backed storage for completed leads.

pub mod libsql_backend;
pub mod traits;

pub use libsql_backend::LibSqlBackend;
pub use traits::{Lead, LeadStore, NewLead};
