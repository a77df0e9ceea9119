//! Offline lead inspection — prints all persisted leads, newest first.
//!
//! Not part of the live conversational path; run it against the same
//! database file the server writes to.

use intake_assist::store::{LeadStore, LibSqlBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let db_path =
        std::env::var("INTAKE_DB_PATH").unwrap_or_else(|_| "./data/leads.db".to_string());

    let store = LibSqlBackend::new_local(std::path::Path::new(&db_path)).await?;
    let leads = store.list_all().await?;

    println!("--- Mostrando {} lead(s) ---", leads.len());
    for lead in leads {
        println!(
            "[{}] {} <{}> — negocio: {} | necesidades: {} | creado: {}",
            lead.id,
            lead.name,
            lead.email,
            lead.business_type,
            lead.needs,
            lead.created_at.to_rfc3339(),
        );
    }

    Ok(())
}
