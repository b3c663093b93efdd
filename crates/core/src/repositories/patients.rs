//! Patient directory: read-only adapter over the patient master data.
//!
//! This workflow never creates or mutates patients; rows arrive via
//! seeding (standing in for the external master-data system).

use std::sync::Arc;

use rusqlite::{params, Connection, OptionalExtension, Row};
use spectrum_types::PatientSummary;
use uuid::Uuid;

use crate::db::Db;
use crate::error::ServiceResult;
use crate::repositories::helpers::{like_pattern, parse_timestamp, parse_uuid};

/// Read-only service for patient lookups.
#[derive(Clone)]
pub struct PatientService {
    db: Arc<Db>,
}

impl PatientService {
    pub fn new(db: Arc<Db>) -> Self {
        Self { db }
    }

    /// Searches patients by partial name match (case-insensitive). An empty
    /// or absent query lists all patients.
    pub fn search(&self, query: Option<&str>) -> ServiceResult<Vec<PatientSummary>> {
        let conn = self.db.conn();
        let mut out = Vec::new();
        match query.map(str::trim).filter(|q| !q.is_empty()) {
            Some(q) => {
                let mut stmt = conn.prepare(
                    "SELECT patient_id, name, dob FROM patients WHERE name LIKE ?1 ORDER BY name",
                )?;
                let rows = stmt.query_map(params![like_pattern(q)], columns)?;
                for row in rows {
                    out.push(from_columns(row?)?);
                }
            }
            None => {
                let mut stmt =
                    conn.prepare("SELECT patient_id, name, dob FROM patients ORDER BY name")?;
                let rows = stmt.query_map([], columns)?;
                for row in rows {
                    out.push(from_columns(row?)?);
                }
            }
        }
        Ok(out)
    }
}

fn columns(row: &Row<'_>) -> rusqlite::Result<(String, String, String)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

fn from_columns(columns: (String, String, String)) -> ServiceResult<PatientSummary> {
    let (id, name, dob) = columns;
    Ok(PatientSummary {
        patient_id: parse_uuid("patient_id", id)?,
        name,
        dob: parse_timestamp("dob", dob)?,
    })
}

/// Summary lookup against an already-held connection, used inside the
/// complaint-creation transaction.
pub(crate) fn fetch_summary(
    conn: &Connection,
    id: Uuid,
) -> ServiceResult<Option<PatientSummary>> {
    let row = conn
        .query_row(
            "SELECT patient_id, name, dob FROM patients WHERE patient_id = ?1",
            params![id.to_string()],
            columns,
        )
        .optional()?;
    row.map(from_columns).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    #[test]
    fn search_filters_on_partial_name() {
        let db = Arc::new(Db::open_in_memory().unwrap());
        seed::seed_demo_data(&db).unwrap();
        let svc = PatientService::new(db);

        let hits = svc.search(Some("john")).unwrap();
        assert_eq!(hits.len(), 2); // John Smith, Sarah Johnson
        assert!(hits.iter().any(|p| p.name == "John Smith"));

        assert_eq!(svc.search(None).unwrap().len(), 6);
        assert!(svc.search(Some("nobody")).unwrap().is_empty());
    }
}
