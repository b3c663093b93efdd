//! Case directory: read-only adapter over the case master data.
//!
//! Cases are always listed in the context of a patient by the registration
//! workflow; the unscoped listing exists for parity with the REST boundary,
//! where the filter parameter is optional.

use std::sync::Arc;

use rusqlite::{params, Connection, OptionalExtension, Row};
use spectrum_types::CaseSummary;
use uuid::Uuid;

use crate::db::Db;
use crate::error::ServiceResult;
use crate::repositories::helpers::parse_uuid;

/// Read-only service for case lookups.
#[derive(Clone)]
pub struct CaseService {
    db: Arc<Db>,
}

impl CaseService {
    pub fn new(db: Arc<Db>) -> Self {
        Self { db }
    }

    /// Lists the cases belonging to one patient.
    pub fn list_for_patient(&self, patient_id: Uuid) -> ServiceResult<Vec<CaseSummary>> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare(
            "SELECT case_id, case_reference, patient_id FROM cases
             WHERE patient_id = ?1 ORDER BY case_reference",
        )?;
        let rows = stmt.query_map(params![patient_id.to_string()], columns)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(from_columns(row?)?);
        }
        Ok(out)
    }

    /// Lists all cases.
    pub fn list_all(&self) -> ServiceResult<Vec<CaseSummary>> {
        let conn = self.db.conn();
        let mut stmt =
            conn.prepare("SELECT case_id, case_reference, patient_id FROM cases ORDER BY case_reference")?;
        let rows = stmt.query_map([], columns)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(from_columns(row?)?);
        }
        Ok(out)
    }
}

fn columns(row: &Row<'_>) -> rusqlite::Result<(String, String, String)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

fn from_columns(columns: (String, String, String)) -> ServiceResult<CaseSummary> {
    let (id, reference, patient) = columns;
    Ok(CaseSummary {
        case_id: parse_uuid("case_id", id)?,
        case_reference: reference,
        patient_id: parse_uuid("patient_id", patient)?,
    })
}

/// Summary lookup against an already-held connection, used inside the
/// complaint-creation transaction.
pub(crate) fn fetch_summary(conn: &Connection, id: Uuid) -> ServiceResult<Option<CaseSummary>> {
    let row = conn
        .query_row(
            "SELECT case_id, case_reference, patient_id FROM cases WHERE case_id = ?1",
            params![id.to_string()],
            columns,
        )
        .optional()?;
    row.map(from_columns).transpose()
}
