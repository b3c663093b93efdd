//! Complainant directory: search, creation, and lookup.
//!
//! A complainant is an independent, reusable record; many complaints may
//! reference the same complainant. Deduplication is advisory only — the
//! store enforces no uniqueness on name or email, search merely helps the
//! user find an existing match.

use std::sync::Arc;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use spectrum_types::{
    fields::validate_complainant, Complainant, ComplainantInput, ComplainantSummary,
};
use uuid::Uuid;

use crate::db::Db;
use crate::error::{ServiceError, ServiceResult};
use crate::repositories::helpers::{like_pattern, parse_timestamp, parse_uuid};

/// Service for complainant records.
#[derive(Clone)]
pub struct ComplainantService {
    db: Arc<Db>,
}

impl ComplainantService {
    pub fn new(db: Arc<Db>) -> Self {
        Self { db }
    }

    /// Searches complainants by partial name or email match
    /// (case-insensitive). An empty or absent query lists all records; the
    /// minimum-length and debounce rules are client-side concerns.
    pub fn search(&self, query: Option<&str>) -> ServiceResult<Vec<ComplainantSummary>> {
        let conn = self.db.conn();
        let mut out = Vec::new();
        match query.map(str::trim).filter(|q| !q.is_empty()) {
            Some(q) => {
                let mut stmt = conn.prepare(
                    "SELECT complainant_id, name, email, address_line1, address_line2, city, postcode
                     FROM complainants
                     WHERE name LIKE ?1 OR email LIKE ?1
                     ORDER BY name",
                )?;
                let rows = stmt.query_map(params![like_pattern(q)], summary_columns)?;
                for row in rows {
                    out.push(summary_from_columns(row?)?);
                }
            }
            None => {
                let mut stmt = conn.prepare(
                    "SELECT complainant_id, name, email, address_line1, address_line2, city, postcode
                     FROM complainants ORDER BY name",
                )?;
                let rows = stmt.query_map([], summary_columns)?;
                for row in rows {
                    out.push(summary_from_columns(row?)?);
                }
            }
        }
        Ok(out)
    }

    /// Creates a new complainant.
    ///
    /// All required address fields are validated first; on any failure the
    /// first offending field is reported and nothing is persisted. Stored
    /// values are trimmed; empty optional fields are stored as NULL.
    pub fn create(&self, input: &ComplainantInput) -> ServiceResult<Complainant> {
        if let Some(err) = validate_complainant(input).into_iter().next() {
            return Err(err.into());
        }

        let complainant = Complainant {
            complainant_id: Uuid::new_v4(),
            name: input.name.trim().to_owned(),
            email: input.email.trim().to_owned(),
            phone: trim_optional(input.phone.as_deref()),
            address_line1: input.address_line1.trim().to_owned(),
            address_line2: trim_optional(input.address_line2.as_deref()),
            city: input.city.trim().to_owned(),
            postcode: input.postcode.trim().to_owned(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let conn = self.db.conn();
        conn.execute(
            "INSERT INTO complainants (complainant_id, name, email, phone, address_line1,
             address_line2, city, postcode, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                complainant.complainant_id.to_string(),
                complainant.name,
                complainant.email,
                complainant.phone,
                complainant.address_line1,
                complainant.address_line2,
                complainant.city,
                complainant.postcode,
                complainant.created_at.to_rfc3339(),
                complainant.updated_at.to_rfc3339(),
            ],
        )?;
        tracing::info!(complainant_id = %complainant.complainant_id, "created complainant");
        Ok(complainant)
    }

    /// Fetches a complainant by id, including the postal address.
    pub fn get(&self, id: Uuid) -> ServiceResult<Complainant> {
        let conn = self.db.conn();
        let row = conn
            .query_row(
                "SELECT complainant_id, name, email, phone, address_line1, address_line2,
                 city, postcode, created_at, updated_at
                 FROM complainants WHERE complainant_id = ?1",
                params![id.to_string()],
                full_columns,
            )
            .optional()?;
        match row {
            Some(columns) => full_from_columns(columns),
            None => Err(ServiceError::NotFound {
                resource: "Complainant",
                id: id.to_string(),
            }),
        }
    }
}

type SummaryColumns = (
    String,
    String,
    String,
    String,
    Option<String>,
    String,
    String,
);

fn summary_columns(row: &Row<'_>) -> rusqlite::Result<SummaryColumns> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
    ))
}

fn summary_from_columns(columns: SummaryColumns) -> ServiceResult<ComplainantSummary> {
    let (id, name, email, address_line1, address_line2, city, postcode) = columns;
    Ok(ComplainantSummary {
        complainant_id: parse_uuid("complainant_id", id)?,
        name,
        email,
        address_line1,
        address_line2,
        city,
        postcode,
    })
}

type FullColumns = (
    String,
    String,
    String,
    Option<String>,
    String,
    Option<String>,
    String,
    String,
    String,
    String,
);

fn full_columns(row: &Row<'_>) -> rusqlite::Result<FullColumns> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
        row.get(8)?,
        row.get(9)?,
    ))
}

fn full_from_columns(columns: FullColumns) -> ServiceResult<Complainant> {
    let (id, name, email, phone, address_line1, address_line2, city, postcode, created, updated) =
        columns;
    Ok(Complainant {
        complainant_id: parse_uuid("complainant_id", id)?,
        name,
        email,
        phone,
        address_line1,
        address_line2,
        city,
        postcode,
        created_at: parse_timestamp("created_at", created)?,
        updated_at: parse_timestamp("updated_at", updated)?,
    })
}

/// Summary lookup against an already-held connection, used inside the
/// complaint-creation transaction.
pub(crate) fn fetch_summary(
    conn: &Connection,
    id: Uuid,
) -> ServiceResult<Option<ComplainantSummary>> {
    let row = conn
        .query_row(
            "SELECT complainant_id, name, email, address_line1, address_line2, city, postcode
             FROM complainants WHERE complainant_id = ?1",
            params![id.to_string()],
            summary_columns,
        )
        .optional()?;
    row.map(summary_from_columns).transpose()
}

fn trim_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}
