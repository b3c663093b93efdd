//! Complaint creation and retrieval.
//!
//! Creation is the only write path that crosses entities: every foreign key
//! is checked and the insert performed inside one SQLite transaction, so a
//! mid-way failure leaves no partially-visible complaint row.

use std::sync::Arc;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use spectrum_types::{fields::validate_description, Complaint, ComplaintInput};
use uuid::Uuid;

use crate::db::Db;
use crate::error::{ServiceError, ServiceResult};
use crate::repositories::helpers::{parse_timestamp, parse_uuid};
use crate::repositories::{cases, complainants, patients};

/// Service for creating and reading complaints.
#[derive(Clone)]
pub struct ComplaintService {
    db: Arc<Db>,
}

impl ComplaintService {
    pub fn new(db: Arc<Db>) -> Self {
        Self { db }
    }

    /// Creates a complaint after validating every reference.
    ///
    /// Checks, in order: description bounds; the category id resolves to a
    /// leaf (the store only ever holds leaves, so an unknown id — including
    /// a main-category label — fails here); complainant, patient and case
    /// all exist; the case belongs to the submitted patient. The checks and
    /// the insert share one transaction. On success the complaint is
    /// returned with the related summaries embedded.
    pub fn create(&self, input: &ComplaintInput) -> ServiceResult<Complaint> {
        let description = input.description.trim().to_owned();
        validate_description(&description)?;

        let mut conn = self.db.conn();
        let tx = conn.transaction()?;

        if !category_exists(&tx, input.category_id)? {
            return Err(ServiceError::Validation {
                field: "category_id",
                message: format!(
                    "category_id does not reference a known sub-category: {}",
                    input.category_id
                ),
            });
        }

        let complainant = complainants::fetch_summary(&tx, input.complainant_id)?.ok_or(
            ServiceError::Validation {
                field: "complainant_id",
                message: format!(
                    "complainant_id does not reference an existing complainant: {}",
                    input.complainant_id
                ),
            },
        )?;
        let patient =
            patients::fetch_summary(&tx, input.patient_id)?.ok_or(ServiceError::Validation {
                field: "patient_id",
                message: format!(
                    "patient_id does not reference an existing patient: {}",
                    input.patient_id
                ),
            })?;
        let case = cases::fetch_summary(&tx, input.case_id)?.ok_or(ServiceError::Validation {
            field: "case_id",
            message: format!("case_id does not reference an existing case: {}", input.case_id),
        })?;

        if case.patient_id != input.patient_id {
            return Err(ServiceError::Validation {
                field: "case_id",
                message: format!(
                    "case {} does not belong to patient {}",
                    input.case_id, input.patient_id
                ),
            });
        }

        let complaint_id = Uuid::new_v4();
        let now = Utc::now();
        tx.execute(
            "INSERT INTO complaints (complaint_id, description, category_id, complainant_id,
             patient_id, case_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                complaint_id.to_string(),
                description,
                input.category_id.to_string(),
                input.complainant_id.to_string(),
                input.patient_id.to_string(),
                input.case_id.to_string(),
                now.to_rfc3339(),
                now.to_rfc3339(),
            ],
        )?;
        tx.commit()?;
        tracing::info!(%complaint_id, "created complaint");

        Ok(Complaint {
            complaint_id,
            description,
            category_id: input.category_id,
            complainant_id: input.complainant_id,
            patient_id: input.patient_id,
            case_id: input.case_id,
            created_at: now,
            updated_at: now,
            complainant,
            patient,
            case,
        })
    }

    /// Fetches a complaint with its related summaries embedded.
    pub fn get(&self, id: Uuid) -> ServiceResult<Complaint> {
        let conn = self.db.conn();
        let row = conn
            .query_row(
                "SELECT complaint_id, description, category_id, complainant_id, patient_id,
                 case_id, created_at, updated_at
                 FROM complaints WHERE complaint_id = ?1",
                params![id.to_string()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, String>(5)?,
                        row.get::<_, String>(6)?,
                        row.get::<_, String>(7)?,
                    ))
                },
            )
            .optional()?;

        let Some((cid, description, category, complainant, patient, case, created, updated)) = row
        else {
            return Err(ServiceError::NotFound {
                resource: "Complaint",
                id: id.to_string(),
            });
        };

        let complainant_id = parse_uuid("complainant_id", complainant)?;
        let patient_id = parse_uuid("patient_id", patient)?;
        let case_id = parse_uuid("case_id", case)?;

        // The FKs guarantee these rows exist; a miss here means the store
        // itself is inconsistent.
        let complainant = complainants::fetch_summary(&conn, complainant_id)?.ok_or(
            ServiceError::Corrupt {
                column: "complainant_id",
                value: complainant_id.to_string(),
            },
        )?;
        let patient =
            patients::fetch_summary(&conn, patient_id)?.ok_or(ServiceError::Corrupt {
                column: "patient_id",
                value: patient_id.to_string(),
            })?;
        let case = cases::fetch_summary(&conn, case_id)?.ok_or(ServiceError::Corrupt {
            column: "case_id",
            value: case_id.to_string(),
        })?;

        Ok(Complaint {
            complaint_id: parse_uuid("complaint_id", cid)?,
            description,
            category_id: parse_uuid("category_id", category)?,
            complainant_id,
            patient_id,
            case_id,
            created_at: parse_timestamp("created_at", created)?,
            updated_at: parse_timestamp("updated_at", updated)?,
            complainant,
            patient,
            case,
        })
    }
}

fn category_exists(conn: &Connection, id: Uuid) -> ServiceResult<bool> {
    let hit = conn
        .query_row(
            "SELECT 1 FROM complaint_categories WHERE category_id = ?1",
            params![id.to_string()],
            |_| Ok(()),
        )
        .optional()?;
    Ok(hit.is_some())
}
