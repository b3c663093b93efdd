//! Entities and payloads exchanged over the REST interface.
//!
//! All identifiers are UUIDs and all timestamps are UTC. Field names match
//! the JSON wire format exactly, so these structs are used unchanged by the
//! axum handlers, the reqwest client, and the workflow state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A leaf complaint category. Every stored category row is a leaf; the main
/// category is a grouping label only and never carries its own identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SubCategory {
    pub category_id: Uuid,
    pub sub_category: String,
}

/// A main category together with its leaf sub-categories, as returned by
/// `GET /complaint-categories`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoryGroup {
    pub main_category: String,
    pub sub_categories: Vec<SubCategory>,
}

/// A complainant record with full postal address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Complainant {
    pub complainant_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub postcode: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Complainant search hit; enough to populate the registration form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ComplainantSummary {
    pub complainant_id: Uuid,
    pub name: String,
    pub email: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub postcode: String,
}

/// Payload for `POST /complainants`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ComplainantInput {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub postcode: String,
}

/// Read-only patient summary from the patient master data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PatientSummary {
    pub patient_id: Uuid,
    pub name: String,
    pub dob: DateTime<Utc>,
}

/// Read-only case summary. Every case belongs to exactly one patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CaseSummary {
    pub case_id: Uuid,
    pub case_reference: String,
    pub patient_id: Uuid,
}

/// A persisted complaint with the referenced entities embedded, so callers
/// need no follow-up reads for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Complaint {
    pub complaint_id: Uuid,
    pub description: String,
    pub category_id: Uuid,
    pub complainant_id: Uuid,
    pub patient_id: Uuid,
    pub case_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub complainant: ComplainantSummary,
    pub patient: PatientSummary,
    pub case: CaseSummary,
}

/// Payload for `POST /complaints`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ComplaintInput {
    pub description: String,
    pub category_id: Uuid,
    pub complainant_id: Uuid,
    pub patient_id: Uuid,
    pub case_id: Uuid,
}

/// Error body returned by the REST interface for 4xx/5xx responses.
///
/// `field` is set when the failure is scoped to a single submitted field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub field: Option<String>,
    pub message: String,
}
