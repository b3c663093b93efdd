//! Directory traits at the client's network boundary.
//!
//! Each trait maps to one external collaborator of the registration
//! workflow. Production code uses [`crate::rest::RestDirectory`], which
//! implements all of them; tests substitute mocks to control responses and
//! count calls.

use spectrum_types::{
    CaseSummary, CategoryGroup, Complainant, ComplainantInput, ComplainantSummary, Complaint,
    ComplaintInput, PatientSummary,
};
use uuid::Uuid;

use crate::error::ClientError;

/// Read-only taxonomy lookup, fetched once at workflow start.
pub trait CategoryDirectory {
    async fn list_categories(&self) -> Result<Vec<CategoryGroup>, ClientError>;
}

/// Patient master-data search (read-only).
pub trait PatientDirectory {
    async fn search_patients(&self, query: &str) -> Result<Vec<PatientSummary>, ClientError>;
}

/// Case master-data listing, always scoped to a patient (read-only).
pub trait CaseDirectory {
    async fn cases_for_patient(&self, patient_id: Uuid)
        -> Result<Vec<CaseSummary>, ClientError>;
}

/// Complainant search and creation.
pub trait ComplainantDirectory {
    async fn search_complainants(
        &self,
        query: &str,
    ) -> Result<Vec<ComplainantSummary>, ClientError>;

    async fn create_complainant(
        &self,
        input: &ComplainantInput,
    ) -> Result<Complainant, ClientError>;
}

/// Complaint creation and retrieval.
pub trait ComplaintApi {
    async fn create_complaint(&self, input: &ComplaintInput) -> Result<Complaint, ClientError>;

    async fn fetch_complaint(&self, id: Uuid) -> Result<Complaint, ClientError>;
}
