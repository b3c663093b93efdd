//! # Spectrum Types
//!
//! Wire-level data model and field validation shared between the server
//! crates and the client registration workflow.
//!
//! Contains:
//! - Entity and payload structs for the REST interface (`model` module)
//! - Field validation rules applied on both sides (`fields` module)
//!
//! The client mirrors the server's validation to give immediate feedback;
//! keeping a single implementation here means the two cannot drift apart.
//! Server-side validation remains the authoritative check.

pub mod fields;
pub mod model;

pub use fields::{
    validate_complainant, validate_description, FieldError, DESCRIPTION_MAX_CHARS,
    DESCRIPTION_MIN_CHARS,
};
pub use model::{
    CaseSummary, CategoryGroup, Complainant, ComplainantInput, ComplainantSummary, Complaint,
    ComplaintInput, ErrorBody, PatientSummary, SubCategory,
};
