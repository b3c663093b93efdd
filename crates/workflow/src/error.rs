use spectrum_types::FieldError;

use crate::state::Step;

/// Errors surfaced by directory calls.
///
/// Mirrors the server's error taxonomy: field-scoped validation failures,
/// missing resources, transient connectivity failures, and unexpected
/// server errors. The search drivers retry `Network` once for reads; write
/// calls are never auto-retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// The server rejected a submitted field (HTTP 400).
    #[error("{message}")]
    Validation {
        field: Option<String>,
        message: String,
    },
    /// A referenced resource does not exist (HTTP 404).
    #[error("{0}")]
    NotFound(String),
    /// Transient connectivity failure.
    #[error("network error: {0}")]
    Network(String),
    /// Unexpected server failure.
    #[error("server error (status {0})")]
    Server(u16),
}

/// Rejected workflow operations.
///
/// Every rejected transition leaves the entered data untouched; the error
/// tells the caller which gate failed and why.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    /// Complainant fields failed the step gate; all failures are listed so
    /// they can be shown inline.
    #[error("complainant details are incomplete")]
    InvalidComplainant(Vec<FieldError>),
    /// Complaint details failed the step gate.
    #[error("complaint details are incomplete")]
    InvalidDetails(Vec<FieldError>),
    /// The operation is not valid in the current step.
    #[error("operation requires step {expected:?}, but the workflow is at {actual:?}")]
    WrongStep { expected: Step, actual: Step },
    /// A submission is already in flight; the duplicate trigger is dropped.
    #[error("a submission is already in progress")]
    AlreadySubmitting,
    /// The chosen category id is not a leaf of the loaded taxonomy.
    #[error("selected category is not a known sub-category")]
    UnknownCategory,
    /// A case was selected without a patient selection.
    #[error("a patient must be selected before choosing a case")]
    NoPatientSelected,
    /// The selected case belongs to a different patient.
    #[error("selected case does not belong to the selected patient")]
    CaseNotForSelectedPatient,
}
