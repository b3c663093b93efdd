//! Submission orchestration.
//!
//! A [`SubmissionPlan`] is produced exactly once per attempt by
//! [`crate::RegistrationWorkflow::begin_submit`]; [`run`] then performs the
//! optional complainant creation followed by the complaint creation. The
//! two calls are independent — there is no compensating transaction. When
//! the complaint call fails after the complainant has already been
//! committed, the outcome carries the new complainant id so a retry reuses
//! it instead of creating a duplicate.

use spectrum_types::{Complaint, ComplainantInput, ComplaintInput};
use uuid::Uuid;

use crate::directories::{ComplainantDirectory, ComplaintApi};
use crate::error::ClientError;

/// How the submission obtains its complainant id.
#[derive(Debug, Clone, PartialEq)]
pub enum ComplainantAction {
    /// Reuse an existing record (selected in the form, or committed by an
    /// earlier failed attempt).
    UseExisting(Uuid),
    /// Create a new complainant first.
    Create(ComplainantInput),
}

/// Everything needed to perform one submission attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionPlan {
    pub complainant: ComplainantAction,
    pub description: String,
    pub category_id: Uuid,
    pub patient_id: Uuid,
    pub case_id: Uuid,
}

/// Which of the two creation calls failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStage {
    CreateComplainant,
    CreateComplaint,
}

/// A failed submission attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitFailure {
    pub stage: SubmitStage,
    pub error: ClientError,
    /// Set when a complainant was committed before the failure; retries
    /// must reuse this id rather than re-submitting the create payload.
    pub created_complainant: Option<Uuid>,
}

/// Result of one submission attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    Created(Complaint),
    Failed(SubmitFailure),
}

/// Executes a submission plan. Writes are never auto-retried.
pub async fn run<C>(plan: SubmissionPlan, client: &C) -> SubmissionOutcome
where
    C: ComplainantDirectory + ComplaintApi,
{
    let (complainant_id, newly_created) = match plan.complainant {
        ComplainantAction::UseExisting(id) => (id, None),
        ComplainantAction::Create(input) => match client.create_complainant(&input).await {
            Ok(created) => {
                tracing::debug!(complainant_id = %created.complainant_id, "complainant created");
                (created.complainant_id, Some(created.complainant_id))
            }
            Err(error) => {
                return SubmissionOutcome::Failed(SubmitFailure {
                    stage: SubmitStage::CreateComplainant,
                    error,
                    created_complainant: None,
                })
            }
        },
    };

    let input = ComplaintInput {
        description: plan.description,
        category_id: plan.category_id,
        complainant_id,
        patient_id: plan.patient_id,
        case_id: plan.case_id,
    };
    match client.create_complaint(&input).await {
        Ok(complaint) => SubmissionOutcome::Created(complaint),
        Err(error) => SubmissionOutcome::Failed(SubmitFailure {
            stage: SubmitStage::CreateComplaint,
            error,
            created_complainant: newly_created,
        }),
    }
}
