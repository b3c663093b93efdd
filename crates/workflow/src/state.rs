//! The registration state machine.
//!
//! Steps advance strictly in order and every transition has an explicit
//! validation gate, so each precondition is independently testable. The
//! machine holds the in-memory draft only; nothing here touches the
//! network except the async conveniences at the bottom, which delegate to
//! the directory traits.

use spectrum_types::{
    fields, CaseSummary, CategoryGroup, ComplainantInput, ComplainantSummary, Complaint,
    FieldError, PatientSummary,
};
use uuid::Uuid;

use crate::directories::{CategoryDirectory, ComplainantDirectory, ComplaintApi};
use crate::error::WorkflowError;
use crate::submit::{
    self, ComplainantAction, SubmissionOutcome, SubmissionPlan, SubmitFailure,
};

/// The ordered steps of the registration workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    CollectingComplainant,
    CollectingComplaintDetails,
    Review,
    Submitting,
    /// Both creations succeeded. The draft is cleared on entry; call
    /// [`RegistrationWorkflow::start_new`] to begin the next registration.
    Success,
    /// A creation call failed. The draft is kept; call
    /// [`RegistrationWorkflow::return_to_review`] to let the user retry.
    Error,
}

/// The complainant form fields, exactly as typed.
///
/// `phone` and `address_line2` are optional and never validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplainantForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address_line1: String,
    pub address_line2: String,
    pub city: String,
    pub postcode: String,
}

impl ComplainantForm {
    /// Builds the create payload, dropping empty optional fields.
    pub fn to_input(&self) -> ComplainantInput {
        fn optional(value: &str) -> Option<String> {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        }
        ComplainantInput {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: optional(&self.phone),
            address_line1: self.address_line1.clone(),
            address_line2: optional(&self.address_line2),
            city: self.city.clone(),
            postcode: self.postcode.clone(),
        }
    }

    /// Runs the shared field rules; empty means the step gate passes.
    pub fn validate(&self) -> Vec<FieldError> {
        fields::validate_complainant(&self.to_input())
    }

    /// Populates the form from a search hit.
    pub fn fill_from(&mut self, summary: &ComplainantSummary) {
        self.name = summary.name.clone();
        self.email = summary.email.clone();
        self.address_line1 = summary.address_line1.clone();
        self.address_line2 = summary.address_line2.clone().unwrap_or_default();
        self.city = summary.city.clone();
        self.postcode = summary.postcode.clone();
    }
}

/// Client-side state machine driving the four directories and the
/// complaint creation service.
#[derive(Debug, Default)]
pub struct RegistrationWorkflow {
    step: StepState,
    pub form: ComplainantForm,
    selected_complainant: Option<Uuid>,
    /// Complainant committed by an earlier failed attempt, keyed by the
    /// payload it was created from; reused on retry only while the form
    /// still produces that payload.
    created_complainant: Option<(Uuid, ComplainantInput)>,
    /// Create payload issued by the in-flight attempt, pending its outcome.
    pending_create: Option<ComplainantInput>,
    categories: Option<Vec<CategoryGroup>>,
    categories_error: Option<String>,
    selected_category: Option<Uuid>,
    selected_patient: Option<PatientSummary>,
    cases: Vec<CaseSummary>,
    selected_case: Option<CaseSummary>,
    description: String,
    last_failure: Option<SubmitFailure>,
    last_created: Option<Complaint>,
}

#[derive(Debug)]
struct StepState(Step);

impl Default for StepState {
    fn default() -> Self {
        Self(Step::CollectingComplainant)
    }
}

impl RegistrationWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> Step {
        self.step.0
    }

    // ------------------------------------------------------------------
    // Complainant step
    // ------------------------------------------------------------------

    /// Adopts an existing complainant: the form is populated from the
    /// summary and the later create call is suppressed. Editing a populated
    /// field afterwards does not clear the selection; call
    /// [`clear_selected_complainant`](Self::clear_selected_complainant) to
    /// force a new record.
    pub fn select_existing_complainant(&mut self, summary: &ComplainantSummary) {
        self.form.fill_from(summary);
        self.selected_complainant = Some(summary.complainant_id);
    }

    pub fn clear_selected_complainant(&mut self) {
        self.selected_complainant = None;
    }

    pub fn selected_complainant(&self) -> Option<Uuid> {
        self.selected_complainant
    }

    pub fn created_complainant(&self) -> Option<Uuid> {
        self.created_complainant.as_ref().map(|(id, _)| *id)
    }

    /// Gate: `CollectingComplainant → CollectingComplaintDetails`.
    pub fn advance_to_details(&mut self) -> Result<(), WorkflowError> {
        self.require_step(Step::CollectingComplainant)?;
        let errors = self.form.validate();
        if !errors.is_empty() {
            return Err(WorkflowError::InvalidComplainant(errors));
        }
        self.step.0 = Step::CollectingComplaintDetails;
        Ok(())
    }

    /// Steps back without validation; entered data is kept. A no-op from
    /// the first step and while a submission is in flight.
    pub fn back(&mut self) {
        self.step.0 = match self.step.0 {
            Step::CollectingComplaintDetails => Step::CollectingComplainant,
            Step::Review => Step::CollectingComplaintDetails,
            other => other,
        };
    }

    // ------------------------------------------------------------------
    // Details step
    // ------------------------------------------------------------------

    /// Installs a fetched taxonomy and clears any earlier fetch error.
    pub fn set_categories(&mut self, groups: Vec<CategoryGroup>) {
        self.categories = Some(groups);
        self.categories_error = None;
    }

    pub fn categories(&self) -> Option<&[CategoryGroup]> {
        self.categories.as_deref()
    }

    /// Form-level error from a failed taxonomy fetch. Category selection is
    /// blocked while set, but other steps stay navigable.
    pub fn categories_error(&self) -> Option<&str> {
        self.categories_error.as_deref()
    }

    /// Selects a leaf category by id.
    pub fn select_category(&mut self, category_id: Uuid) -> Result<(), WorkflowError> {
        let known = self
            .categories
            .as_deref()
            .unwrap_or_default()
            .iter()
            .flat_map(|g| &g.sub_categories)
            .any(|leaf| leaf.category_id == category_id);
        if !known {
            return Err(WorkflowError::UnknownCategory);
        }
        self.selected_category = Some(category_id);
        Ok(())
    }

    /// Selects a patient, discarding the scoped case list and any case
    /// chosen for a previously selected patient.
    pub fn select_patient(&mut self, patient: PatientSummary) {
        self.selected_patient = Some(patient);
        self.cases.clear();
        self.selected_case = None;
    }

    pub fn clear_patient(&mut self) {
        self.selected_patient = None;
        self.cases.clear();
        self.selected_case = None;
    }

    pub fn selected_patient(&self) -> Option<&PatientSummary> {
        self.selected_patient.as_ref()
    }

    /// Installs the case list fetched for the selected patient. Cases for
    /// other patients are ignored.
    pub fn set_cases(&mut self, cases: Vec<CaseSummary>) {
        let Some(patient) = &self.selected_patient else {
            return;
        };
        let patient_id = patient.patient_id;
        self.cases = cases
            .into_iter()
            .filter(|c| c.patient_id == patient_id)
            .collect();
    }

    pub fn cases(&self) -> &[CaseSummary] {
        &self.cases
    }

    pub fn select_case(&mut self, case: CaseSummary) -> Result<(), WorkflowError> {
        let Some(patient) = &self.selected_patient else {
            return Err(WorkflowError::NoPatientSelected);
        };
        if case.patient_id != patient.patient_id {
            return Err(WorkflowError::CaseNotForSelectedPatient);
        }
        self.selected_case = Some(case);
        Ok(())
    }

    pub fn selected_case(&self) -> Option<&CaseSummary> {
        self.selected_case.as_ref()
    }

    pub fn set_description(&mut self, text: impl Into<String>) {
        self.description = text.into();
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Gate: `CollectingComplaintDetails → Review`.
    pub fn advance_to_review(&mut self) -> Result<(), WorkflowError> {
        self.require_step(Step::CollectingComplaintDetails)?;

        let mut errors = Vec::new();
        if self.selected_category.is_none() {
            errors.push(FieldError {
                field: "category_id",
                message: "A sub-category must be selected".into(),
            });
        }
        if self.selected_patient.is_none() {
            errors.push(FieldError {
                field: "patient_id",
                message: "A patient must be selected".into(),
            });
        }
        if self.selected_case.is_none() {
            errors.push(FieldError {
                field: "case_id",
                message: "A case must be selected".into(),
            });
        }
        if let Err(err) = fields::validate_description(&self.description) {
            errors.push(err);
        }
        if !errors.is_empty() {
            return Err(WorkflowError::InvalidDetails(errors));
        }
        self.step.0 = Step::Review;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Submission
    // ------------------------------------------------------------------

    /// Gate: `Review → Submitting`. Yields the plan for this attempt
    /// exactly once; while a submission is in flight further triggers fail
    /// with [`WorkflowError::AlreadySubmitting`], so repeated clicks cannot
    /// produce duplicate complaint creations.
    pub fn begin_submit(&mut self) -> Result<SubmissionPlan, WorkflowError> {
        match self.step.0 {
            Step::Review => {}
            Step::Submitting => return Err(WorkflowError::AlreadySubmitting),
            actual => {
                return Err(WorkflowError::WrongStep {
                    expected: Step::Review,
                    actual,
                })
            }
        }

        // The Review gate guarantees these selections exist.
        let (Some(category_id), Some(patient), Some(case)) = (
            self.selected_category,
            self.selected_patient.as_ref(),
            self.selected_case.as_ref(),
        ) else {
            return Err(WorkflowError::WrongStep {
                expected: Step::CollectingComplaintDetails,
                actual: self.step.0,
            });
        };

        let complainant = if let Some(id) = self.selected_complainant {
            ComplainantAction::UseExisting(id)
        } else {
            let input = self.form.to_input();
            match &self.created_complainant {
                // Reuse the committed record only while the form still
                // describes the same person.
                Some((id, prior)) if *prior == input => ComplainantAction::UseExisting(*id),
                _ => {
                    self.pending_create = Some(input.clone());
                    ComplainantAction::Create(input)
                }
            }
        };

        self.step.0 = Step::Submitting;
        Ok(SubmissionPlan {
            complainant,
            description: self.description.trim().to_owned(),
            category_id,
            patient_id: patient.patient_id,
            case_id: case.case_id,
        })
    }

    /// Applies the outcome of a submission attempt.
    ///
    /// Success clears the draft and enters [`Step::Success`]; failure
    /// enters [`Step::Error`], keeps every entered value, and memoizes a
    /// complainant committed before the failure so a retry with an
    /// unchanged form reuses it instead of creating a duplicate.
    pub fn apply_outcome(&mut self, outcome: SubmissionOutcome) {
        match outcome {
            SubmissionOutcome::Created(complaint) => {
                *self = Self {
                    step: StepState(Step::Success),
                    last_created: Some(complaint),
                    // Keep the fetched taxonomy; it is reference data.
                    categories: self.categories.take(),
                    ..Self::default()
                };
            }
            SubmissionOutcome::Failed(failure) => {
                let pending = self.pending_create.take();
                if let Some(id) = failure.created_complainant {
                    if let Some(input) = pending {
                        self.created_complainant = Some((id, input));
                    }
                }
                self.last_failure = Some(failure);
                self.step.0 = Step::Error;
            }
        }
    }

    /// The failure behind the current [`Step::Error`] state, identifying
    /// which call failed.
    pub fn last_failure(&self) -> Option<&SubmitFailure> {
        self.last_failure.as_ref()
    }

    /// The complaint created by the most recent successful submission.
    pub fn last_created(&self) -> Option<&Complaint> {
        self.last_created.as_ref()
    }

    /// `Error → Review`: hand control back to the user with all entered
    /// data intact.
    pub fn return_to_review(&mut self) -> Result<(), WorkflowError> {
        self.require_step(Step::Error)?;
        self.step.0 = Step::Review;
        Ok(())
    }

    /// `Success → CollectingComplainant`: begin the next registration. The
    /// draft was already cleared when Success was entered.
    pub fn start_new(&mut self) -> Result<(), WorkflowError> {
        self.require_step(Step::Success)?;
        self.step.0 = Step::CollectingComplainant;
        self.last_created = None;
        Ok(())
    }

    fn require_step(&self, expected: Step) -> Result<(), WorkflowError> {
        if self.step.0 != expected {
            return Err(WorkflowError::WrongStep {
                expected,
                actual: self.step.0,
            });
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Async conveniences over the directory traits
    // ------------------------------------------------------------------

    /// Fetches the taxonomy, recording a failure as a form-level error that
    /// blocks category selection but leaves other steps navigable. Call
    /// again to retry.
    pub async fn load_categories<D: CategoryDirectory>(&mut self, directory: &D) {
        match directory.list_categories().await {
            Ok(groups) => self.set_categories(groups),
            Err(err) => {
                tracing::warn!("category fetch failed: {err}");
                self.categories_error = Some(err.to_string());
            }
        }
    }

    /// Runs one submission attempt end to end and applies the outcome.
    pub async fn submit<C>(&mut self, client: &C) -> Result<SubmissionOutcome, WorkflowError>
    where
        C: ComplainantDirectory + ComplaintApi,
    {
        let plan = self.begin_submit()?;
        let outcome = submit::run(plan, client).await;
        self.apply_outcome(outcome.clone());
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::submit::SubmitStage;
    use chrono::Utc;
    use spectrum_types::{Complainant, ComplaintInput, SubCategory};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn patient(name: &str) -> PatientSummary {
        PatientSummary {
            patient_id: Uuid::new_v4(),
            name: name.into(),
            dob: Utc::now(),
        }
    }

    fn case_for(patient: &PatientSummary, reference: &str) -> CaseSummary {
        CaseSummary {
            case_id: Uuid::new_v4(),
            case_reference: reference.into(),
            patient_id: patient.patient_id,
        }
    }

    fn taxonomy() -> Vec<CategoryGroup> {
        vec![CategoryGroup {
            main_category: "Clinical".into(),
            sub_categories: vec![SubCategory {
                category_id: Uuid::new_v4(),
                sub_category: "Diagnosis".into(),
            }],
        }]
    }

    fn valid_form() -> ComplainantForm {
        ComplainantForm {
            name: "Alice Ward".into(),
            email: "alice@example.org".into(),
            phone: String::new(),
            address_line1: "45 Station Road".into(),
            address_line2: String::new(),
            city: "York".into(),
            postcode: "YO1 6HT".into(),
        }
    }

    const DESCRIPTION: &str = "Patient waited three hours without assessment and no staff \
                               member explained the delay.";

    /// Drives a fresh workflow to Review with valid data.
    fn at_review() -> RegistrationWorkflow {
        let mut wf = RegistrationWorkflow::new();
        wf.form = valid_form();
        wf.advance_to_details().unwrap();

        wf.set_categories(taxonomy());
        let leaf = wf.categories().unwrap()[0].sub_categories[0].category_id;
        wf.select_category(leaf).unwrap();

        let p = patient("John Smith");
        let c = case_for(&p, "CASE-2024-001-001");
        wf.select_patient(p);
        wf.set_cases(vec![c.clone()]);
        wf.select_case(c).unwrap();
        wf.set_description(DESCRIPTION);
        wf.advance_to_review().unwrap();
        wf
    }

    // ------------------------------------------------------------------
    // Mock directory client
    // ------------------------------------------------------------------

    #[derive(Default)]
    struct MockClient {
        complainant_creates: AtomicUsize,
        complaint_creates: AtomicUsize,
        /// Number of leading create_complaint calls to fail.
        fail_complaints: AtomicUsize,
    }

    impl ComplainantDirectory for MockClient {
        async fn search_complainants(
            &self,
            _query: &str,
        ) -> Result<Vec<ComplainantSummary>, ClientError> {
            Ok(Vec::new())
        }

        async fn create_complainant(
            &self,
            input: &ComplainantInput,
        ) -> Result<Complainant, ClientError> {
            self.complainant_creates.fetch_add(1, Ordering::SeqCst);
            Ok(Complainant {
                complainant_id: Uuid::new_v4(),
                name: input.name.clone(),
                email: input.email.clone(),
                phone: input.phone.clone(),
                address_line1: input.address_line1.clone(),
                address_line2: input.address_line2.clone(),
                city: input.city.clone(),
                postcode: input.postcode.clone(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
        }
    }

    impl ComplaintApi for MockClient {
        async fn create_complaint(
            &self,
            input: &ComplaintInput,
        ) -> Result<Complaint, ClientError> {
            self.complaint_creates.fetch_add(1, Ordering::SeqCst);
            let remaining = self.fail_complaints.load(Ordering::SeqCst);
            if remaining > 0 {
                self.fail_complaints.store(remaining - 1, Ordering::SeqCst);
                return Err(ClientError::Server(500));
            }
            Ok(Complaint {
                complaint_id: Uuid::new_v4(),
                description: input.description.clone(),
                category_id: input.category_id,
                complainant_id: input.complainant_id,
                patient_id: input.patient_id,
                case_id: input.case_id,
                created_at: Utc::now(),
                updated_at: Utc::now(),
                complainant: ComplainantSummary {
                    complainant_id: input.complainant_id,
                    name: "Alice Ward".into(),
                    email: "alice@example.org".into(),
                    address_line1: "45 Station Road".into(),
                    address_line2: None,
                    city: "York".into(),
                    postcode: "YO1 6HT".into(),
                },
                patient: PatientSummary {
                    patient_id: input.patient_id,
                    name: "John Smith".into(),
                    dob: Utc::now(),
                },
                case: CaseSummary {
                    case_id: input.case_id,
                    case_reference: "CASE-2024-001-001".into(),
                    patient_id: input.patient_id,
                },
            })
        }

        async fn fetch_complaint(&self, id: Uuid) -> Result<Complaint, ClientError> {
            Err(ClientError::NotFound(format!("Complaint {id}")))
        }
    }

    struct FlakyCategories {
        calls: AtomicUsize,
    }

    impl CategoryDirectory for FlakyCategories {
        async fn list_categories(&self) -> Result<Vec<CategoryGroup>, ClientError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(ClientError::Network("connection refused".into()));
            }
            Ok(taxonomy())
        }
    }

    // ------------------------------------------------------------------
    // Step gates
    // ------------------------------------------------------------------

    #[test]
    fn complainant_gate_lists_every_failing_field() {
        let mut wf = RegistrationWorkflow::new();
        wf.form.name = "A".into();
        wf.form.email = "not-an-email".into();

        match wf.advance_to_details() {
            Err(WorkflowError::InvalidComplainant(errors)) => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
                assert_eq!(
                    fields,
                    vec!["name", "email", "address_line1", "city", "postcode"]
                );
            }
            other => panic!("expected InvalidComplainant, got {other:?}"),
        }
        assert_eq!(wf.step(), Step::CollectingComplainant);
        // Entered data is untouched by the rejection.
        assert_eq!(wf.form.name, "A");
    }

    #[test]
    fn valid_complainant_advances_and_back_returns() {
        let mut wf = RegistrationWorkflow::new();
        wf.form = valid_form();
        wf.advance_to_details().unwrap();
        assert_eq!(wf.step(), Step::CollectingComplaintDetails);
        wf.back();
        assert_eq!(wf.step(), Step::CollectingComplainant);
        assert_eq!(wf.form, valid_form());
    }

    #[test]
    fn details_gate_names_every_missing_selection() {
        let mut wf = RegistrationWorkflow::new();
        wf.form = valid_form();
        wf.advance_to_details().unwrap();
        wf.set_description("too short");

        match wf.advance_to_review() {
            Err(WorkflowError::InvalidDetails(errors)) => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
                assert_eq!(
                    fields,
                    vec!["category_id", "patient_id", "case_id", "description"]
                );
            }
            other => panic!("expected InvalidDetails, got {other:?}"),
        }
    }

    #[test]
    fn steps_cannot_be_skipped() {
        let mut wf = RegistrationWorkflow::new();
        assert!(matches!(
            wf.advance_to_review(),
            Err(WorkflowError::WrongStep { .. })
        ));
        assert!(matches!(
            wf.begin_submit(),
            Err(WorkflowError::WrongStep { .. })
        ));
    }

    // ------------------------------------------------------------------
    // Patient / case scoping
    // ------------------------------------------------------------------

    #[test]
    fn selecting_a_case_requires_a_matching_patient() {
        let mut wf = RegistrationWorkflow::new();
        let p = patient("John Smith");
        let foreign = case_for(&patient("Emily Davis"), "CASE-2024-004-001");

        assert_eq!(
            wf.select_case(foreign.clone()),
            Err(WorkflowError::NoPatientSelected)
        );

        wf.select_patient(p);
        assert_eq!(
            wf.select_case(foreign),
            Err(WorkflowError::CaseNotForSelectedPatient)
        );
    }

    #[test]
    fn changing_patient_clears_cases_and_selection() {
        let mut wf = RegistrationWorkflow::new();
        let first = patient("John Smith");
        let case = case_for(&first, "CASE-2024-001-001");
        wf.select_patient(first);
        wf.set_cases(vec![case.clone()]);
        wf.select_case(case).unwrap();

        wf.select_patient(patient("Emily Davis"));
        assert!(wf.cases().is_empty());
        assert!(wf.selected_case().is_none());
    }

    #[test]
    fn foreign_cases_in_a_stale_fetch_are_ignored() {
        let mut wf = RegistrationWorkflow::new();
        let selected = patient("John Smith");
        let stale = case_for(&patient("Emily Davis"), "CASE-2024-004-001");
        let scoped = case_for(&selected, "CASE-2024-001-001");
        wf.select_patient(selected);
        wf.set_cases(vec![stale, scoped.clone()]);
        assert_eq!(wf.cases(), [scoped]);
    }

    #[test]
    fn unknown_category_is_rejected() {
        let mut wf = RegistrationWorkflow::new();
        wf.set_categories(taxonomy());
        assert_eq!(
            wf.select_category(Uuid::new_v4()),
            Err(WorkflowError::UnknownCategory)
        );
    }

    // ------------------------------------------------------------------
    // Category loading
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn category_fetch_failure_is_recorded_and_retryable() {
        let directory = FlakyCategories {
            calls: AtomicUsize::new(0),
        };
        let mut wf = RegistrationWorkflow::new();

        wf.load_categories(&directory).await;
        assert!(wf.categories().is_none());
        assert!(wf.categories_error().is_some());

        wf.load_categories(&directory).await;
        assert!(wf.categories().is_some());
        assert!(wf.categories_error().is_none());
    }

    // ------------------------------------------------------------------
    // Submission
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn successful_submission_resets_the_workflow() {
        let client = MockClient::default();
        let mut wf = at_review();

        let outcome = wf.submit(&client).await.unwrap();
        assert!(matches!(outcome, SubmissionOutcome::Created(_)));
        assert_eq!(wf.step(), Step::Success);
        assert!(wf.last_created().is_some());

        wf.start_new().unwrap();
        assert_eq!(wf.step(), Step::CollectingComplainant);
        assert_eq!(wf.form, ComplainantForm::default());
        assert!(wf.description().is_empty());
        assert_eq!(client.complainant_creates.load(Ordering::SeqCst), 1);
        assert_eq!(client.complaint_creates.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn second_trigger_while_submitting_is_rejected() {
        let mut wf = at_review();
        wf.begin_submit().unwrap();
        assert_eq!(wf.begin_submit(), Err(WorkflowError::AlreadySubmitting));
    }

    #[tokio::test]
    async fn two_rapid_triggers_produce_exactly_one_complaint_call() {
        let client = MockClient::default();
        let mut wf = at_review();

        let plan = wf.begin_submit().unwrap();
        assert_eq!(wf.begin_submit(), Err(WorkflowError::AlreadySubmitting));

        let outcome = submit::run(plan, &client).await;
        wf.apply_outcome(outcome);
        assert_eq!(client.complaint_creates.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn existing_complainant_suppresses_the_create_call() {
        let client = MockClient::default();
        let mut wf = RegistrationWorkflow::new();
        let existing = ComplainantSummary {
            complainant_id: Uuid::new_v4(),
            name: "Alice Ward".into(),
            email: "alice@example.org".into(),
            address_line1: "45 Station Road".into(),
            address_line2: None,
            city: "York".into(),
            postcode: "YO1 6HT".into(),
        };
        wf.select_existing_complainant(&existing);
        // Editing a populated field keeps the existing selection.
        wf.form.city = "Leeds".into();
        assert_eq!(wf.selected_complainant(), Some(existing.complainant_id));

        wf.advance_to_details().unwrap();
        wf.set_categories(taxonomy());
        let leaf = wf.categories().unwrap()[0].sub_categories[0].category_id;
        wf.select_category(leaf).unwrap();
        let p = patient("John Smith");
        let c = case_for(&p, "CASE-2024-001-001");
        wf.select_patient(p);
        wf.set_cases(vec![c.clone()]);
        wf.select_case(c).unwrap();
        wf.set_description(DESCRIPTION);
        wf.advance_to_review().unwrap();

        let outcome = wf.submit(&client).await.unwrap();
        let SubmissionOutcome::Created(complaint) = outcome else {
            panic!("expected success");
        };
        assert_eq!(complaint.complainant_id, existing.complainant_id);
        assert_eq!(client.complainant_creates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn retry_after_failure_reuses_the_committed_complainant() {
        let client = MockClient::default();
        client.fail_complaints.store(1, Ordering::SeqCst);
        let mut wf = at_review();

        let outcome = wf.submit(&client).await.unwrap();
        let SubmissionOutcome::Failed(failure) = outcome else {
            panic!("expected failure");
        };
        assert_eq!(failure.stage, SubmitStage::CreateComplaint);
        let committed = failure.created_complainant.expect("complainant committed");

        assert_eq!(wf.step(), Step::Error);
        assert_eq!(wf.created_complainant(), Some(committed));
        assert!(wf.last_failure().is_some());
        // Entered data survives the failure.
        assert_eq!(wf.description(), DESCRIPTION);

        wf.return_to_review().unwrap();
        let outcome = wf.submit(&client).await.unwrap();
        let SubmissionOutcome::Created(complaint) = outcome else {
            panic!("expected success on retry");
        };
        assert_eq!(complaint.complainant_id, committed);
        // The complainant was created once across both attempts.
        assert_eq!(client.complainant_creates.load(Ordering::SeqCst), 1);
        assert_eq!(client.complaint_creates.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn rewriting_the_form_after_a_failure_creates_a_new_complainant() {
        let client = MockClient::default();
        client.fail_complaints.store(1, Ordering::SeqCst);
        let mut wf = at_review();

        let outcome = wf.submit(&client).await.unwrap();
        let SubmissionOutcome::Failed(failure) = outcome else {
            panic!("expected failure");
        };
        let committed = failure.created_complainant.expect("complainant committed");

        // The user walks back to the complainant step and enters a
        // different person; the committed record must not be attached.
        wf.return_to_review().unwrap();
        wf.back();
        wf.back();
        assert_eq!(wf.step(), Step::CollectingComplainant);
        wf.form.name = "Brian Ward".into();
        wf.form.email = "brian@example.org".into();
        wf.advance_to_details().unwrap();
        wf.advance_to_review().unwrap();

        let outcome = wf.submit(&client).await.unwrap();
        let SubmissionOutcome::Created(complaint) = outcome else {
            panic!("expected success");
        };
        assert_ne!(complaint.complainant_id, committed);
        assert_eq!(client.complainant_creates.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_complainant_create_commits_nothing_to_reuse() {
        struct FailingComplainants;
        impl ComplainantDirectory for FailingComplainants {
            async fn search_complainants(
                &self,
                _query: &str,
            ) -> Result<Vec<ComplainantSummary>, ClientError> {
                Ok(Vec::new())
            }
            async fn create_complainant(
                &self,
                _input: &ComplainantInput,
            ) -> Result<Complainant, ClientError> {
                Err(ClientError::Validation {
                    field: Some("postcode".into()),
                    message: "Postcode is required".into(),
                })
            }
        }
        impl ComplaintApi for FailingComplainants {
            async fn create_complaint(
                &self,
                _input: &ComplaintInput,
            ) -> Result<Complaint, ClientError> {
                panic!("complaint create must not be reached");
            }
            async fn fetch_complaint(&self, _id: Uuid) -> Result<Complaint, ClientError> {
                unreachable!()
            }
        }

        let mut wf = at_review();
        let outcome = wf.submit(&FailingComplainants).await.unwrap();
        let SubmissionOutcome::Failed(failure) = outcome else {
            panic!("expected failure");
        };
        assert_eq!(failure.stage, SubmitStage::CreateComplainant);
        assert_eq!(failure.created_complainant, None);
        assert_eq!(wf.created_complainant(), None);
    }
}
