//! # Spectrum Workflow
//!
//! The client side of complaint registration: an explicit finite-state
//! machine over the stepwise data-collection process, debounced
//! sequence-numbered search helpers, and the submission orchestration that
//! guarantees at most one complaint creation per attempt.
//!
//! The state machine itself is synchronous and holds only the in-memory
//! draft; all network access goes through the directory traits in
//! [`directories`], implemented over REST by [`rest::RestDirectory`] and by
//! hand-written mocks in tests.

// The directory traits use async-fn-in-trait; callers are generic, dyn
// dispatch is not needed.
#![allow(async_fn_in_trait)]

pub mod directories;
pub mod error;
pub mod rest;
pub mod search;
pub mod state;
pub mod submit;

pub use directories::{
    CaseDirectory, CategoryDirectory, ComplainantDirectory, ComplaintApi, PatientDirectory,
};
pub use error::{ClientError, WorkflowError};
pub use rest::RestDirectory;
pub use search::{SearchField, SearchRequest, DEBOUNCE, MIN_QUERY_CHARS};
pub use state::{ComplainantForm, RegistrationWorkflow, Step};
pub use submit::{
    ComplainantAction, SubmissionOutcome, SubmissionPlan, SubmitFailure, SubmitStage,
};
