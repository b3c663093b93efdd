//! # Spectrum Core
//!
//! Persistence and domain services for the complaint registration system.
//!
//! This crate contains **only** data operations: the SQLite store, schema
//! migration, seeding, and one service per directory from the registration
//! workflow (categories, complainants, patients, cases) plus the
//! transactional complaint creation service. API-level concerns such as
//! HTTP routing and status-code mapping belong in `api-rest`.

pub mod config;
pub mod db;
pub mod error;
pub mod repositories;
pub mod seed;

pub use config::CoreConfig;
pub use db::Db;
pub use error::{ServiceError, ServiceResult};
pub use repositories::cases::CaseService;
pub use repositories::categories::CategoryService;
pub use repositories::complainants::ComplainantService;
pub use repositories::complaints::ComplaintService;
pub use repositories::patients::PatientService;
