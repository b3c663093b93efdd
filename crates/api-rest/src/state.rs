use std::sync::Arc;

use spectrum_core::{
    CaseService, CategoryService, ComplainantService, ComplaintService, Db, PatientService,
};

/// Application state shared across REST API handlers.
///
/// Holds the database handle; the lightweight service structs are
/// constructed per request from it.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Db>,
}

impl AppState {
    pub fn new(db: Arc<Db>) -> Self {
        Self { db }
    }

    pub fn categories(&self) -> CategoryService {
        CategoryService::new(self.db.clone())
    }

    pub fn complainants(&self) -> ComplainantService {
        ComplainantService::new(self.db.clone())
    }

    pub fn patients(&self) -> PatientService {
        PatientService::new(self.db.clone())
    }

    pub fn cases(&self) -> CaseService {
        CaseService::new(self.db.clone())
    }

    pub fn complaints(&self) -> ComplaintService {
        ComplaintService::new(self.db.clone())
    }
}
