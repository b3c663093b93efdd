//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup by the binary and then
//! passed into services, so nothing in this crate reads environment
//! variables during request handling.

use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    db_path: PathBuf,
    seed_demo_data: bool,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// `seed_demo_data` controls whether demo patients and cases are seeded
    /// at startup in addition to the category taxonomy (which is always
    /// seeded when absent).
    pub fn new(db_path: PathBuf, seed_demo_data: bool) -> Self {
        Self {
            db_path,
            seed_demo_data,
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn seed_demo_data(&self) -> bool {
        self.seed_demo_data
    }
}
