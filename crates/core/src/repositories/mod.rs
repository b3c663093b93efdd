//! Domain services, one module per directory of the registration workflow.

pub mod cases;
pub mod categories;
pub mod complainants;
pub mod complaints;
pub(crate) mod helpers;
pub mod patients;
