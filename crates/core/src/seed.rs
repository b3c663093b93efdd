//! Idempotent seeding of the category taxonomy and demo master data.
//!
//! The category taxonomy is reference data this system owns. Patients and
//! cases belong to an external master-data system; the demo rows seeded
//! here stand in for it during development and testing.

use chrono::{Datelike, Utc};
use rusqlite::params;
use uuid::Uuid;

use crate::db::Db;
use crate::error::ServiceResult;

/// The two-level complaint category taxonomy: (main category, leaf).
pub const CATEGORIES: &[(&str, &str)] = &[
    ("Clinical", "Diagnosis"),
    ("Clinical", "Medication"),
    ("Clinical", "Quality of Care"),
    ("Administrative", "Billing"),
    ("Administrative", "Appointment"),
    ("Administrative", "Communication"),
    ("Technical", "Website Issue"),
    ("Technical", "Equipment"),
];

const DEMO_PATIENTS: &[(&str, &str)] = &[
    ("John Smith", "1985-03-15T00:00:00Z"),
    ("Sarah Johnson", "1990-07-22T00:00:00Z"),
    ("Michael Brown", "1978-11-08T00:00:00Z"),
    ("Emily Davis", "1995-01-30T00:00:00Z"),
    ("Robert Wilson", "1982-09-12T00:00:00Z"),
    ("Lisa Garcia", "1987-05-18T00:00:00Z"),
];

const CASES_PER_PATIENT: usize = 2;

/// Seeds the category taxonomy. Skipped when categories already exist.
pub fn seed_categories(db: &Db) -> ServiceResult<usize> {
    let mut conn = db.conn();
    let existing: i64 = conn.query_row("SELECT COUNT(*) FROM complaint_categories", [], |row| {
        row.get(0)
    })?;
    if existing > 0 {
        tracing::info!("found {existing} existing categories, skipping category seeding");
        return Ok(0);
    }

    let tx = conn.transaction()?;
    for (main, sub) in CATEGORIES {
        tx.execute(
            "INSERT INTO complaint_categories (category_id, main_category, sub_category)
             VALUES (?1, ?2, ?3)",
            params![Uuid::new_v4().to_string(), main, sub],
        )?;
    }
    tx.commit()?;
    tracing::info!("seeded {} complaint categories", CATEGORIES.len());
    Ok(CATEGORIES.len())
}

/// Seeds demo patients and two cases each. Skipped when patients already
/// exist.
pub fn seed_demo_data(db: &Db) -> ServiceResult<()> {
    let mut conn = db.conn();
    let existing: i64 =
        conn.query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))?;
    if existing > 0 {
        tracing::info!("found {existing} existing patients, skipping demo seeding");
        return Ok(());
    }

    let year = Utc::now().year();
    let tx = conn.transaction()?;
    for (index, (name, dob)) in DEMO_PATIENTS.iter().enumerate() {
        let patient_id = Uuid::new_v4();
        tx.execute(
            "INSERT INTO patients (patient_id, name, dob) VALUES (?1, ?2, ?3)",
            params![patient_id.to_string(), name, dob],
        )?;
        for case_num in 1..=CASES_PER_PATIENT {
            let reference = format!("CASE-{year}-{:03}-{case_num:03}", index + 1);
            tx.execute(
                "INSERT INTO cases (case_id, case_reference, patient_id) VALUES (?1, ?2, ?3)",
                params![Uuid::new_v4().to_string(), reference, patient_id.to_string()],
            )?;
        }
    }
    tx.commit()?;
    tracing::info!(
        "seeded {} demo patients with {} cases each",
        DEMO_PATIENTS.len(),
        CASES_PER_PATIENT
    );
    Ok(())
}
