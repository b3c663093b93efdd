//! Category directory: read-only taxonomy lookup.
//!
//! Categories form a two-level taxonomy. Only leaf rows are stored; a main
//! category is a grouping label derived from its leaves, so it never has an
//! identifier of its own and can never be referenced by a complaint.

use std::sync::Arc;

use spectrum_types::{CategoryGroup, SubCategory};

use crate::db::Db;
use crate::error::ServiceResult;
use crate::repositories::helpers::parse_uuid;

/// Service for listing the complaint category taxonomy.
#[derive(Clone)]
pub struct CategoryService {
    db: Arc<Db>,
}

impl CategoryService {
    pub fn new(db: Arc<Db>) -> Self {
        Self { db }
    }

    /// Lists all categories grouped by main category.
    ///
    /// Main categories appear in first-seen order and leaves keep their
    /// insertion order, matching the seeded taxonomy.
    pub fn list_grouped(&self) -> ServiceResult<Vec<CategoryGroup>> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare(
            "SELECT category_id, main_category, sub_category
             FROM complaint_categories ORDER BY rowid",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut groups: Vec<CategoryGroup> = Vec::new();
        for row in rows {
            let (id, main, sub) = row?;
            let leaf = SubCategory {
                category_id: parse_uuid("category_id", id)?,
                sub_category: sub,
            };
            match groups.iter_mut().find(|g| g.main_category == main) {
                Some(group) => group.sub_categories.push(leaf),
                None => groups.push(CategoryGroup {
                    main_category: main,
                    sub_categories: vec![leaf],
                }),
            }
        }
        Ok(groups)
    }
}
