//! Grants-directory category groups.
//!
//! Categories are imported flat into the store; clients want them grouped
//! by theme ("groupe") for the search filters.

use serde::{Deserialize, Serialize};

use crate::common::ApiError;
use crate::kernel::store::{columns, decode_rows, Store};

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryRow {
    pub id: String,
    pub categorie: String,
    pub groupe: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Category {
    pub id: String,
    pub categorie: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryGroup {
    /// Id of the group's first category, kept as a stable group handle
    pub id: String,
    pub groupe: String,
    pub categories: Vec<Category>,
}

/// Group flat category rows by their `groupe` label, preserving first-seen
/// group order.
pub fn group_categories(rows: Vec<CategoryRow>) -> Vec<CategoryGroup> {
    let mut groups: Vec<CategoryGroup> = Vec::new();

    for row in rows {
        let category = Category {
            id: row.id.clone(),
            categorie: row.categorie,
        };

        match groups.iter_mut().find(|group| group.groupe == row.groupe) {
            Some(group) => group.categories.push(category),
            None => groups.push(CategoryGroup {
                id: row.id,
                groupe: row.groupe,
                categories: vec![category],
            }),
        }
    }

    groups
}

pub async fn list_category_groups(store: &dyn Store) -> Result<Vec<CategoryGroup>, ApiError> {
    let rows: Vec<CategoryRow> = decode_rows(
        store
            .select(
                "categories_aides_territoire",
                &[columns("id,categorie,groupe")],
            )
            .await?,
    )?;

    Ok(group_categories(rows))
}
