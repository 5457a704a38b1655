use crate::model::{Category, SelectedValue};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable result of a successful submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub category: Category,
    pub subcategory: Category,

    /// One entry per valued field, in field order
    pub values: Vec<SelectedValue>,

    pub submitted_at: DateTime<Utc>,
}

impl Snapshot {
    /// Summary lines: category, subcategory, then one line per value
    pub fn rows(&self) -> Vec<String> {
        let mut rows = Vec::with_capacity(self.values.len() + 2);
        rows.push(format!("Category: {}", self.category.name));
        rows.push(format!("Subcategory: {}", self.subcategory.name));
        rows.extend(
            self.values
                .iter()
                .map(|v| format!("{}: {}", v.property.name, v.display_name())),
        );
        rows
    }
}
