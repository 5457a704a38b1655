use crate::model::{Id, Property, PropertyOption};
use serde::{Deserialize, Serialize};

pub const NOT_SELECTED_LABEL: &str = "Not selected";

/// What the user entered for one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Option(PropertyOption),
    /// Free text typed after picking "Other"
    Other(String),
    Unset,
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Unset
    }
}

impl FieldValue {
    pub fn option(&self) -> Option<&PropertyOption> {
        match self {
            FieldValue::Option(option) => Some(option),
            _ => None,
        }
    }

    pub fn option_id(&self) -> Option<Id> {
        self.option().map(|o| o.id)
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, FieldValue::Unset)
    }
}

/// A property together with the value chosen for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedValue {
    pub property: Property,
    pub value: FieldValue,
}

impl SelectedValue {
    pub fn new(property: Property, value: FieldValue) -> Self {
        Self { property, value }
    }

    pub fn property_id(&self) -> Id {
        self.property.id
    }

    pub fn display_name(&self) -> String {
        match &self.value {
            FieldValue::Option(option) => option.name.clone(),
            FieldValue::Other(text) if !text.is_empty() => format!("Other: {}", text),
            _ => NOT_SELECTED_LABEL.to_string(),
        }
    }
}
