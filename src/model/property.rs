use crate::model::Id;
use serde::{Deserialize, Serialize};

/// Label of the free-text choice offered on every property
pub const OTHER_CHOICE_LABEL: &str = "Other";

/// A form field definition bound to a category or unlocked by an option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: Id,
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Widget hint from the API (e.g. "select", "text")
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub parent_id: Option<Id>,

    /// `None` for free-text properties
    #[serde(default)]
    pub options: Option<Vec<PropertyOption>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyOption {
    pub id: Id,
    pub name: String,

    /// Choosing this option unlocks child properties
    #[serde(rename = "has_child")]
    pub has_children: bool,
}

/// One entry of a property's dropdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Choice {
    Option(PropertyOption),
    /// Free-text entry
    Other,
}

impl Choice {
    pub fn label(&self) -> &str {
        match self {
            Choice::Option(option) => &option.name,
            Choice::Other => OTHER_CHOICE_LABEL,
        }
    }
}

impl PropertyOption {
    pub fn new(id: Id, name: impl Into<String>, has_children: bool) -> Self {
        Self {
            id,
            name: name.into(),
            has_children,
        }
    }

    pub fn is_named_other(&self) -> bool {
        self.name.trim().eq_ignore_ascii_case(OTHER_CHOICE_LABEL)
    }
}

impl Property {
    pub fn new(id: Id, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            kind: "text".to_string(),
            parent_id: None,
            options: None,
        }
    }

    pub fn with_options(mut self, options: Vec<PropertyOption>) -> Self {
        self.kind = "select".to_string();
        self.options = Some(options);
        self
    }

    pub fn is_free_text(&self) -> bool {
        self.options.is_none()
    }

    pub fn find_option(&self, option_id: Id) -> Option<&PropertyOption> {
        self.options
            .as_deref()
            .unwrap_or_default()
            .iter()
            .find(|o| o.id == option_id)
    }

    /// Dropdown entries: the API options followed by a synthetic free-text
    /// choice unless an option already carries that name. Free-text
    /// properties have no dropdown.
    pub fn choices(&self) -> Vec<Choice> {
        let Some(options) = &self.options else {
            return Vec::new();
        };

        let mut choices: Vec<Choice> = options.iter().cloned().map(Choice::Option).collect();
        if !options.iter().any(PropertyOption::is_named_other) {
            choices.push(Choice::Other);
        }
        choices
    }
}
