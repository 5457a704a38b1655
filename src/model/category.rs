use crate::model::Id;
use serde::{Deserialize, Serialize};

/// A node in the two-level category tree served by the catalog API.
/// Subcategories point at their parent through `parent_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Id,
    pub name: String,

    #[serde(default)]
    pub slug: Option<String>,

    /// `None` for top-level categories
    #[serde(default)]
    pub parent_id: Option<Id>,

    pub properties_count: i64,

    pub seo_tags: Vec<String>,

    pub is_other: bool,

    /// Image URLs are passed through to clients as-is
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<CategoryImage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryImage {
    pub medium: String,
    pub thumbnail: String,
    #[serde(default)]
    pub id: Option<Id>,
    #[serde(default)]
    pub custom_properties: Option<String>,
    #[serde(default)]
    pub place_holder: Option<ImagePlaceHolder>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagePlaceHolder {
    pub small_no_bg: String,
    pub medium_bg: String,
    pub small_bg: String,
}

impl Category {
    pub fn new(id: Id, name: impl Into<String>, parent_id: Option<Id>) -> Self {
        Self {
            id,
            name: name.into(),
            slug: None,
            parent_id,
            properties_count: 0,
            seo_tags: Vec::new(),
            is_other: false,
            image: None,
        }
    }

    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn is_child_of(&self, parent_id: Id) -> bool {
        self.parent_id == Some(parent_id)
    }
}

/// Direct children of `parent_id`, in the order the API returned them
pub fn subcategories_of(categories: &[Category], parent_id: Id) -> Vec<Category> {
    categories
        .iter()
        .filter(|c| c.is_child_of(parent_id))
        .cloned()
        .collect()
}

pub fn top_level_categories(categories: &[Category]) -> Vec<Category> {
    categories
        .iter()
        .filter(|c| c.is_top_level())
        .cloned()
        .collect()
}
