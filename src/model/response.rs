//! Envelopes returned by the remote catalog API.

use crate::model::{Category, Property};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub txt: Vec<Option<String>>,
}

/// `GET /all-categories/web`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoriesResponse {
    #[serde(default)]
    pub message: ApiMessage,
    pub data: CategoriesData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoriesData {
    pub categories: Vec<Category>,
    #[serde(default)]
    pub ios_version: Option<String>,
    #[serde(default)]
    pub ios_latest_version: Option<String>,
    #[serde(default)]
    pub google_version: Option<String>,
    #[serde(default)]
    pub huawei_version: Option<String>,
}

/// `GET /properties/{category_id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertiesResponse {
    #[serde(default)]
    pub message: ApiMessage,
    pub data: Vec<Property>,
}

/// `GET /option-properties/{option_id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionPropertiesResponse {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub msg: String,
    pub data: Vec<Property>,
}
