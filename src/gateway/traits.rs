use crate::error::GatewayError;
use crate::model::{Category, Id, Property};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// Read-only access to the remote catalog.
///
/// Every call is idempotent and independent of the others, so callers may
/// retry freely. Failures come back classified, never as panics.
#[async_trait::async_trait]
pub trait CatalogGateway: Send + Sync {
    /// All categories, top-level and nested, in API order
    async fn fetch_all_categories(&self) -> GatewayResult<Vec<Category>>;
    /// Top-level properties of a (sub)category
    async fn fetch_properties(&self, category_id: Id) -> GatewayResult<Vec<Property>>;
    /// Child properties unlocked by an option
    async fn fetch_option_properties(&self, option_id: Id) -> GatewayResult<Vec<Property>>;
}

#[async_trait::async_trait]
impl<G: CatalogGateway + ?Sized> CatalogGateway for Arc<G> {
    async fn fetch_all_categories(&self) -> GatewayResult<Vec<Category>> {
        (**self).fetch_all_categories().await
    }

    async fn fetch_properties(&self, category_id: Id) -> GatewayResult<Vec<Property>> {
        (**self).fetch_properties(category_id).await
    }

    async fn fetch_option_properties(&self, option_id: Id) -> GatewayResult<Vec<Property>> {
        (**self).fetch_option_properties(option_id).await
    }
}

/// Identifies one gateway call; used as a cache key and in call logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "endpoint", content = "id", rename_all = "snake_case")]
pub enum CatalogRequest {
    AllCategories,
    Properties(Id),
    OptionProperties(Id),
}

impl CatalogRequest {
    /// Path relative to the API base URL
    pub fn path(&self) -> String {
        match self {
            CatalogRequest::AllCategories => "all-categories/web".to_string(),
            CatalogRequest::Properties(id) => format!("properties/{}", id),
            CatalogRequest::OptionProperties(id) => format!("option-properties/{}", id),
        }
    }
}
