use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;

use crate::error::GatewayError;
use crate::gateway::traits::{CatalogGateway, CatalogRequest, GatewayResult};
use crate::model::{Category, Id, Property};

/// Catalog served from memory. Backs the demo mode and the tests; failures
/// and latency can be injected per request.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    categories: Vec<Category>,
    properties: HashMap<Id, Vec<Property>>,
    option_properties: HashMap<Id, Vec<Property>>,
    failures: HashMap<CatalogRequest, GatewayError>,
    delays: HashMap<CatalogRequest, Duration>,
    calls: Mutex<Vec<CatalogRequest>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_properties(mut self, category_id: Id, properties: Vec<Property>) -> Self {
        self.properties.insert(category_id, properties);
        self
    }

    pub fn with_option_properties(mut self, option_id: Id, properties: Vec<Property>) -> Self {
        self.option_properties.insert(option_id, properties);
        self
    }

    /// Make every call matching `request` fail with `error`
    pub fn with_failure(mut self, request: CatalogRequest, error: GatewayError) -> Self {
        self.failures.insert(request, error);
        self
    }

    /// Delay responses to `request`
    pub fn with_delay(mut self, request: CatalogRequest, delay: Duration) -> Self {
        self.delays.insert(request, delay);
        self
    }

    /// Requests received so far, in arrival order
    pub fn calls(&self) -> Vec<CatalogRequest> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self, request: CatalogRequest) -> usize {
        self.calls.lock().iter().filter(|c| **c == request).count()
    }

    async fn serve<T: Clone>(&self, request: CatalogRequest, payload: Option<&T>, empty: T) -> GatewayResult<T> {
        self.calls.lock().push(request);

        if let Some(delay) = self.delays.get(&request) {
            tokio::time::sleep(*delay).await;
        }

        if let Some(error) = self.failures.get(&request) {
            return Err(error.clone());
        }

        Ok(payload.cloned().unwrap_or(empty))
    }
}

#[async_trait::async_trait]
impl CatalogGateway for MemoryGateway {
    async fn fetch_all_categories(&self) -> GatewayResult<Vec<Category>> {
        self.serve(CatalogRequest::AllCategories, Some(&self.categories), Vec::new())
            .await
    }

    async fn fetch_properties(&self, category_id: Id) -> GatewayResult<Vec<Property>> {
        self.serve(
            CatalogRequest::Properties(category_id),
            self.properties.get(&category_id),
            Vec::new(),
        )
        .await
    }

    async fn fetch_option_properties(&self, option_id: Id) -> GatewayResult<Vec<Property>> {
        self.serve(
            CatalogRequest::OptionProperties(option_id),
            self.option_properties.get(&option_id),
            Vec::new(),
        )
        .await
    }
}
