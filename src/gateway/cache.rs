use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::gateway::traits::{CatalogGateway, CatalogRequest, GatewayResult};
use crate::model::{Category, Id, Property};

#[derive(Clone, Debug)]
enum CachedPayload {
    Categories(Vec<Category>),
    Properties(Vec<Property>),
}

/// Cache entry for one gateway response
#[derive(Clone, Debug)]
struct CacheEntry {
    payload: CachedPayload,
    stored_at: Instant,
}

/// TTL cache in front of a gateway. Only successful responses are kept, so a
/// failed call is retried on the next request.
#[derive(Debug)]
pub struct CachedGateway<G> {
    inner: G,
    /// Cache entries keyed by the request that produced them
    entries: Arc<RwLock<HashMap<CatalogRequest, CacheEntry>>>,
    ttl: Duration,
}

impl<G: CatalogGateway> CachedGateway<G> {
    pub fn new(inner: G, ttl: Duration) -> Self {
        Self {
            inner,
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }

    /// Expired entries are also removed here when they are looked up
    async fn get(&self, request: &CatalogRequest) -> Option<CachedPayload> {
        let mut entries = self.entries.write().await;

        if let Some(entry) = entries.get(request) {
            if entry.stored_at.elapsed() > self.ttl {
                entries.remove(request);
                return None;
            }
            log::debug!("Cache hit for {:?}", request);
            return Some(entry.payload.clone());
        }
        None
    }

    async fn put(&self, request: CatalogRequest, payload: CachedPayload) {
        let mut entries = self.entries.write().await;
        entries.insert(
            request,
            CacheEntry {
                payload,
                stored_at: Instant::now(),
            },
        );
    }

    async fn cached_properties<F>(&self, request: CatalogRequest, fetch: F) -> GatewayResult<Vec<Property>>
    where
        F: std::future::Future<Output = GatewayResult<Vec<Property>>> + Send,
    {
        if let Some(CachedPayload::Properties(properties)) = self.get(&request).await {
            return Ok(properties);
        }

        let properties = fetch.await?;
        self.put(request, CachedPayload::Properties(properties.clone()))
            .await;
        Ok(properties)
    }

    /// Sweep expired entries every `every` on a background task. The task
    /// ends once the cache is dropped.
    pub fn spawn_eviction(&self, every: Duration) -> JoinHandle<()> {
        let entries: Weak<_> = Arc::downgrade(&self.entries);
        let ttl = self.ttl;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let Some(entries) = entries.upgrade() else {
                    break;
                };
                let removed = evict_expired(&entries, ttl).await;
                if removed > 0 {
                    log::debug!("Evicted {} expired catalog responses", removed);
                }
            }
        })
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

async fn evict_expired(entries: &RwLock<HashMap<CatalogRequest, CacheEntry>>, ttl: Duration) -> usize {
    let mut entries = entries.write().await;
    let before = entries.len();
    entries.retain(|_, entry| entry.stored_at.elapsed() <= ttl);
    before - entries.len()
}

#[async_trait::async_trait]
impl<G: CatalogGateway> CatalogGateway for CachedGateway<G> {
    async fn fetch_all_categories(&self) -> GatewayResult<Vec<Category>> {
        let request = CatalogRequest::AllCategories;
        if let Some(CachedPayload::Categories(categories)) = self.get(&request).await {
            return Ok(categories);
        }

        let categories = self.inner.fetch_all_categories().await?;
        self.put(request, CachedPayload::Categories(categories.clone()))
            .await;
        Ok(categories)
    }

    async fn fetch_properties(&self, category_id: Id) -> GatewayResult<Vec<Property>> {
        self.cached_properties(
            CatalogRequest::Properties(category_id),
            self.inner.fetch_properties(category_id),
        )
        .await
    }

    async fn fetch_option_properties(&self, option_id: Id) -> GatewayResult<Vec<Property>> {
        self.cached_properties(
            CatalogRequest::OptionProperties(option_id),
            self.inner.fetch_option_properties(option_id),
        )
        .await
    }
}
