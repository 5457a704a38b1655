pub mod api;
pub mod config;
pub mod error;
pub mod gateway;
pub mod logic;
pub mod model;
pub mod seed;

use std::sync::Arc;

// Export API types
pub use api::handlers;
pub use api::routes;
pub use api::FormService;

pub use error::{FormError, GatewayError};

// Export gateway types
pub use gateway::{
    CachedGateway, CatalogGateway, CatalogRequest, GatewayResult, HttpGateway, MemoryGateway,
    ReachabilityProbe,
};

// Export logic types
pub use logic::{
    ChildRequest, ChildrenOutcome, Field, FieldOrigin, FilteredItem, FormEngine, FormSession,
    FormUpdate, PropertiesOutcome, PropertiesRequest, SearchableSelector, SubmissionValidator,
    Ticket,
};

// Export all model types
pub use model::*;

// Export seed module
pub use seed::*;

/// Gateway selected at startup; the concrete type depends on configuration
pub type SharedGateway = Arc<dyn CatalogGateway>;

/// Pick the catalog backend: the demo catalog when `FORM_USE_SEED_GATEWAY`
/// is set, otherwise the remote API, cached when a TTL is configured.
pub fn build_gateway(config: &crate::config::AppConfig) -> anyhow::Result<SharedGateway> {
    if crate::config::AppConfig::use_seed_gateway() {
        log::info!("Serving the built-in demo catalog");
        return Ok(Arc::new(seed::seed_gateway()));
    }

    let http = HttpGateway::new(&config.gateway)?;
    log::info!("Using catalog API at {}", http.base_url());

    match config.gateway.cache_ttl() {
        Some(ttl) => {
            log::info!("Caching catalog responses for {}s", ttl.as_secs());
            let cache = CachedGateway::new(http, ttl);
            cache.spawn_eviction(ttl);
            Ok(Arc::new(cache))
        }
        None => Ok(Arc::new(http)),
    }
}

/// Router with a fresh session registry around `gateway`
pub fn create_app<G: CatalogGateway + 'static>(gateway: G) -> axum::Router {
    routes::create_router::<G>().with_state(Arc::new(FormService::new(Arc::new(gateway))))
}

/// Bind the configured address and serve `app` until shutdown
pub async fn run_server(app: axum::Router, config: &crate::config::AppConfig) -> anyhow::Result<()> {
    use axum::serve;
    use tokio::net::TcpListener;

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    log::info!("Listing form server running on http://{}", bind_address);

    serve(listener, app).await?;

    Ok(())
}
