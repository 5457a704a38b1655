use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::gateway::reachability::ReachabilityProbe;
use crate::gateway::traits::{CatalogGateway, CatalogRequest, GatewayResult};
use crate::model::{
    CategoriesResponse, Category, Id, OptionPropertiesResponse, PropertiesResponse, Property,
};

const BODY_PREVIEW_CHARS: usize = 500;

/// HTTP client for the remote catalog API
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
    headers: HeaderMap,
    probe: Option<ReachabilityProbe>,
}

impl HttpGateway {
    pub fn new(config: &GatewayConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .context("Failed to create HTTP client")?;

        let headers = default_headers(config)?;

        let probe = if config.check_reachability {
            let url = Url::parse(&config.base_url)
                .with_context(|| format!("Invalid gateway base URL '{}'", config.base_url))?;
            ReachabilityProbe::for_url(&url, config.timeout())
        } else {
            None
        };

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            headers,
            probe,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, request: CatalogRequest) -> GatewayResult<Url> {
        let raw = format!("{}/{}", self.base_url, request.path());
        Url::parse(&raw).map_err(|e| GatewayError::InvalidUrl(format!("{}: {}", raw, e)))
    }

    async fn get_json<T: DeserializeOwned>(&self, request: CatalogRequest) -> GatewayResult<T> {
        let url = self.endpoint(request)?;

        if let Some(probe) = &self.probe {
            probe.check().await?;
        }

        log::debug!("GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .headers(self.headers.clone())
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(classify_transport_error)?;

        if !status.is_success() {
            log::warn!("GET {} returned {}", url, status);
            return Err(GatewayError::HttpError {
                status: status.as_u16(),
                body: preview(&body),
            });
        }

        if body.trim().is_empty() {
            return Err(GatewayError::EmptyResponseBody);
        }

        log::debug!("Response from {}: {}", url, preview(&body));

        serde_json::from_str::<T>(&body).map_err(|e| {
            log::error!("Failed to decode response from {}: {}", url, e);
            GatewayError::DecodeFailure(e.to_string())
        })
    }
}

#[async_trait::async_trait]
impl CatalogGateway for HttpGateway {
    async fn fetch_all_categories(&self) -> GatewayResult<Vec<Category>> {
        let response: CategoriesResponse = self.get_json(CatalogRequest::AllCategories).await?;
        Ok(response.data.categories)
    }

    async fn fetch_properties(&self, category_id: Id) -> GatewayResult<Vec<Property>> {
        let response: PropertiesResponse =
            self.get_json(CatalogRequest::Properties(category_id)).await?;
        Ok(response.data)
    }

    async fn fetch_option_properties(&self, option_id: Id) -> GatewayResult<Vec<Property>> {
        let response: OptionPropertiesResponse =
            self.get_json(CatalogRequest::OptionProperties(option_id)).await?;
        Ok(response.data)
    }
}

fn default_headers(config: &GatewayConfig) -> anyhow::Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    let mut insert = |name: &'static str, value: &str| -> anyhow::Result<()> {
        let value = HeaderValue::from_str(value)
            .with_context(|| format!("Invalid value for header '{}'", name))?;
        headers.insert(HeaderName::from_static(name), value);
        Ok(())
    };

    insert("content-language", &config.language)?;
    insert("platform", &config.platform)?;
    insert("currency", &config.currency)?;
    match &config.private_key {
        Some(key) => insert("private-key", key)?,
        None => log::warn!("No gateway private key configured; requests may be rejected"),
    }

    Ok(headers)
}

fn classify_transport_error(e: reqwest::Error) -> GatewayError {
    if e.is_builder() {
        GatewayError::InvalidUrl(e.to_string())
    } else if e.is_decode() || e.is_body() {
        GatewayError::DecodeFailure(e.to_string())
    } else {
        GatewayError::NetworkUnreachable(e.to_string())
    }
}

fn preview(body: &str) -> String {
    let mut preview: String = body.chars().take(BODY_PREVIEW_CHARS).collect();
    if preview.len() < body.len() {
        preview.push_str("...");
    }
    preview
}
