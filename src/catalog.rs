use crate::config::{http_client, CatalogConfig};
use crate::models::{ProductRecord, Rating};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
enum CatalogError {
    #[error("HTTP error: {0}")] Http(String),
    #[error("Malformed payload: {0}")] Payload(String),
}

/// The demo store answers either with a bare list or with `{"products": [...]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogPayload {
    Bare(Vec<ProductRecord>),
    Wrapped { products: Vec<ProductRecord> },
}

impl CatalogPayload {
    fn into_products(self) -> Vec<ProductRecord> {
        match self {
            CatalogPayload::Bare(products) | CatalogPayload::Wrapped { products } => products,
        }
    }
}

pub struct CatalogClient {
    client: Client,
    url: String,
    limit: u32,
}

impl CatalogClient {
    pub fn new(config: &CatalogConfig) -> Self {
        let client = http_client(config.timeout, "catalog");
        Self { client, url: config.url.clone(), limit: config.limit }
    }

    /// Never fails: any transport or payload problem yields the built-in samples.
    pub async fn fetch_products(&self) -> Vec<ProductRecord> {
        match self.try_fetch().await {
            Ok(products) => {
                info!("📦 Loaded {} products from {}", products.len(), self.url);
                products
            }
            Err(e) => {
                warn!("⚠️ Error fetching products: {}; using sample products", e);
                sample_products()
            }
        }
    }

    pub async fn fetch_product_by_id(&self, id: i64) -> Option<ProductRecord> {
        let found = self.fetch_products().await.into_iter().find(|p| p.id == id);
        if found.is_none() {
            warn!("⚠️ Product {} not found in catalog", id);
        }
        found
    }

    async fn try_fetch(&self) -> Result<Vec<ProductRecord>, CatalogError> {
        let response = self.client
            .get(&self.url)
            .query(&[("limit", self.limit)])
            .send()
            .await
            .map_err(|e| CatalogError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Http(format!("status={}", status)));
        }

        let body = response.text().await.map_err(|e| CatalogError::Http(e.to_string()))?;
        parse_catalog_payload(&body)
    }
}

fn parse_catalog_payload(body: &str) -> Result<Vec<ProductRecord>, CatalogError> {
    serde_json::from_str::<CatalogPayload>(body)
        .map(CatalogPayload::into_products)
        .map_err(|e| CatalogError::Payload(e.to_string()))
}

pub fn sample_products() -> Vec<ProductRecord> {
    vec![
        ProductRecord {
            id: 1,
            title: "Sample Product 1".to_string(),
            price: 29.99,
            description: "This is a sample product description".to_string(),
            category: "electronics".to_string(),
            image: Some("https://via.placeholder.com/300".to_string()),
            rating: Some(Rating { rate: 4.5, count: 100 }),
        },
        ProductRecord {
            id: 2,
            title: "Sample Product 2".to_string(),
            price: 49.99,
            description: "Another sample product description".to_string(),
            category: "clothing".to_string(),
            image: Some("https://via.placeholder.com/300".to_string()),
            rating: Some(Rating { rate: 4.2, count: 85 }),
        },
    ]
}
