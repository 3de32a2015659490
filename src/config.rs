use reqwest::Client;
use std::time::Duration;
use tracing::warn;

const DEFAULT_GEMINI_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_CATALOG_URL: &str = "https://fakestoreapi.com/products";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub url: String,
    pub limit: u32,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct ImageConfig {
    pub timeout: Duration,
    pub max_edge: u32,
}

/// Process-wide settings, read once at startup and handed to each component.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub gemini: GeminiConfig,
    pub catalog: CatalogConfig,
    pub image: ImageConfig,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_GEMINI_BASE.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_CATALOG_URL.to_string(),
            limit: 20,
            timeout: Duration::from_secs(10),
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(10), max_edge: 800 }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            gemini: GeminiConfig::default(),
            catalog: CatalogConfig::default(),
            image: ImageConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads `.env` (if any) and overlays environment variables on the defaults.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let text = |key: &str, fallback: String| lookup(key).filter(|v| !v.trim().is_empty()).unwrap_or(fallback);

        let api_key = lookup("GEMINI_API_KEY").filter(|k| !k.trim().is_empty());

        Self {
            port: parse_or(&lookup, "PORT", defaults.port),
            gemini: GeminiConfig {
                api_key,
                base_url: text("GEMINI_API_BASE", defaults.gemini.base_url),
                model: text("GEMINI_MODEL", defaults.gemini.model),
                timeout: Duration::from_secs(parse_or(&lookup, "GEMINI_TIMEOUT_SECS", defaults.gemini.timeout.as_secs())),
            },
            catalog: CatalogConfig {
                url: text("DEMO_STORE_API_URL", defaults.catalog.url),
                limit: parse_or(&lookup, "CATALOG_LIMIT", defaults.catalog.limit),
                timeout: Duration::from_secs(parse_or(&lookup, "CATALOG_TIMEOUT_SECS", defaults.catalog.timeout.as_secs())),
            },
            image: ImageConfig {
                timeout: Duration::from_secs(parse_or(&lookup, "IMAGE_TIMEOUT_SECS", defaults.image.timeout.as_secs())),
                max_edge: parse_or(&lookup, "IMAGE_MAX_EDGE", defaults.image.max_edge),
            },
        }
    }
}

/// HTTP client with the configured request timeout. A builder failure falls back to a
/// default client with no timeout, which is logged.
pub(crate) fn http_client(timeout: Duration, purpose: &str) -> Client {
    Client::builder().timeout(timeout).build().unwrap_or_else(|e| {
        warn!("⚠️ Could not build {} HTTP client ({}); continuing without a {:?} timeout", purpose, e, timeout);
        Client::new()
    })
}

fn parse_or<F, T>(lookup: &F, key: &str, fallback: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + Copy + std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("⚠️ Ignoring invalid {}={:?}, using {}", key, raw, fallback);
            fallback
        }),
        None => fallback,
    }
}
