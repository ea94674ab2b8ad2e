use async_trait::async_trait;
use log::debug;
use reqwest::header::USER_AGENT;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::api::{CocktailApi, Endpoint};
use crate::config::{AppConfig, DEFAULT_API_BASE_URL};
use crate::error::CocktailError;
use crate::model::{ListingQuery, Recipe};

/// Sent with every request
pub const CLIENT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Deserialize)]
struct GlassEntry {
    #[serde(rename = "strGlass")]
    name: String,
}

#[derive(Deserialize)]
struct CategoryEntry {
    #[serde(rename = "strCategory")]
    name: String,
}

/// reqwest-backed client for TheCocktailDB JSON API
pub struct CocktailDbClient {
    client: Client,
    base_url: String,
    default_first_letter: Option<String>,
}

impl CocktailDbClient {
    /// Create a client from configuration
    pub fn new(config: &AppConfig) -> Result<Self, CocktailError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(CocktailDbClient {
            client: builder.build()?,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            default_first_letter: config.default_first_letter.clone(),
        })
    }

    /// Client against a custom base URL (mirrors, tests)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        CocktailDbClient {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            default_first_letter: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch an endpoint and return the raw items of its `drinks` array
    async fn drinks(&self, endpoint: &Endpoint) -> Result<Vec<Value>, CocktailError> {
        let url = format!("{}/{}", self.base_url, endpoint.path());
        debug!("GET {}/{}", self.base_url, endpoint);

        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .query(&endpoint.query())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CocktailError::Status {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
            });
        }

        let body = response.text().await?;
        let body: Value = serde_json::from_str(&body)?;
        drinks_from_body(body, endpoint)
    }

    async fn fetch<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> Result<Vec<T>, CocktailError> {
        self.drinks(endpoint)
            .await?
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(CocktailError::from))
            .collect()
    }
}

impl Default for CocktailDbClient {
    fn default() -> Self {
        Self::with_base_url(DEFAULT_API_BASE_URL)
    }
}

/// Unwrap `{ "drinks": ... }`.
///
/// A missing key, `null` and the service's string placeholder for filter
/// misses ("None Found") all mean no items. A body that is not an object, or a
/// `drinks` value of any other type, is malformed.
fn drinks_from_body(mut body: Value, endpoint: &Endpoint) -> Result<Vec<Value>, CocktailError> {
    let Some(fields) = body.as_object_mut() else {
        return Err(CocktailError::MalformedPayload(format!(
            "{}: response is not a JSON object",
            endpoint
        )));
    };
    match fields.remove("drinks") {
        Some(Value::Array(items)) => Ok(items),
        Some(Value::Null) | Some(Value::String(_)) | None => Ok(Vec::new()),
        Some(other) => Err(CocktailError::MalformedPayload(format!(
            "{}: unexpected drinks value {}",
            endpoint, other
        ))),
    }
}

#[async_trait]
impl CocktailApi for CocktailDbClient {
    async fn lookup(&self, id: &str) -> Result<Option<Recipe>, CocktailError> {
        let recipes: Vec<Recipe> = self.fetch(&Endpoint::Lookup(id.to_string())).await?;
        Ok(recipes.into_iter().next())
    }

    async fn random(&self) -> Result<Recipe, CocktailError> {
        let recipes: Vec<Recipe> = self.fetch(&Endpoint::Random).await?;
        recipes.into_iter().next().ok_or_else(|| {
            CocktailError::MalformedPayload("random.php returned no drinks".to_string())
        })
    }

    async fn list(&self, query: &ListingQuery) -> Result<Vec<Recipe>, CocktailError> {
        let endpoint = Endpoint::for_listing(query, self.default_first_letter.as_deref());
        self.fetch(&endpoint).await
    }

    async fn glasses(&self) -> Result<Vec<String>, CocktailError> {
        let entries: Vec<GlassEntry> = self.fetch(&Endpoint::ListGlasses).await?;
        Ok(entries.into_iter().map(|e| e.name).collect())
    }

    async fn categories(&self) -> Result<Vec<String>, CocktailError> {
        let entries: Vec<CategoryEntry> = self.fetch(&Endpoint::ListCategories).await?;
        Ok(entries.into_iter().map(|e| e.name).collect())
    }
}
