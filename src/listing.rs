//! Searchable, filterable recipe grid plus the cached recipe of the day.

use chrono::{Local, NaiveDate};
use log::{debug, error, info, warn};
use std::sync::Arc;

use crate::api::CocktailApi;
use crate::error::CocktailError;
use crate::model::{FilterKind, ListingQuery, Recipe};
use crate::router::Route;
use crate::store::KeyValueStore;
use crate::ticket::{Ticket, TicketCounter};

/// Store key of the cached recipe-of-the-day blob
pub const DAILY_RECIPE_KEY: &str = "cocktail_of_day";
/// Store key of the date the blob was cached for
pub const DAILY_DATE_KEY: &str = "cocktail_of_day_date";

pub const FILTER_OPTIONS_ERROR: &str = "Failed to load filter options";
pub const LISTING_ERROR: &str = "Failed to load cocktails";
pub const NO_RESULTS: &str = "No cocktails found";

/// Selectable filter values, fetched on mount
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    pub glasses: Vec<String>,
    pub categories: Vec<String>,
}

/// An issued listing fetch awaiting its result
#[derive(Debug, Clone)]
pub struct PendingListing {
    pub ticket: Ticket,
    pub query: ListingQuery,
}

pub struct ListingView {
    api: Arc<dyn CocktailApi>,
    store: Arc<dyn KeyValueStore>,
    query: ListingQuery,
    vocabulary: Vocabulary,
    vocabulary_error: Option<String>,
    results: Vec<Recipe>,
    loading: bool,
    error: Option<String>,
    daily: Option<Recipe>,
    tickets: TicketCounter,
}

impl ListingView {
    pub fn new(api: Arc<dyn CocktailApi>, store: Arc<dyn KeyValueStore>) -> Self {
        ListingView {
            api,
            store,
            query: ListingQuery::All,
            vocabulary: Vocabulary::default(),
            vocabulary_error: None,
            results: Vec::new(),
            loading: false,
            error: None,
            daily: None,
            tickets: TicketCounter::new(),
        }
    }

    /// Start from a query taken from the location
    pub fn with_query(mut self, query: ListingQuery) -> Self {
        self.query = query;
        self
    }

    /// Initial loads: recipe list, filter vocabularies and recipe of the day
    pub async fn mount(&mut self) {
        self.refresh().await;
        self.load_vocabulary().await;
        self.recipe_of_the_day().await;
    }

    /// Fetch both vocabularies concurrently; if either fails both stay empty
    pub async fn load_vocabulary(&mut self) {
        let api = Arc::clone(&self.api);
        match tokio::try_join!(api.glasses(), api.categories()) {
            Ok((glasses, categories)) => {
                debug!(
                    "Loaded {} glass types and {} categories",
                    glasses.len(),
                    categories.len()
                );
                self.vocabulary = Vocabulary {
                    glasses,
                    categories,
                };
                self.vocabulary_error = None;
            }
            Err(e) => {
                error!("Error fetching filter options: {}", e);
                self.vocabulary = Vocabulary::default();
                self.vocabulary_error = Some(FILTER_OPTIONS_ERROR.to_string());
            }
        }
    }

    /// Set the free-text search, clearing every filter, and refetch
    pub async fn set_search(&mut self, text: &str) {
        self.query = ListingQuery::search(text);
        self.refresh().await;
    }

    /// Set one filter, clearing the other two and the search, and refetch.
    ///
    /// An empty value selects "All". A value that is not a valid filter leaves
    /// the state untouched.
    pub async fn set_filter(&mut self, kind: FilterKind, value: &str) -> Result<(), CocktailError> {
        self.query = ListingQuery::filter(kind, value)?;
        self.refresh().await;
        Ok(())
    }

    /// Replace the whole query, e.g. after the location changed
    pub async fn set_query(&mut self, query: ListingQuery) {
        self.query = query;
        self.refresh().await;
    }

    /// Issue a listing fetch for the current query
    pub fn begin_refresh(&mut self) -> PendingListing {
        self.loading = true;
        self.error = None;
        PendingListing {
            ticket: self.tickets.issue(),
            query: self.query.clone(),
        }
    }

    /// Commit a listing result; returns `false` when a newer fetch superseded it
    pub fn commit_refresh(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<Recipe>, CocktailError>,
    ) -> bool {
        if !self.tickets.is_current(ticket) {
            debug!(
                "Dropping stale listing result (generation {})",
                ticket.generation()
            );
            return false;
        }

        self.loading = false;
        match result {
            Ok(recipes) => {
                debug!("Listing returned {} recipes", recipes.len());
                self.results = recipes;
            }
            Err(e) => {
                error!("Error fetching cocktails: {}", e);
                self.error = Some(LISTING_ERROR.to_string());
                self.results.clear();
            }
        }
        true
    }

    pub async fn refresh(&mut self) {
        let pending = self.begin_refresh();
        let result = self.api.list(&pending.query).await;
        self.commit_refresh(pending.ticket, result);
    }

    /// Recipe of the day for the local calendar date
    pub async fn recipe_of_the_day(&mut self) -> Option<&Recipe> {
        self.recipe_of_the_day_on(Local::now().date_naive()).await
    }

    /// Reuse the cached recipe when it was cached for `today`, otherwise fetch
    /// one random recipe and overwrite the cache
    pub async fn recipe_of_the_day_on(&mut self, today: NaiveDate) -> Option<&Recipe> {
        let today = today.format("%Y-%m-%d").to_string();

        if let Some(recipe) = self.cached_daily(&today).await {
            info!("Using cached cocktail of the day for {}", today);
            self.daily = Some(recipe);
            return self.daily.as_ref();
        }

        info!("No cocktail of the day cached for {}, fetching one", today);
        match self.api.random().await {
            Ok(recipe) => {
                if let Err(e) = self.write_daily(&recipe, &today).await {
                    warn!("Failed to cache cocktail of the day: {}", e);
                }
                self.daily = Some(recipe);
            }
            Err(e) => error!("Error fetching cocktail of the day: {}", e),
        }
        self.daily.as_ref()
    }

    async fn cached_daily(&self, today: &str) -> Option<Recipe> {
        let date = self.store.get(DAILY_DATE_KEY).await?;
        if date.as_str() != Some(today) {
            return None;
        }
        let blob = self.store.get(DAILY_RECIPE_KEY).await?;
        match serde_json::from_value(blob) {
            Ok(recipe) => Some(recipe),
            Err(e) => {
                warn!("Ignoring unreadable cached cocktail of the day: {}", e);
                None
            }
        }
    }

    async fn write_daily(&self, recipe: &Recipe, today: &str) -> Result<(), CocktailError> {
        self.store
            .set(DAILY_RECIPE_KEY, serde_json::to_value(recipe)?)
            .await?;
        self.store.set(DAILY_DATE_KEY, today.into()).await
    }

    /// Fetch a random recipe and return the route to open it.
    ///
    /// Failures are logged only; the listing is left as it was.
    pub async fn random_recipe(&self) -> Option<Route> {
        match self.api.random().await {
            Ok(recipe) => Some(Route::detail(recipe.id)),
            Err(e) => {
                warn!("Error fetching random cocktail: {}", e);
                None
            }
        }
    }

    /// Location reproducing the current search or filter
    pub fn route(&self) -> Route {
        Route::Listing(self.query.clone())
    }

    pub fn api(&self) -> Arc<dyn CocktailApi> {
        Arc::clone(&self.api)
    }

    pub fn query(&self) -> &ListingQuery {
        &self.query
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn vocabulary_error(&self) -> Option<&str> {
        self.vocabulary_error.as_deref()
    }

    pub fn results(&self) -> &[Recipe] {
        &self.results
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The grid shows the placeholder instead of cards
    pub fn no_results(&self) -> bool {
        !self.loading && self.results.is_empty()
    }

    pub fn daily(&self) -> Option<&Recipe> {
        self.daily.as_ref()
    }
}
