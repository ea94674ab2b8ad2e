pub mod api;
pub mod config;
pub mod detail;
pub mod error;
pub mod listing;
pub mod model;
pub mod render;
pub mod router;
pub mod shell;
pub mod store;
pub mod ticket;

pub use api::{CocktailApi, CocktailDbClient, Endpoint, CLIENT_USER_AGENT};
pub use config::{load_config, AppConfig};
pub use detail::{DetailState, DetailView, RecipeDetail};
pub use error::CocktailError;
pub use listing::{ListingView, Vocabulary};
pub use model::{
    Alcoholic, FilterKind, IngredientLine, IngredientSlot, ListingQuery, Recipe, DEFAULT_MEASURE,
    INGREDIENT_SLOTS,
};
pub use render::{DetailPage, ListingPage};
pub use router::{BackTarget, History, HistoryMode, Route};
pub use shell::{Command, Outcome, Shell, View};
pub use store::{FileStore, KeyValueStore, MemoryStore};

/// Client for the configured service (`cocktails.toml`, `COCKTAILS__*`)
fn configured_client() -> Result<CocktailDbClient, CocktailError> {
    let config = AppConfig::load()?;
    CocktailDbClient::new(&config)
}

/// Look up one recipe on the configured service
///
/// # Example
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let recipe = cocktail_finder::lookup_recipe("11007").await?;
/// println!("{}", recipe.name);
/// # Ok(())
/// # }
/// ```
pub async fn lookup_recipe(id: &str) -> Result<Recipe, CocktailError> {
    configured_client()?
        .lookup(id)
        .await?
        .ok_or_else(|| CocktailError::NotFound(id.to_string()))
}

/// Recipes for a listing query on the configured service
pub async fn find_recipes(query: &ListingQuery) -> Result<Vec<Recipe>, CocktailError> {
    configured_client()?.list(query).await
}

/// One random recipe from the configured service
pub async fn random_recipe() -> Result<Recipe, CocktailError> {
    configured_client()?.random().await
}
