mod client;

pub use client::{CocktailDbClient, CLIENT_USER_AGENT};

use async_trait::async_trait;
use std::fmt;

use crate::error::CocktailError;
use crate::model::{Alcoholic, ListingQuery, Recipe};

/// One request the application makes against the cocktail service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Lookup(String),
    Random,
    Search(String),
    FirstLetter(String),
    FilterAlcoholic(Alcoholic),
    FilterCategory(String),
    FilterGlass(String),
    ListCategories,
    ListGlasses,
}

impl Endpoint {
    /// Endpoint serving a listing query; `All` maps to the default listing
    pub fn for_listing(query: &ListingQuery, default_first_letter: Option<&str>) -> Self {
        match query {
            ListingQuery::Search(text) => Endpoint::Search(text.clone()),
            ListingQuery::Alcoholic(class) => Endpoint::FilterAlcoholic(*class),
            ListingQuery::Category(category) => Endpoint::FilterCategory(category.clone()),
            ListingQuery::Glass(glass) => Endpoint::FilterGlass(glass.clone()),
            ListingQuery::All => match default_first_letter {
                Some(letter) if !letter.is_empty() => Endpoint::FirstLetter(letter.to_string()),
                _ => Endpoint::Search(String::new()),
            },
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Lookup(_) => "lookup.php",
            Endpoint::Random => "random.php",
            Endpoint::Search(_) | Endpoint::FirstLetter(_) => "search.php",
            Endpoint::FilterAlcoholic(_)
            | Endpoint::FilterCategory(_)
            | Endpoint::FilterGlass(_) => "filter.php",
            Endpoint::ListCategories | Endpoint::ListGlasses => "list.php",
        }
    }

    /// Unencoded query pairs; the HTTP client encodes them
    pub fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            Endpoint::Lookup(id) => vec![("i", id.clone())],
            Endpoint::Random => Vec::new(),
            Endpoint::Search(text) => vec![("s", text.clone())],
            Endpoint::FirstLetter(letter) => vec![("f", letter.clone())],
            Endpoint::FilterAlcoholic(class) => vec![("a", class.as_query().to_string())],
            Endpoint::FilterCategory(category) => vec![("c", category.clone())],
            Endpoint::FilterGlass(glass) => vec![("g", glass.clone())],
            Endpoint::ListCategories => vec![("c", "list".to_string())],
            Endpoint::ListGlasses => vec![("g", "list".to_string())],
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())?;
        for (i, (key, value)) in self.query().iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{}{}={}", sep, key, value)?;
        }
        Ok(())
    }
}

/// Read access to the cocktail service
#[async_trait]
pub trait CocktailApi: Send + Sync {
    /// Look up one recipe; `Ok(None)` when the identifier is unknown
    async fn lookup(&self, id: &str) -> Result<Option<Recipe>, CocktailError>;

    /// One random recipe
    async fn random(&self) -> Result<Recipe, CocktailError>;

    /// Recipes for a listing query; an empty vector means no matches
    async fn list(&self, query: &ListingQuery) -> Result<Vec<Recipe>, CocktailError>;

    /// Glass-type vocabulary
    async fn glasses(&self) -> Result<Vec<String>, CocktailError>;

    /// Category vocabulary
    async fn categories(&self) -> Result<Vec<String>, CocktailError>;
}
