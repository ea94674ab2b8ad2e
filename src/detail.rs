//! Single recipe page.

use log::{debug, error};
use std::sync::Arc;

use crate::api::CocktailApi;
use crate::error::CocktailError;
use crate::model::{IngredientLine, Recipe};
use crate::router::Route;
use crate::ticket::{Ticket, TicketCounter};

pub const NOT_FOUND_ERROR: &str = "Cocktail not found";
pub const LOOKUP_ERROR: &str = "Failed to fetch cocktail details";
pub const RANDOM_ERROR: &str = "Failed to fetch random cocktail";

/// A recipe with its display rows derived
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeDetail {
    pub recipe: Recipe,
    pub ingredients: Vec<IngredientLine>,
    pub instructions: Vec<String>,
}

impl RecipeDetail {
    pub fn new(recipe: Recipe, image_base: &str) -> Self {
        RecipeDetail {
            ingredients: recipe.ingredient_lines(image_base),
            instructions: recipe.instruction_sentences(),
            recipe,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Loading,
    Ready(Box<RecipeDetail>),
    /// Terminal until the view is mounted again
    Error(String),
}

pub struct DetailView {
    api: Arc<dyn CocktailApi>,
    image_base: String,
    id: String,
    state: DetailState,
    tickets: TicketCounter,
}

impl DetailView {
    pub fn new(
        api: Arc<dyn CocktailApi>,
        id: impl Into<String>,
        image_base: impl Into<String>,
    ) -> Self {
        DetailView {
            api,
            image_base: image_base.into(),
            id: id.into(),
            state: DetailState::Loading,
            tickets: TicketCounter::new(),
        }
    }

    /// Identifier currently shown (changes after "try another")
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn detail(&self) -> Option<&RecipeDetail> {
        match &self.state {
            DetailState::Ready(detail) => Some(detail.as_ref()),
            _ => None,
        }
    }

    pub fn api(&self) -> Arc<dyn CocktailApi> {
        Arc::clone(&self.api)
    }

    /// Issue the lookup for the current identifier
    pub fn begin_load(&mut self) -> Ticket {
        self.state = DetailState::Loading;
        self.tickets.issue()
    }

    /// Commit a lookup result; returns `false` when a newer fetch superseded it
    pub fn commit_load(
        &mut self,
        ticket: Ticket,
        result: Result<Option<Recipe>, CocktailError>,
    ) -> bool {
        if !self.tickets.is_current(ticket) {
            debug!(
                "Dropping stale lookup for {} (generation {})",
                self.id,
                ticket.generation()
            );
            return false;
        }

        self.state = match result {
            Ok(Some(recipe)) => {
                DetailState::Ready(Box::new(RecipeDetail::new(recipe, &self.image_base)))
            }
            Ok(None) | Err(CocktailError::NotFound(_)) => {
                error!("Cocktail {} not found", self.id);
                DetailState::Error(NOT_FOUND_ERROR.to_string())
            }
            Err(e) => {
                error!("Error fetching cocktail {}: {}", self.id, e);
                DetailState::Error(LOOKUP_ERROR.to_string())
            }
        };
        true
    }

    /// Fetch the recipe for the current identifier
    pub async fn load(&mut self) {
        let ticket = self.begin_load();
        let result = self.api.lookup(&self.id).await;
        self.commit_load(ticket, result);
    }

    /// Issue a "try another random recipe" fetch; `None` in the error state
    pub fn begin_another(&mut self) -> Option<Ticket> {
        if matches!(self.state, DetailState::Error(_)) {
            return None;
        }
        Some(self.tickets.issue())
    }

    /// Replace the shown recipe with a random one and return its route.
    ///
    /// A failed fetch moves the view into the error state.
    pub fn commit_another(
        &mut self,
        ticket: Ticket,
        result: Result<Recipe, CocktailError>,
    ) -> Option<Route> {
        if !self.tickets.is_current(ticket) {
            debug!(
                "Dropping stale random recipe (generation {})",
                ticket.generation()
            );
            return None;
        }

        match result {
            Ok(recipe) => {
                self.id = recipe.id.clone();
                let detail = RecipeDetail::new(recipe, &self.image_base);
                self.state = DetailState::Ready(Box::new(detail));
                Some(Route::detail(self.id.clone()))
            }
            Err(e) => {
                error!("Error fetching random cocktail: {}", e);
                self.state = DetailState::Error(RANDOM_ERROR.to_string());
                None
            }
        }
    }

    pub async fn try_another(&mut self) -> Option<Route> {
        let ticket = self.begin_another()?;
        let result = self.api.random().await;
        self.commit_another(ticket, result)
    }
}
