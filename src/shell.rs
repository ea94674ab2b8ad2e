//! Maps routes to views and user commands to view actions.

use log::{debug, info};
use std::str::FromStr;
use std::sync::Arc;

use crate::api::{CocktailApi, CocktailDbClient};
use crate::config::AppConfig;
use crate::detail::DetailView;
use crate::error::CocktailError;
use crate::listing::ListingView;
use crate::model::FilterKind;
use crate::render::{DetailPage, ListingPage};
use crate::router::{BackTarget, History, Route};
use crate::store::{FileStore, KeyValueStore};

pub const HELP: &str = "\
Commands:
  search <text>      search by name (empty clears)
  category <name>    filter by category (empty = all)
  glass <name>       filter by glass (empty = all)
  type <class>       filter by Alcoholic / Non_Alcoholic / Optional_alcohol
  clear              show the default listing
  open <id>          open a recipe
  daily              open the cocktail of the day
  random             open a random recipe (on a recipe: try another)
  back               leave the recipe page
  go <route>         open a location such as /?glass=Mug or /cocktail/11007
  help               show this help
  quit               exit";

/// One user action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Filter(FilterKind, String),
    Clear,
    Open(String),
    Daily,
    Random,
    Back,
    Go(Route),
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = CocktailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "search" | "s" => Command::Search(rest.to_string()),
            "category" => Command::Filter(FilterKind::Category, rest.to_string()),
            "glass" => Command::Filter(FilterKind::Glass, rest.to_string()),
            "type" | "alcoholic" => Command::Filter(FilterKind::Alcoholic, rest.to_string()),
            "clear" => Command::Clear,
            "open" if !rest.is_empty() => Command::Open(rest.to_string()),
            "daily" => Command::Daily,
            "random" | "another" => Command::Random,
            "back" => Command::Back,
            "go" if !rest.is_empty() => Command::Go(rest.parse()?),
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            _ => return Err(CocktailError::InvalidCommand(line.to_string())),
        };
        Ok(command)
    }
}

/// What the front end should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Help,
    Quit,
}

pub enum View {
    Listing(ListingView),
    Detail(DetailView),
}

/// Owns navigation history and the mounted view
pub struct Shell {
    config: AppConfig,
    api: Arc<dyn CocktailApi>,
    store: Arc<dyn KeyValueStore>,
    history: History,
    view: View,
}

impl Shell {
    pub fn new(
        config: AppConfig,
        api: Arc<dyn CocktailApi>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        let view = View::Listing(ListingView::new(Arc::clone(&api), Arc::clone(&store)));
        Shell {
            config,
            api,
            store,
            history: History::new(Route::root()),
            view,
        }
    }

    /// Shell backed by the real service and the configured cache file
    pub fn from_config(config: AppConfig) -> Result<Self, CocktailError> {
        let api: Arc<dyn CocktailApi> = Arc::new(CocktailDbClient::new(&config)?);
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(config.cache_path.clone()));
        Ok(Self::new(config, api, store))
    }

    /// Reset history to `route` and mount its view
    pub async fn start(&mut self, route: Route) {
        self.history = History::new(route);
        self.mount().await;
    }

    /// Push `route` and mount its view
    pub async fn navigate(&mut self, route: Route) {
        info!("Navigating to {}", route);
        self.history.push(route);
        self.mount().await;
    }

    async fn mount(&mut self) {
        let route = self.history.current().clone();
        debug!("Mounting view for {}", route);
        self.view = match route {
            Route::Listing(query) => {
                let mut listing = ListingView::new(Arc::clone(&self.api), Arc::clone(&self.store))
                    .with_query(query);
                listing.mount().await;
                View::Listing(listing)
            }
            Route::Detail(id) => {
                let image_base = self.config.image_base_url.clone();
                let mut detail = DetailView::new(Arc::clone(&self.api), id, image_base);
                detail.load().await;
                View::Detail(detail)
            }
        };
    }

    pub fn current_route(&self) -> &Route {
        self.history.current()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub async fn execute(&mut self, command: Command) -> Result<Outcome, CocktailError> {
        match command {
            Command::Help => return Ok(Outcome::Help),
            Command::Quit => return Ok(Outcome::Quit),
            Command::Open(id) => self.navigate(Route::detail(id)).await,
            Command::Go(route) => self.navigate(route).await,
            Command::Search(text) => {
                let listing = self.listing_mut("search")?;
                listing.set_search(&text).await;
                self.sync_listing_location();
            }
            Command::Filter(kind, value) => {
                let listing = self.listing_mut("filters")?;
                listing.set_filter(kind, &value).await?;
                self.sync_listing_location();
            }
            Command::Clear => {
                let listing = self.listing_mut("clear")?;
                listing.set_search("").await;
                self.sync_listing_location();
            }
            Command::Daily => {
                let id = match &self.view {
                    View::Listing(listing) => listing.daily().map(|recipe| recipe.id.clone()),
                    View::Detail(_) => return Err(not_here("daily")),
                };
                match id {
                    Some(id) => self.navigate(Route::detail(id)).await,
                    None => {
                        return Err(CocktailError::InvalidCommand(
                            "no cocktail of the day available".to_string(),
                        ))
                    }
                }
            }
            Command::Random => self.random().await,
            Command::Back => self.back().await?,
        }
        Ok(Outcome::Continue)
    }

    async fn random(&mut self) {
        match &mut self.view {
            View::Listing(listing) => {
                let route = listing.random_recipe().await;
                if let Some(route) = route {
                    self.navigate(route).await;
                }
            }
            View::Detail(detail) => {
                let route = detail.try_another().await;
                if let Some(route) = route {
                    self.history.apply(route, self.config.history_mode);
                }
            }
        }
    }

    async fn back(&mut self) -> Result<(), CocktailError> {
        if !matches!(self.view, View::Detail(_)) {
            return Err(not_here("back"));
        }
        match self.config.back_target {
            BackTarget::Root => self.navigate(Route::root()).await,
            BackTarget::PreviousEntry => {
                if self.history.back().is_some() {
                    self.mount().await;
                } else {
                    self.navigate(Route::root()).await;
                }
            }
        }
        Ok(())
    }

    fn listing_mut(&mut self, action: &str) -> Result<&mut ListingView, CocktailError> {
        match &mut self.view {
            View::Listing(listing) => Ok(listing),
            View::Detail(_) => Err(not_here(action)),
        }
    }

    /// Keep the location in step with the listing's search and filters
    fn sync_listing_location(&mut self) {
        if let View::Listing(listing) = &self.view {
            self.history.replace(listing.route());
        }
    }

    /// Current view as text
    pub fn render(&self) -> String {
        let body = match &self.view {
            View::Listing(listing) => ListingPage(listing).to_string(),
            View::Detail(detail) => DetailPage(detail).to_string(),
        };
        format!("@ {}\n\n{}", self.history.current(), body)
    }
}

fn not_here(action: &str) -> CocktailError {
    CocktailError::InvalidCommand(format!("'{}' is not available on this page", action))
}
