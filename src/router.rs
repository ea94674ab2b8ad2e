//! Addressable locations and navigation history.

use log::warn;
use percent_encoding::{percent_decode_str, utf8_percent_encode};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use url::form_urlencoded;
use url::Url;

use crate::error::CocktailError;
use crate::model::{Alcoholic, ListingQuery, COMPONENT};

const PARSE_BASE: &str = "http://localhost/";

/// How an in-place recipe change updates history
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryMode {
    /// Add a new entry
    Push,
    /// Overwrite the current entry
    #[default]
    Replace,
}

/// Where "back" leads from the detail view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackTarget {
    /// Always the unfiltered listing
    Root,
    /// The previous history entry, or the listing when there is none
    #[default]
    PreviousEntry,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`, optionally with `search`, `category`, `glass` or `alcoholic`
    Listing(ListingQuery),
    /// `/cocktail/{id}`
    Detail(String),
}

impl Route {
    pub fn root() -> Self {
        Route::Listing(ListingQuery::All)
    }

    pub fn detail(id: impl Into<String>) -> Self {
        Route::Detail(id.into())
    }
}

impl Default for Route {
    fn default() -> Self {
        Route::root()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Detail(id) => write!(f, "/cocktail/{}", utf8_percent_encode(id, COMPONENT)),
            Route::Listing(query) => {
                let pair = match query {
                    ListingQuery::All => None,
                    ListingQuery::Search(text) => Some(("search", text.as_str())),
                    ListingQuery::Alcoholic(class) => Some(("alcoholic", class.as_query())),
                    ListingQuery::Category(category) => Some(("category", category.as_str())),
                    ListingQuery::Glass(glass) => Some(("glass", glass.as_str())),
                };
                match pair {
                    None => f.write_str("/"),
                    Some((key, value)) => {
                        let encoded = form_urlencoded::Serializer::new(String::new())
                            .append_pair(key, value)
                            .finish();
                        write!(f, "/?{}", encoded)
                    }
                }
            }
        }
    }
}

impl FromStr for Route {
    type Err = CocktailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let location = s.trim();
        if !location.starts_with('/') || location.starts_with("//") {
            return Err(CocktailError::InvalidRoute(s.to_string()));
        }
        let url = Url::parse(PARSE_BASE)
            .and_then(|base| base.join(location))
            .map_err(|e| CocktailError::InvalidRoute(format!("{}: {}", s, e)))?;

        let segments: Vec<&str> = url
            .path_segments()
            .map(|segments| segments.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();

        match segments.as_slice() {
            [] => Ok(Route::Listing(listing_query(&url))),
            ["cocktail", id] => {
                let id = percent_decode_str(id).decode_utf8_lossy().to_string();
                Ok(Route::Detail(id))
            }
            _ => Err(CocktailError::InvalidRoute(s.to_string())),
        }
    }
}

/// Rebuild the listing query from location parameters, resolving several by precedence
fn listing_query(url: &Url) -> ListingQuery {
    let mut search = None;
    let mut alcoholic = None;
    let mut category = None;
    let mut glass = None;

    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "search" => search = Some(value.into_owned()),
            "category" => category = Some(value.into_owned()),
            "glass" => glass = Some(value.into_owned()),
            "alcoholic" if !value.is_empty() => match value.parse::<Alcoholic>() {
                Ok(class) => alcoholic = Some(class),
                Err(e) => warn!("Ignoring location parameter: {}", e),
            },
            _ => {}
        }
    }

    ListingQuery::from_parts(
        search.as_deref(),
        alcoholic,
        category.as_deref(),
        glass.as_deref(),
    )
}

/// Linear navigation history with a cursor, like a browser tab's
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Route>,
    index: usize,
}

impl History {
    pub fn new(initial: Route) -> Self {
        History {
            entries: vec![initial],
            index: 0,
        }
    }

    pub fn current(&self) -> &Route {
        &self.entries[self.index]
    }

    /// Never zero: history always holds the entry it started from
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Add an entry after the cursor, dropping any forward entries
    pub fn push(&mut self, route: Route) {
        self.entries.truncate(self.index + 1);
        self.entries.push(route);
        self.index = self.entries.len() - 1;
    }

    /// Overwrite the entry under the cursor
    pub fn replace(&mut self, route: Route) {
        self.entries[self.index] = route;
    }

    pub fn apply(&mut self, route: Route, mode: HistoryMode) {
        match mode {
            HistoryMode::Push => self.push(route),
            HistoryMode::Replace => self.replace(route),
        }
    }

    pub fn can_go_back(&self) -> bool {
        self.index > 0
    }

    /// Move the cursor one entry back; `None` at the first entry
    pub fn back(&mut self) -> Option<&Route> {
        if !self.can_go_back() {
            return None;
        }
        self.index -= 1;
        Some(&self.entries[self.index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_listing_routes() {
        assert_eq!("/".parse::<Route>().unwrap(), Route::root());
        assert_eq!(
            "/?search=blue%20lagoon".parse::<Route>().unwrap(),
            Route::Listing(ListingQuery::Search("blue lagoon".into()))
        );
        assert_eq!(
            "/?alcoholic=Non_Alcoholic".parse::<Route>().unwrap(),
            Route::Listing(ListingQuery::Alcoholic(Alcoholic::NonAlcoholic))
        );
    }

    #[test]
    fn test_parse_resolves_precedence() {
        let route: Route = "/?glass=Highball+glass&category=Shot&search=".parse().unwrap();
        assert_eq!(route, Route::Listing(ListingQuery::Category("Shot".into())));

        let route: Route = "/?alcoholic=wine&glass=Mug".parse().unwrap();
        assert_eq!(route, Route::Listing(ListingQuery::Glass("Mug".into())));
    }

    #[test]
    fn test_parse_detail_routes() {
        assert_eq!("/cocktail/11007".parse::<Route>().unwrap(), Route::detail("11007"));
        assert_eq!("/cocktail/11007/".parse::<Route>().unwrap(), Route::detail("11007"));
    }

    #[test]
    fn test_parse_rejects_unknown_routes() {
        assert!("/cocktail".parse::<Route>().is_err());
        assert!("/ingredients/vodka".parse::<Route>().is_err());
        assert!("cocktail/1".parse::<Route>().is_err());
        assert!("//example.com/".parse::<Route>().is_err());
    }

    #[test]
    fn test_detail_location_keeps_id_readable() {
        assert_eq!(Route::detail("a-b_c.d~1").to_string(), "/cocktail/a-b_c.d~1");
        assert_eq!(Route::detail("a b/c?").to_string(), "/cocktail/a%20b%2Fc%3F");
        assert_eq!(
            "/cocktail/a%20b%2Fc%3F".parse::<Route>().unwrap(),
            Route::detail("a b/c?")
        );
    }

    #[test]
    fn test_routes_roundtrip() {
        let routes = vec![
            Route::root(),
            Route::detail("17222"),
            Route::detail("house-special_v2.1"),
            Route::Listing(ListingQuery::Search("gin & tonic".into())),
            Route::Listing(ListingQuery::Category("Coffee / Tea".into())),
            Route::Listing(ListingQuery::Glass("Old-fashioned glass".into())),
            Route::Listing(ListingQuery::Alcoholic(Alcoholic::OptionalAlcohol)),
        ];
        for route in routes {
            let location = route.to_string();
            assert_eq!(location.parse::<Route>().unwrap(), route, "{}", location);
        }
    }

    #[test]
    fn test_history_push_replace_back() {
        let mut history = History::new(Route::root());
        assert_eq!(history.len(), 1);
        assert!(!history.can_go_back());
        history.push(Route::detail("1"));
        assert_eq!(history.len(), 2);

        history.apply(Route::detail("2"), HistoryMode::Replace);
        assert_eq!(history.len(), 2);
        assert_eq!(history.current(), &Route::detail("2"));

        history.apply(Route::detail("3"), HistoryMode::Push);
        assert_eq!(history.len(), 3);

        assert_eq!(history.back(), Some(&Route::detail("2")));
        assert_eq!(history.back(), Some(&Route::root()));
        assert_eq!(history.back(), None);

        // pushing from the middle drops forward entries
        history.push(Route::detail("9"));
        assert_eq!(history.len(), 2);
        assert!(history.can_go_back());
    }
}
