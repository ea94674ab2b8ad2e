use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::CocktailError;

/// Number of positional ingredient/measure slots a recipe carries
pub const INGREDIENT_SLOTS: usize = 15;

/// Shown in place of a blank or missing measure
pub const DEFAULT_MEASURE: &str = "To taste";

/// Characters `encodeURIComponent` leaves untouched
pub(crate) const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// One positional (ingredient, measure) pair as the service returns it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngredientSlot {
    pub ingredient: Option<String>,
    pub measure: Option<String>,
}

/// A cocktail entry as returned by the service
///
/// Filter endpoints only return `id`, `name` and `thumbnail`; every other field
/// is then empty. Serializing produces the service's flat wire shape, so a
/// recipe written to the cache reads back unchanged.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(from = "RawRecipe", into = "RawRecipe")]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub thumbnail: String,
    pub category: Option<String>,
    pub alcoholic: Option<String>,
    pub glass: Option<String>,
    pub instructions: String,
    pub slots: [IngredientSlot; INGREDIENT_SLOTS],
}

/// Derived display row for one kept ingredient slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientLine {
    pub ingredient: String,
    pub measure: String,
    pub image: String,
}

impl Recipe {
    /// Scan slots 1..=15 in order, keeping those with a non-blank ingredient
    pub fn ingredient_lines(&self, image_base: &str) -> Vec<IngredientLine> {
        self.slots
            .iter()
            .filter_map(|slot| {
                let ingredient = slot.ingredient.as_deref().map(str::trim)?;
                if ingredient.is_empty() {
                    return None;
                }
                let measure = slot
                    .measure
                    .as_deref()
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
                    .unwrap_or(DEFAULT_MEASURE);

                Some(IngredientLine {
                    ingredient: ingredient.to_string(),
                    measure: measure.to_string(),
                    image: ingredient_image_url(image_base, ingredient),
                })
            })
            .collect()
    }

    /// Instructions split into display sentences, see [`instruction_sentences`]
    pub fn instruction_sentences(&self) -> Vec<String> {
        instruction_sentences(&self.instructions)
    }
}

/// Thumbnail URL for an ingredient: `{base}/{encoded name}-Small.png`
pub fn ingredient_image_url(image_base: &str, ingredient: &str) -> String {
    format!(
        "{}/{}-Small.png",
        image_base.trim_end_matches('/'),
        utf8_percent_encode(ingredient, COMPONENT)
    )
}

/// Split free text on '.', dropping empty fragments and re-appending the period.
///
/// Purely cosmetic: abbreviations and decimals ("2.5 oz") are split as well.
pub fn instruction_sentences(text: &str) -> Vec<String> {
    text.split('.')
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(|fragment| format!("{}.", fragment))
        .collect()
}

/// Wire representation; ingredient slots stay in the flattened remainder
#[derive(Deserialize, Serialize)]
struct RawRecipe {
    #[serde(rename = "idDrink")]
    id: String,
    #[serde(rename = "strDrink", default)]
    name: Option<String>,
    #[serde(rename = "strDrinkThumb", default)]
    thumbnail: Option<String>,
    #[serde(rename = "strCategory", default)]
    category: Option<String>,
    #[serde(rename = "strAlcoholic", default)]
    alcoholic: Option<String>,
    #[serde(rename = "strGlass", default)]
    glass: Option<String>,
    #[serde(rename = "strInstructions", default)]
    instructions: Option<String>,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

fn slot_field(rest: &Map<String, Value>, key: String) -> Option<String> {
    rest.get(&key).and_then(Value::as_str).map(str::to_string)
}

impl From<RawRecipe> for Recipe {
    fn from(raw: RawRecipe) -> Self {
        let mut slots: [IngredientSlot; INGREDIENT_SLOTS] = Default::default();
        for (index, slot) in slots.iter_mut().enumerate() {
            let n = index + 1;
            slot.ingredient = slot_field(&raw.rest, format!("strIngredient{}", n));
            slot.measure = slot_field(&raw.rest, format!("strMeasure{}", n));
        }

        Recipe {
            id: raw.id,
            name: raw.name.unwrap_or_default(),
            thumbnail: raw.thumbnail.unwrap_or_default(),
            category: raw.category,
            alcoholic: raw.alcoholic,
            glass: raw.glass,
            instructions: raw.instructions.unwrap_or_default(),
            slots,
        }
    }
}

impl From<Recipe> for RawRecipe {
    fn from(recipe: Recipe) -> Self {
        let mut rest = Map::new();
        for (index, slot) in recipe.slots.into_iter().enumerate() {
            let n = index + 1;
            rest.insert(
                format!("strIngredient{}", n),
                slot.ingredient.map(Value::String).unwrap_or(Value::Null),
            );
            rest.insert(
                format!("strMeasure{}", n),
                slot.measure.map(Value::String).unwrap_or(Value::Null),
            );
        }

        RawRecipe {
            id: recipe.id,
            name: Some(recipe.name),
            thumbnail: Some(recipe.thumbnail),
            category: recipe.category,
            alcoholic: recipe.alcoholic,
            glass: recipe.glass,
            instructions: Some(recipe.instructions),
            rest,
        }
    }
}

/// Alcoholic classification accepted by `filter.php?a=`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alcoholic {
    Alcoholic,
    NonAlcoholic,
    OptionalAlcohol,
}

impl Alcoholic {
    pub const ALL: [Alcoholic; 3] = [
        Alcoholic::Alcoholic,
        Alcoholic::NonAlcoholic,
        Alcoholic::OptionalAlcohol,
    ];

    /// Value sent to the service and kept in the location
    pub fn as_query(&self) -> &'static str {
        match self {
            Alcoholic::Alcoholic => "Alcoholic",
            Alcoholic::NonAlcoholic => "Non_Alcoholic",
            Alcoholic::OptionalAlcohol => "Optional_alcohol",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Alcoholic::Alcoholic => "Alcoholic",
            Alcoholic::NonAlcoholic => "Non alcoholic",
            Alcoholic::OptionalAlcohol => "Optional alcohol",
        }
    }
}

impl fmt::Display for Alcoholic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Alcoholic {
    type Err = CocktailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Alcoholic::ALL
            .into_iter()
            .find(|class| {
                class.as_query().eq_ignore_ascii_case(wanted)
                    || class.display_name().eq_ignore_ascii_case(wanted)
                    || class.display_name().replace(' ', "-").eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| CocktailError::InvalidFilter(format!("unknown alcoholic class '{}'", s)))
    }
}

/// Which of the three mutually exclusive filters a value applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Alcoholic,
    Category,
    Glass,
}

/// What the listing shows; search and the three filters exclude each other
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ListingQuery {
    /// Default listing, no search and no filter
    #[default]
    All,
    Search(String),
    Alcoholic(Alcoholic),
    Category(String),
    Glass(String),
}

impl ListingQuery {
    /// Free-text search; an empty string means no search
    pub fn search(text: &str) -> Self {
        if text.is_empty() {
            ListingQuery::All
        } else {
            ListingQuery::Search(text.to_string())
        }
    }

    /// One filter; an empty value selects "All"
    pub fn filter(kind: FilterKind, value: &str) -> Result<Self, CocktailError> {
        if value.trim().is_empty() {
            return Ok(ListingQuery::All);
        }
        Ok(match kind {
            FilterKind::Alcoholic => ListingQuery::Alcoholic(value.parse()?),
            FilterKind::Category => ListingQuery::Category(value.to_string()),
            FilterKind::Glass => ListingQuery::Glass(value.to_string()),
        })
    }

    /// Resolve several candidate values by precedence:
    /// search > alcoholic > category > glass > default listing
    pub fn from_parts(
        search: Option<&str>,
        alcoholic: Option<Alcoholic>,
        category: Option<&str>,
        glass: Option<&str>,
    ) -> Self {
        let non_empty = |v: Option<&str>| v.filter(|s| !s.is_empty()).map(str::to_string);

        if let Some(text) = non_empty(search) {
            ListingQuery::Search(text)
        } else if let Some(class) = alcoholic {
            ListingQuery::Alcoholic(class)
        } else if let Some(category) = non_empty(category) {
            ListingQuery::Category(category)
        } else if let Some(glass) = non_empty(glass) {
            ListingQuery::Glass(glass)
        } else {
            ListingQuery::All
        }
    }

    pub fn search_text(&self) -> &str {
        match self {
            ListingQuery::Search(text) => text,
            _ => "",
        }
    }

    pub fn alcoholic(&self) -> Option<Alcoholic> {
        match self {
            ListingQuery::Alcoholic(class) => Some(*class),
            _ => None,
        }
    }

    pub fn category(&self) -> &str {
        match self {
            ListingQuery::Category(category) => category,
            _ => "",
        }
    }

    pub fn glass(&self) -> &str {
        match self {
            ListingQuery::Glass(glass) => glass,
            _ => "",
        }
    }
}
