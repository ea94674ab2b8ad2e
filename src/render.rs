//! Plain-text rendering of the two views.

use std::fmt;

use crate::detail::{DetailState, DetailView};
use crate::listing::{ListingView, NO_RESULTS};
use crate::model::{ListingQuery, Recipe};
use crate::router::Route;

/// Characters of the daily recipe's instructions shown on the listing
const DAILY_PREVIEW_CHARS: usize = 240;

pub struct ListingPage<'a>(pub &'a ListingView);

pub struct DetailPage<'a>(pub &'a DetailView);

fn selected<'a>(value: &'a str, all: &'a str) -> &'a str {
    if value.is_empty() {
        all
    } else {
        value
    }
}

fn badges(recipe: &Recipe) -> String {
    [&recipe.category, &recipe.alcoholic, &recipe.glass]
        .into_iter()
        .flatten()
        .filter(|badge| !badge.is_empty())
        .map(|badge| format!("[{}]", badge))
        .collect::<Vec<_>>()
        .join(" ")
}

fn preview(text: &str) -> String {
    if text.chars().count() <= DAILY_PREVIEW_CHARS {
        return text.to_string();
    }
    let cut: String = text.chars().take(DAILY_PREVIEW_CHARS).collect();
    format!("{}...", cut.trim_end())
}

impl fmt::Display for ListingPage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.0;
        let query = view.query();

        writeln!(f, "Search: {}", selected(query.search_text(), "(none)"))?;
        writeln!(
            f,
            "Category: {} | Glass: {} | Type: {}",
            selected(query.category(), "All Categories"),
            selected(query.glass(), "All Glasses"),
            query
                .alcoholic()
                .map(|class| class.display_name())
                .unwrap_or("All Types"),
        )?;

        let vocabulary = view.vocabulary();
        if !vocabulary.categories.is_empty() {
            writeln!(f, "  categories: {}", vocabulary.categories.join(", "))?;
        }
        if !vocabulary.glasses.is_empty() {
            writeln!(f, "  glasses: {}", vocabulary.glasses.join(", "))?;
        }

        for banner in [view.vocabulary_error(), view.error()].into_iter().flatten() {
            writeln!(f, "! {}", banner)?;
        }

        if let Some(daily) = view.daily() {
            writeln!(f)?;
            writeln!(f, "== Cocktail of the Day ==")?;
            writeln!(f, "{}  {}", daily.name, badges(daily))?;
            if !daily.instructions.is_empty() {
                writeln!(f, "  {}", preview(&daily.instructions))?;
            }
            writeln!(f, "  View Full Recipe -> {}", Route::detail(daily.id.as_str()))?;
        }

        writeln!(f)?;
        match query {
            ListingQuery::All => writeln!(f, "== Cocktails ==")?,
            _ => writeln!(f, "== Cocktails ({}) ==", view.route())?,
        }
        if view.is_loading() {
            writeln!(f, "Loading...")?;
        } else if view.no_results() {
            writeln!(f, "{}", view.error().unwrap_or(NO_RESULTS))?;
        } else {
            for recipe in view.results() {
                writeln!(
                    f,
                    "  {:<40} {:<45} {}",
                    recipe.name,
                    badges(recipe),
                    Route::detail(recipe.id.as_str())
                )?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for DetailPage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let detail = match self.0.state() {
            DetailState::Loading => return writeln!(f, "Loading..."),
            DetailState::Error(message) => {
                writeln!(f, "{}", message)?;
                return writeln!(f, "Return to Home: {}", Route::root());
            }
            DetailState::Ready(detail) => detail,
        };
        let recipe = &detail.recipe;

        writeln!(f, "<- Back to Cocktails    [Try Another Random Cocktail]")?;
        writeln!(f)?;
        writeln!(f, "{}", recipe.name)?;
        let badges = badges(recipe);
        if !badges.is_empty() {
            writeln!(f, "{}", badges)?;
        }
        if !recipe.thumbnail.is_empty() {
            writeln!(f, "Image: {}", recipe.thumbnail)?;
        }

        writeln!(f)?;
        writeln!(f, "Ingredients")?;
        for line in &detail.ingredients {
            writeln!(f, "  - {:<30} {:<20} {}", line.ingredient, line.measure, line.image)?;
        }

        writeln!(f)?;
        writeln!(f, "Instructions")?;
        for sentence in &detail.instructions {
            writeln!(f, "  {}", sentence)?;
        }
        Ok(())
    }
}
