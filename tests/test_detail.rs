use cocktail_finder::detail::{LOOKUP_ERROR, NOT_FOUND_ERROR, RANDOM_ERROR};
use cocktail_finder::{
    CocktailApi, CocktailDbClient, DetailPage, DetailState, DetailView, Route, DEFAULT_MEASURE,
};
use mockito::{Matcher, ServerGuard};
use serde_json::json;
use std::sync::Arc;

const IMAGES: &str = "https://www.thecocktaildb.com/images/ingredients";

fn margarita() -> serde_json::Value {
    json!({
        "idDrink": "11007",
        "strDrink": "Margarita",
        "strDrinkThumb": "https://example.com/margarita.jpg",
        "strCategory": "Ordinary Drink",
        "strAlcoholic": "Alcoholic",
        "strGlass": "Cocktail glass",
        "strInstructions": "Rub the rim of the glass with the lime slice. Shake with ice. Serve.",
        "strIngredient1": "Tequila",
        "strMeasure1": "1 1/2 oz ",
        "strIngredient2": "Triple sec",
        "strMeasure2": "1/2 oz ",
        "strIngredient3": "",
        "strMeasure3": "",
        "strIngredient4": "Lime juice",
        "strMeasure4": "1 oz ",
        "strIngredient5": "Salt",
        "strMeasure5": null,
        "strIngredient6": null,
        "strMeasure6": null
    })
}

fn mojito() -> serde_json::Value {
    json!({
        "idDrink": "11000",
        "strDrink": "Mojito",
        "strDrinkThumb": "https://example.com/mojito.jpg",
        "strCategory": "Cocktail",
        "strAlcoholic": "Alcoholic",
        "strGlass": "Highball glass",
        "strInstructions": "Muddle mint leaves with sugar and lime juice. Top with soda water.",
        "strIngredient1": "Light rum",
        "strMeasure1": "2-3 oz ",
        "strIngredient2": "Mint",
        "strMeasure2": "2-4 "
    })
}

fn drinks(items: Vec<serde_json::Value>) -> String {
    json!({ "drinks": items }).to_string()
}

fn detail_for(server: &ServerGuard, id: &str) -> DetailView {
    let api: Arc<dyn CocktailApi> = Arc::new(CocktailDbClient::with_base_url(server.url()));
    DetailView::new(api, id, IMAGES)
}

#[tokio::test]
async fn test_load_derives_ingredients_and_instructions() {
    let mut server = mockito::Server::new_async().await;
    let lookup = server
        .mock("GET", "/lookup.php")
        .match_query(Matcher::UrlEncoded("i".into(), "11007".into()))
        .with_status(200)
        .with_body(drinks(vec![margarita()]))
        .expect(1)
        .create_async()
        .await;

    let mut view = detail_for(&server, "11007");
    assert_eq!(view.state(), &DetailState::Loading);
    view.load().await;

    let detail = view.detail().unwrap();
    let names: Vec<&str> = detail.ingredients.iter().map(|l| l.ingredient.as_str()).collect();
    assert_eq!(names, vec!["Tequila", "Triple sec", "Lime juice", "Salt"]);
    assert_eq!(detail.ingredients[0].measure, "1 1/2 oz");
    assert_eq!(detail.ingredients[3].measure, DEFAULT_MEASURE);
    assert_eq!(
        detail.ingredients[2].image,
        format!("{}/Lime%20juice-Small.png", IMAGES)
    );
    assert_eq!(
        detail.instructions,
        vec![
            "Rub the rim of the glass with the lime slice.",
            "Shake with ice.",
            "Serve."
        ]
    );
    lookup.assert_async().await;

    let page = DetailPage(&view).to_string();
    assert!(page.contains("Margarita"));
    assert!(page.contains("[Ordinary Drink] [Alcoholic] [Cocktail glass]"));
    assert!(page.contains("Shake with ice."));
}

#[tokio::test]
async fn test_unknown_id_is_error_state() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/lookup.php")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"drinks": null}"#)
        .create_async()
        .await;

    let mut view = detail_for(&server, "424242");
    view.load().await;

    assert_eq!(view.state(), &DetailState::Error(NOT_FOUND_ERROR.to_string()));
    let page = DetailPage(&view).to_string();
    assert!(page.contains(NOT_FOUND_ERROR));
    assert!(page.contains("Return to Home: /"));
}

#[tokio::test]
async fn test_missing_drinks_field_is_not_found() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/lookup.php")
        .match_query(Matcher::UrlEncoded("i".into(), "999".into()))
        .with_status(200)
        .with_body(r#"{}"#)
        .create_async()
        .await;

    let mut view = detail_for(&server, "999");
    view.load().await;
    assert_eq!(view.state(), &DetailState::Error(NOT_FOUND_ERROR.to_string()));
}

#[tokio::test]
async fn test_non_object_body_is_lookup_error() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/lookup.php")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"[1, 2, 3]"#)
        .create_async()
        .await;

    let mut view = detail_for(&server, "1");
    view.load().await;
    assert_eq!(view.state(), &DetailState::Error(LOOKUP_ERROR.to_string()));
}

#[tokio::test]
async fn test_transport_failure_is_error_state() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/lookup.php")
        .match_query(Matcher::Any)
        .with_status(502)
        .create_async()
        .await;

    let mut view = detail_for(&server, "11007");
    view.load().await;
    assert_eq!(view.state(), &DetailState::Error(LOOKUP_ERROR.to_string()));
}

#[tokio::test]
async fn test_try_another_replaces_recipe() {
    let mut server = mockito::Server::new_async().await;
    let _lookup = server
        .mock("GET", "/lookup.php")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(drinks(vec![margarita()]))
        .create_async()
        .await;
    let _random = server
        .mock("GET", "/random.php")
        .with_status(200)
        .with_body(drinks(vec![mojito()]))
        .create_async()
        .await;

    let mut view = detail_for(&server, "11007");
    view.load().await;

    let route = view.try_another().await;
    assert_eq!(route, Some(Route::detail("11000")));
    assert_eq!(view.id(), "11000");

    let detail = view.detail().unwrap();
    assert_eq!(detail.recipe.name, "Mojito");
    // ingredients are derived from the new recipe, not kept from the old one
    assert_eq!(detail.ingredients.len(), 2);
    assert_eq!(detail.ingredients[0].ingredient, "Light rum");
}

#[tokio::test]
async fn test_try_another_failure_is_error_state() {
    let mut server = mockito::Server::new_async().await;
    let _lookup = server
        .mock("GET", "/lookup.php")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(drinks(vec![margarita()]))
        .create_async()
        .await;
    let _random = server
        .mock("GET", "/random.php")
        .with_status(500)
        .create_async()
        .await;

    let mut view = detail_for(&server, "11007");
    view.load().await;

    assert_eq!(view.try_another().await, None);
    assert_eq!(view.state(), &DetailState::Error(RANDOM_ERROR.to_string()));
    assert_eq!(view.id(), "11007");
}

#[tokio::test]
async fn test_error_state_is_terminal() {
    let mut server = mockito::Server::new_async().await;
    let _lookup = server
        .mock("GET", "/lookup.php")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"drinks": null}"#)
        .create_async()
        .await;
    let random = server
        .mock("GET", "/random.php")
        .with_status(200)
        .with_body(drinks(vec![mojito()]))
        .expect(0)
        .create_async()
        .await;

    let mut view = detail_for(&server, "0");
    view.load().await;

    assert_eq!(view.try_another().await, None);
    assert!(matches!(view.state(), DetailState::Error(_)));
    random.assert_async().await;
}

#[tokio::test]
async fn test_stale_lookup_does_not_overwrite_random_recipe() {
    let server = mockito::Server::new_async().await;
    let mut view = detail_for(&server, "11007");

    let lookup_ticket = view.begin_load();
    let random_ticket = view.begin_another().unwrap();

    let route = view.commit_another(
        random_ticket,
        Ok(serde_json::from_value(mojito()).unwrap()),
    );
    assert_eq!(route, Some(Route::detail("11000")));

    let committed = view.commit_load(
        lookup_ticket,
        Ok(Some(serde_json::from_value(margarita()).unwrap())),
    );
    assert!(!committed);
    assert_eq!(view.detail().unwrap().recipe.name, "Mojito");
}
