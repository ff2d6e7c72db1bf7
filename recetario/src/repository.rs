//! Recipe repository
//!
//! Wraps [`RecipeStore`] and turns its queries into reactive collections: each
//! stream yields the current result as soon as it is polled, then a fresh
//! result after every change published on the store's [`EventBus`].

use futures::stream::{Stream, StreamExt};
use recetario_common::db::RecipeStore;
use recetario_common::{Category, EventBus, Recipe, Result};
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::seed::demo_recipes;

/// Which slice of the recipe table a collection observes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeQuery {
    All,
    /// Name substring
    Search(String),
    ByCategory(Category),
}

impl RecipeQuery {
    /// Search when the query is non-blank, else the category, else everything
    pub fn select(query: &str, category: Option<Category>) -> Self {
        if !query.trim().is_empty() {
            RecipeQuery::Search(query.to_string())
        } else if let Some(category) = category {
            RecipeQuery::ByCategory(category)
        } else {
            RecipeQuery::All
        }
    }

    pub async fn fetch(&self, store: &RecipeStore) -> Result<Vec<Recipe>> {
        match self {
            RecipeQuery::All => store.all().await,
            RecipeQuery::Search(query) => store.search(query).await,
            RecipeQuery::ByCategory(category) => store.by_category(*category).await,
        }
    }
}

/// A recipe paired with how many pantry terms its ingredients contain
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub recipe: Recipe,
    pub hits: usize,
}

/// Trim and lowercase pantry terms, dropping blank ones
pub fn normalize_pantry<S: AsRef<str>>(pantry: &[S]) -> Vec<String> {
    pantry
        .iter()
        .map(|term| term.as_ref().trim().to_lowercase())
        .filter(|term| !term.is_empty())
        .collect()
}

/// Rank recipes by pantry overlap
///
/// A term counts once per recipe when it is a substring of the recipe's
/// lowercased, space-joined ingredient names. Recipes with no hit are
/// dropped; the rest are ordered by descending hits, ties keeping their
/// input order.
pub fn rank_by_pantry<S: AsRef<str>>(recipes: Vec<Recipe>, pantry: &[S]) -> Vec<Recommendation> {
    let terms = normalize_pantry(pantry);

    let mut ranked: Vec<Recommendation> = recipes
        .into_iter()
        .filter_map(|recipe| {
            let haystack = recipe.ingredient_haystack();
            let hits = terms.iter().filter(|t| haystack.contains(t.as_str())).count();
            (hits > 0).then_some(Recommendation { recipe, hits })
        })
        .collect();

    // sort_by is stable
    ranked.sort_by(|a, b| b.hits.cmp(&a.hits));
    ranked
}

/// Reactive access to the recipe catalog
#[derive(Clone)]
pub struct RecipeRepository {
    store: RecipeStore,
}

impl RecipeRepository {
    pub fn new(store: RecipeStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &RecipeStore {
        &self.store
    }

    pub fn events(&self) -> &EventBus {
        self.store.events()
    }

    /// Observe a query: current result first, then one per store change
    ///
    /// The subscription is taken before the first fetch, so a change racing
    /// the initial query still triggers a re-query. A lagged subscriber
    /// re-queries as well.
    pub fn observe(&self, query: RecipeQuery) -> impl Stream<Item = Result<Vec<Recipe>>> + Send + 'static {
        let store = self.store.clone();
        let mut rx = store.events().subscribe();

        async_stream::stream! {
            debug!("Observing {:?}", query);
            yield query.fetch(&store).await;

            loop {
                match rx.recv().await {
                    Ok(event) if event.touches_recipes() => {
                        debug!("{} received, re-running {:?}", event.event_type(), query);
                    }
                    Ok(_) => continue,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Recipe observer lagged {} events, re-running {:?}", skipped, query);
                    }
                    Err(RecvError::Closed) => break,
                }

                yield query.fetch(&store).await;
            }
        }
    }

    pub fn all(&self) -> impl Stream<Item = Result<Vec<Recipe>>> + Send + 'static {
        self.observe(RecipeQuery::All)
    }

    pub fn search(&self, query: &str) -> impl Stream<Item = Result<Vec<Recipe>>> + Send + 'static {
        self.observe(RecipeQuery::Search(query.to_string()))
    }

    pub fn by_category(&self, category: Category) -> impl Stream<Item = Result<Vec<Recipe>>> + Send + 'static {
        self.observe(RecipeQuery::ByCategory(category))
    }

    /// Search if `query` is non-blank, else by category if given, else all
    pub fn recipes(
        &self,
        query: &str,
        category: Option<Category>,
    ) -> impl Stream<Item = Result<Vec<Recipe>>> + Send + 'static {
        self.observe(RecipeQuery::select(query, category))
    }

    /// Pantry ranking over the whole catalog, recomputed on every change
    pub fn recommend(
        &self,
        pantry: &[String],
    ) -> impl Stream<Item = Result<Vec<Recommendation>>> + Send + 'static {
        let terms = normalize_pantry(pantry);
        self.all()
            .map(move |result| result.map(|recipes| rank_by_pantry(recipes, terms.as_slice())))
    }

    pub async fn insert(&self, recipe: &Recipe) -> Result<i64> {
        self.store.insert(recipe).await
    }

    pub async fn insert_all(&self, recipes: &[Recipe]) -> Result<Vec<i64>> {
        self.store.insert_all(recipes).await
    }

    pub async fn update(&self, recipe: &Recipe) -> Result<()> {
        self.store.update(recipe).await
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        self.store.delete(id).await
    }

    /// Flip the favorite flag and persist the whole record
    ///
    /// Returns the record as written.
    pub async fn toggle_favorite(&self, recipe: &Recipe) -> Result<Recipe> {
        let mut toggled = recipe.clone();
        toggled.is_favorite = !recipe.is_favorite;
        self.store.update(&toggled).await?;
        debug!("Recipe {} favorite = {}", toggled.id, toggled.is_favorite);
        Ok(toggled)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Recipe>> {
        self.store.get_by_id(id).await
    }

    pub async fn random(&self) -> Result<Option<Recipe>> {
        self.store.random().await
    }

    pub async fn count(&self) -> Result<i64> {
        self.store.count().await
    }

    /// Insert the demo catalog when the store holds no recipes
    ///
    /// Returns the number of recipes inserted (0 if the store was not empty).
    pub async fn seed_if_empty(&self) -> Result<usize> {
        if self.store.count().await? > 0 {
            debug!("Store already has recipes, skipping demo data");
            return Ok(0);
        }

        let ids = self.store.insert_all(&demo_recipes()).await?;
        info!("Seeded {} demo recipes", ids.len());
        Ok(ids.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recetario_common::Ingredient;

    fn recipe(name: &str, ingredients: &[&str]) -> Recipe {
        Recipe::new(name, Category::Breakfast)
            .with_ingredients(ingredients.iter().map(|n| Ingredient::named(*n)).collect())
    }

    #[test]
    fn test_select_prefers_search_then_category() {
        assert_eq!(
            RecipeQuery::select("pollo", Some(Category::Dinner)),
            RecipeQuery::Search("pollo".to_string())
        );
        assert_eq!(
            RecipeQuery::select("   ", Some(Category::Dinner)),
            RecipeQuery::ByCategory(Category::Dinner)
        );
        assert_eq!(RecipeQuery::select("", None), RecipeQuery::All);
    }

    #[test]
    fn test_rank_by_pantry_orders_by_hits() {
        let recipes = vec![
            recipe("A", &["Huevo", "Leche"]),
            recipe("B", &["pan"]),
            recipe("C", &["huevos"]),
        ];

        let ranked = rank_by_pantry(recipes, &["huevo", "leche"]);
        let summary: Vec<(&str, usize)> = ranked
            .iter()
            .map(|r| (r.recipe.name.as_str(), r.hits))
            .collect();
        assert_eq!(summary, vec![("A", 2), ("C", 1)]);
    }

    #[test]
    fn test_rank_ties_keep_input_order() {
        let recipes = vec![
            recipe("Primera", &["arroz"]),
            recipe("Doble", &["arroz", "pollo"]),
            recipe("Segunda", &["arroz blanco"]),
        ];

        let ranked = rank_by_pantry(recipes, &["  ARROZ ", "pollo"]);
        let names: Vec<&str> = ranked.iter().map(|r| r.recipe.name.as_str()).collect();
        assert_eq!(names, vec!["Doble", "Primera", "Segunda"]);
    }

    #[test]
    fn test_blank_pantry_terms_match_nothing() {
        let ranked = rank_by_pantry(vec![recipe("A", &["sal"])], &["", "   "]);
        assert!(ranked.is_empty());
        assert!(normalize_pantry::<&str>(&[]).is_empty());
    }

    #[test]
    fn test_terms_match_across_ingredient_boundaries() {
        // names are joined with a space before matching
        let ranked = rank_by_pantry(vec![recipe("A", &["pan", "rallado"])], &["pan rallado"]);
        assert_eq!(ranked.len(), 1);
    }
}
