//! Recipe table access
//!
//! Parameterised queries over the `recipes` table. Every statement that
//! changes rows publishes [`CatalogEvent::RecipesChanged`] so observers can
//! re-run their queries.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::db::models::{Category, Ingredient, Recipe};
use crate::events::{CatalogEvent, EventBus};
use crate::{Error, Result};

const SELECT_RECIPE: &str = "SELECT id, name, category, steps, image_uri, ingredients_json, \
     calories, protein, cook_time, difficulty, servings, description, is_favorite FROM recipes";

/// Handle on the recipes table plus the bus its changes are published on
#[derive(Clone)]
pub struct RecipeStore {
    pool: SqlitePool,
    events: EventBus,
}

impl RecipeStore {
    pub fn new(pool: SqlitePool, events: EventBus) -> Self {
        Self { pool, events }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Insert a recipe, returning its newly assigned id
    pub async fn insert(&self, recipe: &Recipe) -> Result<i64> {
        let ingredients_json = serde_json::to_string(&recipe.ingredients)?;
        let id = sqlx::query(
            r#"
            INSERT INTO recipes (name, category, steps, image_uri, ingredients_json,
                                 calories, protein, cook_time, difficulty, servings,
                                 description, is_favorite)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&recipe.name)
        .bind(recipe.category.as_str())
        .bind(&recipe.steps)
        .bind(&recipe.image_uri)
        .bind(ingredients_json)
        .bind(recipe.calories)
        .bind(recipe.protein)
        .bind(recipe.cook_time)
        .bind(recipe.difficulty)
        .bind(recipe.servings)
        .bind(&recipe.description)
        .bind(recipe.is_favorite)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        debug!("Inserted recipe {} '{}'", id, recipe.name);
        self.events.emit_lossy(CatalogEvent::recipes_changed(1));
        Ok(id)
    }

    /// Insert several recipes in one transaction, returning their ids
    pub async fn insert_all(&self, recipes: &[Recipe]) -> Result<Vec<i64>> {
        let mut tx = self.pool.begin().await?;
        let mut ids = Vec::with_capacity(recipes.len());

        for recipe in recipes {
            let ingredients_json = serde_json::to_string(&recipe.ingredients)?;
            let id = sqlx::query(
                r#"
                INSERT INTO recipes (name, category, steps, image_uri, ingredients_json,
                                     calories, protein, cook_time, difficulty, servings,
                                     description, is_favorite)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&recipe.name)
            .bind(recipe.category.as_str())
            .bind(&recipe.steps)
            .bind(&recipe.image_uri)
            .bind(ingredients_json)
            .bind(recipe.calories)
            .bind(recipe.protein)
            .bind(recipe.cook_time)
            .bind(recipe.difficulty)
            .bind(recipe.servings)
            .bind(&recipe.description)
            .bind(recipe.is_favorite)
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();
            ids.push(id);
        }

        tx.commit().await?;

        if !ids.is_empty() {
            self.events
                .emit_lossy(CatalogEvent::recipes_changed(ids.len() as u64));
        }
        Ok(ids)
    }

    /// Overwrite every column of the row with `recipe.id`
    pub async fn update(&self, recipe: &Recipe) -> Result<()> {
        let ingredients_json = serde_json::to_string(&recipe.ingredients)?;
        let affected = sqlx::query(
            r#"
            UPDATE recipes
            SET name = ?, category = ?, steps = ?, image_uri = ?, ingredients_json = ?,
                calories = ?, protein = ?, cook_time = ?, difficulty = ?, servings = ?,
                description = ?, is_favorite = ?
            WHERE id = ?
            "#,
        )
        .bind(&recipe.name)
        .bind(recipe.category.as_str())
        .bind(&recipe.steps)
        .bind(&recipe.image_uri)
        .bind(ingredients_json)
        .bind(recipe.calories)
        .bind(recipe.protein)
        .bind(recipe.cook_time)
        .bind(recipe.difficulty)
        .bind(recipe.servings)
        .bind(&recipe.description)
        .bind(recipe.is_favorite)
        .bind(recipe.id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(Error::NotFound(format!("Recipe {}", recipe.id)));
        }

        self.events.emit_lossy(CatalogEvent::recipes_changed(affected));
        Ok(())
    }

    /// Delete by id; returns false if no such recipe existed
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let affected = sqlx::query("DELETE FROM recipes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if affected > 0 {
            self.events.emit_lossy(CatalogEvent::recipes_changed(affected));
        }
        Ok(affected > 0)
    }

    /// All recipes in id order
    pub async fn all(&self) -> Result<Vec<Recipe>> {
        let rows = sqlx::query(&format!("{SELECT_RECIPE} ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(recipe_from_row).collect()
    }

    /// Recipes whose name contains `query` (SQLite LIKE, ASCII case-insensitive)
    pub async fn search(&self, query: &str) -> Result<Vec<Recipe>> {
        let rows = sqlx::query(&format!(
            "{SELECT_RECIPE} WHERE name LIKE '%' || ? || '%' ORDER BY id"
        ))
        .bind(query)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(recipe_from_row).collect()
    }

    /// Recipes in exactly `category`
    pub async fn by_category(&self, category: Category) -> Result<Vec<Recipe>> {
        let rows = sqlx::query(&format!("{SELECT_RECIPE} WHERE category = ? ORDER BY id"))
            .bind(category.as_str())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(recipe_from_row).collect()
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Recipe>> {
        let row = sqlx::query(&format!("{SELECT_RECIPE} WHERE id = ? LIMIT 1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(recipe_from_row).transpose()
    }

    /// One recipe picked uniformly at random; None when the table is empty
    pub async fn random(&self) -> Result<Option<Recipe>> {
        let row = sqlx::query(&format!("{SELECT_RECIPE} ORDER BY RANDOM() LIMIT 1"))
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(recipe_from_row).transpose()
    }

    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM recipes")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn recipe_from_row(row: &SqliteRow) -> Result<Recipe> {
    let category: String = row.try_get("category")?;
    let ingredients_json: String = row.try_get("ingredients_json")?;
    let ingredients: Vec<Ingredient> = serde_json::from_str(&ingredients_json)?;

    Ok(Recipe {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        category: category.parse()?,
        ingredients,
        steps: row.try_get("steps")?,
        image_uri: row.try_get("image_uri")?,
        calories: row.try_get("calories")?,
        protein: row.try_get("protein")?,
        cook_time: row.try_get("cook_time")?,
        difficulty: row.try_get("difficulty")?,
        servings: row.try_get("servings")?,
        description: row.try_get("description")?,
        is_favorite: row.try_get("is_favorite")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init::init_memory_database;

    async fn setup_store() -> RecipeStore {
        let pool = init_memory_database().await.unwrap();
        RecipeStore::new(pool, EventBus::new(16))
    }

    fn curry() -> Recipe {
        Recipe::new("Pollo al Curry", Category::Dinner)
            .with_ingredients(vec![
                Ingredient::new(150.0, "g", "pechuga de pollo en cubos"),
                Ingredient::new(100.0, "ml", "leche de coco"),
            ])
            .with_steps("1. Sofreír\n2. Hervir")
            .with_nutrition(540, 35, 18)
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_round_trips() {
        let store = setup_store().await;
        let mut recipe = curry();
        recipe.id = 999; // ignored

        let id = store.insert(&recipe).await.unwrap();
        assert_eq!(id, 1);

        let loaded = store.get_by_id(id).await.unwrap().unwrap();
        recipe.id = id;
        assert_eq!(loaded, recipe);
    }

    #[tokio::test]
    async fn test_mutations_publish_events() {
        let store = setup_store().await;
        let mut rx = store.events().subscribe();

        let id = store.insert(&curry()).await.unwrap();
        assert!(rx.recv().await.unwrap().touches_recipes());

        let mut recipe = store.get_by_id(id).await.unwrap().unwrap();
        recipe.name = "Curry Rojo".to_string();
        store.update(&recipe).await.unwrap();
        assert!(rx.recv().await.unwrap().touches_recipes());

        assert!(store.delete(id).await.unwrap());
        assert!(rx.recv().await.unwrap().touches_recipes());

        // deleting a missing row changes nothing and stays silent
        assert!(!store.delete(id).await.unwrap());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_update_missing_recipe_is_not_found() {
        let store = setup_store().await;
        let mut recipe = curry();
        recipe.id = 42;
        assert!(matches!(store.update(&recipe).await, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_search_category_count_random() {
        let store = setup_store().await;
        assert!(store.random().await.unwrap().is_none());

        store
            .insert_all(&[
                curry(),
                Recipe::new("Salmón al Horno", Category::Dinner).with_steps("1. Hornear"),
                Recipe::new("Ensalada César con Pollo", Category::Lunch).with_steps("1. Mezclar"),
            ])
            .await
            .unwrap();

        assert_eq!(store.count().await.unwrap(), 3);

        let found = store.search("pollo").await.unwrap();
        let names: Vec<_> = found.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Pollo al Curry", "Ensalada César con Pollo"]);

        let dinners = store.by_category(Category::Dinner).await.unwrap();
        assert_eq!(dinners.len(), 2);
        assert!(dinners.iter().all(|r| r.category == Category::Dinner));

        assert!(store.random().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_corrupt_ingredients_json_surfaces_error() {
        let store = setup_store().await;
        let id = store.insert(&curry()).await.unwrap();
        sqlx::query("UPDATE recipes SET ingredients_json = 'not json' WHERE id = ?")
            .bind(id)
            .execute(store.pool())
            .await
            .unwrap();

        assert!(matches!(store.get_by_id(id).await, Err(Error::Serialization(_))));
    }
}
