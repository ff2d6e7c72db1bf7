//! Database schema migrations
//!
//! Stores written by older releases are upgraded in place, one version at a
//! time, tracked by the `schema_version` table.
//!
//! | Version | Change |
//! |---------|--------|
//! | 1 | original layout, ingredients as newline-separated `ingredients` TEXT |
//! | 2 | nullable `image_uri` column |
//! | 3 | `ingredients_json` column, backfilled from the legacy text |
//! | 4 | legacy `ingredients` column removed (table rebuilt) |
//!
//! # Migration Guidelines
//!
//! 1. **Never modify existing migrations** - users upgrade from any older version
//! 2. **One transaction per step** - a step and its version row commit together
//!    or not at all; a failed step aborts initialization
//! 3. **Inspect before altering** - each step checks `pragma_table_info` first,
//!    so a database already at the target layout passes through untouched

use crate::db::models::Ingredient;
use crate::{Error, Result};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{info, warn};

/// Current schema version
///
/// **IMPORTANT:** Increment this when adding new migrations
pub const CURRENT_SCHEMA_VERSION: i32 = 4;

/// Columns of the current `recipes` layout, in table order
pub const RECIPE_COLUMNS: [&str; 13] = [
    "id",
    "name",
    "category",
    "steps",
    "image_uri",
    "ingredients_json",
    "calories",
    "protein",
    "cook_time",
    "difficulty",
    "servings",
    "description",
    "is_favorite",
];

/// Name of the pre-v4 newline-separated ingredients column
const LEGACY_INGREDIENTS_COLUMN: &str = "ingredients";

/// CREATE TABLE statement for the current `recipes` layout
pub fn recipes_table_sql(table_name: &str, if_not_exists: bool) -> String {
    let guard = if if_not_exists { "IF NOT EXISTS " } else { "" };
    format!(
        r#"
        CREATE TABLE {guard}{table_name} (
            id               INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
            name             TEXT    NOT NULL,
            category         TEXT    NOT NULL,
            steps            TEXT    NOT NULL,
            image_uri        TEXT,
            ingredients_json TEXT    NOT NULL DEFAULT '[]',
            calories         INTEGER NOT NULL DEFAULT 0,
            protein          INTEGER NOT NULL DEFAULT 0,
            cook_time        INTEGER NOT NULL DEFAULT 0,
            difficulty       INTEGER NOT NULL DEFAULT 2,
            servings         INTEGER NOT NULL DEFAULT 4,
            description      TEXT    NOT NULL DEFAULT '',
            is_favorite      INTEGER NOT NULL DEFAULT 0
        )
        "#
    )
}

/// Get current schema version from database
///
/// Returns 0 if schema_version table doesn't exist or has no rows
pub async fn get_schema_version(pool: &SqlitePool) -> Result<i32> {
    let table_exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM sqlite_master
            WHERE type='table' AND name='schema_version'
        )
        "#,
    )
    .fetch_one(pool)
    .await?;

    if !table_exists {
        return Ok(0);
    }

    let version: Option<i32> =
        sqlx::query_scalar("SELECT version FROM schema_version ORDER BY version DESC LIMIT 1")
            .fetch_optional(pool)
            .await?;

    Ok(version.unwrap_or(0))
}

async fn set_schema_version(conn: &mut SqliteConnection, version: i32) -> Result<()> {
    sqlx::query("INSERT OR REPLACE INTO schema_version (version) VALUES (?)")
        .bind(version)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

/// Run all pending migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    let current_version = get_schema_version(pool).await?;

    if current_version == CURRENT_SCHEMA_VERSION {
        info!("Database schema is up to date (v{})", current_version);
        return Ok(());
    }

    if current_version > CURRENT_SCHEMA_VERSION {
        warn!(
            "Database schema version ({}) is newer than code version ({})",
            current_version, CURRENT_SCHEMA_VERSION
        );
        warn!("This may indicate a downgrade. Proceeding with caution.");
        return Ok(());
    }

    info!(
        "Running database migrations: v{} -> v{}",
        current_version, CURRENT_SCHEMA_VERSION
    );

    for version in (current_version + 1).max(2)..=CURRENT_SCHEMA_VERSION {
        apply_step(pool, version).await?;
        info!("✓ Migration v{} completed", version);
    }

    info!("All migrations completed successfully");
    Ok(())
}

/// Apply one upgrade step and record its version in a single transaction
async fn apply_step(pool: &SqlitePool, version: i32) -> Result<()> {
    let mut tx = pool.begin().await?;

    let outcome = match version {
        2 => migrate_v2(&mut *tx).await,
        3 => migrate_v3(&mut *tx).await,
        4 => migrate_v4(&mut *tx).await,
        other => Err(Error::InvalidInput(format!("No migration defined for v{}", other))),
    };

    if let Err(e) = outcome {
        // dropping the transaction rolls the step back
        return Err(Error::Migration {
            version,
            reason: e.to_string(),
        });
    }

    set_schema_version(&mut *tx, version).await?;
    tx.commit().await?;
    Ok(())
}

async fn recipe_columns(conn: &mut SqliteConnection) -> Result<Vec<String>> {
    let columns: Vec<String> = sqlx::query_scalar("SELECT name FROM pragma_table_info('recipes')")
        .fetch_all(&mut *conn)
        .await?;
    Ok(columns)
}

/// Migration v2: add nullable image_uri column
async fn migrate_v2(conn: &mut SqliteConnection) -> Result<()> {
    info!("Running migration v2: Add image_uri column to recipes");

    let columns = recipe_columns(conn).await?;
    if columns.is_empty() {
        info!("  Recipes table doesn't exist yet - skipping migration");
        return Ok(());
    }
    if columns.iter().any(|c| c == "image_uri") {
        info!("  image_uri column already exists - skipping");
        return Ok(());
    }

    sqlx::query("ALTER TABLE recipes ADD COLUMN image_uri TEXT")
        .execute(&mut *conn)
        .await?;

    info!("  ✓ Added image_uri column to recipes table");
    Ok(())
}

/// Convert one legacy ingredients text into the JSON column value
///
/// Each non-blank line becomes a single ingredient with quantity 1, no unit,
/// and the trimmed line as its name.
pub fn legacy_ingredients_to_json(text: &str) -> Result<String> {
    let ingredients: Vec<Ingredient> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(Ingredient::named)
        .collect();
    Ok(serde_json::to_string(&ingredients)?)
}

/// Migration v3: add ingredients_json and backfill it from the legacy text
async fn migrate_v3(conn: &mut SqliteConnection) -> Result<()> {
    info!("Running migration v3: Add ingredients_json column to recipes");

    let columns = recipe_columns(conn).await?;
    if columns.is_empty() {
        info!("  Recipes table doesn't exist yet - skipping migration");
        return Ok(());
    }
    if columns.iter().any(|c| c == "ingredients_json") {
        info!("  ingredients_json column already exists - skipping");
        return Ok(());
    }

    sqlx::query("ALTER TABLE recipes ADD COLUMN ingredients_json TEXT NOT NULL DEFAULT '[]'")
        .execute(&mut *conn)
        .await?;

    if !columns.iter().any(|c| c == LEGACY_INGREDIENTS_COLUMN) {
        info!("  No legacy ingredients column - nothing to backfill");
        return Ok(());
    }

    let rows: Vec<(i64, Option<String>)> = sqlx::query_as("SELECT id, ingredients FROM recipes")
        .fetch_all(&mut *conn)
        .await?;

    for (id, text) in &rows {
        let json = legacy_ingredients_to_json(text.as_deref().unwrap_or(""))?;
        sqlx::query("UPDATE recipes SET ingredients_json = ? WHERE id = ?")
            .bind(json)
            .bind(id)
            .execute(&mut *conn)
            .await?;
    }

    info!("  ✓ Backfilled ingredients_json for {} recipes", rows.len());
    Ok(())
}

/// Migration v4: drop the legacy ingredients column
///
/// SQLite releases before 3.35 have no DROP COLUMN, so the table is rebuilt
/// at the current layout and every column both layouts share is copied.
async fn migrate_v4(conn: &mut SqliteConnection) -> Result<()> {
    info!("Running migration v4: Remove legacy ingredients column from recipes");

    let columns = recipe_columns(conn).await?;
    if columns.is_empty() {
        info!("  Recipes table doesn't exist yet - skipping migration");
        return Ok(());
    }
    if !columns.iter().any(|c| c == LEGACY_INGREDIENTS_COLUMN) {
        info!("  Legacy ingredients column already gone - skipping");
        return Ok(());
    }

    let shared: Vec<&str> = RECIPE_COLUMNS
        .iter()
        .copied()
        .filter(|wanted| columns.iter().any(|c| c == wanted))
        .collect();
    let column_list = shared.join(", ");

    sqlx::query("DROP TABLE IF EXISTS recipes_new")
        .execute(&mut *conn)
        .await?;
    sqlx::query(&recipes_table_sql("recipes_new", false))
        .execute(&mut *conn)
        .await?;

    let copied = sqlx::query(&format!(
        "INSERT INTO recipes_new ({column_list}) SELECT {column_list} FROM recipes"
    ))
    .execute(&mut *conn)
    .await?
    .rows_affected();

    sqlx::query("DROP TABLE recipes").execute(&mut *conn).await?;
    sqlx::query("ALTER TABLE recipes_new RENAME TO recipes")
        .execute(&mut *conn)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_recipes_category ON recipes(category)")
        .execute(&mut *conn)
        .await?;

    info!("  ✓ Rebuilt recipes table ({} rows, {} columns copied)", copied, shared.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init::open_memory_pool;

    async fn setup_legacy_v1_db() -> SqlitePool {
        let pool = open_memory_pool().await.unwrap();

        sqlx::query(
            "CREATE TABLE schema_version (version INTEGER PRIMARY KEY, applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP)"
        )
        .execute(&pool)
        .await
        .unwrap();

        sqlx::query(
            r#"
            CREATE TABLE recipes (
                id          INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
                name        TEXT    NOT NULL,
                category    TEXT    NOT NULL,
                ingredients TEXT    NOT NULL,
                steps       TEXT    NOT NULL,
                calories    INTEGER NOT NULL,
                protein     INTEGER NOT NULL,
                cook_time   INTEGER NOT NULL,
                is_favorite INTEGER NOT NULL DEFAULT 0
            )
            "#,
        )
        .execute(&pool)
        .await
        .unwrap();

        sqlx::query("INSERT INTO schema_version (version) VALUES (1)")
            .execute(&pool)
            .await
            .unwrap();

        pool
    }

    #[test]
    fn test_legacy_text_conversion() {
        let json = legacy_ingredients_to_json("2 huevos\n\n   leche entera  \r\nsal").unwrap();
        let parsed: Vec<Ingredient> = serde_json::from_str(&json).unwrap();
        assert_eq!(
            parsed,
            vec![
                Ingredient::new(1.0, "", "2 huevos"),
                Ingredient::new(1.0, "", "leche entera"),
                Ingredient::new(1.0, "", "sal"),
            ]
        );
    }

    #[test]
    fn test_legacy_text_with_quotes_is_escaped() {
        let json = legacy_ingredients_to_json(r#"queso "manchego""#).unwrap();
        let parsed: Vec<Ingredient> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0].name, r#"queso "manchego""#);
    }

    #[test]
    fn test_empty_legacy_text_gives_empty_array() {
        assert_eq!(legacy_ingredients_to_json("").unwrap(), "[]");
        assert_eq!(legacy_ingredients_to_json("  \n \n").unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_get_schema_version_no_table() {
        let pool = open_memory_pool().await.unwrap();
        assert_eq!(get_schema_version(&pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_migrate_v2_adds_column() {
        let pool = setup_legacy_v1_db().await;
        let mut conn = pool.acquire().await.unwrap();

        migrate_v2(&mut conn).await.unwrap();
        // second run is a no-op
        migrate_v2(&mut conn).await.unwrap();

        let columns = recipe_columns(&mut conn).await.unwrap();
        assert_eq!(columns.iter().filter(|c| *c == "image_uri").count(), 1);
    }

    #[tokio::test]
    async fn test_full_upgrade_from_v1() {
        let pool = setup_legacy_v1_db().await;

        sqlx::query(
            "INSERT INTO recipes (name, category, ingredients, steps, calories, protein, cook_time, is_favorite)
             VALUES ('Tortilla', 'BREAKFAST', 'huevos\npatatas\n\n  aceite ', '1. Freír', 300, 12, 25, 1)",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO recipes (name, category, ingredients, steps, calories, protein, cook_time)
             VALUES ('Gazpacho', 'LUNCH', 'tomate', '1. Triturar', 90, 2, 10)",
        )
        .execute(&pool)
        .await
        .unwrap();

        run_migrations(&pool).await.unwrap();

        assert_eq!(get_schema_version(&pool).await.unwrap(), CURRENT_SCHEMA_VERSION);

        let mut conn = pool.acquire().await.unwrap();
        let columns = recipe_columns(&mut conn).await.unwrap();
        assert_eq!(columns, RECIPE_COLUMNS.iter().map(|c| c.to_string()).collect::<Vec<_>>());
        drop(conn);

        let rows: Vec<(i64, String, String, i32, i32, i32, bool, String, Option<String>, i32, i32)> =
            sqlx::query_as(
                "SELECT id, name, category, calories, protein, cook_time, is_favorite,
                        ingredients_json, image_uri, difficulty, servings
                 FROM recipes ORDER BY id",
            )
            .fetch_all(&pool)
            .await
            .unwrap();

        assert_eq!(rows.len(), 2);
        let tortilla = &rows[0];
        assert_eq!((tortilla.1.as_str(), tortilla.2.as_str()), ("Tortilla", "BREAKFAST"));
        assert_eq!((tortilla.3, tortilla.4, tortilla.5, tortilla.6), (300, 12, 25, true));
        assert!(tortilla.8.is_none());
        // columns the legacy layout never had take their defaults
        assert_eq!((tortilla.9, tortilla.10), (2, 4));

        let ingredients: Vec<Ingredient> = serde_json::from_str(&tortilla.7).unwrap();
        let names: Vec<&str> = ingredients.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["huevos", "patatas", "aceite"]);
        assert!(ingredients.iter().all(|i| i.qty == 1.0 && i.unit.is_empty()));

        assert_eq!(rows[1].0, 2);
        assert_eq!(rows[1].7, r#"[{"qty":1.0,"unit":"","name":"tomate"}]"#);
    }

    #[tokio::test]
    async fn test_rebuild_preserves_values_from_v3() {
        let pool = setup_legacy_v1_db().await;
        sqlx::query("ALTER TABLE recipes ADD COLUMN image_uri TEXT")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("ALTER TABLE recipes ADD COLUMN ingredients_json TEXT NOT NULL DEFAULT '[]'")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO schema_version (version) VALUES (3)")
            .execute(&pool)
            .await
            .unwrap();

        for i in 0..5 {
            sqlx::query(
                "INSERT INTO recipes (name, category, ingredients, steps, calories, protein, cook_time, is_favorite, image_uri, ingredients_json)
                 VALUES (?, 'DINNER', 'old', 'paso', ?, ?, ?, ?, ?, ?)",
            )
            .bind(format!("Receta {}", i))
            .bind(100 + i)
            .bind(i)
            .bind(10 * i)
            .bind(i % 2 == 0)
            .bind(format!("img/{}", i))
            .bind(format!(r#"[{{"qty":{}.0,"unit":"g","name":"arroz"}}]"#, i + 1))
            .execute(&pool)
            .await
            .unwrap();
        }
        // ids with a gap must survive
        sqlx::query("DELETE FROM recipes WHERE id = 2").execute(&pool).await.unwrap();

        let before: Vec<(i64, String, i32, bool, Option<String>, String)> = sqlx::query_as(
            "SELECT id, name, calories, is_favorite, image_uri, ingredients_json FROM recipes ORDER BY id",
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        run_migrations(&pool).await.unwrap();

        let after: Vec<(i64, String, i32, bool, Option<String>, String)> = sqlx::query_as(
            "SELECT id, name, calories, is_favorite, image_uri, ingredients_json FROM recipes ORDER BY id",
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        assert_eq!(before.len(), 4);
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_failed_step_rolls_back_and_aborts() {
        let pool = open_memory_pool().await.unwrap();
        sqlx::query(
            "CREATE TABLE schema_version (version INTEGER PRIMARY KEY, applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP)"
        )
        .execute(&pool)
        .await
        .unwrap();
        // no `steps` column: the rebuild cannot satisfy NOT NULL
        sqlx::query(
            "CREATE TABLE recipes (id INTEGER PRIMARY KEY, name TEXT NOT NULL, category TEXT NOT NULL, ingredients TEXT)",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query("INSERT INTO recipes (name, category, ingredients) VALUES ('Sopa', 'DINNER', 'agua')")
            .execute(&pool)
            .await
            .unwrap();

        let err = run_migrations(&pool).await.unwrap_err();
        assert!(matches!(err, Error::Migration { version: 4, .. }), "got {:?}", err);

        // v2 and v3 committed, v4 did not
        assert_eq!(get_schema_version(&pool).await.unwrap(), 3);
        let mut conn = pool.acquire().await.unwrap();
        let columns = recipe_columns(&mut conn).await.unwrap();
        assert!(columns.iter().any(|c| c == "ingredients"));
        assert!(columns.iter().any(|c| c == "ingredients_json"));
        let leftover: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='recipes_new')",
        )
        .fetch_one(&mut *conn)
        .await
        .unwrap();
        assert!(!leftover);
    }

    #[tokio::test]
    async fn test_newer_version_left_alone() {
        let pool = setup_legacy_v1_db().await;
        sqlx::query("INSERT INTO schema_version (version) VALUES (9)")
            .execute(&pool)
            .await
            .unwrap();

        run_migrations(&pool).await.unwrap();

        let mut conn = pool.acquire().await.unwrap();
        let columns = recipe_columns(&mut conn).await.unwrap();
        assert!(!columns.iter().any(|c| c == "image_uri"));
    }
}
