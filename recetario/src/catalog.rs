//! Catalog view state
//!
//! [`RecipeCatalog`] combines three filter signals (free-text query,
//! category, difficulty) with the store into one filtered list:
//!
//! ```text
//!  set_query / set_category / set_difficulty
//!                 │
//!        watch<Filters> ──┐
//!                         ├──► recompute task ──► watch<CatalogSnapshot>
//!  EventBus (RecipesChanged)┘
//! ```
//!
//! On every filter or store change the task fetches the base collection
//! (category-scoped when a category is selected, else everything) and keeps
//! recipes whose difficulty matches and whose name or any ingredient name
//! contains the query, case-insensitively. Observers only ever see the latest
//! snapshot. A failed recomputation keeps the previous recipes and publishes
//! the error alongside them. The task stops when the catalog is dropped.
//!
//! The catalog also owns the in-memory ingredient checklists.

use recetario_common::{Category, Recipe, Result};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::checklist::ChecklistStore;
use crate::repository::{RecipeQuery, RecipeRepository};
use crate::voice::VoiceCommand;

/// Current filter selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Filters {
    pub query: String,
    pub category: Option<Category>,
    pub difficulty: Option<i32>,
}

impl Filters {
    /// Collection fetched before in-memory filtering
    pub fn base_query(&self) -> RecipeQuery {
        match self.category {
            Some(category) => RecipeQuery::ByCategory(category),
            None => RecipeQuery::All,
        }
    }

    pub fn matches(&self, recipe: &Recipe) -> bool {
        let difficulty_match = self.difficulty.map_or(true, |d| recipe.difficulty == d);
        if !difficulty_match {
            return false;
        }

        let query = self.query.trim().to_lowercase();
        query.is_empty()
            || recipe.name.to_lowercase().contains(&query)
            || recipe
                .ingredients
                .iter()
                .any(|i| i.name.to_lowercase().contains(&query))
    }

    pub fn is_empty(&self) -> bool {
        self.query.trim().is_empty() && self.category.is_none() && self.difficulty.is_none()
    }
}

/// Latest filtered list and the filters it was computed for
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CatalogSnapshot {
    /// 0 until the first computation completes
    pub revision: u64,
    pub filters: Filters,
    pub recipes: Vec<Recipe>,
    /// Set when the computation for `filters` failed; `recipes` are then
    /// the last successful result
    pub error: Option<String>,
}

/// The catalog could not be recomputed for the current filters
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to refresh catalog: {0}")]
pub struct RefreshError(pub String);

/// Fetch the base collection and apply `filters` in memory
pub async fn filtered_recipes(repo: &RecipeRepository, filters: &Filters) -> Result<Vec<Recipe>> {
    let base = filters.base_query().fetch(repo.store()).await?;
    Ok(base.into_iter().filter(|r| filters.matches(r)).collect())
}

/// Recompute loop: runs until the filter sender or the event bus goes away
async fn run_recompute(
    repo: RecipeRepository,
    mut filters_rx: watch::Receiver<Filters>,
    mut events: broadcast::Receiver<recetario_common::CatalogEvent>,
    snapshot_tx: watch::Sender<CatalogSnapshot>,
) {
    let mut revision = 0u64;

    loop {
        let filters = filters_rx.borrow_and_update().clone();

        match filtered_recipes(&repo, &filters).await {
            Ok(recipes) => {
                revision += 1;
                debug!(
                    "Catalog revision {}: {} recipes for {:?}",
                    revision,
                    recipes.len(),
                    filters
                );
                snapshot_tx.send_replace(CatalogSnapshot {
                    revision,
                    filters,
                    recipes,
                    error: None,
                });
            }
            Err(e) => {
                revision += 1;
                error!("Failed to recompute catalog for {:?}: {}", filters, e);
                snapshot_tx.send_modify(|snap| {
                    snap.revision = revision;
                    snap.filters = filters;
                    snap.error = Some(e.to_string());
                });
            }
        }

        // Wait for the next relevant change
        loop {
            tokio::select! {
                changed = filters_rx.changed() => {
                    if changed.is_err() {
                        debug!("Filter sender dropped, stopping catalog task");
                        return;
                    }
                    break;
                }
                event = events.recv() => match event {
                    Ok(event) if event.touches_recipes() => {
                        debug!("{} received, recomputing catalog", event.event_type());
                        break;
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Catalog lagged {} store events, recomputing", skipped);
                        break;
                    }
                    Err(RecvError::Closed) => return,
                },
            }
        }
    }
}

/// Filterable, observable view of the recipe catalog
pub struct RecipeCatalog {
    repo: RecipeRepository,
    filters: watch::Sender<Filters>,
    snapshot: watch::Receiver<CatalogSnapshot>,
    checklists: ChecklistStore,
    task: JoinHandle<()>,
}

impl RecipeCatalog {
    /// Start the recompute task; must be called inside a tokio runtime
    pub fn new(repo: RecipeRepository) -> Self {
        let (filters, filters_rx) = watch::channel(Filters::default());
        let (snapshot_tx, snapshot) = watch::channel(CatalogSnapshot::default());
        let events = repo.events().subscribe();

        let task = tokio::spawn(run_recompute(repo.clone(), filters_rx, events, snapshot_tx));

        Self {
            repo,
            filters,
            snapshot,
            checklists: ChecklistStore::new(),
            task,
        }
    }

    pub fn repository(&self) -> &RecipeRepository {
        &self.repo
    }

    pub fn filters(&self) -> Filters {
        self.filters.borrow().clone()
    }

    /// Latest successfully computed list (empty before the first one)
    pub fn recipes(&self) -> Vec<Recipe> {
        self.snapshot.borrow().recipes.clone()
    }

    /// Receiver following every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<CatalogSnapshot> {
        self.snapshot.clone()
    }

    /// Wait for the outcome of the computation for the current filters
    ///
    /// Store changes made after the filters were set may not be reflected
    /// yet; subscribe to follow those.
    pub async fn settled(&self) -> std::result::Result<Vec<Recipe>, RefreshError> {
        let wanted = self.filters();
        let mut rx = self.snapshot.clone();
        let outcome = match rx
            .wait_for(|snap| snap.revision > 0 && snap.filters == wanted)
            .await
        {
            Ok(snap) => match &snap.error {
                Some(reason) => Err(RefreshError(reason.clone())),
                None => Ok(snap.recipes.clone()),
            },
            Err(_) => Err(RefreshError("catalog task stopped".to_string())),
        };
        outcome
    }

    pub fn set_query(&self, query: impl Into<String>) {
        let query = query.into();
        self.filters.send_modify(|f| f.query = query);
    }

    pub fn set_category(&self, category: Option<Category>) {
        self.filters.send_modify(|f| f.category = category);
    }

    pub fn set_difficulty(&self, difficulty: Option<i32>) {
        self.filters.send_modify(|f| f.difficulty = difficulty);
    }

    /// Replace all three filters with an interpreted voice command
    pub fn apply_voice_command(&self, command: &VoiceCommand) {
        self.filters.send_replace(Filters {
            query: command.query.clone(),
            category: command.category,
            difficulty: command.difficulty,
        });
    }

    pub fn clear_filters(&self) {
        self.filters.send_replace(Filters::default());
    }

    pub async fn insert(&self, recipe: &Recipe) -> Result<i64> {
        self.repo.insert(recipe).await
    }

    pub async fn update(&self, recipe: &Recipe) -> Result<()> {
        self.repo.update(recipe).await
    }

    /// Delete a recipe and discard its checklist
    pub async fn delete(&mut self, id: i64) -> Result<bool> {
        let deleted = self.repo.delete(id).await?;
        self.checklists.remove(id);
        Ok(deleted)
    }

    pub async fn toggle_favorite(&self, recipe: &Recipe) -> Result<Recipe> {
        self.repo.toggle_favorite(recipe).await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Recipe>> {
        self.repo.get_by_id(id).await
    }

    pub async fn random(&self) -> Result<Option<Recipe>> {
        self.repo.random().await
    }

    /// Checklist for a recipe, created or resized to its ingredient count
    pub fn checklist_for(&mut self, recipe: &Recipe) -> &[bool] {
        self.checklists.checklist_for(recipe)
    }

    /// Existing checklist, without creating one
    pub fn checklist(&self, recipe_id: i64) -> Option<&[bool]> {
        self.checklists.get(recipe_id)
    }

    /// Flip one ingredient's tick; no-op without a checklist or out of range
    pub fn toggle_ingredient(&mut self, recipe_id: i64, index: usize) -> Option<bool> {
        self.checklists.toggle(recipe_id, index)
    }

    pub fn remove_checklist(&mut self, recipe_id: i64) -> bool {
        self.checklists.remove(recipe_id)
    }
}

impl Drop for RecipeCatalog {
    fn drop(&mut self) {
        self.task.abort();
    }
}
