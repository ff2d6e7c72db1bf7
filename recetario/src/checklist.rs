//! Per-recipe ingredient checklists
//!
//! One boolean per ingredient index, held in memory only. A list is created
//! the first time a recipe's detail is shown and is resized, never rebuilt,
//! when the ingredient count changes, so ticks below the new length survive.

use std::collections::HashMap;

use recetario_common::Recipe;

#[derive(Debug, Default)]
pub struct ChecklistStore {
    lists: HashMap<i64, Vec<bool>>,
}

impl ChecklistStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checklist for `recipe`, created or resized to its ingredient count
    pub fn checklist_for(&mut self, recipe: &Recipe) -> &[bool] {
        let wanted = recipe.ingredients.len();
        let list = self
            .lists
            .entry(recipe.id)
            .or_insert_with(|| vec![false; wanted]);
        list.resize(wanted, false);
        list
    }

    /// Flip one entry, returning its new value
    ///
    /// None (and no change) when the recipe has no checklist yet or the
    /// index is out of range.
    pub fn toggle(&mut self, recipe_id: i64, index: usize) -> Option<bool> {
        let slot = self.lists.get_mut(&recipe_id)?.get_mut(index)?;
        *slot = !*slot;
        Some(*slot)
    }

    /// Current ticks of a recipe, if its detail was ever shown
    pub fn get(&self, recipe_id: i64) -> Option<&[bool]> {
        self.lists.get(&recipe_id).map(Vec::as_slice)
    }

    /// Drop the checklist of a deleted recipe
    pub fn remove(&mut self, recipe_id: i64) -> bool {
        self.lists.remove(&recipe_id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recetario_common::{Category, Ingredient};

    fn recipe_with(id: i64, count: usize) -> Recipe {
        let mut recipe = Recipe::new("Prueba", Category::Snack).with_ingredients(
            (0..count).map(|i| Ingredient::named(format!("ingrediente {}", i))).collect(),
        );
        recipe.id = id;
        recipe
    }

    #[test]
    fn test_first_view_creates_unchecked_list() {
        let mut store = ChecklistStore::new();
        assert!(store.get(1).is_none());
        assert_eq!(store.checklist_for(&recipe_with(1, 3)), &[false, false, false]);
        assert_eq!(store.get(1), Some(&[false, false, false][..]));
    }

    #[test]
    fn test_resize_keeps_prefix() {
        let mut store = ChecklistStore::new();
        store.checklist_for(&recipe_with(1, 4));
        store.toggle(1, 0);
        store.toggle(1, 3);

        // shrink to 2: index 0 kept, index 3 dropped
        assert_eq!(store.checklist_for(&recipe_with(1, 2)), &[true, false]);

        // grow to 5: new entries unchecked
        assert_eq!(
            store.checklist_for(&recipe_with(1, 5)),
            &[true, false, false, false, false]
        );
    }

    #[test]
    fn test_toggle_out_of_range_or_absent_is_noop() {
        let mut store = ChecklistStore::new();
        assert_eq!(store.toggle(7, 0), None);
        assert!(store.get(7).is_none());

        store.checklist_for(&recipe_with(7, 2));
        assert_eq!(store.toggle(7, 2), None);
        assert_eq!(store.get(7), Some(&[false, false][..]));

        assert_eq!(store.toggle(7, 1), Some(true));
        assert_eq!(store.toggle(7, 1), Some(false));
    }

    #[test]
    fn test_remove_discards_list() {
        let mut store = ChecklistStore::new();
        store.checklist_for(&recipe_with(3, 1));
        assert!(store.remove(3));
        assert!(!store.remove(3));
        assert!(store.get(3).is_none());
    }
}
