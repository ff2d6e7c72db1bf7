//! Portion scaling and quantity display
//!
//! Stored ingredient quantities are for a single portion. The detail view
//! multiplies them by the number of portions picked, from 1 to
//! [`MAX_PORTIONS`].

use recetario_common::{Ingredient, Recipe};

/// Render a quantity: whole numbers without decimals, others with one
///
/// ```
/// use recetario::scaling::format_quantity;
///
/// assert_eq!(format_quantity(2.0), "2");
/// assert_eq!(format_quantity(0.75), "0.8");
/// ```
pub fn format_quantity(qty: f32) -> String {
    if qty.is_finite() && qty.fract() == 0.0 {
        format!("{}", qty as i64)
    } else {
        format!("{:.1}", qty)
    }
}

/// Largest portion count the detail view offers
pub const MAX_PORTIONS: i32 = 10;

/// Portion count clamped to `1..=MAX_PORTIONS`
pub fn clamp_portions(portions: i32) -> i32 {
    portions.clamp(1, MAX_PORTIONS)
}

pub trait IngredientExt {
    /// Copy with the quantity multiplied by `factor`
    fn scaled(&self, factor: f32) -> Ingredient;

    /// `qty [unit]  name`
    fn display_line(&self) -> String;
}

impl IngredientExt for Ingredient {
    fn scaled(&self, factor: f32) -> Ingredient {
        Ingredient {
            qty: self.qty * factor,
            ..self.clone()
        }
    }

    fn display_line(&self) -> String {
        let mut line = format_quantity(self.qty);
        if !self.unit.trim().is_empty() {
            line.push(' ');
            line.push_str(&self.unit);
        }
        line.push_str("  ");
        line.push_str(&self.name);
        line
    }
}

pub trait RecipeExt {
    /// Copy with every single-portion quantity multiplied by `portions`
    ///
    /// `portions` is clamped to `1..=MAX_PORTIONS`; the copy's `servings`
    /// is the clamped count.
    fn scaled(&self, portions: i32) -> Recipe;

    /// Non-blank lines of the steps text
    fn steps_lines(&self) -> Vec<&str>;
}

impl RecipeExt for Recipe {
    fn scaled(&self, portions: i32) -> Recipe {
        let portions = clamp_portions(portions);
        let factor = portions as f32;

        Recipe {
            ingredients: self.ingredients.iter().map(|i| i.scaled(factor)).collect(),
            servings: portions,
            ..self.clone()
        }
    }

    fn steps_lines(&self) -> Vec<&str> {
        self.steps.lines().filter(|l| !l.trim().is_empty()).collect()
    }
}
