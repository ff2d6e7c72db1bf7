//! Add and edit forms
//!
//! Raw text as typed by the user, turned into a [`Recipe`]. The two flows
//! parse ingredient lines differently:
//!
//! | Flow | Input | Split | Bad quantity |
//! |------|-------|-------|--------------|
//! | add  | one field per line | runs of whitespace, at most 3 parts | line dropped |
//! | edit | one multi-line text | single spaces, at most 3 parts | quantity 1 |
//!
//! Numeric fields that do not parse as integers become 0.

use recetario_common::db::DEFAULT_SERVINGS;
use recetario_common::{Category, Ingredient, Recipe};
use thiserror::Error;

use crate::scaling::format_quantity;

/// Message shown when a required field is missing
pub const REQUIRED_FIELDS_MESSAGE: &str = "Completa todos los campos obligatorios.";

/// Form validation failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Completa todos los campos obligatorios.")]
    MissingRequiredFields,
}

/// Integer field value, 0 when empty or not a number
pub fn parse_number(raw: &str) -> i32 {
    raw.trim().parse().unwrap_or(0)
}

/// Parse one add-form line: `qty [unit] [name…]`
///
/// Returns None when the first token is not a number. With a single extra
/// token that token is the name and the unit is empty.
pub fn parse_ingredient_line(line: &str) -> Option<Ingredient> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let (qty, rest) = split_token(line);
    let qty: f32 = qty.parse().ok()?;

    let (unit, name) = match split_token(rest) {
        ("", _) => ("", ""),
        (name, "") => ("", name),
        (unit, name) => (unit, name),
    };

    Some(Ingredient::new(qty, unit, name))
}

/// First whitespace-delimited token and the trimmed remainder
fn split_token(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    match text.find(char::is_whitespace) {
        Some(end) => (&text[..end], text[end..].trim_start()),
        None => (text, ""),
    }
}

/// Parse the edit form's multi-line ingredients text
///
/// Each non-empty line splits on single spaces into at most three parts.
/// A line with fewer than three parts keeps the whole line as its name.
pub fn parse_ingredients_text(text: &str) -> Vec<Ingredient> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|raw| {
            let parts: Vec<&str> = raw.splitn(3, ' ').collect();
            let qty = parts.first().and_then(|p| p.parse().ok()).unwrap_or(1.0);
            let unit = parts.get(1).copied().unwrap_or("");
            let name = parts.get(2).copied().unwrap_or(raw);
            Ingredient::new(qty, unit, name)
        })
        .collect()
}

/// Render ingredients back into the edit form's text, one per line
pub fn ingredients_text(ingredients: &[Ingredient]) -> String {
    ingredients
        .iter()
        .map(|ing| {
            let mut line = format_quantity(ing.qty);
            if !ing.unit.trim().is_empty() {
                line.push(' ');
                line.push_str(&ing.unit);
            }
            line.push(' ');
            line.push_str(&ing.name);
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fields of the add-recipe form
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeForm {
    pub name: String,
    pub category: Category,
    pub ingredient_lines: Vec<String>,
    pub step_lines: Vec<String>,
    pub image_uri: Option<String>,
    pub calories: String,
    pub protein: String,
    pub cook_time: String,
    pub difficulty: i32,
    pub servings: i32,
}

impl Default for RecipeForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            category: Category::Breakfast,
            ingredient_lines: vec![String::new()],
            step_lines: vec![String::new()],
            image_uri: None,
            calories: String::new(),
            protein: String::new(),
            cook_time: String::new(),
            difficulty: 1,
            servings: DEFAULT_SERVINGS,
        }
    }
}

impl RecipeForm {
    /// Name is non-blank, one ingredient line parses and one step line is
    /// non-blank
    pub fn can_save(&self) -> bool {
        !self.name.trim().is_empty()
            && self
                .ingredient_lines
                .iter()
                .any(|l| parse_ingredient_line(l).is_some())
            && self.step_lines.iter().any(|l| !l.trim().is_empty())
    }

    /// Validate and build the recipe to insert
    pub fn to_recipe(&self) -> Result<Recipe, FormError> {
        if !self.can_save() {
            return Err(FormError::MissingRequiredFields);
        }

        let steps = self
            .step_lines
            .iter()
            .map(|s| s.trim())
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string();

        let mut recipe = Recipe::new(self.name.clone(), self.category)
            .with_ingredients(
                self.ingredient_lines
                    .iter()
                    .filter_map(|l| parse_ingredient_line(l))
                    .collect(),
            )
            .with_steps(steps)
            .with_nutrition(
                parse_number(&self.calories),
                parse_number(&self.protein),
                parse_number(&self.cook_time),
            )
            .with_difficulty(self.difficulty)
            .with_servings(self.servings.max(1));
        recipe.image_uri = self.image_uri.clone();
        Ok(recipe)
    }
}

/// Fields of the edit-recipe form, pre-filled from an existing recipe
///
/// Difficulty, servings, description and favorite state are not editable
/// here and carry over from the original.
#[derive(Debug, Clone, PartialEq)]
pub struct EditForm {
    original: Recipe,
    pub name: String,
    pub category: Category,
    pub ingredients: String,
    pub steps: String,
    pub image_uri: Option<String>,
    pub calories: String,
    pub protein: String,
    pub cook_time: String,
}

impl EditForm {
    pub fn new(original: Recipe) -> Self {
        Self {
            name: original.name.clone(),
            category: original.category,
            ingredients: ingredients_text(&original.ingredients),
            steps: original.steps.clone(),
            image_uri: original.image_uri.clone(),
            calories: original.calories.to_string(),
            protein: original.protein.to_string(),
            cook_time: original.cook_time.to_string(),
            original,
        }
    }

    pub fn original(&self) -> &Recipe {
        &self.original
    }

    /// Same required fields as the add form
    pub fn can_save(&self) -> bool {
        !self.name.trim().is_empty()
            && self.ingredients.lines().any(|l| !l.trim().is_empty())
            && self.steps.lines().any(|l| !l.trim().is_empty())
    }

    /// Validate and build the updated recipe, keeping the original id
    pub fn to_recipe(&self) -> Result<Recipe, FormError> {
        if !self.can_save() {
            return Err(FormError::MissingRequiredFields);
        }

        Ok(Recipe {
            name: self.name.clone(),
            category: self.category,
            ingredients: parse_ingredients_text(&self.ingredients),
            steps: self.steps.clone(),
            image_uri: self.image_uri.clone(),
            calories: parse_number(&self.calories),
            protein: parse_number(&self.protein),
            cook_time: parse_number(&self.cook_time),
            ..self.original.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ingredient_line_shapes() {
        assert_eq!(
            parse_ingredient_line("  2   taza   harina de trigo "),
            Some(Ingredient::new(2.0, "taza", "harina de trigo"))
        );
        assert_eq!(
            parse_ingredient_line("3 huevos"),
            Some(Ingredient::new(3.0, "", "huevos"))
        );
        assert_eq!(
            parse_ingredient_line("0.5 cdta"),
            Some(Ingredient::new(0.5, "", "cdta"))
        );
        assert_eq!(parse_ingredient_line("7"), Some(Ingredient::new(7.0, "", "")));
        assert_eq!(parse_ingredient_line("sal al gusto"), None);
        assert_eq!(parse_ingredient_line("   "), None);
    }

    #[test]
    fn test_parse_ingredients_text_defaults() {
        let parsed = parse_ingredients_text("2 taza harina\nsal\n\n abc g queso \n1.5 kg");
        assert_eq!(
            parsed,
            vec![
                Ingredient::new(2.0, "taza", "harina"),
                Ingredient::new(1.0, "", "sal"),
                Ingredient::new(1.0, "g", "queso"),
                Ingredient::new(1.5, "kg", "1.5 kg"),
            ]
        );
    }

    #[test]
    fn test_parse_number_defaults_to_zero() {
        assert_eq!(parse_number(" 350 "), 350);
        assert_eq!(parse_number(""), 0);
        assert_eq!(parse_number("12.5"), 0);
        assert_eq!(parse_number("abc"), 0);
    }

    #[test]
    fn test_add_form_requires_fields() {
        let mut form = RecipeForm {
            name: "Arepa".to_string(),
            ..Default::default()
        };
        assert_eq!(form.to_recipe(), Err(FormError::MissingRequiredFields));
        assert_eq!(FormError::MissingRequiredFields.to_string(), REQUIRED_FIELDS_MESSAGE);

        form.ingredient_lines = vec!["2 taza harina de maíz".to_string(), "  ".to_string()];
        assert!(!form.can_save());
        form.step_lines = vec![" Amasar ".to_string(), "".to_string(), "Asar".to_string()];
        assert!(form.can_save());
    }

    #[test]
    fn test_add_form_rejects_only_unparsable_ingredients() {
        let form = RecipeForm {
            name: "Sal".to_string(),
            ingredient_lines: vec!["sal al gusto".to_string(), "pimienta".to_string()],
            step_lines: vec!["Servir".to_string()],
            ..Default::default()
        };
        assert!(!form.can_save());
        assert_eq!(form.to_recipe(), Err(FormError::MissingRequiredFields));

        let form = RecipeForm {
            ingredient_lines: vec!["sal al gusto".to_string(), "1 pizca sal".to_string()],
            ..form
        };
        let recipe = form.to_recipe().unwrap();
        assert_eq!(recipe.ingredients, vec![Ingredient::new(1.0, "pizca", "sal")]);
    }

    #[test]
    fn test_add_form_builds_recipe() {
        let form = RecipeForm {
            name: "Arepa".to_string(),
            category: Category::Breakfast,
            ingredient_lines: vec![
                "2 taza harina de maíz".to_string(),
                "un poco de sal".to_string(),
                "1 agua".to_string(),
            ],
            step_lines: vec![" Amasar ".to_string(), "Asar ".to_string()],
            image_uri: Some("content://galeria/1".to_string()),
            calories: "200".to_string(),
            protein: "x".to_string(),
            cook_time: "15".to_string(),
            difficulty: 1,
            servings: 0,
        };

        let recipe = form.to_recipe().unwrap();
        assert_eq!(
            recipe.ingredients,
            vec![
                Ingredient::new(2.0, "taza", "harina de maíz"),
                Ingredient::new(1.0, "", "agua"),
            ]
        );
        assert_eq!(recipe.steps, "Amasar\nAsar");
        assert_eq!((recipe.calories, recipe.protein, recipe.cook_time), (200, 0, 15));
        assert_eq!(recipe.difficulty, 1);
        assert_eq!(recipe.servings, 1);
        assert_eq!(recipe.description, "");
        assert_eq!(recipe.image_uri.as_deref(), Some("content://galeria/1"));
    }

    #[test]
    fn test_edit_form_round_trips_and_keeps_metadata() {
        let mut original = Recipe::new("Pollo al Curry", Category::Dinner)
            .with_ingredients(vec![
                Ingredient::new(150.0, "g", "pechuga de pollo"),
                Ingredient::new(0.5, "", "cebolla"),
            ])
            .with_steps("1. Sofreír")
            .with_difficulty(3)
            .with_servings(6);
        original.id = 9;
        original.description = "Picante".to_string();
        original.is_favorite = true;

        let mut form = EditForm::new(original.clone());
        assert_eq!(form.ingredients, "150 g pechuga de pollo\n0.5 cebolla");

        form.name = "Curry Rojo".to_string();
        form.calories = "abc".to_string();
        let updated = form.to_recipe().unwrap();

        assert_eq!(updated.id, 9);
        assert_eq!(updated.name, "Curry Rojo");
        assert_eq!(updated.calories, 0);
        assert_eq!((updated.difficulty, updated.servings), (3, 6));
        assert_eq!(updated.description, "Picante");
        assert!(updated.is_favorite);
        assert_eq!(updated.ingredients[0], Ingredient::new(150.0, "g", "pechuga de pollo"));
        // fewer than three parts: whole line is the name
        assert_eq!(updated.ingredients[1], Ingredient::new(0.5, "cebolla", "0.5 cebolla"));
    }

    #[test]
    fn test_edit_form_validates_like_add() {
        let original = Recipe::new("Té", Category::Beverage)
            .with_ingredients(vec![Ingredient::named("té negro")])
            .with_steps("Infusionar");
        let mut form = EditForm::new(original);
        form.steps = "  \n ".to_string();
        assert_eq!(form.to_recipe(), Err(FormError::MissingRequiredFields));
    }
}
