//! Database models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Default difficulty tier for new recipes (Media)
pub const DEFAULT_DIFFICULTY: i32 = 2;

/// Default servings for new recipes
pub const DEFAULT_SERVINGS: i32 = 4;

/// Recipe category, stored as its upper-case name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Breakfast,
    Lunch,
    Dinner,
    Dessert,
    Snack,
    Beverage,
}

impl Category {
    /// All categories in display order
    pub const ALL: [Category; 6] = [
        Category::Breakfast,
        Category::Lunch,
        Category::Dinner,
        Category::Dessert,
        Category::Snack,
        Category::Beverage,
    ];

    /// Value stored in the `category` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Breakfast => "BREAKFAST",
            Category::Lunch => "LUNCH",
            Category::Dinner => "DINNER",
            Category::Dessert => "DESSERT",
            Category::Snack => "SNACK",
            Category::Beverage => "BEVERAGE",
        }
    }

    /// Label shown to users
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Breakfast => "Desayuno",
            Category::Lunch => "Almuerzo",
            Category::Dinner => "Cena",
            Category::Dessert => "Postre",
            Category::Snack => "Snack",
            Category::Beverage => "Bebida",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown category: {}", s)))
    }
}

fn default_qty() -> f32 {
    1.0
}

/// One line of a recipe's ingredient list
///
/// Serialized as `{"qty":…,"unit":…,"name":…}` inside `ingredients_json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    #[serde(default = "default_qty")]
    pub qty: f32,
    #[serde(default)]
    pub unit: String,
    pub name: String,
}

impl Ingredient {
    pub fn new(qty: f32, unit: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            qty,
            unit: unit.into(),
            name: name.into(),
        }
    }

    /// Ingredient with default quantity (1) and no unit
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(default_qty(), "", name)
    }
}

/// A persisted recipe
///
/// `id` is assigned by the store on insert; the value carried by a recipe
/// passed to insert is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    pub category: Category,
    pub ingredients: Vec<Ingredient>,
    pub steps: String,
    pub image_uri: Option<String>,
    pub calories: i32,
    pub protein: i32,
    pub cook_time: i32,
    pub difficulty: i32,
    pub servings: i32,
    pub description: String,
    pub is_favorite: bool,
}

impl Recipe {
    /// Unsaved recipe with default metadata
    pub fn new(name: impl Into<String>, category: Category) -> Self {
        Self {
            id: 0,
            name: name.into(),
            category,
            ingredients: Vec::new(),
            steps: String::new(),
            image_uri: None,
            calories: 0,
            protein: 0,
            cook_time: 0,
            difficulty: DEFAULT_DIFFICULTY,
            servings: DEFAULT_SERVINGS,
            description: String::new(),
            is_favorite: false,
        }
    }

    pub fn with_ingredients(mut self, ingredients: Vec<Ingredient>) -> Self {
        self.ingredients = ingredients;
        self
    }

    pub fn with_steps(mut self, steps: impl Into<String>) -> Self {
        self.steps = steps.into();
        self
    }

    pub fn with_image(mut self, image_uri: impl Into<String>) -> Self {
        self.image_uri = Some(image_uri.into());
        self
    }

    /// Calories, protein (g) and cook time (min)
    pub fn with_nutrition(mut self, calories: i32, protein: i32, cook_time: i32) -> Self {
        self.calories = calories;
        self.protein = protein;
        self.cook_time = cook_time;
        self
    }

    pub fn with_difficulty(mut self, difficulty: i32) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_servings(mut self, servings: i32) -> Self {
        self.servings = servings;
        self
    }

    /// Lowercased ingredient names joined by single spaces
    pub fn ingredient_haystack(&self) -> String {
        self.ingredients
            .iter()
            .map(|i| i.name.as_str())
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }
}
