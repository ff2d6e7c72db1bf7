//! Command-line front end
//!
//! Argument definitions and the handlers behind each subcommand. Handlers
//! write their output to any `io::Write` so they can be driven from tests.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use recetario_common::{Category, Recipe};
use serde::Serialize;

use crate::catalog::RecipeCatalog;
use crate::forms::{EditForm, RecipeForm};
use crate::preferences::ThemePreferences;
use crate::scaling::{IngredientExt, RecipeExt};
use crate::voice::{interpret_recognition, SpeechError};

/// Command-line arguments for recetario
#[derive(Parser, Debug)]
#[command(name = "recetario")]
#[command(about = "Catálogo de recetas con búsqueda por voz")]
#[command(version)]
pub struct Cli {
    /// Folder holding recetario.db (overrides RECETARIO_ROOT and the config file)
    #[arg(short, long)]
    pub root_folder: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long, env = "RECETARIO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List recipes, optionally filtered
    List {
        /// Text contained in the name or an ingredient
        #[arg(short, long, default_value = "")]
        query: String,
        #[arg(short, long, value_parser = parse_category)]
        category: Option<Category>,
        /// 1 = Fácil, 2 = Media, 3 = Difícil
        #[arg(short, long, value_parser = clap::value_parser!(i32).range(1..=3))]
        difficulty: Option<i32>,
        /// Only favorites
        #[arg(long)]
        favorites: bool,
    },
    /// Show one recipe
    Show {
        id: i64,
        /// Portions to cook (1-10, default 1); stored quantities are for one portion
        #[arg(short, long, visible_alias = "portions", value_parser = clap::value_parser!(i32).range(1..=10))]
        servings: Option<i32>,
        /// Tick ingredients by index (0-based)
        #[arg(long = "check")]
        check: Vec<usize>,
    },
    /// Add a recipe
    Add(AddArgs),
    /// Edit a recipe
    Edit(EditArgs),
    /// Delete a recipe
    Delete {
        id: i64,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Toggle a recipe's favorite flag
    Favorite { id: i64 },
    /// Pick a random recipe
    Random,
    /// Rank recipes by the ingredients you have
    Recommend {
        #[arg(required = true)]
        pantry: Vec<String>,
    },
    /// Filter the catalog with a spoken command
    Voice {
        /// Recognised text
        text: Vec<String>,
        /// Recogniser error code instead of text
        #[arg(long, conflicts_with = "text")]
        error_code: Option<i32>,
    },
    /// Show or set the dark-mode preference
    DarkMode { state: Option<Switch> },
}

#[derive(Args, Debug)]
pub struct AddArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long, value_parser = parse_category, default_value = "BREAKFAST")]
    pub category: Category,
    /// `qty [unit] name`, repeatable
    #[arg(long = "ingredient")]
    pub ingredients: Vec<String>,
    /// Step text, repeatable
    #[arg(long = "step")]
    pub steps: Vec<String>,
    #[arg(long)]
    pub image: Option<String>,
    #[arg(long, default_value = "")]
    pub calories: String,
    #[arg(long, default_value = "")]
    pub protein: String,
    #[arg(long, default_value = "")]
    pub cook_time: String,
    #[arg(long, default_value_t = 1)]
    pub difficulty: i32,
    #[arg(long, default_value_t = recetario_common::db::DEFAULT_SERVINGS)]
    pub servings: i32,
}

/// Fields left out keep their current value
#[derive(Args, Debug)]
pub struct EditArgs {
    pub id: i64,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long, value_parser = parse_category)]
    pub category: Option<Category>,
    /// Replaces the whole ingredient list; `qty unit name`, repeatable
    #[arg(long = "ingredient")]
    pub ingredients: Vec<String>,
    /// Replaces all steps, repeatable
    #[arg(long = "step")]
    pub steps: Vec<String>,
    #[arg(long)]
    pub image: Option<String>,
    #[arg(long)]
    pub calories: Option<String>,
    #[arg(long)]
    pub protein: Option<String>,
    #[arg(long)]
    pub cook_time: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Switch {
    On,
    Off,
}

/// Accept stored names (`DINNER`) and Spanish labels (`cena`)
pub fn parse_category(raw: &str) -> std::result::Result<Category, String> {
    let wanted = raw.trim();
    Category::ALL
        .into_iter()
        .find(|c| c.as_str().eq_ignore_ascii_case(wanted) || c.display_name().eq_ignore_ascii_case(wanted))
        .ok_or_else(|| format!("categoría desconocida: {}", raw))
}

/// Label of a difficulty tier
pub fn difficulty_label(tier: i32) -> String {
    match tier {
        1 => "Fácil".to_string(),
        2 => "Media".to_string(),
        3 => "Difícil".to_string(),
        other => format!("Nivel {}", other),
    }
}

/// Everything a subcommand needs
pub struct Session {
    pub catalog: RecipeCatalog,
    pub preferences: ThemePreferences,
    pub json: bool,
}

impl Session {
    pub async fn execute(&mut self, command: Command, out: &mut impl Write) -> Result<()> {
        match command {
            Command::List {
                query,
                category,
                difficulty,
                favorites,
            } => {
                self.catalog.set_query(query);
                self.catalog.set_category(category);
                self.catalog.set_difficulty(difficulty);
                let mut recipes = self.catalog.settled().await?;
                if favorites {
                    recipes.retain(|r| r.is_favorite);
                }
                self.print_list(&recipes, out)
            }
            Command::Show { id, servings, check } => self.show(id, servings, &check, out).await,
            Command::Add(args) => self.add(args, out).await,
            Command::Edit(args) => self.edit(args, out).await,
            Command::Delete { id, yes } => {
                if !yes {
                    bail!("Borrar la receta {} requiere --yes", id);
                }
                if !self.catalog.delete(id).await? {
                    bail!("No existe la receta {}", id);
                }
                writeln!(out, "Receta {} eliminada", id)?;
                Ok(())
            }
            Command::Favorite { id } => {
                let recipe = self.require(id).await?;
                let updated = self.catalog.toggle_favorite(&recipe).await?;
                if self.json {
                    return self.print_json(&updated, out);
                }
                let state = if updated.is_favorite { "marcada como favorita" } else { "quitada de favoritas" };
                writeln!(out, "{} {}", updated.name, state)?;
                Ok(())
            }
            Command::Random => match self.catalog.random().await? {
                Some(recipe) => self.print_recipe(&recipe, None, out),
                None => {
                    writeln!(out, "No hay recetas")?;
                    Ok(())
                }
            },
            Command::Recommend { pantry } => self.recommend(&pantry, out).await,
            Command::Voice { text, error_code } => self.voice(text, error_code, out).await,
            Command::DarkMode { state } => {
                if let Some(state) = state {
                    self.preferences.set_dark_mode(state == Switch::On).await?;
                }
                let enabled = self.preferences.dark_mode().await?;
                if self.json {
                    return self.print_json(&serde_json::json!({ "dark_mode": enabled }), out);
                }
                writeln!(out, "Modo oscuro: {}", if enabled { "activado" } else { "desactivado" })?;
                Ok(())
            }
        }
    }

    async fn require(&self, id: i64) -> Result<Recipe> {
        self.catalog
            .get_by_id(id)
            .await?
            .with_context(|| format!("No existe la receta {}", id))
    }

    async fn show(&mut self, id: i64, servings: Option<i32>, check: &[usize], out: &mut impl Write) -> Result<()> {
        let recipe = self.require(id).await?;
        let recipe = recipe.scaled(servings.unwrap_or(1));

        self.catalog.checklist_for(&recipe);
        for &index in check {
            self.catalog.toggle_ingredient(recipe.id, index);
        }
        let checklist = self.catalog.checklist(recipe.id).map(<[bool]>::to_vec);

        self.print_recipe(&recipe, checklist.as_deref(), out)
    }

    async fn add(&mut self, args: AddArgs, out: &mut impl Write) -> Result<()> {
        let form = RecipeForm {
            name: args.name,
            category: args.category,
            ingredient_lines: args.ingredients,
            step_lines: args.steps,
            image_uri: args.image,
            calories: args.calories,
            protein: args.protein,
            cook_time: args.cook_time,
            difficulty: args.difficulty,
            servings: args.servings,
        };
        let recipe = form.to_recipe()?;
        let id = self.catalog.insert(&recipe).await?;
        writeln!(out, "Receta {} creada: {}", id, recipe.name)?;
        Ok(())
    }

    async fn edit(&mut self, args: EditArgs, out: &mut impl Write) -> Result<()> {
        let mut form = EditForm::new(self.require(args.id).await?);
        if let Some(name) = args.name {
            form.name = name;
        }
        if let Some(category) = args.category {
            form.category = category;
        }
        if !args.ingredients.is_empty() {
            form.ingredients = args.ingredients.join("\n");
        }
        if !args.steps.is_empty() {
            form.steps = args.steps.join("\n");
        }
        if args.image.is_some() {
            form.image_uri = args.image;
        }
        if let Some(calories) = args.calories {
            form.calories = calories;
        }
        if let Some(protein) = args.protein {
            form.protein = protein;
        }
        if let Some(cook_time) = args.cook_time {
            form.cook_time = cook_time;
        }

        let recipe = form.to_recipe()?;
        self.catalog.update(&recipe).await?;
        writeln!(out, "Receta {} actualizada", recipe.id)?;
        Ok(())
    }

    async fn recommend(&self, pantry: &[String], out: &mut impl Write) -> Result<()> {
        use futures::StreamExt;

        let stream = self.catalog.repository().recommend(pantry);
        futures::pin_mut!(stream);
        let ranked = stream.next().await.context("Recommendation stream ended")??;

        if self.json {
            return self.print_json(&ranked, out);
        }
        if ranked.is_empty() {
            writeln!(out, "Ninguna receta usa esos ingredientes")?;
        }
        for rec in &ranked {
            writeln!(out, "{:>3}  {}  ({} coincidencias)", rec.recipe.id, rec.recipe.name, rec.hits)?;
        }
        Ok(())
    }

    async fn voice(&mut self, text: Vec<String>, error_code: Option<i32>, out: &mut impl Write) -> Result<()> {
        let outcome = match error_code {
            Some(code) => Err(SpeechError::from_code(code)),
            None if text.is_empty() => Err(SpeechError::NoMatch),
            None => Ok(vec![text.join(" ")]),
        };

        let command = match interpret_recognition(outcome) {
            Ok(command) => command,
            Err(e) => {
                writeln!(out, "{}", e)?;
                return Ok(());
            }
        };

        self.catalog.apply_voice_command(&command);
        let recipes = self.catalog.settled().await?;

        if self.json {
            return self.print_json(&serde_json::json!({ "command": command, "recipes": recipes }), out);
        }
        writeln!(
            out,
            "Búsqueda: \"{}\"  categoría: {}  dificultad: {}",
            command.query,
            command.category.map_or("todas", |c| c.display_name()),
            command.difficulty.map_or("todas".to_string(), difficulty_label),
        )?;
        self.print_list(&recipes, out)
    }

    fn print_json<T: Serialize>(&self, value: &T, out: &mut impl Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut *out, value)?;
        writeln!(out)?;
        Ok(())
    }

    fn print_list(&self, recipes: &[Recipe], out: &mut impl Write) -> Result<()> {
        if self.json {
            return self.print_json(&recipes, out);
        }
        if recipes.is_empty() {
            writeln!(out, "No hay recetas")?;
        }
        for r in recipes {
            writeln!(
                out,
                "{:>3}  {}{}  [{}] {} · {} min",
                r.id,
                if r.is_favorite { "★ " } else { "" },
                r.name,
                r.category.display_name(),
                difficulty_label(r.difficulty),
                r.cook_time
            )?;
        }
        Ok(())
    }

    fn print_recipe(&self, recipe: &Recipe, checklist: Option<&[bool]>, out: &mut impl Write) -> Result<()> {
        if self.json {
            return self.print_json(
                &serde_json::json!({ "recipe": recipe, "checklist": checklist }),
                out,
            );
        }

        writeln!(out, "{}{}", if recipe.is_favorite { "★ " } else { "" }, recipe.name)?;
        writeln!(
            out,
            "{} · {} · {} porciones · {} kcal · {} g proteína · {} min",
            recipe.category.display_name(),
            difficulty_label(recipe.difficulty),
            recipe.servings,
            recipe.calories,
            recipe.protein,
            recipe.cook_time
        )?;
        if !recipe.description.is_empty() {
            writeln!(out, "{}", recipe.description)?;
        }

        writeln!(out, "\nIngredientes")?;
        for (idx, ingredient) in recipe.ingredients.iter().enumerate() {
            let mark = match checklist.and_then(|c| c.get(idx)) {
                Some(true) => "[x] ",
                Some(false) => "[ ] ",
                None => "- ",
            };
            writeln!(out, "  {}{}", mark, ingredient.display_line())?;
        }

        writeln!(out, "\nPasos")?;
        for step in recipe.steps_lines() {
            writeln!(out, "  {}", step.trim())?;
        }
        Ok(())
    }
}
