//! # Recetario Common Library
//!
//! Shared code for the recipe catalog:
//! - Recipe, ingredient and category models
//! - SQLite store: initialization, schema migrations, recipe queries, settings
//! - Change events (CatalogEvent) and the EventBus that carries them
//! - Configuration loading and root folder resolution

pub mod config;
pub mod db;
pub mod error;
pub mod events;

pub use db::models::{Category, Ingredient, Recipe};
pub use error::{Error, Result};
pub use events::{CatalogEvent, EventBus};
