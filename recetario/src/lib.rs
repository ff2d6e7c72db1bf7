//! # Recetario
//!
//! Recipe catalog built on `recetario-common`:
//! - [`repository`]: observable recipe queries, favorites, seeding, pantry ranking
//! - [`catalog`]: filter composition over the repository plus ingredient checklists
//! - [`voice`]: spoken command interpretation
//! - [`forms`] and [`scaling`]: add/edit input parsing and serving-size scaling
//! - [`preferences`]: dark-mode setting
//! - [`cli`]: command-line front end

pub mod catalog;
pub mod checklist;
pub mod cli;
pub mod forms;
pub mod preferences;
pub mod repository;
pub mod scaling;
pub mod seed;
pub mod voice;

pub use catalog::{CatalogSnapshot, Filters, RecipeCatalog, RefreshError};
pub use repository::{RecipeQuery, RecipeRepository, Recommendation};
pub use voice::{interpret, VoiceCommand};
