//! Settings database access
//!
//! Read/write preferences in the settings table (key-value store).

use crate::error::{Error, Result};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;

/// Key of the dark-mode preference ("true" / "false")
pub const DARK_MODE_KEY: &str = "dark_mode";

/// Generic setting getter
///
/// Returns None if the key is absent or NULL; fails if the stored value
/// does not parse as `T`.
pub async fn get_setting<T: FromStr>(db: &Pool<Sqlite>, key: &str) -> Result<Option<T>> {
    let value: Option<Option<String>> =
        sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(db)
            .await?;

    match value.flatten() {
        Some(s) => match s.parse::<T>() {
            Ok(parsed) => Ok(Some(parsed)),
            Err(_) => Err(Error::Config(format!(
                "Failed to parse setting '{}' value: {}",
                key, s
            ))),
        },
        None => Ok(None),
    }
}

/// Generic setting setter
///
/// Inserts or updates setting in database.
pub async fn set_setting<T: ToString>(db: &Pool<Sqlite>, key: &str, value: T) -> Result<()> {
    let value_str = value.to_string();

    sqlx::query(
        r#"
        INSERT INTO settings (key, value, updated_at)
        VALUES (?, ?, CURRENT_TIMESTAMP)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
        "#,
    )
    .bind(key)
    .bind(value_str)
    .execute(db)
    .await?;

    Ok(())
}

/// Dark-mode flag, false when unset
pub async fn get_dark_mode(db: &Pool<Sqlite>) -> Result<bool> {
    Ok(get_setting::<bool>(db, DARK_MODE_KEY).await?.unwrap_or(false))
}

pub async fn set_dark_mode(db: &Pool<Sqlite>, enabled: bool) -> Result<()> {
    set_setting(db, DARK_MODE_KEY, enabled).await
}
