//! Theme preferences
//!
//! The dark-mode flag lives in the `settings` table. Writes publish
//! [`CatalogEvent::SettingChanged`] on the shared bus so observers can follow
//! the preference as a stream.

use futures::stream::Stream;
use recetario_common::db::settings::{get_dark_mode, set_dark_mode, DARK_MODE_KEY};
use recetario_common::{CatalogEvent, EventBus, Result};
use sqlx::SqlitePool;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

#[derive(Clone)]
pub struct ThemePreferences {
    pool: SqlitePool,
    events: EventBus,
}

impl ThemePreferences {
    pub fn new(pool: SqlitePool, events: EventBus) -> Self {
        Self { pool, events }
    }

    pub async fn dark_mode(&self) -> Result<bool> {
        get_dark_mode(&self.pool).await
    }

    pub async fn set_dark_mode(&self, enabled: bool) -> Result<()> {
        set_dark_mode(&self.pool, enabled).await?;
        info!("Dark mode {}", if enabled { "enabled" } else { "disabled" });
        self.events
            .emit_lossy(CatalogEvent::setting_changed(DARK_MODE_KEY));
        Ok(())
    }

    /// Current flag, then the stored value after every write to it
    pub fn dark_mode_stream(&self) -> impl Stream<Item = Result<bool>> + Send + 'static {
        let pool = self.pool.clone();
        let mut rx = self.events.subscribe();

        async_stream::stream! {
            yield get_dark_mode(&pool).await;

            loop {
                match rx.recv().await {
                    Ok(CatalogEvent::SettingChanged { key, .. }) if key == DARK_MODE_KEY => {}
                    Ok(_) => continue,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Preference observer lagged {} events, re-reading", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
                yield get_dark_mode(&pool).await;
            }
        }
    }
}
