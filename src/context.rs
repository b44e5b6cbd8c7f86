//! Application context built once at startup and handed to every caller.

use anyhow::{Context, Result};
use log::info;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::logger::Logger;
use crate::notifications::Notifications;
use crate::service::TrackerService;
use crate::storage::LocalStorage;

/// Everything a request handler needs: configuration, storage, logging and
/// the notice queue, wired to one [`TrackerService`].
#[derive(Clone)]
pub struct AppContext {
    pub config: Config,
    pub logger: Logger,
    pub notifications: Notifications,
    pub service: TrackerService,
}

impl AppContext {
    /// Open the configured database and wire the service.
    pub async fn new(config: Config, logger: Logger) -> Result<Self> {
        let storage = LocalStorage::new(&config.database)
            .await
            .with_context(|| format!("Failed to open database: {}", config.database.url))?;
        Ok(Self::with_storage(config, logger, storage))
    }

    /// Wire the service over an already opened storage.
    pub fn with_storage(config: Config, logger: Logger, storage: LocalStorage) -> Self {
        let notifications = Notifications::new();
        let service = TrackerService::new(
            Arc::new(Mutex::new(storage)),
            notifications.clone(),
            config.dashboard.overdue_warning,
        );
        info!("🚀 Application context ready");

        Self {
            config,
            logger,
            notifications,
            service,
        }
    }
}
