//! API handlers for the web API.

pub mod bin;

pub use bin::*;

use std::sync::Arc;

use crate::bins::{BinService, BinSettings, BinStorage};
use crate::db::Database;

/// Shared database handle.
pub type SharedDatabase = Arc<Database>;

/// Application state shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Metadata store.
    pub db: SharedDatabase,
    /// Blob store.
    pub storage: BinStorage,
    /// Quota and retention settings.
    pub settings: BinSettings,
    /// Run the expiry sweep when the landing route is served.
    pub sweep_on_landing: bool,
}

impl AppState {
    /// Create a new application state.
    pub fn new(db: SharedDatabase, storage: BinStorage, settings: BinSettings) -> Self {
        Self {
            db,
            storage,
            settings,
            sweep_on_landing: true,
        }
    }

    /// Enable or disable the sweep on the landing route.
    pub fn with_sweep_on_landing(mut self, enabled: bool) -> Self {
        self.sweep_on_landing = enabled;
        self
    }

    /// Borrow a bin service over this state.
    pub fn bin_service(&self) -> BinService<'_> {
        BinService::new(&self.db, &self.storage, &self.settings)
    }
}
