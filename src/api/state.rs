use std::sync::Arc;

use crate::auth::AuthProvider;
use crate::config::AppConfig;
use crate::league::LeagueController;
use crate::storage::DocumentStore;

#[derive(Clone)]
pub struct AppState {
    pub league: Arc<LeagueController>,
    pub auth: Arc<dyn AuthProvider>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        auth: Arc<dyn AuthProvider>,
        config: AppConfig,
    ) -> Self {
        Self {
            league: Arc::new(LeagueController::new(store)),
            auth,
            config: Arc::new(config),
        }
    }
}
