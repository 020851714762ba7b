use std::sync::Arc;

use crate::config::Config;
use crate::lifecycle::EndpointManager;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub endpoints: EndpointManager,
}
