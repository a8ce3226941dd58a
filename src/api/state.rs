use std::sync::Arc;

use crate::refresh::RosterController;

#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<RosterController>,
    pub cors_origin: String,
}

impl AppState {
    pub fn new(controller: Arc<RosterController>, cors_origin: impl Into<String>) -> Self {
        Self {
            controller,
            cors_origin: cors_origin.into(),
        }
    }
}
