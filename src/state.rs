use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config;
use crate::token::registry::{self, RegistryError};
use crate::token::{DynamicToken, TokenInstanceConfig};

/// ArcSwap gives lock-free reads; a submission swaps in a whole new config.
pub type SharedInstance = Arc<ArcSwap<TokenInstanceConfig>>;

#[derive(Clone)]
pub struct AppState {
    pub instance: SharedInstance,
}

impl AppState {
    pub fn new(initial: TokenInstanceConfig) -> Self {
        Self {
            instance: Arc::new(ArcSwap::new(Arc::new(initial))),
        }
    }

    pub fn config(&self) -> Arc<TokenInstanceConfig> {
        self.instance.load_full()
    }

    /// Token plugin bound to the current configuration.
    pub fn token(&self) -> Result<Box<dyn DynamicToken>, RegistryError> {
        registry::create(config::TOKEN_TYPE_ID, (*self.config()).clone())
    }

    pub fn store(&self, next: TokenInstanceConfig) {
        tracing::info!(
            target_datetime = %next.target_datetime,
            refresh_speed_ms = next.refresh_speed_ms,
            format_mode = %next.format_mode,
            "token configuration updated"
        );
        self.instance.store(Arc::new(next));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::FormatMode;

    #[test]
    fn store_swaps_the_whole_config() {
        let state = AppState::new(TokenInstanceConfig::default());
        let before = state.config();

        let next = TokenInstanceConfig {
            target_datetime: "2030-01-01T00:00:00Z".into(),
            refresh_speed_ms: 200,
            format_mode: FormatMode::SecondsSignedInteger,
        };
        state.store(next.clone());

        assert_eq!(*state.config(), next);
        assert_eq!(*before, TokenInstanceConfig::default());
        assert_eq!(state.token().unwrap().config(), &next);
    }
}
