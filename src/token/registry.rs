use super::date_difference::DateDifferenceToken;
use super::{DynamicToken, TokenInstanceConfig};
use crate::config;

pub type Factory = fn(TokenInstanceConfig) -> Box<dyn DynamicToken>;

/// Token types this build knows about, keyed by type id.
const REGISTRY: &[(&str, Factory)] = &[(config::TOKEN_TYPE_ID, DateDifferenceToken::boxed)];

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("unknown token type: {0}")]
    UnknownToken(String),
}

pub fn create(id: &str, config: TokenInstanceConfig) -> Result<Box<dyn DynamicToken>, RegistryError> {
    let Some(&(_, factory)) = REGISTRY.iter().find(|(key, _)| *key == id) else {
        tracing::warn!(token_type = id, "no registered token type");
        return Err(RegistryError::UnknownToken(id.to_string()));
    };
    Ok(factory(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_registered_token() {
        let token = create(config::TOKEN_TYPE_ID, TokenInstanceConfig::default()).unwrap();
        assert_eq!(token.id(), config::TOKEN_TYPE_ID);
        assert_eq!(token.label(), "Dynamic Date Difference Token");
        assert_eq!(token.config(), &TokenInstanceConfig::default());
    }

    #[test]
    fn unknown_id_is_an_error() {
        let err = create("dynamic_weather_token", TokenInstanceConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, RegistryError::UnknownToken(ref id) if id == "dynamic_weather_token"));
    }
}
