use chrono::{DateTime, Utc};

use super::normalize::{self, ConfigValue, FormInput, NormalizedTarget, ValidationError};
use super::{DynamicToken, TargetDateTime, TokenInstanceConfig, difference};
use crate::config;

const ATTACHMENTS: &[&str] = &[config::RUNTIME_LIBRARY];

/// The date difference token bound to one instance configuration.
pub struct DateDifferenceToken {
    config: TokenInstanceConfig,
}

impl DateDifferenceToken {
    pub fn new(config: TokenInstanceConfig) -> Self {
        Self { config }
    }

    pub fn boxed(config: TokenInstanceConfig) -> Box<dyn DynamicToken> {
        Box::new(Self::new(config))
    }
}

impl DynamicToken for DateDifferenceToken {
    fn id(&self) -> &'static str {
        config::TOKEN_TYPE_ID
    }

    fn label(&self) -> &'static str {
        config::TOKEN_LABEL
    }

    fn render_default(
        &self,
        raw: Option<&ConfigValue>,
        now: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        normalize::render_default(raw, now)
    }

    fn normalize(&self, input: &FormInput, now: DateTime<Utc>) -> NormalizedTarget {
        normalize::normalize(input, now)
    }

    fn validate_element(
        &self,
        value: &FormInput,
        now: DateTime<Utc>,
    ) -> Result<TargetDateTime, ValidationError> {
        normalize::validate_element(value, now)
    }

    fn value(&self, now: DateTime<Utc>) -> String {
        difference::render(&self.config.target_datetime, now, self.config.format_mode)
    }

    fn extra_attributes(&self) -> Vec<(&'static str, String)> {
        vec![("data-target-datetime", self.config.target_datetime.clone())]
    }

    fn attachments(&self) -> &'static [&'static str] {
        ATTACHMENTS
    }

    fn config(&self) -> &TokenInstanceConfig {
        &self.config
    }
}
