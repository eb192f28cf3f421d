//! Configuration validation.
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::ServiceConfig;

/// A single semantic problem with a config value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("not a socket address: {}", config.listener.bind_address),
        ));
    }

    if config.catalog.max_results == 0 {
        errors.push(ValidationError::new("catalog.max_results", "must be greater than 0"));
    }

    if config.resilience.bulkhead_capacity == 0 {
        errors.push(ValidationError::new(
            "resilience.bulkhead_capacity",
            "must be greater than 0",
        ));
    }
    if config.resilience.max_concurrent == 0 {
        errors.push(ValidationError::new(
            "resilience.max_concurrent",
            "must be greater than 0",
        ));
    }
    if config.resilience.failure_threshold == 0 {
        errors.push(ValidationError::new(
            "resilience.failure_threshold",
            "must be greater than 0",
        ));
    }

    if !(0.0..=1.0).contains(&config.fault.failure_rate) {
        errors.push(ValidationError::new(
            "fault.failure_rate",
            format!("must be within [0, 1], got {}", config.fault.failure_rate),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("not a socket address: {}", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_config(&ServiceConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = ServiceConfig::default();
        config.listener.bind_address = "nowhere".into();
        config.catalog.max_results = 0;
        config.resilience.max_concurrent = 0;
        config.fault.failure_rate = 1.5;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "listener.bind_address",
                "catalog.max_results",
                "resilience.max_concurrent",
                "fault.failure_rate",
            ]
        );
    }

    #[test]
    fn test_metrics_address_ignored_when_disabled() {
        let mut config = ServiceConfig::default();
        config.observability.metrics_address = "bogus".into();
        assert!(validate_config(&config).is_err());

        config.observability.metrics_enabled = false;
        assert!(validate_config(&config).is_ok());
    }
}
