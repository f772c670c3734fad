use log::debug;

use crate::error::Result;
use crate::model::config::{FitOptions, ModelConfig};
use crate::model::regressor::MlpRegressor;

/// Turns a `ModelConfig` into an untrained regressor.
#[derive(Debug, Clone, Default)]
pub struct ModelConfigurator {
    options: FitOptions,
}

impl ModelConfigurator {
    pub fn new() -> ModelConfigurator {
        ModelConfigurator::default()
    }

    pub fn with_options(options: FitOptions) -> ModelConfigurator {
        ModelConfigurator { options }
    }

    /// Validates `config` and returns a fresh, unfit model holding its own
    /// copy of it. No training happens here.
    pub fn build(&self, config: &ModelConfig) -> Result<MlpRegressor> {
        config.validate()?;
        debug!("built untrained model: {}", config);
        Ok(MlpRegressor::new(config.clone(), self.options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::activation::ActivationFunction;
    use crate::error::Error;
    use crate::model::regressor::Regressor;

    #[test]
    fn builds_untrained_model_from_defaults() {
        let model = ModelConfigurator::new().build(&ModelConfig::default()).unwrap();
        assert!(!model.is_fitted());
        assert_eq!(model.config(), &ModelConfig::default());
        assert_eq!(model.options(), &FitOptions::default());
    }

    #[test]
    fn rejects_identity_activation_and_bad_width() {
        let configurator = ModelConfigurator::new();
        let config = ModelConfig { activation: ActivationFunction::Identity, ..ModelConfig::default() };
        assert!(matches!(
            configurator.build(&config),
            Err(Error::InvalidConfig { field: "activation", .. })
        ));

        let config = ModelConfig { hidden_layer_width: 300, ..ModelConfig::default() };
        assert!(matches!(
            configurator.build(&config),
            Err(Error::InvalidConfig { field: "hidden_layer_width", .. })
        ));
    }
}
