// (C) Copyright IBM Corp. 2024.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use log::{debug, error, info};
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::functions::FunctionConfig;
use crate::series::Series;
use crate::validation::validate_non_negative;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpeedConfig {
    pub min_available_speed: f64,
    pub max_available_speed: f64,
    /// Generator for the speed schedule, see [`crate::generator`].
    #[serde(flatten)]
    pub generator: FunctionConfig,
}

/// Belt speed over time.
///
/// Holds the speed schedule loaded from the initial data and records the
/// speed actually used at every simulated step.
#[derive(Debug, Clone)]
pub struct Speed {
    tau_to_speed: Series<f64>,
    min_available_speed: f64,
    max_available_speed: f64,
}

impl Speed {
    pub fn new(
        min_available_speed: f64,
        max_available_speed: f64,
        tau_to_speed: Series<f64>,
    ) -> Result<Self> {
        Self::validate_available_speed(min_available_speed, max_available_speed)?;
        info!(
            "Speed created with minAvailableSpeed: {min_available_speed} and maxAvailableSpeed: {max_available_speed}"
        );
        Ok(Self {
            tau_to_speed,
            min_available_speed,
            max_available_speed,
        })
    }

    pub fn from_config(config: &SpeedConfig) -> Result<Self> {
        Self::new(
            config.min_available_speed,
            config.max_available_speed,
            Series::new(),
        )
    }

    pub fn speed_at(&self, tau: f64) -> Result<f64> {
        self.tau_to_speed.get(tau).copied()
    }

    pub fn add_parameters_values(&mut self, tau: f64, speed: f64) -> Result<()> {
        validate_non_negative("Speed", &[("tau", tau), ("speed", speed)])?;
        self.tau_to_speed.insert(tau, speed);
        debug!("Speed value added. Tau: {tau}, Speed: {speed}");
        Ok(())
    }

    pub fn set_values(&mut self, tau_to_speed: Series<f64>) {
        self.tau_to_speed = tau_to_speed;
    }

    pub fn values(&self) -> &Series<f64> {
        &self.tau_to_speed
    }

    pub fn min_available_speed(&self) -> f64 {
        self.min_available_speed
    }

    pub fn max_available_speed(&self) -> f64 {
        self.max_available_speed
    }

    fn validate_available_speed(min_available_speed: f64, max_available_speed: f64) -> Result<()> {
        if min_available_speed < 0.0 || max_available_speed < min_available_speed {
            let err = Error::InvalidSpeedRange {
                min_available_speed,
                max_available_speed,
            };
            error!("{err}");
            return Err(err);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    const DEFAULT_SPEED_VALUE: f64 = 1.0;

    #[fixture]
    fn speed() -> Speed {
        let mut speed = Speed::new(0.0, DEFAULT_SPEED_VALUE, Series::new()).unwrap();
        speed.add_parameters_values(10.0, 30.0).unwrap();
        speed.add_parameters_values(20.0, 50.0).unwrap();
        speed
    }

    #[rstest]
    #[case(-10.0, 100.0, "Invalid speed range: minAvailableSpeed (-10.0) must be non-negative and less than or equal to maxAvailableSpeed (100.0).")]
    #[case(50.0, 40.0, "Invalid speed range: minAvailableSpeed (50.0) must be non-negative and less than or equal to maxAvailableSpeed (40.0).")]
    fn test_invalid_range(#[case] min: f64, #[case] max: f64, #[case] message: &str) {
        let err = Speed::new(min, max, Series::new()).unwrap_err();
        assert_eq!(err.to_string(), message);
    }

    #[rstest]
    fn test_add_valid_values(mut speed: Speed) {
        assert!(speed.add_parameters_values(10.5, 50.2).is_ok());
    }

    #[rstest]
    #[case(-1.0, DEFAULT_SPEED_VALUE)]
    #[case(10.0, -50.0)]
    fn test_add_invalid_values(mut speed: Speed, #[case] tau: f64, #[case] value: f64) {
        assert!(matches!(
            speed.add_parameters_values(tau, value),
            Err(Error::InvalidParameters(_))
        ));
    }

    #[rstest]
    fn test_exact_match(speed: Speed) {
        assert_eq!(speed.speed_at(10.0).unwrap(), 30.0);
    }

    #[rstest]
    fn test_no_match_below_schedule(speed: Speed) {
        assert!(matches!(speed.speed_at(5.0), Err(Error::KeyOutOfRange { .. })));
    }

    #[rstest]
    fn test_value_between_samples(speed: Speed) {
        assert_eq!(speed.speed_at(15.0).unwrap(), 50.0);
    }

    #[test]
    fn test_config_with_generator() {
        let config: SpeedConfig = serde_json::from_value(serde_json::json!({
            "minAvailableSpeed": 0.5,
            "maxAvailableSpeed": 2.0,
            "function": crate::functions::QUARTIC_POLYNOMIAL,
            "parameters": {"a0": 1.0}
        }))
        .unwrap();
        assert!(config.generator.build().unwrap().is_some());
        let speed = Speed::from_config(&config).unwrap();
        assert_eq!(speed.max_available_speed(), 2.0);
        assert!(speed.values().is_empty());
    }
}
