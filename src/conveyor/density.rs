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

use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::series::Series;
use crate::validation::{validate_max_value, validate_non_negative};

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DensityConfig {
    pub max_available_density: f64,
}

/// Material density at the input of the belt.
#[derive(Debug, Clone)]
pub struct Density {
    max_available_density: f64,
    tau_to_density: Series<f64>,
}

impl Density {
    pub fn new(max_available_density: f64) -> Self {
        Self {
            max_available_density,
            tau_to_density: Series::new(),
        }
    }

    pub fn max_available_density(&self) -> f64 {
        self.max_available_density
    }

    pub fn add_parameters_values(&mut self, tau: f64, density: f64) -> Result<()> {
        let params = [("tau", tau), ("density", density)];
        validate_non_negative("Density", &params)?;
        validate_max_value("density", density, self.max_available_density, &params)?;
        self.tau_to_density.insert(tau, density);
        debug!("Density value added. Tau: {tau}, Density: {density}");
        Ok(())
    }

    /// Density at the input of the belt at `tau`.
    pub fn density_at(&self, tau: f64) -> Result<f64> {
        self.tau_to_density.get(tau).copied()
    }

    pub fn last(&self) -> Option<f64> {
        self.tau_to_density.last().map(|(_, density)| *density)
    }

    pub fn values(&self) -> &Series<f64> {
        &self.tau_to_density
    }
}
