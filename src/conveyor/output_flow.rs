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

use crate::errors::Result;
use crate::series::Series;
use crate::validation::validate_non_negative;

use super::{Bunker, InitialDensity, Speed, TransportDelay};

/// What the output flow of a belt is derived from.
pub(crate) trait OutputFlowSource {
    /// Flow put on the belt by the bunker at `tau`.
    fn loaded_flow_at(&self, tau: f64) -> Result<f64>;

    fn speed_at(&self, tau: f64) -> Result<f64>;

    /// Density of the initial load now arriving at the output.
    fn initial_density_at(&self, tau: f64) -> Result<f64>;
}

/// Borrowed view over the conveyor parts feeding its output flow.
pub(crate) struct BeltLoading<'a> {
    pub(crate) bunker: &'a Bunker,
    pub(crate) speed: &'a Speed,
    pub(crate) initial_density: &'a InitialDensity,
    pub(crate) transport_delay: &'a TransportDelay,
}

impl OutputFlowSource for BeltLoading<'_> {
    fn loaded_flow_at(&self, tau: f64) -> Result<f64> {
        self.bunker.conveyor_belt_output_flow_at(tau)
    }

    fn speed_at(&self, tau: f64) -> Result<f64> {
        self.speed.speed_at(tau)
    }

    fn initial_density_at(&self, tau: f64) -> Result<f64> {
        if self.initial_density.values().is_empty() {
            return Ok(0.0);
        }
        let distance = self.transport_delay.delta_distance_from_start(tau)?;
        self.initial_density.density_at_distance(distance)
    }
}

/// Flow leaving the end of the belt over time.
#[derive(Debug, Clone, Default)]
pub struct OutputFlow {
    tau_to_output_flow: Series<f64>,
}

impl OutputFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the output flow at `tau`.
    ///
    /// With a non-negative `delay_tau`, the material leaving was loaded at
    /// `tau - delay_tau` and keeps the density it had then. Otherwise the
    /// initial load is still leaving the belt.
    pub(crate) fn add_output_flow_value(
        &mut self,
        tau: f64,
        delay_tau: f64,
        source: &impl OutputFlowSource,
    ) -> Result<f64> {
        validate_non_negative("OutputFlow", &[("tau", tau)])?;
        let output_flow = if delay_tau >= 0.0 {
            Self::output_flow_for_delay(tau, delay_tau, source)?
        } else {
            source.initial_density_at(tau)? * source.speed_at(tau)?
        };
        self.tau_to_output_flow.insert(tau, output_flow);
        debug!("Output flow value added. Tau: {tau}, OutputFlow: {output_flow}");
        Ok(output_flow)
    }

    /// Records a step without any flow, for a stopped belt.
    pub(crate) fn hold(&mut self, tau: f64) {
        self.tau_to_output_flow.insert(tau, 0.0);
    }

    pub fn output_flow_at(&self, tau: f64) -> Result<f64> {
        self.tau_to_output_flow.get(tau).copied()
    }

    pub fn contains(&self, tau: f64) -> bool {
        self.tau_to_output_flow.contains_key(tau)
    }

    pub fn last_key(&self) -> Option<f64> {
        self.tau_to_output_flow.last_key()
    }

    pub fn values(&self) -> &Series<f64> {
        &self.tau_to_output_flow
    }

    fn output_flow_for_delay(
        tau: f64,
        delay_tau: f64,
        source: &impl OutputFlowSource,
    ) -> Result<f64> {
        let loading_speed = source.speed_at(tau - delay_tau)?;
        if loading_speed == 0.0 {
            return Ok(0.0);
        }
        Ok(source.loaded_flow_at(tau - delay_tau)? / loading_speed * source.speed_at(tau)?)
    }
}
