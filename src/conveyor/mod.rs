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

//! A single conveyor belt fed by a bunker.

mod bunker;
mod density;
mod initial_density;
mod node;
mod output_flow;
mod speed;
mod transport_delay;

use std::collections::BTreeMap;

use log::{debug, info};
use serde::{Deserialize, Serialize};

pub use bunker::{Bunker, BunkerColumn, BunkerConfig, BunkerState};
pub use density::{Density, DensityConfig};
pub use initial_density::InitialDensity;
pub use node::ConveyorNode;
pub use output_flow::OutputFlow;
pub use speed::{Speed, SpeedConfig};
pub use transport_delay::TransportDelay;

use crate::errors::Result;
use crate::functions::FunctionConfig;
use crate::series::Series;
use output_flow::BeltLoading;

/// A conveyor as found in a transport system description.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConveyorConfig {
    pub id: u32,
    pub length: f64,
    pub bunker: BunkerConfig,
    pub density: DensityConfig,
    pub speed: SpeedConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_flow: Option<FunctionConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bunker_output_flow: Option<FunctionConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_density: Option<FunctionConfig>,
    /// Downstream conveyors, with the function splitting the output flow
    /// between them.
    #[serde(default)]
    pub connections: BTreeMap<u32, FunctionConfig>,
}

#[derive(Debug, Clone)]
pub struct Conveyor {
    id: u32,
    length: f64,
    bunker: Bunker,
    speed: Speed,
    density: Density,
    transport_delay: TransportDelay,
    output_flow: OutputFlow,
    initial_density: InitialDensity,
    input_flow: Option<Series<f64>>,
    bunker_output_flow: Option<Series<f64>>,
    node: ConveyorNode,
    delays: Series<f64>,
}

impl Conveyor {
    pub fn new(config: &ConveyorConfig) -> Result<Self> {
        let conveyor = Self {
            id: config.id,
            length: config.length,
            bunker: Bunker::new(&config.bunker),
            speed: Speed::from_config(&config.speed)?,
            density: Density::new(config.density.max_available_density),
            transport_delay: TransportDelay::new(),
            output_flow: OutputFlow::new(),
            initial_density: InitialDensity::default(),
            input_flow: None,
            bunker_output_flow: None,
            node: ConveyorNode::new(config.connections.keys().copied()),
            delays: Series::new(),
        };
        info!("Conveyor {} created with length {}", conveyor.id, conveyor.length);
        Ok(conveyor)
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn bunker(&self) -> &Bunker {
        &self.bunker
    }

    pub fn speed(&self) -> &Speed {
        &self.speed
    }

    pub fn density(&self) -> &Density {
        &self.density
    }

    pub fn output_flow(&self) -> &OutputFlow {
        &self.output_flow
    }

    pub fn initial_density(&self) -> &InitialDensity {
        &self.initial_density
    }

    pub fn input_flow(&self) -> Option<&Series<f64>> {
        self.input_flow.as_ref()
    }

    pub fn bunker_output_flow(&self) -> Option<&Series<f64>> {
        self.bunker_output_flow.as_ref()
    }

    pub fn node(&self) -> &ConveyorNode {
        &self.node
    }

    pub(crate) fn node_mut(&mut self) -> &mut ConveyorNode {
        &mut self.node
    }

    /// Transport delay over the whole belt length, per simulated `tau`.
    pub fn delays(&self) -> &Series<f64> {
        &self.delays
    }

    pub fn set_initial_density(&mut self, density: Series<f64>) {
        self.initial_density.set_values(density);
    }

    pub fn set_input_flow(&mut self, input_flow: Series<f64>) {
        self.input_flow = Some(input_flow);
    }

    pub fn set_bunker_output_flow(&mut self, bunker_output_flow: Series<f64>) {
        self.bunker_output_flow = Some(bunker_output_flow);
    }

    pub fn set_speed(&mut self, tau_to_speed: Series<f64>) {
        self.speed.set_values(tau_to_speed);
    }

    /// Last simulated (or idle) `tau`.
    pub fn last_tau(&self) -> Option<f64> {
        self.output_flow.last_key()
    }

    pub fn holds(&self, tau: f64) -> bool {
        self.output_flow.contains(tau)
    }

    /// Flow entering from outside the system at `tau`, 0 without a schedule.
    pub fn own_input_flow_at(&self, tau: f64) -> Result<f64> {
        match &self.input_flow {
            Some(input_flow) => input_flow.get(tau).copied(),
            None => Ok(0.0),
        }
    }

    /// Scheduled bunker output at `tau`, the bunker limit without a schedule.
    pub fn planned_bunker_output(&self, tau: f64) -> Result<f64> {
        match &self.bunker_output_flow {
            Some(bunker_output_flow) => bunker_output_flow.get(tau).copied(),
            None => Ok(self.bunker.max_available_output()),
        }
    }

    /// Runs one simulation step at `tau`.
    pub fn add_parameters_values(
        &mut self,
        tau: f64,
        bunker_input: f64,
        planed_bunker_output: f64,
        speed: f64,
    ) -> Result<()> {
        let max_density = self.density.max_available_density();
        self.bunker
            .add_parameters_values(tau, bunker_input, planed_bunker_output, max_density * speed)?;
        self.speed.add_parameters_values(tau, speed)?;
        self.transport_delay.add_parameters_values(tau, speed)?;
        let density = self.calculate_density(tau, speed)?;
        self.density.add_parameters_values(tau, density)?;

        let delay_tau = self.record_delay(tau)?;
        let loading = BeltLoading {
            bunker: &self.bunker,
            speed: &self.speed,
            initial_density: &self.initial_density,
            transport_delay: &self.transport_delay,
        };
        self.output_flow
            .add_output_flow_value(tau, delay_tau, &loading)?;
        Ok(())
    }

    /// Records an idle step at `tau`: the belt stands still and the bunker
    /// neither takes nor gives anything.
    pub fn hold(&mut self, tau: f64) -> Result<()> {
        self.bunker.hold(tau);
        self.speed.add_parameters_values(tau, 0.0)?;
        self.transport_delay.add_parameters_values(tau, 0.0)?;
        let density = self.density.last().unwrap_or(0.0);
        self.density.add_parameters_values(tau, density)?;
        self.record_delay(tau)?;
        self.output_flow.hold(tau);
        debug!("Conveyor {} holds at tau {tau}", self.id);
        Ok(())
    }

    fn calculate_density(&self, tau: f64, speed: f64) -> Result<f64> {
        let max_density = self.density.max_available_density();
        if speed == 0.0 {
            return Ok(max_density);
        }
        let density = self.bunker.conveyor_belt_output_flow_at(tau)? / speed;
        Ok(density.min(max_density))
    }

    fn record_delay(&mut self, tau: f64) -> Result<f64> {
        let delay_tau = self.transport_delay.delay_by_delta_distance(self.length)?;
        self.delays.insert(tau, delay_tau);
        Ok(delay_tau)
    }
}
