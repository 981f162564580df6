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

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::series::Series;
use crate::validation::{parameters_message, validate_non_negative};

/// Bunker parameters as found in a transport system description.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BunkerConfig {
    pub initial_capacity: f64,
    #[serde(default)]
    pub bunker_over_max_capacity: f64,
    #[serde(default)]
    pub density_over_max_capacity: f64,
    pub max_capacity: f64,
    #[serde(default)]
    pub min_available_capacity: f64,
    pub max_available_capacity: f64,
    pub max_available_output: f64,
}

/// State of a bunker at a given `tau`.
///
/// `real_output_flow` and `conveyor_belt_output_flow` are provisional until
/// the next step is added: both depend on the length of the step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BunkerState {
    pub input_flow: f64,
    pub planed_output_flow: f64,
    pub capacity: f64,
    pub over_max_capacity: f64,
    pub density_over_max_capacity: f64,
    pub real_output_flow: f64,
    pub conveyor_belt_output_flow: f64,
    /// Largest flow the belt could take at this step.
    pub output_for_max_density: f64,
}

/// Fields of [`BunkerState`], named like the result table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BunkerColumn {
    Capacity,
    OverMaxCapacity,
    DensityOverMaxCapacity,
    InputFlow,
    PlanedOutputFlow,
    RealOutputFlow,
    ConveyorBeltOutputFlow,
}

impl BunkerColumn {
    pub const ALL: [BunkerColumn; 7] = [
        BunkerColumn::Capacity,
        BunkerColumn::OverMaxCapacity,
        BunkerColumn::DensityOverMaxCapacity,
        BunkerColumn::InputFlow,
        BunkerColumn::PlanedOutputFlow,
        BunkerColumn::RealOutputFlow,
        BunkerColumn::ConveyorBeltOutputFlow,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Capacity => "bunker-capacity",
            Self::OverMaxCapacity => "bunker-over-max-capacity",
            Self::DensityOverMaxCapacity => "density-over-max-capacity",
            Self::InputFlow => "bunker-input-flow",
            Self::PlanedOutputFlow => "bunker-planed-output-flow",
            Self::RealOutputFlow => "bunker-real-output-flow",
            Self::ConveyorBeltOutputFlow => "conveyor-belt-bunker-output-flow",
        }
    }

    fn of(&self, state: &BunkerState) -> f64 {
        match self {
            Self::Capacity => state.capacity,
            Self::OverMaxCapacity => state.over_max_capacity,
            Self::DensityOverMaxCapacity => state.density_over_max_capacity,
            Self::InputFlow => state.input_flow,
            Self::PlanedOutputFlow => state.planed_output_flow,
            Self::RealOutputFlow => state.real_output_flow,
            Self::ConveyorBeltOutputFlow => state.conveyor_belt_output_flow,
        }
    }
}

/// Storage feeding a conveyor belt.
///
/// Tracks input and output flows over time and derives the capacity and the
/// material that could not be stored (over max capacity) or could not be
/// put on the belt (over max density).
#[derive(Debug, Clone)]
pub struct Bunker {
    states: Series<BunkerState>,
    min_capacity: f64,
    max_capacity: f64,
    capacity: f64,
    bunker_over_max_capacity: f64,
    density_over_max_capacity: f64,
    min_available_capacity: f64,
    max_available_capacity: f64,
    max_available_output: f64,
}

impl Bunker {
    pub fn new(config: &BunkerConfig) -> Self {
        info!(
            "Bunker created with initial capacity: {}, max capacity: {}, min available capacity: {}, \
             max available capacity: {}, max available output: {}",
            config.initial_capacity,
            config.max_capacity,
            config.min_available_capacity,
            config.max_available_capacity,
            config.max_available_output
        );
        Self {
            states: Series::new(),
            min_capacity: 0.0,
            max_capacity: config.max_capacity,
            capacity: config.initial_capacity,
            bunker_over_max_capacity: config.bunker_over_max_capacity,
            density_over_max_capacity: config.density_over_max_capacity,
            min_available_capacity: config.min_available_capacity,
            max_available_capacity: config.max_available_capacity,
            max_available_output: config.max_available_output,
        }
    }

    pub fn max_available_output(&self) -> f64 {
        self.max_available_output
    }

    pub fn min_available_capacity(&self) -> f64 {
        self.min_available_capacity
    }

    pub fn max_available_capacity(&self) -> f64 {
        self.max_available_capacity
    }

    /// Records the flows at `tau`.
    ///
    /// `output_for_max_density` is the largest flow the belt can take at
    /// `tau` (max density times speed).
    pub fn add_parameters_values(
        &mut self,
        tau: f64,
        input: f64,
        planed_output: f64,
        output_for_max_density: f64,
    ) -> Result<()> {
        validate_non_negative(
            "Bunker",
            &[
                ("tau", tau),
                ("input", input),
                ("planedBunkerOutput", planed_output),
                ("outputForMaxDensity", output_for_max_density),
            ],
        )?;
        let state = if self.states.is_empty() {
            self.initial_state(input, planed_output, output_for_max_density)
        } else {
            self.next_state(tau, input, planed_output, output_for_max_density)
        };
        debug!(
            "{}",
            parameters_message(
                "Bunker parameters added => ",
                &[
                    ("tau", tau),
                    ("input", state.input_flow),
                    ("planedOutput", state.planed_output_flow),
                    ("capacity", state.capacity),
                    ("overMaxCapacity", state.over_max_capacity),
                    ("densityOverMaxCapacity", state.density_over_max_capacity),
                ]
            )
        );
        self.states.insert(tau, state);
        Ok(())
    }

    /// Records an idle step at `tau`: nothing enters or leaves the bunker
    /// from `tau` on. The previous step is closed with its own belt limit.
    pub fn hold(&mut self, tau: f64) {
        let last_limit = self
            .states
            .last()
            .map(|(_, last)| last.output_for_max_density);
        let state = match last_limit {
            None => self.initial_state(0.0, 0.0, 0.0),
            Some(output_for_max_density) => self.next_state(tau, 0.0, 0.0, output_for_max_density),
        };
        self.states.insert(tau, state);
    }

    pub fn input_flow_at(&self, tau: f64) -> Result<f64> {
        self.parameter_at(BunkerColumn::InputFlow, tau)
    }

    /// Output flow leaving the bunker regardless of the belt density limit.
    pub fn real_output_flow_at(&self, tau: f64) -> Result<f64> {
        self.parameter_at(BunkerColumn::RealOutputFlow, tau)
    }

    /// Output flow put on the belt, limited by the max belt density.
    pub fn conveyor_belt_output_flow_at(&self, tau: f64) -> Result<f64> {
        self.parameter_at(BunkerColumn::ConveyorBeltOutputFlow, tau)
    }

    pub fn capacity_at(&self, tau: f64) -> Result<f64> {
        debug!("Retrieving capacity for tau: {tau}");
        self.parameter_at(BunkerColumn::Capacity, tau)
    }

    pub fn over_max_capacity_at(&self, tau: f64) -> Result<f64> {
        self.parameter_at(BunkerColumn::OverMaxCapacity, tau)
    }

    pub fn density_over_max_capacity_at(&self, tau: f64) -> Result<f64> {
        self.parameter_at(BunkerColumn::DensityOverMaxCapacity, tau)
    }

    pub fn column(&self, column: BunkerColumn) -> Vec<f64> {
        self.states.values().map(|state| column.of(state)).collect()
    }

    pub fn last_tau(&self) -> Option<f64> {
        self.states.last_key()
    }

    fn parameter_at(&self, column: BunkerColumn, tau: f64) -> Result<f64> {
        self.states.get(tau).map(|state| column.of(state))
    }

    fn initial_state(
        &self,
        input: f64,
        planed_output: f64,
        output_for_max_density: f64,
    ) -> BunkerState {
        BunkerState {
            input_flow: input,
            planed_output_flow: planed_output,
            capacity: self.limited_capacity(self.capacity),
            over_max_capacity: Self::over_max_capacity(
                self.bunker_over_max_capacity,
                self.max_capacity,
                self.capacity,
            ),
            density_over_max_capacity: self.density_over_max_capacity,
            real_output_flow: 0.0,
            conveyor_belt_output_flow: 0.0,
            output_for_max_density,
        }
    }

    /// Closes the previous step (its real and on-belt output depend on the
    /// step length) and derives the state at `tau` from it.
    fn next_state(
        &mut self,
        tau: f64,
        input: f64,
        planed_output: f64,
        output_for_max_density: f64,
    ) -> BunkerState {
        let max_available_output = self.max_available_output;
        let Some((last_tau, last)) = self.states.last_mut() else {
            return self.initial_state(input, planed_output, output_for_max_density);
        };
        let delta_tau = tau - last_tau;

        let limited_planed_output = last.planed_output_flow.min(max_available_output);
        last.real_output_flow =
            limited_planed_output.min(last.input_flow + last.capacity / delta_tau);
        last.conveyor_belt_output_flow = last.real_output_flow.min(output_for_max_density);
        let last = *last;

        let predicted_capacity = (last.capacity
            + (last.input_flow - last.real_output_flow) * delta_tau)
            .max(0.0);
        BunkerState {
            input_flow: input,
            planed_output_flow: planed_output,
            capacity: self.limited_capacity(predicted_capacity),
            over_max_capacity: Self::over_max_capacity(
                last.over_max_capacity,
                self.max_capacity,
                predicted_capacity,
            ),
            density_over_max_capacity: last.density_over_max_capacity
                + ((last.real_output_flow - last.conveyor_belt_output_flow) * delta_tau).max(0.0),
            real_output_flow: last.real_output_flow,
            conveyor_belt_output_flow: last.conveyor_belt_output_flow,
            output_for_max_density,
        }
    }

    fn limited_capacity(&self, capacity: f64) -> f64 {
        capacity.max(self.min_capacity).min(self.max_capacity)
    }

    fn over_max_capacity(previous: f64, max_capacity: f64, capacity: f64) -> f64 {
        previous + (capacity - max_capacity).max(0.0)
    }
}
