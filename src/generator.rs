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

//! Generation of the initial data of a transport system.
//!
//! Every schedule of a conveyor (input flow, planned bunker output, speed and
//! junction splits) is sampled from its function over the time grid, and the
//! initial belt loading over the belt coordinate. The result is the table
//! read back by [`TransportSystem::load`](crate::TransportSystem::load).

use std::collections::BTreeMap;

use log::{error, info, warn};

use crate::columns::{self, connection_header, header};
use crate::conveyor::ConveyorConfig;
use crate::errors::{Error, Result};
use crate::functions::{grid, sample, FunctionConfig};
use crate::settings::App;
use crate::table::{Table, TableFormat};
use crate::transport_system::TransportSystemConfig;
use crate::validation::parameters_message;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataGenerator {
    research_tau: f64,
    delta_tau: f64,
    delta_length: f64,
}

impl DataGenerator {
    pub fn new(research_tau: f64, delta_tau: f64, delta_length: f64) -> Self {
        Self {
            research_tau,
            delta_tau,
            delta_length,
        }
    }

    pub fn from_app(app: &App) -> Self {
        Self::new(app.research_tau, app.delta_tau, app.delta_length)
    }

    /// Generates the initial data and writes it to the system's init data path.
    pub fn generate(&self, config: &TransportSystemConfig, format: &TableFormat) -> Result<()> {
        self.initial_data(config, format)?
            .write(&config.init_data_path)?;
        info!(
            "Initial data for {} conveyors written to '{}'",
            config.conveyors.len(),
            config.init_data_path.display()
        );
        Ok(())
    }

    /// Builds the initial data table: the belt coordinate and the initial
    /// densities first, then the time grid and the schedules.
    pub fn initial_data(&self, config: &TransportSystemConfig, format: &TableFormat) -> Result<Table> {
        let mut table_columns = Vec::new();

        let longest = config
            .conveyors
            .iter()
            .map(|conveyor| conveyor.length)
            .fold(0.0, f64::max);
        table_columns.push(format.column(
            columns::KSI,
            grid(self.delta_length, longest + self.delta_length),
        ));
        for conveyor in &config.conveyors {
            let length = conveyor.length + self.delta_length;
            match self.sample(conveyor.initial_density.as_ref(), self.delta_length, length)? {
                Some(density) => table_columns.push(format.column(
                    &header(conveyor.id, columns::INITIAL_DENSITY),
                    density,
                )),
                None => warn!("No initial density for conveyor {}", conveyor.id),
            }
        }

        table_columns.push(format.column(
            columns::TAU,
            grid(self.delta_tau, self.research_tau),
        ));
        for conveyor in &config.conveyors {
            let schedules = [
                (columns::INPUT_FLOW, conveyor.input_flow.as_ref()),
                (columns::BUNKER_OUTPUT_FLOW, conveyor.bunker_output_flow.as_ref()),
                (columns::SPEED, Some(&conveyor.speed.generator)),
            ];
            for (name, generator) in schedules {
                if let Some(values) = self.sample(generator, self.delta_tau, self.research_tau)? {
                    table_columns.push(format.column(&header(conveyor.id, name), values));
                }
            }
            for (target_id, fractions) in self.splits(conveyor)? {
                table_columns.push(format.column(
                    &connection_header(conveyor.id, target_id),
                    fractions,
                ));
            }
        }
        Ok(Table::from_columns(&table_columns))
    }

    fn sample(
        &self,
        generator: Option<&FunctionConfig>,
        step: f64,
        limit: f64,
    ) -> Result<Option<Vec<f64>>> {
        let Some(function) = generator.map(FunctionConfig::build).transpose()?.flatten() else {
            return Ok(None);
        };
        Ok(Some(
            sample(function.as_ref(), step, limit)
                .into_iter()
                .map(|(_, y)| y)
                .collect(),
        ))
    }

    /// Fractions of the output flow routed to each downstream conveyor.
    ///
    /// Only junctions with several targets are split. The split functions
    /// are normalized by their sum at every `tau`.
    fn splits(&self, conveyor: &ConveyorConfig) -> Result<BTreeMap<u32, Vec<f64>>> {
        if conveyor.connections.len() < 2 {
            return Ok(BTreeMap::new());
        }
        let mut splits = BTreeMap::new();
        for (target_id, generator) in &conveyor.connections {
            let values = self
                .sample(Some(generator), self.delta_tau, self.research_tau)?
                .ok_or(Error::MissingSplitFunction {
                    conveyor_id: conveyor.id,
                    target_id: *target_id,
                })?;
            splits.insert(*target_id, values);
        }

        let taus: Vec<f64> = grid(self.delta_tau, self.research_tau).collect();
        let sums: Vec<f64> = (0..taus.len())
            .map(|i| splits.values().filter_map(|values| values.get(i)).sum())
            .collect();
        for values in splits.values_mut() {
            for ((value, sum), tau) in values.iter_mut().zip(&sums).zip(&taus) {
                if *sum <= 0.0 || *value < 0.0 {
                    let message = parameters_message(
                        "Parameters for [ConveyorNode] must be positive:",
                        &[("id", f64::from(conveyor.id)), ("tau", *tau), ("value", *value), ("sum", *sum)],
                    );
                    error!("{message}");
                    return Err(Error::InvalidParameters(message));
                }
                *value /= sum;
            }
        }
        Ok(splits)
    }
}
