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

//! Builders for transport systems used in tests.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::conveyor::{BunkerConfig, ConveyorConfig, DensityConfig, SpeedConfig};
use crate::functions::{FunctionConfig, QUARTIC_POLYNOMIAL};
use crate::settings::{App, PrepareDataTableFormat, Settings, TransportSystemFile};
use crate::table::{NumberLocale, Table, TableFormat};
use crate::transport_system::TransportSystemConfig;

/// A function returning `value` everywhere.
pub fn constant(value: f64) -> FunctionConfig {
    FunctionConfig::new(
        QUARTIC_POLYNOMIAL,
        HashMap::from([("a0".to_string(), value)]),
    )
}

/// Builds a [`ConveyorConfig`] with an empty bunker large enough not to
/// limit the flows.
pub struct ConveyorConfigBuilder {
    config: ConveyorConfig,
}

impl ConveyorConfigBuilder {
    pub fn new(id: u32, length: f64) -> Self {
        Self {
            config: ConveyorConfig {
                id,
                length,
                bunker: BunkerConfig {
                    initial_capacity: 0.0,
                    bunker_over_max_capacity: 0.0,
                    density_over_max_capacity: 0.0,
                    max_capacity: 1000.0,
                    min_available_capacity: 0.0,
                    max_available_capacity: 1000.0,
                    max_available_output: 100.0,
                },
                density: DensityConfig {
                    max_available_density: 100.0,
                },
                speed: SpeedConfig {
                    min_available_speed: 0.0,
                    max_available_speed: 10.0,
                    generator: constant(1.0),
                },
                input_flow: None,
                bunker_output_flow: None,
                initial_density: None,
                connections: BTreeMap::new(),
            },
        }
    }

    pub fn bunker(mut self, bunker: BunkerConfig) -> Self {
        self.config.bunker = bunker;
        self
    }

    pub fn max_available_density(mut self, max_available_density: f64) -> Self {
        self.config.density.max_available_density = max_available_density;
        self
    }

    pub fn speed(mut self, generator: FunctionConfig) -> Self {
        self.config.speed.generator = generator;
        self
    }

    pub fn input_flow(mut self, generator: FunctionConfig) -> Self {
        self.config.input_flow = Some(generator);
        self
    }

    pub fn bunker_output_flow(mut self, generator: FunctionConfig) -> Self {
        self.config.bunker_output_flow = Some(generator);
        self
    }

    pub fn initial_density(mut self, generator: FunctionConfig) -> Self {
        self.config.initial_density = Some(generator);
        self
    }

    pub fn connection(mut self, target_id: u32, split: FunctionConfig) -> Self {
        self.config.connections.insert(target_id, split);
        self
    }

    pub fn build(self) -> ConveyorConfig {
        self.config
    }
}

/// A transport system keeping its data files in `dir`.
pub fn transport_system_config(
    dir: &Path,
    name: &str,
    conveyors: Vec<ConveyorConfig>,
) -> TransportSystemConfig {
    TransportSystemConfig {
        conveyors,
        init_data_path: dir.join(format!("{name}-init.csv")),
        output_data_path: dir.join(format!("{name}-result.csv")),
    }
}

/// Settings running each `(file, id, start_times)` system over `[0, research_tau)`.
pub fn settings(
    research_tau: f64,
    delta_tau: f64,
    delta_length: f64,
    systems: &[(&Path, &str, Vec<f64>)],
) -> Settings {
    Settings {
        app: App {
            name: "conveyor-transport".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            locale: NumberLocale::default(),
            research_tau,
            delta_tau,
            delta_length,
            init_transport_system_files: systems
                .iter()
                .map(|(file, id, start_times)| {
                    (
                        file.to_path_buf(),
                        TransportSystemFile {
                            id: id.to_string(),
                            start_times: start_times.clone(),
                        },
                    )
                })
                .collect(),
        },
        prepare_data_table_format: PrepareDataTableFormat::default(),
    }
}

/// An initial data table with the given columns, in the default format.
pub fn initial_data(columns: &[(&str, Vec<f64>)]) -> Table {
    let format = TableFormat::default();
    let columns: Vec<Vec<String>> = columns
        .iter()
        .map(|(header, values)| format.column(header, values.iter().copied()))
        .collect();
    Table::from_columns(&columns)
}
