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

//! A network of conveyors connected through junctions.

mod config;

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

pub use config::TransportSystemConfig;

use crate::columns::{self, connection_header, header};
use crate::conveyor::{BunkerColumn, Conveyor};
use crate::errors::{Error, Result};
use crate::functions::grid;
use crate::series::{is_same_key, Series};
use crate::settings::Settings;
use crate::table::{NumberLocale, Table, TableFormat};

#[derive(Debug, Clone)]
pub struct TransportSystem {
    conveyors: Vec<Conveyor>,
    index: HashMap<u32, usize>,
    /// Conveyor indices, upstream conveyors first.
    order: Vec<usize>,
    taus: Vec<f64>,
    init_data_path: PathBuf,
    output_data_path: PathBuf,
}

impl TransportSystem {
    /// Loads the description in `path` and its initial data table.
    ///
    /// Without a `tau` column in the initial data, the time grid is derived
    /// from the settings.
    pub fn load(path: &Path, settings: &Settings) -> Result<Self> {
        let config = TransportSystemConfig::load(path)?;
        let data = Table::read(&config.init_data_path)?;
        let mut system = Self::new(&config, &data, &settings.app.locale)?;
        if system.taus.is_empty() {
            warn!(
                "No '{}' column in '{}', using the time grid from the settings",
                columns::TAU,
                config.init_data_path.display()
            );
            system.taus = grid(settings.app.delta_tau, settings.app.research_tau).collect();
        }
        info!(
            "Transport system loaded from '{}' with {} conveyors",
            path.display(),
            system.conveyors.len()
        );
        Ok(system)
    }

    /// Builds the system from its description and the initial data table.
    pub fn new(config: &TransportSystemConfig, data: &Table, locale: &NumberLocale) -> Result<Self> {
        let mut conveyors = Vec::with_capacity(config.conveyors.len());
        let mut index = HashMap::new();
        for conveyor_config in &config.conveyors {
            if index
                .insert(conveyor_config.id, conveyors.len())
                .is_some()
            {
                return Err(Error::DuplicateConveyorId(conveyor_config.id));
            }
            conveyors.push(Conveyor::new(conveyor_config)?);
        }

        for conveyor_config in &config.conveyors {
            for target_id in conveyor_config.connections.keys() {
                let target = index
                    .get(target_id)
                    .and_then(|i| conveyors.get_mut(*i))
                    .ok_or(Error::ConveyorNotFound {
                        conveyor_id: *target_id,
                        referenced_by: conveyor_config.id,
                    })?;
                target.node_mut().add_input(conveyor_config.id);
            }
        }

        let taus = data.column(columns::TAU, locale)?.unwrap_or_default();
        let ksis = data.column(columns::KSI, locale)?.unwrap_or_default();
        for conveyor in &mut conveyors {
            Self::load_initial_data(conveyor, data, locale, &taus, &ksis)?;
        }

        let order = Self::evaluation_order(&conveyors, &index)?;
        Ok(Self {
            conveyors,
            index,
            order,
            taus,
            init_data_path: config.init_data_path.clone(),
            output_data_path: config.output_data_path.clone(),
        })
    }

    pub fn conveyors(&self) -> &[Conveyor] {
        &self.conveyors
    }

    pub fn conveyor(&self, id: u32) -> Option<&Conveyor> {
        self.index.get(&id).and_then(|i| self.conveyors.get(*i))
    }

    /// Conveyor ids in evaluation order.
    pub fn evaluation_ids(&self) -> Vec<u32> {
        self.order
            .iter()
            .filter_map(|i| self.conveyors.get(*i))
            .map(Conveyor::id)
            .collect()
    }

    pub fn taus(&self) -> &[f64] {
        &self.taus
    }

    pub fn init_data_path(&self) -> &Path {
        &self.init_data_path
    }

    pub fn output_data_path(&self) -> &Path {
        &self.output_data_path
    }

    /// Simulates every grid `tau` in `[start, finish)`, or `tau == start`
    /// when both are equal. Steps that were already simulated are kept.
    pub fn process(&mut self, start: f64, finish: f64) -> Result<()> {
        let taus: Vec<f64> = self
            .taus
            .iter()
            .copied()
            .filter(|tau| {
                if is_same_key(start, finish) {
                    is_same_key(*tau, start)
                } else {
                    at_or_after(*tau, start) && before(*tau, finish)
                }
            })
            .collect();
        debug!("Processing {} steps in [{start}, {finish})", taus.len());
        for tau in taus {
            for position in 0..self.order.len() {
                let i = self.order[position];
                if !self.conveyors[i].holds(tau) {
                    self.calculate_parameters(i, tau)?;
                }
            }
        }
        Ok(())
    }

    /// Idles every conveyor from its last step up to, but not including, `tau`.
    pub fn hold_until(&mut self, tau: f64) -> Result<()> {
        let taus = &self.taus;
        for conveyor in &mut self.conveyors {
            let last_tau = conveyor.last_tau();
            for hold_tau in taus
                .iter()
                .copied()
                .filter(|t| before(*t, tau) && last_tau.map_or(true, |last| *t > last))
            {
                conveyor.hold(hold_tau)?;
            }
        }
        Ok(())
    }

    /// Idles every conveyor up to the end of the time grid.
    pub fn hold_to_end(&mut self) -> Result<()> {
        self.hold_until(f64::INFINITY)
    }

    /// Columns of the results: the time grid, then the series of every
    /// conveyor.
    pub fn result_table(&self, format: &TableFormat) -> Table {
        let mut table_columns = vec![format.column(columns::TAU, self.taus.iter().copied())];
        for conveyor in &self.conveyors {
            let id = conveyor.id();
            if let Some(input_flow) = conveyor.input_flow() {
                table_columns.push(series_column(format, id, columns::INPUT_FLOW, input_flow));
            }
            for bunker_column in BunkerColumn::ALL {
                table_columns.push(format.column(
                    &header(id, bunker_column.name()),
                    conveyor.bunker().column(bunker_column),
                ));
            }
            table_columns.push(series_column(format, id, columns::SPEED, conveyor.speed().values()));
            table_columns.push(series_column(
                format,
                id,
                columns::DENSITY,
                conveyor.density().values(),
            ));
            table_columns.push(series_column(
                format,
                id,
                columns::OUTPUT_FLOW,
                conveyor.output_flow().values(),
            ));
            if let Some(bunker_output_flow) = conveyor.bunker_output_flow() {
                table_columns.push(series_column(
                    format,
                    id,
                    columns::BUNKER_OUTPUT_FLOW,
                    bunker_output_flow,
                ));
            }
            for (target_id, fractions) in conveyor.node().splits() {
                table_columns.push(format.column(
                    &connection_header(id, target_id),
                    fractions.values().copied(),
                ));
            }
            table_columns.push(series_column(
                format,
                id,
                columns::DELAY_FOR_CONVEYOR_LENGTH,
                conveyor.delays(),
            ));
        }
        Table::from_columns(&table_columns)
    }

    /// Writes the results to the output data path.
    pub fn write_results(&self, format: &TableFormat) -> Result<()> {
        self.result_table(format).write(&self.output_data_path)?;
        info!("Results written to '{}'", self.output_data_path.display());
        Ok(())
    }

    fn calculate_parameters(&mut self, i: usize, tau: f64) -> Result<()> {
        let conveyor = &self.conveyors[i];
        let mut input_flow = conveyor.own_input_flow_at(tau)?;
        for upstream_id in conveyor.node().inputs() {
            let upstream = self.conveyor(upstream_id).ok_or(Error::ConveyorNotFound {
                conveyor_id: upstream_id,
                referenced_by: conveyor.id(),
            })?;
            input_flow += upstream.output_flow().output_flow_at(tau)?
                * upstream.node().fraction_to(conveyor.id(), tau)?;
        }
        let speed = conveyor.speed().speed_at(tau)?;
        let planed_bunker_output = conveyor.planned_bunker_output(tau)?;
        self.conveyors[i].add_parameters_values(tau, input_flow, planed_bunker_output, speed)
    }

    fn load_initial_data(
        conveyor: &mut Conveyor,
        data: &Table,
        locale: &NumberLocale,
        taus: &[f64],
        ksis: &[f64],
    ) -> Result<()> {
        let id = conveyor.id();
        let column = |name: &str| data.column(&header(id, name), locale);

        if let Some(density) = column(columns::INITIAL_DENSITY)? {
            conveyor.set_initial_density(Series::from_columns(ksis, &density));
        }
        if let Some(input_flow) = column(columns::INPUT_FLOW)? {
            conveyor.set_input_flow(Series::from_columns(taus, &input_flow));
        }
        if let Some(bunker_output_flow) = column(columns::BUNKER_OUTPUT_FLOW)? {
            conveyor.set_bunker_output_flow(Series::from_columns(taus, &bunker_output_flow));
        }
        match column(columns::SPEED)? {
            Some(speed) => conveyor.set_speed(Series::from_columns(taus, &speed)),
            None => warn!("No speed schedule for conveyor {id}"),
        }

        let targets: Vec<u32> = conveyor.node().outputs().collect();
        for target_id in &targets {
            match data.column(&connection_header(id, *target_id), locale)? {
                Some(fractions) => conveyor
                    .node_mut()
                    .set_split(*target_id, Series::from_columns(taus, &fractions)),
                None if targets.len() > 1 => {
                    return Err(Error::MissingSplitFunction {
                        conveyor_id: id,
                        target_id: *target_id,
                    })
                }
                None => {}
            }
        }
        Ok(())
    }

    /// Orders the conveyors so that every conveyor comes after the ones
    /// feeding it. Among ready conveyors the declaration order is kept.
    fn evaluation_order(conveyors: &[Conveyor], index: &HashMap<u32, usize>) -> Result<Vec<usize>> {
        let mut pending_inputs: Vec<usize> = conveyors
            .iter()
            .map(|conveyor| conveyor.node().inputs().count())
            .collect();
        let mut ready: BTreeSet<usize> = pending_inputs
            .iter()
            .enumerate()
            .filter(|(_, count)| **count == 0)
            .map(|(i, _)| i)
            .collect();
        let mut order = Vec::with_capacity(conveyors.len());
        while let Some(i) = ready.pop_first() {
            order.push(i);
            for target_id in conveyors[i].node().outputs() {
                if let Some(&target) = index.get(&target_id) {
                    pending_inputs[target] -= 1;
                    if pending_inputs[target] == 0 {
                        ready.insert(target);
                    }
                }
            }
        }
        if order.len() < conveyors.len() {
            let cyclic = pending_inputs
                .iter()
                .enumerate()
                .filter(|(_, count)| **count > 0)
                .map(|(i, _)| conveyors[i].id())
                .collect();
            return Err(Error::CyclicConnections(cyclic));
        }
        Ok(order)
    }
}

/// `tau >= bound`, with grid taus that differ from `bound` only by rounding
/// counted as equal.
fn at_or_after(tau: f64, bound: f64) -> bool {
    tau >= bound || is_same_key(tau, bound)
}

/// `tau < bound`, excluding grid taus that round to `bound`.
fn before(tau: f64, bound: f64) -> bool {
    tau < bound && !is_same_key(tau, bound)
}

fn series_column(format: &TableFormat, id: u32, name: &str, series: &Series<f64>) -> Vec<String> {
    format.column(&header(id, name), series.values().copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conveyor::ConveyorConfig;
    use crate::test_utils::{constant, initial_data, ConveyorConfigBuilder};
    use rstest::*;

    const TAUS: [f64; 5] = [0.0, 0.5, 1.0, 1.5, 2.0];

    fn system_config(conveyors: Vec<ConveyorConfig>) -> TransportSystemConfig {
        TransportSystemConfig {
            conveyors,
            init_data_path: PathBuf::from("init.csv"),
            output_data_path: PathBuf::from("result.csv"),
        }
    }

    fn build(conveyors: Vec<ConveyorConfig>, columns: &[(&str, Vec<f64>)]) -> Result<TransportSystem> {
        TransportSystem::new(
            &system_config(conveyors),
            &initial_data(columns),
            &NumberLocale::default(),
        )
    }

    #[fixture]
    fn line() -> TransportSystem {
        build(
            vec![
                ConveyorConfigBuilder::new(1, 1.0)
                    .input_flow(constant(10.0))
                    .connection(2, Default::default())
                    .build(),
                ConveyorConfigBuilder::new(2, 1.0).build(),
            ],
            &[
                ("tau", TAUS.to_vec()),
                ("1.inputFlow", vec![10.0; 5]),
                ("1.speed", vec![1.0; 5]),
                ("2.speed", vec![1.0; 5]),
            ],
        )
        .unwrap()
    }

    #[fixture]
    fn split() -> TransportSystem {
        build(
            vec![
                ConveyorConfigBuilder::new(3, 1.0).build(),
                ConveyorConfigBuilder::new(2, 1.0).build(),
                ConveyorConfigBuilder::new(1, 1.0)
                    .connection(2, constant(1.0))
                    .connection(3, constant(3.0))
                    .build(),
            ],
            &[
                ("tau", TAUS.to_vec()),
                ("1.inputFlow", vec![10.0; 5]),
                ("1.speed", vec![1.0; 5]),
                ("2.speed", vec![1.0; 5]),
                ("3.speed", vec![1.0; 5]),
                ("1.connections.2", vec![0.25; 5]),
                ("1.connections.3", vec![0.75; 5]),
            ],
        )
        .unwrap()
    }

    #[rstest]
    fn test_output_feeds_downstream_conveyor(mut line: TransportSystem) {
        line.process(0.0, 2.5).unwrap();

        let upstream = line.conveyor(1).unwrap();
        assert_eq!(
            upstream.output_flow().values().values().copied().collect::<Vec<_>>(),
            vec![0.0, 0.0, 10.0, 10.0, 10.0]
        );
        let downstream = line.conveyor(2).unwrap();
        assert_eq!(
            downstream.bunker().column(BunkerColumn::InputFlow),
            vec![0.0, 0.0, 10.0, 10.0, 10.0]
        );
        assert_eq!(downstream.delays().get(1.0).copied().unwrap(), 1.0);
    }

    #[rstest]
    fn test_split_between_targets(mut split: TransportSystem) {
        assert_eq!(split.evaluation_ids(), vec![1, 3, 2]);
        split.process(0.0, 2.5).unwrap();
        assert_eq!(
            split.conveyor(2).unwrap().bunker().input_flow_at(1.0).unwrap(),
            2.5
        );
        assert_eq!(
            split.conveyor(3).unwrap().bunker().input_flow_at(1.0).unwrap(),
            7.5
        );
    }

    #[rstest]
    fn test_process_single_tau(mut line: TransportSystem) {
        line.process(1.0, 1.0).unwrap();
        let conveyor = line.conveyor(1).unwrap();
        assert_eq!(conveyor.last_tau(), Some(1.0));
        assert_eq!(conveyor.output_flow().values().len(), 1);
    }

    #[rstest]
    fn test_window_bounds_snap_to_grid(mut line: TransportSystem) {
        let start = 0.5 + 1e-12;
        let finish = 1.5 + 1e-12;
        line.hold_until(start).unwrap();
        line.process(start, finish).unwrap();

        let conveyor = line.conveyor(1).unwrap();
        assert_eq!(
            conveyor.speed().values().values().copied().collect::<Vec<_>>(),
            vec![0.0, 1.0, 1.0]
        );
        assert_eq!(conveyor.last_tau(), Some(1.0));
    }

    #[rstest]
    fn test_single_tau_with_rounded_bounds(mut line: TransportSystem) {
        line.process(1.0 - 1e-12, 1.0 + 1e-12).unwrap();
        let speeds = line.conveyor(1).unwrap().speed().values();
        assert_eq!(speeds.keys().collect::<Vec<_>>(), vec![1.0]);
    }

    #[rstest]
    fn test_processed_steps_are_kept(mut line: TransportSystem) {
        line.process(0.0, 1.0).unwrap();
        line.process(0.0, 1.0).unwrap();
        assert_eq!(line.conveyor(1).unwrap().bunker().column(BunkerColumn::Capacity).len(), 2);
    }

    #[rstest]
    fn test_hold_until(mut line: TransportSystem) {
        line.process(0.0, 1.0).unwrap();
        line.hold_until(2.0).unwrap();
        line.process(2.0, 2.5).unwrap();

        for conveyor in line.conveyors() {
            assert!(TAUS.iter().all(|tau| conveyor.holds(*tau)));
            assert_eq!(conveyor.output_flow().output_flow_at(1.5).unwrap(), 0.0);
            assert_eq!(conveyor.speed().speed_at(1.0).unwrap(), 0.0);
        }
        let upstream = line.conveyor(1).unwrap();
        assert_eq!(upstream.bunker().input_flow_at(1.0).unwrap(), 0.0);
        assert_eq!(upstream.bunker().input_flow_at(2.0).unwrap(), 10.0);
    }

    #[rstest]
    fn test_hold_never_overwrites(mut line: TransportSystem) {
        line.process(0.0, 1.5).unwrap();
        line.hold_until(1.0).unwrap();
        assert_eq!(line.conveyor(1).unwrap().output_flow().output_flow_at(1.0).unwrap(), 10.0);
        line.hold_to_end().unwrap();
        assert_eq!(line.conveyor(1).unwrap().last_tau(), Some(2.0));
    }

    #[rstest]
    fn test_result_table(mut line: TransportSystem) {
        line.process(0.0, 2.5).unwrap();
        let table = line.result_table(&TableFormat::default());

        let headers: Vec<&str> = table.headers().collect();
        assert_eq!(headers.len(), 1 + 12 + 11);
        assert_eq!(
            &headers[..4],
            &["tau", "1.inputFlow", "1.bunker-capacity", "1.bunker-over-max-capacity"]
        );
        assert_eq!(headers[12], "1.delayForConveyorLength");
        assert_eq!(headers[13], "2.bunker-capacity");
        assert_eq!(table.rows().len(), 1 + TAUS.len());
        assert_eq!(
            table.column("1.outputFlow", &NumberLocale::default()).unwrap(),
            Some(vec![0.0, 0.0, 10.0, 10.0, 10.0])
        );
    }

    #[test]
    fn test_duplicate_id() {
        let err = build(
            vec![
                ConveyorConfigBuilder::new(1, 1.0).build(),
                ConveyorConfigBuilder::new(1, 2.0).build(),
            ],
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, Error::DuplicateConveyorId(1)));
    }

    #[test]
    fn test_unknown_target() {
        let err = build(
            vec![ConveyorConfigBuilder::new(1, 1.0)
                .connection(5, Default::default())
                .build()],
            &[],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::ConveyorNotFound {
                conveyor_id: 5,
                referenced_by: 1
            }
        ));
    }

    #[test]
    fn test_cycle() {
        let err = build(
            vec![
                ConveyorConfigBuilder::new(1, 1.0).build(),
                ConveyorConfigBuilder::new(2, 1.0)
                    .connection(3, Default::default())
                    .build(),
                ConveyorConfigBuilder::new(3, 1.0)
                    .connection(2, Default::default())
                    .build(),
            ],
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, Error::CyclicConnections(ref ids) if ids == &vec![2, 3]));
    }

    #[test]
    fn test_missing_split() {
        let err = build(
            vec![
                ConveyorConfigBuilder::new(1, 1.0)
                    .connection(2, Default::default())
                    .connection(3, Default::default())
                    .build(),
                ConveyorConfigBuilder::new(2, 1.0).build(),
                ConveyorConfigBuilder::new(3, 1.0).build(),
            ],
            &[("tau", TAUS.to_vec())],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::MissingSplitFunction {
                conveyor_id: 1,
                target_id: 2
            }
        ));
    }
}
