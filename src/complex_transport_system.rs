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

use std::collections::BTreeMap;

use log::{info, warn};

use crate::errors::{Error, Result};
use crate::series::Series;
use crate::settings::Settings;
use crate::table::TableFormat;
use crate::transport_system::TransportSystem;

/// Alternative transport systems switched over the research horizon.
///
/// The schedule maps start times, as fractions of the research horizon, to
/// the id of the system running from then on. A system only runs in its own
/// windows and stands idle otherwise.
#[derive(Debug)]
pub struct ComplexTransportSystem {
    systems: BTreeMap<String, TransportSystem>,
    schedule: Series<String>,
    research_tau: f64,
    format: TableFormat,
}

impl ComplexTransportSystem {
    /// Loads every transport system listed in the settings.
    pub fn new(settings: &Settings) -> Result<Self> {
        let mut systems = BTreeMap::new();
        let mut schedule = Vec::new();
        for (path, entry) in &settings.app.init_transport_system_files {
            let system = TransportSystem::load(path, settings)?;
            if systems.insert(entry.id.clone(), system).is_some() {
                warn!("Transport system '{}' is declared more than once, keeping '{}'", entry.id, path.display());
            }
            schedule.extend(entry.start_times.iter().map(|start| (*start, entry.id.clone())));
        }
        Self::from_systems(
            systems,
            schedule,
            settings.app.research_tau,
            settings.table_format(),
        )
    }

    pub fn from_systems(
        systems: BTreeMap<String, TransportSystem>,
        entries: impl IntoIterator<Item = (f64, String)>,
        research_tau: f64,
        format: TableFormat,
    ) -> Result<Self> {
        let mut schedule = Series::new();
        for (start, id) in entries {
            if let Some(replaced) = schedule.insert(start, id.clone()) {
                warn!(
                    "Transport systems '{replaced}' and '{id}' both start at {start:?}, keeping '{id}'"
                );
            }
        }
        if let Some(id) = schedule.values().find(|id| !systems.contains_key(*id)) {
            return Err(Error::UnknownTransportSystem(id.clone()));
        }
        info!(
            "Complex transport system with {} systems and {} scheduled windows",
            systems.len(),
            schedule.len()
        );
        Ok(Self {
            systems,
            schedule,
            research_tau,
            format,
        })
    }

    pub fn systems(&self) -> &BTreeMap<String, TransportSystem> {
        &self.systems
    }

    pub fn system(&self, id: &str) -> Option<&TransportSystem> {
        self.systems.get(id)
    }

    /// Scheduled windows as `(start, finish, id)` in units of the research
    /// horizon. The last window runs to the end of the horizon.
    pub fn windows(&self) -> Vec<(f64, f64, &str)> {
        let starts: Vec<(f64, &String)> = self.schedule.iter().collect();
        starts
            .iter()
            .enumerate()
            .map(|(i, &(start, id))| {
                let finish = starts.get(i + 1).map_or(1.0, |(next, _)| *next);
                (start, finish, id.as_str())
            })
            .collect()
    }

    /// Runs every scheduled window, idles each system to the end of its time
    /// grid and writes its results.
    pub fn run(&mut self) -> Result<()> {
        let windows: Vec<(f64, f64, String)> = self
            .windows()
            .into_iter()
            .map(|(start, finish, id)| (start, finish, id.to_string()))
            .collect();
        for (start, finish, id) in windows {
            let start_tau = start * self.research_tau;
            let finish_tau = finish * self.research_tau;
            info!("Transport system '{id}' runs over [{start_tau}, {finish_tau})");
            let system = self
                .systems
                .get_mut(&id)
                .ok_or_else(|| Error::UnknownTransportSystem(id.clone()))?;
            system.hold_until(start_tau)?;
            system.process(start_tau, finish_tau)?;
        }
        for system in self.systems.values_mut() {
            system.hold_to_end()?;
            system.write_results(&self.format)?;
        }
        Ok(())
    }
}
