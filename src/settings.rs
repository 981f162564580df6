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

//! Application settings, stored as YAML.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::errors::{DeserializationError, Error, Result};
use crate::table::{CellFormat, NumberLocale, TableFormat};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub app: App,
    #[serde(default)]
    pub prepare_data_table_format: PrepareDataTableFormat,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct App {
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub locale: NumberLocale,
    /// Research horizon: the simulated time runs over `[0, research_tau)`.
    pub research_tau: f64,
    pub delta_tau: f64,
    pub delta_length: f64,
    /// Transport system description files, by path.
    #[serde(default)]
    pub init_transport_system_files: BTreeMap<PathBuf, TransportSystemFile>,
}

/// Schedule entry of one transport system.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportSystemFile {
    pub id: String,
    /// Start times as fractions of the research horizon, in `[0, 1]`.
    #[serde(default)]
    pub start_times: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepareDataTableFormat {
    #[serde(default)]
    pub min_width: usize,
    #[serde(default)]
    pub cell_format: CellFormat,
}

impl Settings {
    /// Loads the settings from `path`.
    ///
    /// Relative transport system paths are resolved against the directory
    /// of the settings file.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|_| {
            Error::Other(format!(
                "File '{}' doesn't exist or cannot be read",
                path.display()
            ))
        })?;
        let mut settings: Settings = serde_yaml::from_reader(std::io::BufReader::new(file))
            .map_err(|e| {
                Error::DeserializationError(DeserializationError {
                    string: format!("Error deserializing Settings from file '{}'", path.display()),
                    source: e.into(),
                })
            })?;
        if let Some(base) = path.parent() {
            settings.app.init_transport_system_files = settings
                .app
                .init_transport_system_files
                .into_iter()
                .map(|(file, entry)| (base.join(file), entry))
                .collect();
        }
        settings.validate()?;
        info!(
            "Settings for '{}' {} loaded from '{}'",
            settings.app.name,
            settings.app.version,
            path.display()
        );
        Ok(settings)
    }

    /// Saves the settings to `path` in block style.
    pub fn save(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self).map_err(|e| {
            Error::DeserializationError(DeserializationError {
                string: format!("Error serializing Settings to file '{}'", path.display()),
                source: e.into(),
            })
        })?;
        std::fs::write(path, yaml)
            .map_err(|e| Error::Other(format!("Cannot write '{}': {e}", path.display())))
    }

    pub fn table_format(&self) -> TableFormat {
        let format = &self.prepare_data_table_format;
        let cell_format = CellFormat {
            width: format.cell_format.width.max(format.min_width),
            ..format.cell_format
        };
        TableFormat::new(cell_format, self.app.locale.clone())
    }

    fn validate(&self) -> Result<()> {
        let app = &self.app;
        if app.research_tau <= 0.0 || app.delta_tau <= 0.0 || app.delta_length <= 0.0 {
            return Err(Error::InvalidParameters(format!(
                "researchTau ({}), deltaTau ({}) and deltaLength ({}) must be positive.",
                app.research_tau, app.delta_tau, app.delta_length
            )));
        }
        for (file, entry) in &app.init_transport_system_files {
            if let Some(start) = entry
                .start_times
                .iter()
                .find(|start| !(0.0..=1.0).contains(*start))
            {
                return Err(Error::InvalidParameters(format!(
                    "Start time {start} of transport system '{}' ({}) must lie in [0, 1].",
                    entry.id,
                    file.display()
                )));
            }
        }
        Ok(())
    }
}
