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

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::conveyor::ConveyorConfig;
use crate::errors::{DeserializationError, Error, Result};

/// A transport system as described in its JSON file:
///
/// ```json
/// { "conveyors": [...], "initDataPath": "init.csv", "outputDataPath": "out/result.csv" }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransportSystemConfig {
    pub conveyors: Vec<ConveyorConfig>,
    pub init_data_path: PathBuf,
    pub output_data_path: PathBuf,
}

impl TransportSystemConfig {
    /// Parses the description in `filepath`. Relative data paths are
    /// resolved against the directory of the file.
    pub fn load(filepath: &Path) -> Result<Self> {
        let file = std::fs::File::open(filepath).map_err(|_| {
            Error::Other(format!(
                "File '{}' doesn't exist or cannot be read",
                filepath.display()
            ))
        })?;
        let reader = std::io::BufReader::new(file);

        let mut config: Self = serde_json::from_reader(reader).map_err(|e| {
            Error::DeserializationError(DeserializationError {
                string: format!(
                    "Error deserializing TransportSystem from file '{}'",
                    filepath.display()
                ),
                source: e.into(),
            })
        })?;
        if let Some(base) = filepath.parent() {
            config.init_data_path = base.join(&config.init_data_path);
            config.output_data_path = base.join(&config.output_data_path);
        }
        Ok(config)
    }

    /// Writes the description to `filepath` as pretty-printed JSON.
    pub fn save(&self, filepath: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            Error::DeserializationError(DeserializationError {
                string: format!(
                    "Error serializing TransportSystem to file '{}'",
                    filepath.display()
                ),
                source: e.into(),
            })
        })?;
        std::fs::write(filepath, json)
            .map_err(|e| Error::Other(format!("Cannot write '{}': {e}", filepath.display())))
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use rstest::*;

    #[rstest]
    fn test_load(split_system_path: PathBuf, split_system: TransportSystemConfig) {
        let base = split_system_path.parent().unwrap();
        assert_eq!(split_system.init_data_path, base.join("out/split-init.csv"));
        assert_eq!(split_system.output_data_path, base.join("out/split-result.csv"));
        let ids: Vec<u32> = split_system.conveyors.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(
            split_system.conveyors[0]
                .connections
                .keys()
                .copied()
                .collect::<Vec<_>>(),
            vec![2, 3]
        );
    }

    #[test]
    fn test_missing_file() {
        let err = TransportSystemConfig::load(Path::new("does/not/exist.json")).unwrap_err();
        assert!(matches!(err, Error::Other(ref msg) if msg.contains("doesn't exist")));
    }

    #[rstest]
    fn test_save_and_load(split_system: TransportSystemConfig) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("system.json");
        split_system.save(&path).unwrap();
        assert_eq!(TransportSystemConfig::load(&path).unwrap(), split_system);
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("system.json");
        std::fs::write(&path, r#"{"conveyors": 1}"#).unwrap();
        assert!(matches!(
            TransportSystemConfig::load(&path),
            Err(Error::DeserializationError(_))
        ));
    }
}
