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

use crate::errors::Result;
use crate::series::Series;

/// Density of the material lying on the belt when the simulation starts,
/// indexed by the belt coordinate `ksi`.
#[derive(Debug, Clone, Default)]
pub struct InitialDensity {
    density: Series<f64>,
}

impl InitialDensity {
    pub fn new(density: Series<f64>) -> Self {
        Self { density }
    }

    pub fn set_values(&mut self, density: Series<f64>) {
        self.density = density;
    }

    pub fn density_at_distance(&self, delta_distance: f64) -> Result<f64> {
        self.density.get(delta_distance).copied()
    }

    pub fn values(&self) -> &Series<f64> {
        &self.density
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::functions::grid;
    use rstest::*;

    const CONVEYOR_LENGTH: f64 = 1.0;
    const DELTA_LENGTH: f64 = 0.0001;

    #[fixture]
    fn initial_density() -> InitialDensity {
        InitialDensity::new(
            grid(DELTA_LENGTH, CONVEYOR_LENGTH + 1.5 * DELTA_LENGTH)
                .map(|ksi| (ksi, 1.0 + ksi))
                .collect(),
        )
    }

    #[rstest]
    fn test_density_at_distance(initial_density: InitialDensity) {
        assert_eq!(initial_density.density_at_distance(0.0).unwrap(), 1.0);
        let at_end = initial_density
            .density_at_distance(CONVEYOR_LENGTH)
            .unwrap();
        assert!((at_end - 2.0).abs() <= DELTA_LENGTH);
    }

    #[rstest]
    fn test_density_beyond_belt(initial_density: InitialDensity) {
        let err = initial_density
            .density_at_distance(2.0 * CONVEYOR_LENGTH)
            .unwrap_err();
        assert!(matches!(err, Error::KeyOutOfRange { .. }));
        assert!(err.to_string().contains("must lie between the minimum"));
    }
}
