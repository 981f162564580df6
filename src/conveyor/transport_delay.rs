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

#[derive(Debug, Clone, Copy, PartialEq)]
struct DelayPoint {
    tau: f64,
    speed: f64,
}

/// Relation between time and the distance travelled by the belt.
///
/// Every `(tau, speed)` pair advances the belt by the distance covered at
/// the previous speed since the previous `tau`. From that the delay for
/// material to travel a given distance can be derived.
#[derive(Debug, Clone, Default)]
pub struct TransportDelay {
    distance_to_point: Series<DelayPoint>,
    tau_to_distance: Series<f64>,
}

impl TransportDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_parameters_values(&mut self, tau: f64, speed: f64) -> Result<()> {
        validate_non_negative("Speed", &[("tau", tau), ("speed", speed)])?;
        let distance = self.calculate_distance(tau);
        self.distance_to_point
            .insert(distance, DelayPoint { tau, speed });
        self.tau_to_distance.insert(tau, distance);
        debug!("Distance value added. Distance: {distance}, Tau: {tau}, Speed: {speed}");
        Ok(())
    }

    /// Time the material now leaving has spent travelling `delta_distance`.
    ///
    /// A negative result means the belt has not yet moved `delta_distance`
    /// since the start; its magnitude is the remaining distance.
    pub fn delay_by_delta_distance(&self, delta_distance: f64) -> Result<f64> {
        let Some((last_distance, last_point)) = self.distance_to_point.last() else {
            return Ok(-delta_distance);
        };
        let distance = last_distance - delta_distance;
        if distance < 0.0 {
            return Ok(distance);
        }
        let start = self.distance_to_point.get(distance)?;
        Ok(last_point.tau - start.tau)
    }

    /// Distance travelled by the belt between the first recorded `tau` and `tau`.
    pub fn delta_distance_from_start(&self, tau: f64) -> Result<f64> {
        let distance = self.tau_to_distance.get(tau)?;
        let start = self
            .tau_to_distance
            .first()
            .map_or(0.0, |(_, distance)| *distance);
        Ok(distance - start)
    }

    fn calculate_distance(&self, tau: f64) -> f64 {
        self.distance_to_point
            .last()
            .map_or(0.0, |(distance, point)| {
                distance + point.speed * (tau - point.tau)
            })
    }
}
