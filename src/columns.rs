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

//! Column headers of the initial data and result tables.

pub const TAU: &str = "tau";
pub const KSI: &str = "ksi";
pub const INITIAL_DENSITY: &str = "initialDensity";
pub const INPUT_FLOW: &str = "inputFlow";
pub const BUNKER_OUTPUT_FLOW: &str = "bunkerOutputFlow";
pub const SPEED: &str = "speed";
pub const DENSITY: &str = "density";
pub const OUTPUT_FLOW: &str = "outputFlow";
pub const CONNECTIONS: &str = "connections";
pub const DELAY_FOR_CONVEYOR_LENGTH: &str = "delayForConveyorLength";

/// `<conveyor_id>.<name>`
pub fn header(conveyor_id: u32, name: &str) -> String {
    format!("{conveyor_id}.{name}")
}

/// `<conveyor_id>.connections.<target_id>`
pub fn connection_header(conveyor_id: u32, target_id: u32) -> String {
    format!("{}.{target_id}", header(conveyor_id, CONNECTIONS))
}
