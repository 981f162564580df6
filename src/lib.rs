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

//! Discrete-time simulation of conveyor-belt transport systems.
//!
//! A transport system is a network of conveyors, each one fed by a bunker.
//! Material enters the bunkers from outside or from upstream conveyors, is
//! put on the belt limited by the belt density, and leaves the belt after
//! the transport delay. Junctions split the output flow between downstream
//! conveyors.
//!
//! The usual workflow is:
//!
//! 1. describe the systems in JSON and list them in the YAML [`Settings`],
//! 2. sample the initial data with a [`DataGenerator`],
//! 3. run the schedule with a [`ComplexTransportSystem`], which writes the
//!    results of every system.
//!
//! ```no_run
//! use conveyor_transport::{ComplexTransportSystem, DataGenerator, Settings, TransportSystemConfig};
//!
//! # fn main() -> conveyor_transport::Result<()> {
//! let settings = Settings::load("data/settings.yaml".as_ref())?;
//! let generator = DataGenerator::from_app(&settings.app);
//! for path in settings.app.init_transport_system_files.keys() {
//!     generator.generate(&TransportSystemConfig::load(path)?, &settings.table_format())?;
//! }
//! ComplexTransportSystem::new(&settings)?.run()?;
//! # Ok(())
//! # }
//! ```

pub mod columns;
mod complex_transport_system;
pub mod conveyor;
mod errors;
pub mod functions;
mod generator;
mod series;
mod settings;
pub mod table;
mod transport_system;
mod validation;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

pub use complex_transport_system::ComplexTransportSystem;
pub use errors::{DeserializationError, DeserializationErrorKind, Error, Result};
pub use generator::DataGenerator;
pub use series::Series;
pub use settings::{App, PrepareDataTableFormat, Settings, TransportSystemFile};
pub use transport_system::{TransportSystem, TransportSystemConfig};
