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

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::info;

use conveyor_transport::{ComplexTransportSystem, DataGenerator, Settings, TransportSystemConfig};

/// Simulates conveyor-belt transport systems.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// YAML settings listing the transport systems and their schedule.
    #[arg(short, long, default_value = "settings.yaml")]
    settings: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Samples the initial data of every transport system.
    Generate,
    /// Runs the schedule and writes the results of every transport system.
    Simulate,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();
    let settings = Settings::load(&cli.settings)?;

    match cli.command {
        Command::Generate => {
            let generator = DataGenerator::from_app(&settings.app);
            let format = settings.table_format();
            for path in settings.app.init_transport_system_files.keys() {
                info!("Generating initial data for '{}'", path.display());
                generator.generate(&TransportSystemConfig::load(path)?, &format)?;
            }
        }
        Command::Simulate => {
            ComplexTransportSystem::new(&settings)?.run()?;
        }
    }
    Ok(())
}
