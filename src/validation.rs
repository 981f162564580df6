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

use std::fmt::Debug;

use log::error;

use crate::errors::{Error, Result};

/// Renders `(key : value)` pairs joined by `"; "`, prefixed by `description`
/// and terminated by a dot.
pub(crate) fn parameters_message<T: Debug>(description: &str, params: &[(&str, T)]) -> String {
    let pairs = params
        .iter()
        .map(|(key, value)| format!("({key} : {value:?})"))
        .collect::<Vec<_>>()
        .join("; ");
    format!("{description}{pairs}.")
}

/// Fails if any of the values in `params` is negative.
pub(crate) fn validate_non_negative(description: &str, params: &[(&str, f64)]) -> Result<()> {
    if params.iter().any(|(_, value)| *value < 0.0) {
        let message = parameters_message(
            &format!("Parameters for [{description}] must be positive:"),
            params,
        );
        error!("{message}");
        return Err(Error::InvalidParameters(message));
    }
    Ok(())
}

/// Fails if `value` is above `max_value`; `params` give context in the message.
pub(crate) fn validate_max_value(
    description: &str,
    value: f64,
    max_value: f64,
    params: &[(&str, f64)],
) -> Result<()> {
    if value > max_value {
        let message = parameters_message(
            &format!("Parameters for [{description}] must be less or equal max value {max_value:?}:"),
            params,
        );
        error!("{message}");
        return Err(Error::InvalidParameters(message));
    }
    Ok(())
}
