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

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{create_function, Function};
use crate::errors::Result;

/// A function reference as found in a transport system description:
///
/// ```json
/// { "function": "y(x) = a0+a1*sin(2*Pi*a2*x+2*Pi*a3)", "parameters": { "a0": 10.0 } }
/// ```
///
/// Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct FunctionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub parameters: HashMap<String, f64>,
}

impl FunctionConfig {
    pub fn new(function: &str, parameters: HashMap<String, f64>) -> Self {
        Self {
            function: Some(function.to_string()),
            parameters,
        }
    }

    /// Builds the configured function. A missing or blank name yields `None`.
    pub fn build(&self) -> Result<Option<Box<dyn Function>>> {
        match self.function.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(name) => create_function(name, &self.parameters).map(Some),
        }
    }
}
