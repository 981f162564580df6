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

//! Parameterized functions used to generate initial data.
//!
//! A function is selected by its textual formula and parameterized by
//! coefficients `a0`..`a9` (missing coefficients are zero).

mod config;
mod polynomial;
mod sine;

use std::collections::HashMap;

pub use config::FunctionConfig;
pub(crate) use polynomial::QuarticPolynomial;
pub(crate) use sine::Sine;

use crate::errors::{Error, Result};

pub const QUARTIC_POLYNOMIAL: &str = "y(x) = a0+a1*x+a2*x*x+a3*x*x*x+a4*x*x*x*x";
pub const SINE: &str = "y(x) = a0+a1*sin(2*Pi*a2*x+2*Pi*a3)";

const COEFFICIENTS: [&str; 10] = ["a0", "a1", "a2", "a3", "a4", "a5", "a6", "a7", "a8", "a9"];

pub trait Function: std::fmt::Debug {
    fn value_of(&self, x: f64) -> f64;
}

/// Reads the coefficients `a0`..`a9` from `parameters`.
pub(crate) fn coefficients(parameters: &HashMap<String, f64>) -> [f64; 10] {
    COEFFICIENTS.map(|key| parameters.get(key).copied().unwrap_or(0.0))
}

/// Builds the function named by `function_name`.
pub fn create_function(
    function_name: &str,
    parameters: &HashMap<String, f64>,
) -> Result<Box<dyn Function>> {
    match function_name {
        QUARTIC_POLYNOMIAL => Ok(Box::new(QuarticPolynomial::new(parameters))),
        SINE => Ok(Box::new(Sine::new(parameters))),
        _ => Err(Error::UnsupportedFunction(function_name.to_string())),
    }
}

/// Samples `function` at `x = i * step` for every `x < limit`.
pub(crate) fn sample(function: &dyn Function, step: f64, limit: f64) -> Vec<(f64, f64)> {
    grid(step, limit)
        .map(|x| (x, function.value_of(x)))
        .collect()
}

/// Regular grid `0, step, 2*step, ...` strictly below `limit`.
pub(crate) fn grid(
    step: f64,
    limit: f64,
) -> impl DoubleEndedIterator<Item = f64> + ExactSizeIterator {
    (0..grid_len(step, limit)).map(move |i| i as f64 * step)
}

/// Number of points `i * step` below `limit`; empty for non-positive steps.
fn grid_len(step: f64, limit: f64) -> usize {
    if !(step > 0.0 && limit > 0.0 && limit.is_finite()) {
        return 0;
    }
    // `as` saturates, the loops settle the rounding of the quotient.
    let mut len = (limit / step).ceil() as usize;
    while len > 0 && (len - 1) as f64 * step >= limit {
        len -= 1;
    }
    while len < usize::MAX && (len as f64) * step < limit {
        len += 1;
    }
    len
}
