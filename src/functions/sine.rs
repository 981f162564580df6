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
use std::f64::consts::PI;

use super::{coefficients, Function};

/// `y(x) = a0 + a1*sin(2*Pi*a2*x + 2*Pi*a3)`
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Sine {
    a: [f64; 10],
}

impl Sine {
    pub(crate) fn new(parameters: &HashMap<String, f64>) -> Self {
        Self {
            a: coefficients(parameters),
        }
    }
}

impl Function for Sine {
    fn value_of(&self, x: f64) -> f64 {
        self.a[0] + self.a[1] * (2.0 * PI * self.a[2] * x + 2.0 * PI * self.a[3]).sin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[fixture]
    fn sine() -> Sine {
        Sine::new(&HashMap::from([
            ("a0".to_string(), 10.0),
            ("a1".to_string(), 2.0),
            ("a2".to_string(), 1.0),
        ]))
    }

    #[rstest]
    #[case(0.0, 10.0)]
    #[case(0.25, 12.0)]
    #[case(0.75, 8.0)]
    fn test_value_of(sine: Sine, #[case] x: f64, #[case] expected: f64) {
        assert!((sine.value_of(x) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_phase_shift() {
        let sine = Sine::new(&HashMap::from([
            ("a1".to_string(), 1.0),
            ("a2".to_string(), 1.0),
            ("a3".to_string(), 0.25),
        ]));
        assert!((sine.value_of(0.0) - 1.0).abs() < 1e-9);
    }
}
