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

use super::{coefficients, Function};

/// `y(x) = a0 + a1*x + ... + a9*x^9`; named after its usual degree.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct QuarticPolynomial {
    a: [f64; 10],
}

impl QuarticPolynomial {
    pub(crate) fn new(parameters: &HashMap<String, f64>) -> Self {
        Self {
            a: coefficients(parameters),
        }
    }
}

impl Function for QuarticPolynomial {
    fn value_of(&self, x: f64) -> f64 {
        let mut sum = self.a[0];
        let mut x_n = x;
        for a in &self.a[1..] {
            sum += a * x_n;
            x_n *= x;
        }
        sum
    }
}
