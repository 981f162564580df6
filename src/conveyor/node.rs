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

use std::collections::{BTreeMap, BTreeSet};

use crate::errors::Result;
use crate::series::Series;

/// Junction at the end of a conveyor.
///
/// Knows the upstream conveyors feeding this one and how the output flow is
/// split between the downstream conveyors.
#[derive(Debug, Clone, Default)]
pub struct ConveyorNode {
    inputs: BTreeSet<u32>,
    outputs: BTreeSet<u32>,
    splits: BTreeMap<u32, Series<f64>>,
}

impl ConveyorNode {
    pub fn new(outputs: impl IntoIterator<Item = u32>) -> Self {
        Self {
            outputs: outputs.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn add_input(&mut self, conveyor_id: u32) {
        self.inputs.insert(conveyor_id);
    }

    pub fn set_split(&mut self, target_id: u32, fractions: Series<f64>) {
        self.splits.insert(target_id, fractions);
    }

    pub fn inputs(&self) -> impl Iterator<Item = u32> + '_ {
        self.inputs.iter().copied()
    }

    pub fn outputs(&self) -> impl Iterator<Item = u32> + '_ {
        self.outputs.iter().copied()
    }

    pub fn is_input(&self) -> bool {
        self.inputs.is_empty()
    }

    pub fn is_output(&self) -> bool {
        self.outputs.is_empty()
    }

    pub fn splits(&self) -> impl Iterator<Item = (u32, &Series<f64>)> {
        self.splits.iter().map(|(target, series)| (*target, series))
    }

    /// Share of the output flow routed to `target_id` at `tau`.
    ///
    /// A target without split fractions takes the whole output.
    pub fn fraction_to(&self, target_id: u32, tau: f64) -> Result<f64> {
        match self.splits.get(&target_id) {
            Some(fractions) => fractions.get(tau).copied(),
            None => Ok(1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[fixture]
    fn node() -> ConveyorNode {
        let mut node = ConveyorNode::new([3, 2]);
        node.set_split(2, Series::from_iter([(0.0, 0.25), (1.0, 0.5)]));
        node.set_split(3, Series::from_iter([(0.0, 0.75), (1.0, 0.5)]));
        node
    }

    #[rstest]
    #[case(2, 0.0, 0.25)]
    #[case(3, 0.0, 0.75)]
    #[case(2, 0.5, 0.5)]
    fn test_fraction_to(node: ConveyorNode, #[case] target: u32, #[case] tau: f64, #[case] expected: f64) {
        assert_eq!(node.fraction_to(target, tau).unwrap(), expected);
    }

    #[test]
    fn test_single_output_takes_everything() {
        let node = ConveyorNode::new([7]);
        assert_eq!(node.fraction_to(7, 12.0).unwrap(), 1.0);
        assert!(!node.is_output());
        assert!(node.is_input());
    }

    #[rstest]
    fn test_outputs_are_ordered(mut node: ConveyorNode) {
        node.add_input(1);
        assert_eq!(node.outputs().collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(node.inputs().collect::<Vec<_>>(), vec![1]);
        assert_eq!(node.splits().map(|(id, _)| id).collect::<Vec<_>>(), vec![2, 3]);
    }
}
