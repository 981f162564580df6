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

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::errors::{Error, Result};

/// Map key for `f64` values (time `tau` or belt coordinate `ksi`).
///
/// Ordered with [`f64::total_cmp`], so it can index a [`BTreeMap`].
#[derive(Debug, Clone, Copy)]
pub(crate) struct Key(f64);

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Key {}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Relative distance under which two keys are the same sample.
const KEY_TOLERANCE: f64 = 1e-9;

pub(crate) fn is_same_key(sample: f64, key: f64) -> bool {
    (sample - key).abs() <= KEY_TOLERANCE * sample.abs().max(1.0)
}

/// Values sampled over an ordered `f64` axis.
///
/// Lookups with [`Series::get`] return the exact sample when there is one,
/// otherwise the sample at the next larger key. Keys differing from a sample
/// only by rounding errors match that sample. Keys outside of the sampled
/// range are an error.
#[derive(Debug, Clone, PartialEq)]
pub struct Series<T> {
    samples: BTreeMap<Key, T>,
}

impl<T> Default for Series<T> {
    fn default() -> Self {
        Self {
            samples: BTreeMap::new(),
        }
    }
}

impl<T> Series<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: f64, value: T) -> Option<T> {
        self.samples.insert(Key(key), value)
    }

    pub fn get(&self, key: f64) -> Result<&T> {
        if let Some(value) = self.samples.get(&Key(key)) {
            return Ok(value);
        }
        let (Some((min, _)), Some((max, _))) =
            (self.samples.first_key_value(), self.samples.last_key_value())
        else {
            return Err(Error::EmptySeries { key });
        };
        let below = self.samples.range(..Key(key)).next_back();
        let above = self.samples.range(Key(key)..).next();
        if let Some((_, value)) = below
            .into_iter()
            .chain(above)
            .find(|(sample, _)| is_same_key(sample.0, key))
        {
            return Ok(value);
        }
        if key < min.0 || key > max.0 {
            return Err(Error::KeyOutOfRange {
                key,
                min: min.0,
                max: max.0,
            });
        }
        above.map(|(_, value)| value).ok_or(Error::KeyOutOfRange {
            key,
            min: min.0,
            max: max.0,
        })
    }

    pub fn contains_key(&self, key: f64) -> bool {
        self.samples.contains_key(&Key(key))
    }

    pub fn first(&self) -> Option<(f64, &T)> {
        self.samples.first_key_value().map(|(k, v)| (k.0, v))
    }

    pub fn last(&self) -> Option<(f64, &T)> {
        self.samples.last_key_value().map(|(k, v)| (k.0, v))
    }

    pub fn last_mut(&mut self) -> Option<(f64, &mut T)> {
        self.samples.iter_mut().next_back().map(|(k, v)| (k.0, v))
    }

    pub fn last_key(&self) -> Option<f64> {
        self.last().map(|(key, _)| key)
    }

    pub fn keys(&self) -> impl DoubleEndedIterator<Item = f64> + '_ {
        self.samples.keys().map(|k| k.0)
    }

    pub fn values(&self) -> impl DoubleEndedIterator<Item = &T> + '_ {
        self.samples.values()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (f64, &T)> + '_ {
        self.samples.iter().map(|(k, v)| (k.0, v))
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl<T: Clone> Series<T> {
    /// Pairs `keys[i]` with `values[i]` for every available value.
    ///
    /// The keys column may be longer than the values column (shorter
    /// conveyors share the `ksi` axis of the longest one).
    pub fn from_columns(keys: &[f64], values: &[T]) -> Self {
        keys.iter()
            .zip(values)
            .map(|(key, value)| (*key, value.clone()))
            .collect()
    }
}

impl<T> FromIterator<(f64, T)> for Series<T> {
    fn from_iter<I: IntoIterator<Item = (f64, T)>>(iter: I) -> Self {
        Self {
            samples: iter.into_iter().map(|(k, v)| (Key(k), v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[fixture]
    fn series() -> Series<f64> {
        Series::from_iter([(1.0, 1.0), (2.0, 2.0), (3.0, 4.0)])
    }

    #[rstest]
    #[case(1.0, 1.0)]
    #[case(2.0, 2.0)]
    #[case(2.5, 4.0)]
    #[case(1.000001, 2.0)]
    #[case(3.0, 4.0)]
    fn test_get_exact_or_ceiling(series: Series<f64>, #[case] key: f64, #[case] expected: f64) {
        assert_eq!(*series.get(key).unwrap(), expected);
    }

    #[rstest]
    #[case(0.5)]
    #[case(4.0)]
    fn test_get_out_of_range(series: Series<f64>, #[case] key: f64) {
        let err = series.get(key).unwrap_err();
        assert!(matches!(err, Error::KeyOutOfRange { min, max, .. } if min == 1.0 && max == 3.0));
        assert!(err
            .to_string()
            .contains("must lie between the minimum 1.0 and maximum 3.0 keys"));
    }

    #[rstest]
    fn test_out_of_range_message(series: Series<f64>) {
        assert_eq!(
            series.get(4.0).unwrap_err().to_string(),
            "The specified key value 4.0 must lie between the minimum 1.0 and maximum 3.0 keys in the map."
        );
    }

    #[test]
    fn test_single_sample_only_matches_exactly() {
        let series = Series::from_iter([(1.0, 1.0)]);
        assert_eq!(*series.get(1.0).unwrap(), 1.0);
        assert!(matches!(
            series.get(1.5),
            Err(Error::KeyOutOfRange { .. })
        ));
    }

    #[rstest]
    fn test_rounding_errors_match_exactly(series: Series<f64>) {
        let key = 2.3 - (2.3 - 2.0);
        assert_eq!(*series.get(key).unwrap(), 2.0);
        assert_eq!(*series.get(2.0 - 1e-12).unwrap(), 2.0);
        assert_eq!(*series.get(3.0 + 1e-12).unwrap(), 4.0);
    }

    #[test]
    fn test_empty_series() {
        let series: Series<f64> = Series::new();
        assert!(matches!(series.get(0.0), Err(Error::EmptySeries { .. })));
        assert!(series.last().is_none());
    }

    #[test]
    fn test_from_columns_stops_at_shortest() {
        let series = Series::from_columns(&[0.0, 0.5, 1.0], &[10.0, 20.0]);
        assert_eq!(series.len(), 2);
        assert_eq!(series.last_key(), Some(0.5));
    }

    #[test]
    fn test_last_mut_updates_in_place() {
        let mut series = Series::from_iter([(0.0, 1.0), (1.0, 2.0)]);
        if let Some((_, value)) = series.last_mut() {
            *value = 5.0;
        }
        assert_eq!(*series.get(1.0).unwrap(), 5.0);
        assert_eq!(series.values().copied().collect::<Vec<_>>(), vec![1.0, 5.0]);
    }
}
