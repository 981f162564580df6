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

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{DeserializationError, Error, Result};

/// Printf-like format of a table cell, such as `%8.3f`: minimal width 8,
/// 3 decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct CellFormat {
    pub width: usize,
    pub precision: usize,
}

impl Default for CellFormat {
    fn default() -> Self {
        Self {
            width: 8,
            precision: 3,
        }
    }
}

impl FromStr for CellFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidCellFormat(s.to_string());
        let pattern = s
            .trim()
            .strip_prefix('%')
            .and_then(|pattern| pattern.strip_suffix('f'))
            .ok_or_else(invalid)?;
        let (width, precision) = pattern.split_once('.').ok_or_else(invalid)?;
        let width = if width.is_empty() {
            0
        } else {
            width.parse().map_err(|_| invalid())?
        };
        let precision = precision.parse().map_err(|_| invalid())?;
        Ok(Self { width, precision })
    }
}

impl TryFrom<String> for CellFormat {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<CellFormat> for String {
    fn from(value: CellFormat) -> Self {
        value.to_string()
    }
}

impl Display for CellFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "%{}.{}f", self.width, self.precision)
    }
}

/// Language tags whose numbers use a decimal comma.
const DECIMAL_COMMA_LANGUAGES: [&str; 22] = [
    "be", "cs", "da", "de", "es", "fi", "fr", "hr", "hu", "it", "kk", "lt", "lv", "nb", "nl",
    "pl", "pt", "ro", "ru", "sv", "tr", "uk",
];

/// Locale of the numbers written to and read from data tables.
///
/// Only the decimal separator is derived from the language tag (`en`,
/// `ru_RU`, `de-DE`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub struct NumberLocale {
    tag: String,
    decimal_separator: char,
}

impl NumberLocale {
    pub fn new(tag: &str) -> Self {
        let language = tag
            .split(['_', '-'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        let decimal_separator = if DECIMAL_COMMA_LANGUAGES.contains(&language.as_str()) {
            ','
        } else {
            '.'
        };
        Self {
            tag: tag.to_string(),
            decimal_separator,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn decimal_separator(&self) -> char {
        self.decimal_separator
    }

    pub fn format(&self, value: f64, precision: usize) -> String {
        let formatted = format!("{value:.precision$}");
        match self.decimal_separator {
            '.' => formatted,
            separator => formatted.replace('.', &separator.to_string()),
        }
    }

    pub fn parse(&self, value: &str) -> Result<f64> {
        let normalized = value.trim().replace(self.decimal_separator, ".");
        normalized.parse().map_err(|e: std::num::ParseFloatError| {
            Error::DeserializationError(DeserializationError {
                string: value.to_string(),
                source: e.into(),
            })
        })
    }
}

impl Default for NumberLocale {
    fn default() -> Self {
        Self::new("en")
    }
}

impl From<String> for NumberLocale {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl From<NumberLocale> for String {
    fn from(value: NumberLocale) -> Self {
        value.tag
    }
}

/// How values are rendered into table cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableFormat {
    pub cell_format: CellFormat,
    pub locale: NumberLocale,
}

impl TableFormat {
    pub fn new(cell_format: CellFormat, locale: NumberLocale) -> Self {
        Self {
            cell_format,
            locale,
        }
    }

    /// Formats `value` right-aligned to the width of the column under `header`.
    pub fn cell(&self, header: &str, value: f64) -> String {
        let value = self.locale.format(value, self.cell_format.precision);
        pad(&value, self.column_width(header))
    }

    /// Builds a column: the padded header followed by the formatted values.
    pub fn column(&self, header: &str, values: impl IntoIterator<Item = f64>) -> Vec<String> {
        std::iter::once(pad(header, self.column_width(header)))
            .chain(values.into_iter().map(|value| self.cell(header, value)))
            .collect()
    }

    fn column_width(&self, header: &str) -> usize {
        self.cell_format.width.max(header.chars().count())
    }
}

fn pad(value: &str, width: usize) -> String {
    format!("{value:>width$}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case("%8.3f", 8, 3)]
    #[case("%12.1f", 12, 1)]
    #[case(" %.2f ", 0, 2)]
    fn test_parse_cell_format(#[case] format: &str, #[case] width: usize, #[case] precision: usize) {
        assert_eq!(
            format.parse::<CellFormat>().unwrap(),
            CellFormat { width, precision }
        );
    }

    #[rstest]
    #[case("8.3f")]
    #[case("%8.3d")]
    #[case("%8f")]
    #[case("%a.3f")]
    fn test_invalid_cell_format(#[case] format: &str) {
        assert!(matches!(
            format.parse::<CellFormat>(),
            Err(Error::InvalidCellFormat(_))
        ));
    }

    #[rstest]
    #[case("en", '.')]
    #[case("en_US", '.')]
    #[case("ru_RU", ',')]
    #[case("de-DE", ',')]
    #[case("", '.')]
    fn test_decimal_separator(#[case] tag: &str, #[case] separator: char) {
        assert_eq!(NumberLocale::new(tag).decimal_separator(), separator);
    }

    #[test]
    fn test_locale_round_trip() {
        let locale = NumberLocale::new("ru");
        assert_eq!(locale.format(1.5, 3), "1,500");
        assert_eq!(locale.parse(" 1,500 ").unwrap(), 1.5);
        assert!(matches!(
            locale.parse("abc"),
            Err(Error::DeserializationError(_))
        ));
    }

    #[test]
    fn test_column() {
        let format = TableFormat::default();
        assert_eq!(
            format.column("tau", [0.0, 12.25]),
            vec!["     tau", "   0.000", "  12.250"]
        );
        assert_eq!(
            format.column("1.bunker-capacity", [1.0]),
            vec!["1.bunker-capacity", "            1.000"]
        );
    }
}
