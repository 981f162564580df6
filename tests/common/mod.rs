#![allow(dead_code)]

use std::path::{Path, PathBuf};

use conveyor_transport::table::{NumberLocale, Table};

/// Copies the sample settings and transport systems into `dir` and returns
/// the path of the copied settings.
pub fn copy_sample_data(dir: &Path) -> PathBuf {
    let mut data = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    data.push("data");
    for file in ["settings.yaml", "line.json", "split.json"] {
        std::fs::copy(data.join(file), dir.join(file)).unwrap();
    }
    dir.join("settings.yaml")
}

pub fn read_column(path: &Path, name: &str, locale: &NumberLocale) -> Vec<f64> {
    Table::read(path)
        .unwrap()
        .column(name, locale)
        .unwrap()
        .unwrap_or_else(|| panic!("no column '{name}' in '{}'", path.display()))
}
