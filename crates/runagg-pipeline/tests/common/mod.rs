#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use runagg_pipeline::AggregateLayout;

pub const PRIMARY_HEADER: [&str; 4] = ["update", "evaluations", "found_solution", "max_score"];
pub const ELITE_HEADER: [&str; 4] = ["update", "evaluations", "eval_score", "genome"];

/// Layout with short allow-lists matching the fixture logs.
pub fn small_layout() -> AggregateLayout {
    AggregateLayout {
        config_fields: names(&["SEED", "STOP_MODE", "MAX_GENS", "MAX_EVALS"]),
        time_series_primary_fields: names(&["update", "evaluations", "found_solution", "max_score"]),
        time_series_secondary_fields: names(&["eval_score"]),
        time_series_config_fields: Some(names(&["SEED"])),
        ..AggregateLayout::default()
    }
}

pub fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

pub fn write_csv(path: &Path, header: &[&str], rows: &[Vec<String>]) {
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    let mut text = header.join(",");
    text.push('\n');
    for row in rows {
        text.push_str(&row.join(","));
        text.push('\n');
    }
    fs::write(path, text).expect("write csv");
}

pub fn primary_rows(gens: &[u64], solved_at: Option<u64>) -> Vec<Vec<String>> {
    gens.iter()
        .map(|gen| {
            let found = if Some(*gen) == solved_at { "1" } else { "0" };
            vec![
                gen.to_string(),
                (gen * 100).to_string(),
                found.to_string(),
                (gen * 10).to_string(),
            ]
        })
        .collect()
}

pub fn elite_rows(gens: &[u64]) -> Vec<Vec<String>> {
    gens.iter()
        .map(|gen| {
            vec![
                gen.to_string(),
                (gen * 100).to_string(),
                format!("{}.5", gen),
                // Container literal containing the delimiter.
                format!("\"[{gen},{gen}]\""),
            ]
        })
        .collect()
}

pub fn write_config(path: &Path, params: &[(&str, &str)]) {
    let rows: Vec<Vec<String>> = params
        .iter()
        .map(|(key, value)| vec![key.to_string(), value.to_string()])
        .collect();
    write_csv(path, &["parameter", "value"], &rows);
}

/// Writes a full replicate under `root/name/output`.
pub fn write_replicate(
    root: &Path,
    name: &str,
    gens: &[u64],
    elite_gens: &[u64],
    params: &[(&str, &str)],
) -> PathBuf {
    let dir = root.join(name);
    let output = dir.join("output");
    write_csv(&output.join("summary.csv"), &PRIMARY_HEADER, &primary_rows(gens, None));
    write_csv(&output.join("elite.csv"), &ELITE_HEADER, &elite_rows(elite_gens));
    write_config(&output.join("run_config.csv"), params);
    dir
}

pub fn read_table(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .expect("open table");
    let header = reader
        .headers()
        .expect("header")
        .iter()
        .map(str::to_string)
        .collect();
    let rows = reader
        .records()
        .map(|row| row.expect("row").iter().map(str::to_string).collect())
        .collect();
    (header, rows)
}

pub fn column(header: &[String], name: &str) -> usize {
    header
        .iter()
        .position(|column| column == name)
        .unwrap_or_else(|| panic!("missing column {name}"))
}
