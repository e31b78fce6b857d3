//! Column-oriented tabular input
//!
//! Historian exports arrive as rows of loosely typed cells. Coercion to
//! numbers and timestamps happens here, once, so the detectors only ever see
//! `f64` series with NaN marking invalid samples.

use crate::timestamps::parse_timestamp;
use chrono::{DateTime, Utc};
use opmode_core::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A single loosely typed cell
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Missing,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Numeric value of the cell, if it has a finite one
    ///
    /// Text is read by its leading numeric prefix, so `"12.5 kg"` is 12.5
    /// and `"abc"` has no value. Booleans and missing cells have none.
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            CellValue::Number(x) => Some(*x),
            CellValue::Text(s) => parse_float_prefix(s),
            CellValue::Bool(_) | CellValue::Missing => None,
        };
        value.filter(|x| x.is_finite())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }
}

impl From<Value> for CellValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Bool(b) => CellValue::Bool(b),
            Value::Number(n) => n.as_f64().map_or(CellValue::Missing, CellValue::Number),
            Value::String(s) => CellValue::Text(s),
            Value::Null | Value::Array(_) | Value::Object(_) => CellValue::Missing,
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

/// Parse the longest leading decimal literal of `s`
///
/// Leading whitespace is skipped. Accepts an optional sign, digits with an
/// optional fraction, an optional exponent, and `Infinity`.
pub fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    if s[end..].starts_with("Infinity") {
        return s[..end + "Infinity".len()].parse().ok();
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

/// Equal-length named columns of cells, ordered by time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    n_rows: usize,
    columns: BTreeMap<String, Vec<CellValue>>,
}

impl Dataset {
    /// Empty dataset with a fixed row count and no columns
    pub fn with_rows(n_rows: usize) -> Self {
        Self {
            n_rows,
            columns: BTreeMap::new(),
        }
    }

    /// Build from row maps; a key absent from a row reads as missing
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = BTreeMap<String, CellValue>>,
    {
        let rows: Vec<_> = rows.into_iter().collect();
        let n_rows = rows.len();
        let mut columns: BTreeMap<String, Vec<CellValue>> = BTreeMap::new();

        for (row_idx, row) in rows.into_iter().enumerate() {
            for (name, cell) in row {
                let column = columns
                    .entry(name)
                    .or_insert_with(|| vec![CellValue::Missing; n_rows]);
                column[row_idx] = cell;
            }
        }

        Self { n_rows, columns }
    }

    /// Build from JSON row objects
    pub fn from_json_rows(rows: &[Value]) -> Result<Self> {
        let maps = rows
            .iter()
            .enumerate()
            .map(|(idx, row)| match row {
                Value::Object(fields) => Ok(fields
                    .iter()
                    .map(|(k, v)| (k.clone(), CellValue::from(v.clone())))
                    .collect::<BTreeMap<_, _>>()),
                other => Err(Error::InvalidInput(format!(
                    "row {idx} is not an object: {other}"
                ))),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_rows(maps))
    }

    /// Parse a JSON array of row objects
    pub fn from_json_str(json: &str) -> Result<Self> {
        let rows: Vec<Value> = serde_json::from_str(json)?;
        Self::from_json_rows(&rows)
    }

    /// Build from numeric columns of equal length
    pub fn from_numeric_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<f64>)>,
        S: Into<String>,
    {
        let mut dataset: Option<Self> = None;
        for (name, values) in columns {
            let cells = values.into_iter().map(CellValue::Number).collect::<Vec<_>>();
            let ds = dataset.take().unwrap_or_else(|| Self::with_rows(cells.len()));
            dataset = Some(ds.with_column(name, cells)?);
        }
        Ok(dataset.unwrap_or_default())
    }

    /// Add or replace a column; its length must match the row count
    pub fn with_column(mut self, name: impl Into<String>, cells: Vec<CellValue>) -> Result<Self> {
        let name = name.into();
        if cells.len() != self.n_rows {
            return Err(Error::size_mismatch(
                self.n_rows,
                cells.len(),
                &format!("column '{name}'"),
            ));
        }
        self.columns.insert(name, cells);
        Ok(self)
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn column(&self, name: &str) -> Option<&[CellValue]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Column as numbers, NaN where a cell has no finite value
    ///
    /// An unknown column reads as all NaN.
    pub fn numeric_column(&self, name: &str) -> Vec<f64> {
        match self.columns.get(name) {
            Some(cells) => cells
                .iter()
                .map(|c| c.as_number().unwrap_or(f64::NAN))
                .collect(),
            None => vec![f64::NAN; self.n_rows],
        }
    }

    /// Column as timestamps; unknown columns and unparsable cells are `None`
    pub fn timestamp_column(&self, name: &str) -> Vec<Option<DateTime<Utc>>> {
        match self.columns.get(name) {
            Some(cells) => cells.iter().map(parse_timestamp).collect(),
            None => vec![None; self.n_rows],
        }
    }
}
