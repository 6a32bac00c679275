// Column type inference

use crate::data::Dataset;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Fraction of non-empty values that must parse for numeric/temporal tags
const TYPE_RATIO_THRESHOLD: f64 = 0.7;
/// Unique ratio below which a column reads as categorical
const CATEGORICAL_UNIQUE_RATIO: f64 = 0.3;
/// Stored category list length; later categories collapse onto index 0
pub const MAX_CATEGORIES: usize = 20;

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Numeric,
    Temporal,
    Categorical,
    Mixed,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Numeric => "numeric",
            ColumnType::Temporal => "temporal",
            ColumnType::Categorical => "categorical",
            ColumnType::Mixed => "mixed",
        };
        f.write_str(name)
    }
}

/// Parsed numeric (or epoch-millisecond) values of a column with their bounds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
    #[serde(skip)]
    pub values: Vec<f64>,
}

impl NumericRange {
    fn from_values(values: Vec<f64>) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        Some(Self { min, max, values })
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Position of `value` inside the range, 0 when the span is empty
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.span();
        if span == 0.0 {
            0.0
        } else {
            (value - self.min) / span
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ColumnClassification {
    Numeric { range: NumericRange },
    Temporal { range: NumericRange },
    Categorical { categories: Vec<String> },
    /// Mixed columns keep the range of whatever values did parse as numbers
    Mixed { range: Option<NumericRange> },
}

impl ColumnClassification {
    pub fn column_type(&self) -> ColumnType {
        match self {
            ColumnClassification::Numeric { .. } => ColumnType::Numeric,
            ColumnClassification::Temporal { .. } => ColumnType::Temporal,
            ColumnClassification::Categorical { .. } => ColumnType::Categorical,
            ColumnClassification::Mixed { .. } => ColumnType::Mixed,
        }
    }

    pub fn range(&self) -> Option<&NumericRange> {
        match self {
            ColumnClassification::Numeric { range } | ColumnClassification::Temporal { range } => {
                Some(range)
            }
            ColumnClassification::Mixed { range } => range.as_ref(),
            ColumnClassification::Categorical { .. } => None,
        }
    }

    pub fn categories(&self) -> Option<&[String]> {
        match self {
            ColumnClassification::Categorical { categories } => Some(categories),
            _ => None,
        }
    }
}

/// Parse a cell as a finite float
pub fn parse_number(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Parse a cell as a calendar date and return epoch milliseconds (UTC).
///
/// Only years strictly between 1900 and 2100 are accepted.
pub fn parse_temporal(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let parsed = parse_datetime(value)?;
    let year = parsed.year();
    if year <= 1900 || year >= 2100 {
        return None;
    }
    Some(parsed.and_utc().timestamp_millis() as f64)
}

fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }

    // A bare four digit year
    if value.len() == 4 && value.bytes().all(|b| b.is_ascii_digit()) {
        let year = value.parse::<i32>().ok()?;
        return NaiveDate::from_ymd_opt(year, 1, 1)?.and_hms_opt(0, 0, 0);
    }

    // Year and month only
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d") {
        if value.len() <= 7 {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Classify one column from its raw values.
///
/// Empty (or whitespace-only) values are ignored for every ratio.
pub fn classify<'a, I>(values: I) -> ColumnClassification
where
    I: IntoIterator<Item = &'a str>,
{
    let values: Vec<&str> = values
        .into_iter()
        .filter(|v| !v.trim().is_empty())
        .collect();

    if values.is_empty() {
        return ColumnClassification::Mixed { range: None };
    }

    let total = values.len() as f64;

    let numeric: Vec<f64> = values.iter().filter_map(|v| parse_number(v)).collect();
    let temporal: Vec<f64> = values.iter().filter_map(|v| parse_temporal(v)).collect();

    let mut seen = HashSet::new();
    let mut distinct: Vec<&str> = Vec::new();
    for v in &values {
        if seen.insert(*v) {
            distinct.push(v);
        }
    }

    let numeric_ratio = numeric.len() as f64 / total;
    let temporal_ratio = temporal.len() as f64 / total;
    let unique_ratio = distinct.len() as f64 / total;

    if temporal_ratio > TYPE_RATIO_THRESHOLD {
        if let Some(range) = NumericRange::from_values(temporal) {
            return ColumnClassification::Temporal { range };
        }
    }

    match NumericRange::from_values(numeric) {
        Some(range) if numeric_ratio > TYPE_RATIO_THRESHOLD => {
            ColumnClassification::Numeric { range }
        }
        _ if unique_ratio < CATEGORICAL_UNIQUE_RATIO || distinct.len() <= MAX_CATEGORIES => {
            let categories = distinct
                .into_iter()
                .take(MAX_CATEGORIES)
                .map(str::to_string)
                .collect();
            ColumnClassification::Categorical { categories }
        }
        range => ColumnClassification::Mixed { range },
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    pub name: String,
    pub classification: ColumnClassification,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TypeCounts {
    pub numeric: usize,
    pub temporal: usize,
    pub categorical: usize,
    pub mixed: usize,
}

impl TypeCounts {
    pub fn get(&self, column_type: ColumnType) -> usize {
        match column_type {
            ColumnType::Numeric => self.numeric,
            ColumnType::Temporal => self.temporal,
            ColumnType::Categorical => self.categorical,
            ColumnType::Mixed => self.mixed,
        }
    }
}

/// Classification of every column of a dataset, in column order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DatasetProfile {
    pub columns: Vec<ColumnProfile>,
}

impl DatasetProfile {
    pub fn from_dataset(data: &Dataset) -> Self {
        let columns = data
            .columns
            .iter()
            .map(|name| ColumnProfile {
                name: name.clone(),
                classification: classify(data.column_values(name)),
            })
            .collect();
        Self { columns }
    }

    pub fn get(&self, name: &str) -> Option<&ColumnClassification> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| &c.classification)
    }

    pub fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.get(name).map(ColumnClassification::column_type)
    }

    pub fn columns_of(&self, column_type: ColumnType) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.classification.column_type() == column_type)
            .map(|c| c.name.as_str())
            .collect()
    }

    pub fn numeric_columns(&self) -> Vec<&str> {
        self.columns_of(ColumnType::Numeric)
    }

    pub fn temporal_columns(&self) -> Vec<&str> {
        self.columns_of(ColumnType::Temporal)
    }

    pub fn categorical_columns(&self) -> Vec<&str> {
        self.columns_of(ColumnType::Categorical)
    }

    pub fn counts(&self) -> TypeCounts {
        let mut counts = TypeCounts::default();
        for column in &self.columns {
            match column.classification.column_type() {
                ColumnType::Numeric => counts.numeric += 1,
                ColumnType::Temporal => counts.temporal += 1,
                ColumnType::Categorical => counts.categorical += 1,
                ColumnType::Mixed => counts.mixed += 1,
            }
        }
        counts
    }
}
