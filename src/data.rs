use anyhow::{anyhow, Result};
use serde_json::{Map, Value};

/// An uploaded table: ordered column names plus rows of raw cell strings.
///
/// Each row holds one cell per column, in column order. Missing cells are
/// stored as empty strings so that every row covers the full column list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Dataset {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { columns, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Raw cell value, empty when the column is unknown or the cell missing
    pub fn value(&self, row: usize, column: &str) -> &str {
        match (self.rows.get(row), self.column_index(column)) {
            (Some(cells), Some(idx)) => cells.get(idx).map(String::as_str).unwrap_or(""),
            _ => "",
        }
    }

    /// All raw values of one column, in row order
    pub fn column_values(&self, column: &str) -> Vec<&str> {
        match self.column_index(column) {
            Some(idx) => self
                .rows
                .iter()
                .map(|row| row.get(idx).map(String::as_str).unwrap_or(""))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Create a Dataset from a JSON Array of Objects
    pub fn from_json(value: &Value) -> Result<Self> {
        let array = value
            .as_array()
            .ok_or_else(|| anyhow!("Input data must be a JSON array of objects"))?;

        // Column order follows first appearance across all records
        let mut columns: Vec<String> = Vec::new();
        for item in array {
            let obj = item
                .as_object()
                .ok_or_else(|| anyhow!("Items in array must be objects"))?;
            for key in obj.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }

        let mut rows = Vec::with_capacity(array.len());
        for item in array {
            let obj = item
                .as_object()
                .ok_or_else(|| anyhow!("Items in array must be objects"))?;

            let mut row = Vec::with_capacity(columns.len());
            for column in &columns {
                let val_str = match obj.get(column) {
                    Some(Value::String(s)) => s.clone(),
                    Some(Value::Number(n)) => n.to_string(),
                    Some(Value::Bool(b)) => b.to_string(),
                    Some(Value::Null) | None => String::new(),
                    _ => return Err(anyhow!("Unsupported value type for field '{}'", column)),
                };
                row.push(val_str);
            }
            rows.push(row);
        }

        Ok(Self { columns, rows })
    }

    /// Rows as JSON objects keyed by column name
    pub fn to_records(&self) -> Vec<Map<String, Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .zip(row)
                    .map(|(col, cell)| (col.clone(), Value::String(cell.clone())))
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_pads_short_rows() {
        let data = Dataset::new(
            vec!["a".to_string(), "b".to_string()],
            vec![vec!["1".to_string()]],
        );
        assert_eq!(data.rows[0], vec!["1".to_string(), String::new()]);
        assert_eq!(data.value(0, "b"), "");
    }

    #[test]
    fn test_value_lookup() {
        let data = Dataset::new(
            vec!["a".to_string(), "b".to_string()],
            vec![vec!["1".to_string(), "x".to_string()]],
        );
        assert_eq!(data.value(0, "b"), "x");
        assert_eq!(data.value(0, "missing"), "");
        assert_eq!(data.value(5, "a"), "");
        assert_eq!(data.column_values("a"), vec!["1"]);
    }

    #[test]
    fn test_from_json() {
        let value = json!([
            {"a": 1, "b": "x"},
            {"a": 2.5, "c": true},
            {"a": null}
        ]);
        let data = Dataset::from_json(&value).unwrap();
        assert_eq!(data.columns, vec!["a", "b", "c"]);
        assert_eq!(data.rows[0], vec!["1", "x", ""]);
        assert_eq!(data.rows[1], vec!["2.5", "", "true"]);
        assert_eq!(data.rows[2], vec!["", "", ""]);
    }

    #[test]
    fn test_from_json_rejects_non_array() {
        assert!(Dataset::from_json(&json!({"a": 1})).is_err());
        assert!(Dataset::from_json(&json!([1, 2])).is_err());
    }

    #[test]
    fn test_to_records() {
        let data = Dataset::new(
            vec!["a".to_string()],
            vec![vec!["1".to_string()], vec!["2".to_string()]],
        );
        let records = data.to_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["a"], json!("2"));
    }
}
