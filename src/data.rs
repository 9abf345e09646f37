use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::Read;

/// A single dataset cell. Cells are plain JSON scalars (number, string, bool, null).
pub type Cell = Value;

/// Column descriptor of a [`Dataset`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Tabular result set: ordered columns plus rows positionally aligned with them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    columns: Vec<Column>,
    rows: Vec<Vec<Cell>>,
}

#[derive(Deserialize)]
struct RawDataset {
    columns: Vec<Column>,
    #[serde(default)]
    rows: Vec<Vec<Cell>>,
}

impl Dataset {
    /// Build a dataset, rejecting rows whose arity differs from the column count.
    pub fn new(columns: Vec<Column>, rows: Vec<Vec<Cell>>) -> Result<Self> {
        for (idx, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                bail!(
                    "Row {} has {} cells but the dataset has {} columns",
                    idx,
                    row.len(),
                    columns.len()
                );
            }
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Create a Dataset from JSON.
    ///
    /// Accepts either `{"columns": [{"name": ..}], "rows": [[..]]}` or an
    /// array of row objects, in which case the columns are taken from the
    /// first object.
    pub fn from_json(value: &Value) -> Result<Self> {
        if value.is_object() {
            let raw: RawDataset = serde_json::from_value(value.clone())
                .context("Dataset object must carry 'columns' and 'rows'")?;
            return Self::new(raw.columns, raw.rows);
        }

        let array = value
            .as_array()
            .ok_or_else(|| anyhow!("Input data must be a JSON array of objects"))?;

        let Some(first) = array.first() else {
            return Self::new(Vec::new(), Vec::new());
        };

        let first_obj = first
            .as_object()
            .ok_or_else(|| anyhow!("Items in array must be objects"))?;
        let headers: Vec<String> = first_obj.keys().cloned().collect();

        let mut rows = Vec::with_capacity(array.len());
        for item in array {
            let obj = item
                .as_object()
                .ok_or_else(|| anyhow!("Items in array must be objects"))?;

            let mut row = Vec::with_capacity(headers.len());
            for header in &headers {
                match obj.get(header) {
                    Some(v @ (Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Null)) => {
                        row.push(v.clone())
                    }
                    None => row.push(Value::Null),
                    Some(_) => bail!("Unsupported value type for field '{}'", header),
                }
            }
            rows.push(row);
        }

        Self::new(headers.into_iter().map(Column::new).collect(), rows)
    }

    /// Read a CSV document. Cells that parse as numbers become numeric cells,
    /// empty cells become null, everything else stays text.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns: Vec<Column> = rdr
            .headers()
            .context("Failed to read CSV headers")?
            .iter()
            .map(Column::new)
            .collect();

        let mut rows = Vec::new();
        for (idx, record) in rdr.records().enumerate() {
            let record = record.with_context(|| format!("Failed to read CSV record {}", idx + 1))?;
            rows.push(record.iter().map(sniff_cell).collect());
        }

        Self::new(columns, rows)
    }

    /// Resolve a binding key to exactly one column index.
    ///
    /// An exact name match wins; otherwise a single ASCII-case-insensitive
    /// match is accepted. Zero or several candidates are errors.
    pub fn resolve_column(&self, key: &str) -> Result<usize> {
        let exact: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.name == key)
            .map(|(i, _)| i)
            .collect();

        let candidates = if exact.is_empty() {
            self.columns
                .iter()
                .enumerate()
                .filter(|(_, c)| c.name.eq_ignore_ascii_case(key))
                .map(|(i, _)| i)
                .collect()
        } else {
            exact
        };

        match candidates.as_slice() {
            [idx] => Ok(*idx),
            [] => Err(anyhow!("Column '{}' not found", key)),
            _ => Err(anyhow!("Column '{}' is ambiguous ({} matches)", key, candidates.len())),
        }
    }
}

fn sniff_cell(raw: &str) -> Cell {
    if raw.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Value::from(i);
    }
    match raw.parse::<f64>() {
        Ok(f) if f.is_finite() => Value::from(f),
        _ => Value::String(raw.to_string()),
    }
}

/// Numeric view of a cell: numbers, and strings that parse as finite numbers.
pub fn cell_as_f64(cell: &Cell) -> Option<f64> {
    match cell {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Display text of a cell, as used for point names and series keys.
pub fn cell_to_text(cell: &Cell) -> String {
    match cell {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

// =============================================================================
// Row projection
// =============================================================================

/// A dataset row in object form: column name -> cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProjectedRow {
    cells: Map<String, Value>,
}

impl ProjectedRow {
    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.cells.get(column)
    }

    /// Cell for `column`, null when the row does not carry it.
    pub fn cell(&self, column: &str) -> Cell {
        self.cells.get(column).cloned().unwrap_or(Value::Null)
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.cells.clone())
    }
}

/// Zip every row with the column descriptors. Order is preserved.
pub fn project_rows(dataset: &Dataset) -> Vec<ProjectedRow> {
    dataset
        .rows
        .iter()
        .map(|row| ProjectedRow {
            cells: dataset
                .columns
                .iter()
                .zip(row.iter())
                .map(|(col, cell)| (col.name.clone(), cell.clone()))
                .collect(),
        })
        .collect()
}

/// Extracts the auxiliary (drill-down / link) payload carried on a point.
/// The payload is opaque to the series builder.
pub trait RowContextExtractor {
    fn extract(&self, row: &ProjectedRow) -> Value;
}

/// Default extractor: carries the whole row object through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl RowContextExtractor for PassThrough {
    fn extract(&self, row: &ProjectedRow) -> Value {
        row.to_value()
    }
}
