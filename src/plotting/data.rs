//! Tabular data: named columns of numbers or text, read from and written to CSV.

use std::fmt;
use std::fs::File;
use std::hash::{Hash, Hasher};
use std::io::{BufReader, Read, Write};
use std::path::Path;

use indexmap::IndexMap;

use crate::plotting::error::{PlotError, PlotResult};

/// A single cell. Cells that parse as a float are numbers, everything else
/// is kept as text.
#[derive(Debug, Clone)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    /// Parse a raw CSV field.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<f64>() {
            Ok(n) => Value::Number(n),
            Err(_) => Value::Text(trimmed.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(_) => None,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    /// Bit pattern used for equality and hashing; folds -0.0 into 0.0 and
    /// every NaN into one key.
    fn number_key(n: f64) -> u64 {
        if n.is_nan() {
            f64::NAN.to_bits()
        } else if n == 0.0 {
            0.0_f64.to_bits()
        } else {
            n.to_bits()
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => Value::number_key(*a) == Value::number_key(*b),
            (Value::Text(a), Value::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::Number(n) => {
                0u8.hash(state);
                Value::number_key(*n).hash(state);
            }
            Value::Text(t) => {
                1u8.hash(state);
                t.hash(state);
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(t) => write!(f, "{}", t),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// Trait for types that can be converted into a dataset column.
pub trait IntoColumn {
    /// Convert into a vector of cells.
    fn into_column(self) -> Vec<Value>;
}

impl IntoColumn for Vec<Value> {
    fn into_column(self) -> Vec<Value> {
        self
    }
}

impl IntoColumn for &[Value] {
    fn into_column(self) -> Vec<Value> {
        self.to_vec()
    }
}

impl IntoColumn for Vec<f64> {
    fn into_column(self) -> Vec<Value> {
        self.into_iter().map(Value::Number).collect()
    }
}

impl IntoColumn for &[f64] {
    fn into_column(self) -> Vec<Value> {
        self.iter().copied().map(Value::Number).collect()
    }
}

impl IntoColumn for Vec<i32> {
    fn into_column(self) -> Vec<Value> {
        self.into_iter().map(Value::from).collect()
    }
}

impl IntoColumn for Vec<i64> {
    fn into_column(self) -> Vec<Value> {
        self.into_iter().map(|x| Value::Number(x as f64)).collect()
    }
}

impl IntoColumn for Vec<String> {
    fn into_column(self) -> Vec<Value> {
        self.into_iter().map(Value::Text).collect()
    }
}

impl IntoColumn for Vec<&str> {
    fn into_column(self) -> Vec<Value> {
        self.into_iter().map(Value::from).collect()
    }
}

impl<const N: usize> IntoColumn for [f64; N] {
    fn into_column(self) -> Vec<Value> {
        self.iter().copied().map(Value::Number).collect()
    }
}

impl<const N: usize> IntoColumn for [i32; N] {
    fn into_column(self) -> Vec<Value> {
        self.iter().copied().map(Value::from).collect()
    }
}

impl<const N: usize> IntoColumn for [&str; N] {
    fn into_column(self) -> Vec<Value> {
        self.iter().map(|s| Value::from(*s)).collect()
    }
}

/// Named, insertion-ordered columns of equal length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: IndexMap<String, Vec<Value>>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Dataset::push_column`].
    pub fn with_column(mut self, name: impl Into<String>, values: impl IntoColumn) -> PlotResult<Self> {
        self.push_column(name, values)?;
        Ok(self)
    }

    /// Add (or replace) a column. Its length must match the existing columns.
    pub fn push_column(&mut self, name: impl Into<String>, values: impl IntoColumn) -> PlotResult<()> {
        let name = name.into();
        let values = values.into_column();
        let others = self.columns.iter().find(|(n, _)| **n != name);
        if let Some((other, existing)) = others {
            if existing.len() != values.len() {
                return Err(PlotError::InvalidData(format!(
                    "column '{}' has {} rows but '{}' has {}",
                    name,
                    values.len(),
                    other,
                    existing.len()
                )));
            }
        }
        self.columns.insert(name, values);
        Ok(())
    }

    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.columns.values().next().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append the rows of `other`. Both datasets must have the same column
    /// names; an empty dataset adopts `other` wholesale.
    pub fn append_rows(&mut self, other: Dataset) -> PlotResult<()> {
        if self.columns.is_empty() {
            *self = other;
            return Ok(());
        }
        for name in other.columns.keys() {
            if !self.columns.contains_key(name) {
                return Err(PlotError::MissingColumn(name.clone()));
            }
        }
        if let Some(name) = self.columns.keys().find(|n| !other.columns.contains_key(*n)) {
            return Err(PlotError::MissingColumn(name.clone()));
        }
        for (name, mut values) in other.columns {
            if let Some(column) = self.columns.get_mut(&name) {
                column.append(&mut values);
            }
        }
        Ok(())
    }

    /// Read a CSV file with a header row.
    pub fn from_csv_path(path: impl AsRef<Path>) -> PlotResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            std::io::Error::new(
                e.kind(),
                format!("Error opening CSV file {}: {}", path.display(), e),
            )
        })?;
        Self::from_csv_reader(BufReader::new(file))
    }

    /// Read CSV data with a header row from any reader.
    pub fn from_csv_reader<R: Read>(reader: R) -> PlotResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        if headers.is_empty() {
            return Err(PlotError::EmptyData);
        }
        let mut columns: Vec<Vec<Value>> = vec![Vec::new(); headers.len()];

        for (i, record) in rdr.records().enumerate() {
            let record = record?;
            if record.len() != headers.len() {
                return Err(PlotError::InvalidData(format!(
                    "CSV row {} has {} fields, expected {}",
                    i + 2,
                    record.len(),
                    headers.len()
                )));
            }
            for (column, field) in columns.iter_mut().zip(record.iter()) {
                column.push(Value::parse(field));
            }
        }

        let mut dataset = Dataset::new();
        for (name, values) in headers.into_iter().zip(columns) {
            if dataset.columns.contains_key(&name) {
                return Err(PlotError::InvalidData(format!("duplicate CSV column '{}'", name)));
            }
            dataset.columns.insert(name, values);
        }
        Ok(dataset)
    }

    /// Write the dataset as CSV with a header row.
    pub fn write_csv<W: Write>(&self, writer: W) -> PlotResult<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(self.columns.keys())?;
        for row in 0..self.len() {
            wtr.write_record(self.columns.values().map(|col| col[row].to_string()))?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn to_csv_path(&self, path: impl AsRef<Path>) -> PlotResult<()> {
        let file = File::create(path)?;
        self.write_csv(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::io::Cursor;

    #[test]
    fn test_value_parse_and_equality() {
        assert_eq!(Value::parse(" 2.5 "), Value::Number(2.5));
        assert_eq!(Value::parse("HT"), Value::Text("HT".to_string()));
        assert_eq!(Value::Number(-0.0), Value::Number(0.0));
        assert_ne!(Value::Number(1.0), Value::Text("1".to_string()));

        let set: HashSet<Value> = [Value::Number(0.0), Value::Number(-0.0), Value::from("a")]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_csv_parsing() {
        let data = "period,10,perm\n1.0,2.0,0.001\n2.0,3.5,0.01\n";
        let ds = Dataset::from_csv_reader(Cursor::new(data)).unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.column_names().collect::<Vec<_>>(), vec!["period", "10", "perm"]);
        assert_eq!(ds.column("10").unwrap()[1], Value::Number(3.5));
        assert!(ds.column("missing").is_none());
    }

    #[test]
    fn test_csv_ragged_row_is_error() {
        let data = "a,b\n1,2\n3\n";
        let result = Dataset::from_csv_reader(Cursor::new(data));
        assert!(result.is_err());
    }

    #[test]
    fn test_csv_write_round_trip_keeps_text() {
        let ds = Dataset::new()
            .with_column("x", vec![1.0, 2.5])
            .unwrap()
            .with_column("kind", vec!["SS", "HT"])
            .unwrap();

        let mut buf = Vec::new();
        ds.write_csv(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "x,kind\n1,SS\n2.5,HT\n");
    }

    #[test]
    fn test_push_column_length_mismatch() {
        let mut ds = Dataset::new().with_column("x", [1.0, 2.0, 3.0]).unwrap();
        assert!(ds.push_column("y", [1.0, 2.0]).is_err());
        assert!(!ds.has_column("y"));
        // Replacing a column with a different length is allowed when it is the only one.
        assert!(ds.push_column("x", [1.0]).is_ok());
    }

    #[test]
    fn test_append_rows() {
        let mut ds = Dataset::new();
        ds.append_rows(Dataset::new().with_column("x", [1.0]).unwrap()).unwrap();
        ds.append_rows(Dataset::new().with_column("x", [2.0]).unwrap()).unwrap();
        assert_eq!(ds.len(), 2);

        let err = ds.append_rows(Dataset::new().with_column("y", [2.0]).unwrap());
        assert!(matches!(err, Err(PlotError::MissingColumn(_))));
        assert_eq!(ds.len(), 2);
    }
}
