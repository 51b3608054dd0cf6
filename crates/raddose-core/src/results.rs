//! Loading of the engine's `<prefix>Summary.csv` table.
//!
//! Column names and count are whatever the engine writes; cells are typed
//! on load as integer, real, text or empty.

use crate::domain::{RaddoseError, RaddoseResult};
use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Empty,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Cell {
    fn parse(raw: &str) -> Self {
        if raw.is_empty() {
            Self::Empty
        } else if let Ok(integer) = raw.parse::<i64>() {
            Self::Integer(integer)
        } else if let Ok(real) = raw.parse::<f64>() {
            Self::Real(real)
        } else {
            Self::Text(raw.to_string())
        }
    }

    pub fn as_real(&self) -> Option<f64> {
        match self {
            Self::Integer(value) => Some(*value as f64),
            Self::Real(value) => Some(*value),
            Self::Empty | Self::Text(_) => None,
        }
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Real(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl SummaryTable {
    pub fn from_path(path: &Path) -> RaddoseResult<Self> {
        let contents = fs::read_to_string(path).map_err(|source| RaddoseError::ResultUnavailable {
            path: path.to_path_buf(),
            detail: source.to_string(),
        })?;
        Self::parse_str(&contents).map_err(|source| RaddoseError::ResultUnavailable {
            path: path.to_path_buf(),
            detail: source.to_string(),
        })
    }

    pub fn parse_str(contents: &str) -> Result<Self, csv::Error> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(contents.as_bytes());
        let headers = rdr.headers()?.iter().map(str::to_string).collect();
        let rows = rdr
            .records()
            .map(|record| record.map(|record| record.iter().map(Cell::parse).collect()))
            .collect::<Result<Vec<Vec<Cell>>, csv::Error>>()?;
        Ok(Self { headers, rows })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    pub fn column(&self, name: &str) -> Option<Vec<&Cell>> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().filter_map(|row| row.get(index)).collect())
    }

    pub fn cell(&self, row: usize, name: &str) -> Option<&Cell> {
        let index = self.column_index(name)?;
        self.rows.get(row)?.get(index)
    }

    pub fn real(&self, row: usize, name: &str) -> Option<f64> {
        self.cell(row, name)?.as_real()
    }
}
