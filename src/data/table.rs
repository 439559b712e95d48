//! Whitespace-separated reference tables.
//!
//! The tables shipped with the framework share one layout: a single header row,
//! then one row per mass point with numeric columns. Blank lines and lines
//! starting with `#` are ignored.

use std::path::Path;

use crate::error::{ModelError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct TextTable {
    /// Tokens of the header row.
    pub header: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

impl TextTable {
    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| ModelError::io(path, e))?;
        Self::parse(&text).map_err(|e| match e {
            ModelError::Table(msg) => ModelError::Table(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim()))
            .filter(|(_, l)| !l.is_empty() && !l.starts_with('#'));

        let header = lines
            .next()
            .map(|(_, l)| l.split_whitespace().map(str::to_string).collect())
            .ok_or_else(|| ModelError::Table("empty table".into()))?;

        let mut rows = Vec::new();
        for (lineno, line) in lines {
            let row = line
                .split_whitespace()
                .map(|tok| {
                    tok.parse::<f64>()
                        .map_err(|_| ModelError::Table(format!("line {lineno}: '{tok}' is not a number")))
                })
                .collect::<Result<Vec<f64>>>()?;
            rows.push(row);
        }
        if rows.is_empty() {
            return Err(ModelError::Table("table has no data rows".into()));
        }
        Ok(Self { header, rows })
    }

    /// Position of a named header column.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    /// All values of column `idx`; every row must have it.
    pub fn column(&self, idx: usize) -> Result<Vec<f64>> {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                row.get(idx)
                    .copied()
                    .ok_or_else(|| ModelError::Table(format!("data row {} has no column {idx}", i + 1)))
            })
            .collect()
    }
}
