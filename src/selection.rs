use std::collections::HashSet;

use crate::error::DashboardError;
use crate::loader::Dataset;
use crate::models::RecordKey;

/// Ordered row indices into the loaded member set. Only constructible
/// against a dataset, so every index is in range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    rows: Vec<usize>,
}

impl Selection {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_rows(dataset: &Dataset, rows: &[usize]) -> Result<Self, DashboardError> {
        if let Some(&row) = rows.iter().find(|&&row| row >= dataset.len()) {
            return Err(DashboardError::RowOutOfRange {
                row,
                len: dataset.len(),
            });
        }
        Ok(Self {
            rows: rows.to_vec(),
        })
    }

    /// Resolves stable keys to rows, keeping the order the keys were given in.
    pub fn from_keys(dataset: &Dataset, keys: &[RecordKey]) -> Result<Self, DashboardError> {
        let rows = keys
            .iter()
            .map(|key| {
                dataset
                    .row_of(*key)
                    .ok_or(DashboardError::UnknownRecord(*key))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_rows(dataset, &rows)
    }

    /// Drops selected members that the table view currently hides, keeping
    /// selection order. Keys that are not selected are ignored.
    pub fn within_view(self, dataset: &Dataset, visible: &[RecordKey]) -> Self {
        let shown: HashSet<usize> = visible
            .iter()
            .filter_map(|key| dataset.row_of(*key))
            .collect();
        Self {
            rows: self
                .rows
                .into_iter()
                .filter(|row| shown.contains(row))
                .collect(),
        }
    }

    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The display column currently driving the histogram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnChoice {
    name: String,
    index: usize,
}

impl ColumnChoice {
    pub fn new(dataset: &Dataset, name: &str) -> Result<Self, DashboardError> {
        let table = dataset.table();
        match table.column_index(name) {
            Some(index) if index > 0 => Ok(Self {
                name: name.to_string(),
                index,
            }),
            _ => Err(DashboardError::UnknownColumn(name.to_string())),
        }
    }

    /// First column after the identity column.
    pub fn initial(dataset: &Dataset) -> Result<Self, DashboardError> {
        let first = dataset
            .table()
            .choosable_columns()
            .first()
            .ok_or_else(|| DashboardError::UnknownColumn(String::new()))?;
        Self::new(dataset, first)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> usize {
        self.index
    }
}
