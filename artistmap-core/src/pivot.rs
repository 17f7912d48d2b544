//! Wide boolean views over an [`Accumulator`].

use crate::relation::Accumulator;
use serde::Serialize;

/// Name of the leading column every pivot carries.
pub const ID_COLUMN: &str = "id";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PivotRow {
    pub id: String,
    /// One cell per universe column, in universe order.
    pub cells: Vec<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PivotTable {
    /// The column universe, without the leading `id` column.
    pub columns: Vec<String>,
    pub rows: Vec<PivotRow>,
}

impl PivotTable {
    /// Full header: `id` followed by the universe.
    pub fn header(&self) -> Vec<&str> {
        std::iter::once(ID_COLUMN)
            .chain(self.columns.iter().map(String::as_str))
            .collect()
    }

    pub fn row(&self, id: &str) -> Option<&PivotRow> {
        self.rows.iter().find(|row| row.id == id)
    }

    /// Cell lookup by row id and column name. `None` if either is unknown.
    pub fn cell(&self, id: &str, column: &str) -> Option<bool> {
        let position = self.columns.iter().position(|c| c == column)?;
        self.row(id).map(|row| row.cells[position])
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Builds one row per accumulator source, in link order, with a cell per
/// universe column telling whether the source links to it.
pub fn build(accumulator: &Accumulator, universe: &[String]) -> PivotTable {
    let rows = accumulator
        .sources()
        .iter()
        .map(|source| PivotRow {
            id: source.clone(),
            cells: universe
                .iter()
                .map(|column| accumulator.has_link(source, column))
                .collect(),
        })
        .collect();

    PivotTable {
        columns: universe.to_vec(),
        rows,
    }
}
