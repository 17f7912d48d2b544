//! Flat tables handed to the exporters.

use crate::artist::{Artist, RelatedArtist};
use crate::pivot::{ID_COLUMN, PivotTable};
use crate::registry::Registry;
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Number(u64),
    Bool(bool),
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Text(value) => serializer.serialize_str(value),
            Cell::Number(value) => serializer.serialize_u64(*value),
            Cell::Bool(value) => serializer.serialize_bool(*value),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Bool(value)
    }
}

impl From<u64> for Cell {
    fn from(value: u64) -> Self {
        Cell::Number(value)
    }
}

/// A named table with an ordered column list. Every row has exactly one
/// cell per column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn playlist_roster(name: impl Into<String>, artists: &Registry<Artist>) -> Self {
        let mut table = Table::new(name, vec![ID_COLUMN.to_string(), "name".to_string()]);
        for artist in artists {
            table.push_row(vec![artist.id.as_str().into(), artist.name.as_str().into()]);
        }
        table
    }

    pub fn related_roster(name: impl Into<String>, artists: &Registry<RelatedArtist>) -> Self {
        let mut table = Table::new(
            name,
            vec![
                ID_COLUMN.to_string(),
                "name".to_string(),
                "followers".to_string(),
            ],
        );
        for artist in artists {
            table.push_row(vec![
                artist.id.as_str().into(),
                artist.name.as_str().into(),
                artist.followers.into(),
            ]);
        }
        table
    }

    pub fn from_pivot(name: impl Into<String>, pivot: &PivotTable) -> Self {
        let columns = pivot.header().into_iter().map(String::from).collect();
        let mut table = Table::new(name, columns);
        for row in &pivot.rows {
            let mut cells = Vec::with_capacity(row.cells.len() + 1);
            cells.push(Cell::Text(row.id.clone()));
            cells.extend(row.cells.iter().map(|&linked| Cell::Bool(linked)));
            table.push_row(cells);
        }
        table
    }
}

/// Every table one aggregation run produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistTables {
    pub playlist_artists: Table,
    pub related_artists: Table,
    pub origins: Table,
    /// Absent when playlist-artist genres are not tracked.
    pub playlist_genres: Option<Table>,
    pub related_genres: Table,
}

impl ArtistTables {
    /// Tables in output file order.
    pub fn iter(&self) -> impl Iterator<Item = &Table> {
        [
            Some(&self.playlist_artists),
            Some(&self.related_artists),
            Some(&self.origins),
            self.playlist_genres.as_ref(),
            Some(&self.related_genres),
        ]
        .into_iter()
        .flatten()
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.iter().find(|table| table.name == name)
    }
}
