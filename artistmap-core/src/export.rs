// Table serialization: CSV files and the JSON development dump

use crate::error::Result;
use crate::tables::{ArtistTables, Cell, Table};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Some(ExportFormat::Csv),
            "json" => Some(ExportFormat::Json),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// Renders a table as CSV: quoted header, quoted text cells, bare numbers
/// and booleans, `\n` between records and no trailing newline.
pub fn render_csv(table: &Table) -> String {
    let mut lines = Vec::with_capacity(table.rows.len() + 1);

    lines.push(
        table
            .columns
            .iter()
            .map(|column| quote_csv(column))
            .collect::<Vec<_>>()
            .join(","),
    );

    for row in &table.rows {
        lines.push(
            row.iter()
                .map(|cell| match cell {
                    Cell::Text(value) => quote_csv(value),
                    Cell::Number(value) => value.to_string(),
                    Cell::Bool(value) => value.to_string(),
                })
                .collect::<Vec<_>>()
                .join(","),
        );
    }

    lines.join("\n")
}

fn quote_csv(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// One row viewed as a JSON object whose keys follow the column order.
struct RowObject<'a> {
    columns: &'a [String],
    cells: &'a [Cell],
}

impl Serialize for RowObject<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, cell) in self.columns.iter().zip(self.cells) {
            map.serialize_entry(column, cell)?;
        }
        map.end()
    }
}

#[derive(Serialize)]
struct TableDocument<'a> {
    table: Vec<RowObject<'a>>,
}

/// Renders a table as `{"table": [ {column: value, ...}, ... ]}`.
pub fn render_json(table: &Table) -> std::result::Result<String, serde_json::Error> {
    let document = TableDocument {
        table: table
            .rows
            .iter()
            .map(|row| RowObject {
                columns: &table.columns,
                cells: row,
            })
            .collect(),
    };

    serde_json::to_string_pretty(&document)
}

pub fn render(table: &Table, format: ExportFormat) -> Result<String> {
    Ok(match format {
        ExportFormat::Csv => render_csv(table),
        ExportFormat::Json => render_json(table)?,
    })
}

pub fn save_table(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

/// Writes `<dir>/<table name>.<ext>` for every table and format, creating
/// `dir` if needed. Returns the written paths in order.
pub fn write_tables(
    tables: &ArtistTables,
    dir: &Path,
    formats: &[ExportFormat],
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let mut written = Vec::new();
    for format in formats {
        for table in tables.iter() {
            let path = dir.join(format!("{}.{}", table.name, format.extension()));
            let content = render(table, *format)?;
            save_table(&content, &path)?;
            debug!("Wrote {} ({} rows)", path.display(), table.len());
            written.push(path);
        }
    }

    Ok(written)
}
