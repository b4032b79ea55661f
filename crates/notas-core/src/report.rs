//! Consolidated report: fixed columns, placeholders for missing cells.

use std::borrow::Cow;
use std::io;

use serde::Serialize;

use crate::error::Result;
use crate::models::columns::{MUNICIPIO_NF, STATUS_EXECUCAO};
use crate::models::record::ExtractionRecord;

/// Cell value for a field that was never populated.
pub const PLACEHOLDER: &str = "Não Encontrado";

/// Anything that can answer "what is in column X".
pub trait Row {
    /// Value of `column`, `None` when the row has nothing for it.
    fn cell(&self, column: &str) -> Option<Cow<'_, str>>;
}

impl<T: Row + ?Sized> Row for &T {
    fn cell(&self, column: &str) -> Option<Cow<'_, str>> {
        (**self).cell(column)
    }
}

impl Row for ExtractionRecord {
    fn cell(&self, column: &str) -> Option<Cow<'_, str>> {
        match column {
            STATUS_EXECUCAO => Some(Cow::Owned(self.status.to_string())),
            MUNICIPIO_NF => self
                .source_group
                .as_deref()
                .or_else(|| self.get(MUNICIPIO_NF))
                .map(Cow::Borrowed),
            _ => self.get(column).map(Cow::Borrowed),
        }
    }
}

/// Rows normalised to one column list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// One borrowed row of a [`ReportTable`].
#[derive(Debug, Clone, Copy)]
pub struct ReportRow<'a> {
    columns: &'a [String],
    cells: &'a [String],
}

impl<'a> ReportRow<'a> {
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.cells.get(idx).map(String::as_str)
    }

    /// Cells in column order.
    pub fn cells(&self) -> &'a [String] {
        self.cells
    }
}

impl Row for ReportRow<'_> {
    fn cell(&self, column: &str) -> Option<Cow<'_, str>> {
        self.get(column).map(Cow::Borrowed)
    }
}

impl ReportTable {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> impl Iterator<Item = ReportRow<'_>> {
        self.rows.iter().map(|cells| ReportRow {
            columns: &self.columns,
            cells,
        })
    }

    pub fn row(&self, index: usize) -> Option<ReportRow<'_>> {
        self.rows.get(index).map(|cells| ReportRow {
            columns: &self.columns,
            cells,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Write the table as CSV with a header row.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(&self.columns)?;
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// Normalise rows to `columns`, filling gaps with [`PLACEHOLDER`].
pub fn assemble<R, I>(records: I, columns: &[&str]) -> ReportTable
where
    R: Row,
    I: IntoIterator<Item = R>,
{
    assemble_with(records, columns, PLACEHOLDER)
}

/// [`assemble`] with a custom placeholder.
///
/// Input order is kept. Fields outside `columns` are dropped.
pub fn assemble_with<R, I>(records: I, columns: &[&str], placeholder: &str) -> ReportTable
where
    R: Row,
    I: IntoIterator<Item = R>,
{
    let rows = records
        .into_iter()
        .map(|record| {
            columns
                .iter()
                .map(|column| match record.cell(column) {
                    Some(value) => value.into_owned(),
                    None => placeholder.to_string(),
                })
                .collect()
        })
        .collect();

    ReportTable {
        columns: columns.iter().map(|c| c.to_string()).collect(),
        rows,
    }
}
