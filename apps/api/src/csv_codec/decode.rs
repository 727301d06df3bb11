use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::applications::store::ApplicationStore;
use crate::models::{ApplicationDraft, Status, UnknownStatus};

use super::scanner::RowScanner;
use super::{COLUMN_COUNT, DATE_FORMAT};

/// Field content that could not be parsed. Aborts the rest of the import.
#[derive(Debug, Error)]
pub enum ImportErrorKind {
    #[error(transparent)]
    UnknownStatus(#[from] UnknownStatus),

    #[error("invalid {column} date '{value}': {source}")]
    InvalidDate {
        column: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// A failed import. Rows committed before the failing one stay in the store.
#[derive(Debug, Error)]
#[error("import aborted at line {line} after {imported} record(s): {kind}")]
pub struct ImportError {
    /// 1-based line on which the offending row starts.
    pub line: usize,
    /// Records committed before the failure.
    pub imported: usize,
    #[source]
    pub kind: ImportErrorKind,
}

/// A parsed data row, ready to be committed.
struct ImportRow {
    draft: ApplicationDraft,
    last_update: NaiveDate,
}

/// Imports CSV rows into `store` and returns how many records were created.
///
/// The first row is a header and is skipped. Rows with fewer than seven
/// fields are dropped without error. The id column is ignored; every
/// imported row gets a fresh id from the store.
pub fn decode(store: &ApplicationStore, bytes: &[u8]) -> Result<usize, ImportError> {
    let text = String::from_utf8_lossy(bytes);
    let mut imported = 0;

    for row in RowScanner::new(&text).skip(1) {
        if row.fields.len() < COLUMN_COUNT {
            debug!(
                "Skipping line {}: expected {COLUMN_COUNT} fields, found {}",
                row.line,
                row.fields.len()
            );
            continue;
        }

        let parsed = parse_row(&row.fields).map_err(|kind| {
            warn!("CSV import aborted at line {}: {kind}", row.line);
            ImportError {
                line: row.line,
                imported,
                kind,
            }
        })?;

        if commit_row(store, parsed) {
            imported += 1;
        }
    }

    info!("Imported {imported} application record(s) from CSV");
    Ok(imported)
}

/// Creates the record, then pins its `last_update`. Returns false when the
/// record was deleted by another caller before the second step.
fn commit_row(store: &ApplicationStore, row: ImportRow) -> bool {
    let record = store.create(row.draft.clone());
    finish_row(store, record.id, row)
}

fn finish_row(store: &ApplicationStore, id: u64, row: ImportRow) -> bool {
    let committed = store.update(id, row.draft, Some(row.last_update)).is_some();
    if !committed {
        debug!("Application {id} was removed before its import finished; not counted");
    }
    committed
}

/// Columns: id,company,role,status,appliedOn,notes,lastUpdate
fn parse_row(fields: &[String]) -> Result<ImportRow, ImportErrorKind> {
    let status: Status = fields[3].parse()?;
    let applied_on = parse_date("appliedOn", &fields[4])?;
    let last_update = if fields[6].trim().is_empty() {
        applied_on
    } else {
        parse_date("lastUpdate", &fields[6])?
    };
    let notes = Some(fields[5].clone()).filter(|n| !n.is_empty());

    Ok(ImportRow {
        draft: ApplicationDraft {
            company: fields[1].clone(),
            role: fields[2].clone(),
            status,
            applied_on,
            notes,
        },
        last_update,
    })
}

fn parse_date(column: &'static str, value: &str) -> Result<NaiveDate, ImportErrorKind> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|source| ImportErrorKind::InvalidDate {
        column,
        value: value.to_string(),
        source,
    })
}
