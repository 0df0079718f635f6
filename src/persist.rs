use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::Workbook;
use tracing::{debug, info};

use crate::parse::{Field, Record};

/// What one pass of the gate did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Digest differed (or no prior digest existed): both artifacts rewritten.
    Updated,
    /// Digest matched: nothing touched.
    Unchanged,
}

/// Read the sidecar digest. An absent file is "no prior digest", not an error.
pub fn read_stored_digest(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text.trim().to_string())),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("reading digest file {}", path.display())),
    }
}

pub fn write_stored_digest(path: &Path, digest: &str) -> Result<()> {
    fs::write(path, digest)
        .with_context(|| format!("writing digest file {}", path.display()))
}

/// Overwrite the spreadsheet artifact: one sheet, header row with the eight
/// field names in fixed order, one row per record.
pub fn write_spreadsheet(path: &Path, records: &[Record]) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, field) in Field::ALL.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, field.name())
            .context("writing spreadsheet header")?;
    }
    for (row, record) in records.iter().enumerate() {
        for (col, value) in record.values().iter().enumerate() {
            worksheet
                .write_string(row as u32 + 1, col as u16, *value)
                .context("writing spreadsheet row")?;
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("saving spreadsheet {}", path.display()))?;
    debug!(path = %path.display(), rows = records.len(), "spreadsheet written");
    Ok(())
}

/// Compare `digest` to the stored one and rewrite both artifacts when they
/// differ. The spreadsheet is written before the sidecar, so a failure
/// between the two leaves a stale digest and the next run rewrites again
/// rather than skipping.
pub fn apply(
    excel_path: &Path,
    hash_path: &Path,
    records: &[Record],
    digest: &str,
) -> Result<Outcome> {
    let stored = read_stored_digest(hash_path)?;
    if stored.as_deref() == Some(digest) {
        return Ok(Outcome::Unchanged);
    }

    write_spreadsheet(excel_path, records)?;
    write_stored_digest(hash_path, digest)?;
    info!(path = %excel_path.display(), rows = records.len(), "spreadsheet updated");
    Ok(Outcome::Updated)
}
