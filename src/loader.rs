//! Workbook loading: fetch the source, parse it

use crate::error::SieveResult;
use crate::excel::LoadedWorkbook;
use crate::source::Source;
use tracing::info;

/// Fetch and parse the workbook at `source`.
///
/// Blocking; run it on `spawn_blocking` from async code.
pub fn load(source: &Source) -> SieveResult<LoadedWorkbook> {
    let bytes = source.fetch()?;
    let workbook = LoadedWorkbook::from_bytes(bytes)?;
    info!(
        %source,
        sheets = workbook.sheet_names().len(),
        primary = workbook.primary_sheet(),
        "workbook loaded"
    );
    Ok(workbook)
}
