use csv::{Terminator, WriterBuilder};

use super::{ExportError, TallyReport, HEADERS};

/// Render `report` as CSV with CRLF line endings.
///
/// The summary row has two fields, so the writer runs in flexible mode.
pub(super) fn render_csv(report: &TallyReport) -> Result<Vec<u8>, ExportError> {
    let mut wtr = WriterBuilder::new()
        .flexible(true)
        .terminator(Terminator::CRLF)
        .from_writer(Vec::new());

    wtr.write_record(HEADERS)?;

    for row in &report.rows {
        wtr.write_record(row.cells())?;
    }

    wtr.write_record([
        report.total_label.clone(),
        format!("{} interactions", report.rows.len()),
    ])?;

    wtr.into_inner()
        .map_err(|e| ExportError::Render(e.to_string()))
}
