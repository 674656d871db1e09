use std::borrow::Cow;

use rust_xlsxwriter::{Color, Format, FormatBorder, FormatPattern, Workbook};
use unicode_width::UnicodeWidthStr;

use super::{ExportError, TallyReport, HEADERS};

const SHEET_NAME: &str = "Tallies";

/// Excel rejects string cells longer than this many characters
const MAX_CELL_CHARS: usize = 32_767;

const MAX_COLUMN_WIDTH: usize = 80;

/// Render `report` as a single-sheet workbook with a styled, frozen header
pub(super) fn render_xlsx(report: &TallyReport) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0xFFFFFF))
        .set_background_color(Color::RGB(0x2F75B5))
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);
    let cell_format = Format::new().set_border(FormatBorder::Thin);
    let total_format = Format::new().set_bold().set_border(FormatBorder::Thin);

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet.write_with_format(0, col as u16, *header, &header_format)?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    let mut col_widths: Vec<usize> = HEADERS.iter().map(|h| UnicodeWidthStr::width(*h)).collect();

    for (index, row) in report.rows.iter().enumerate() {
        let r = (index + 1) as u32;

        worksheet.write_with_format(r, 0, row.id as f64, &cell_format)?;
        col_widths[0] = col_widths[0].max(UnicodeWidthStr::width(row.id.to_string().as_str()));

        for (col, value) in row.cells().iter().enumerate().skip(1) {
            let text = cell_text(value);
            worksheet.write_with_format(r, col as u16, &*text, &cell_format)?;
            col_widths[col] = col_widths[col].max(UnicodeWidthStr::width(&*text));
        }
    }

    let total_row = (report.rows.len() + 1) as u32;
    worksheet.write_with_format(total_row, 0, report.total_label.as_str(), &total_format)?;
    worksheet.write_with_format(total_row, 1, report.rows.len() as f64, &total_format)?;
    col_widths[0] = col_widths[0].max(UnicodeWidthStr::width(report.total_label.as_str()));

    for (col, width) in col_widths.iter().enumerate() {
        worksheet.set_column_width(col as u16, (*width).min(MAX_COLUMN_WIDTH) as f64 + 2.0)?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// Clip free text to what a single cell can hold; CSV keeps the full value
fn cell_text(value: &str) -> Cow<'_, str> {
    match value.char_indices().nth(MAX_CELL_CHARS) {
        Some((cut, _)) => Cow::Owned(value[..cut].to_string()),
        None => Cow::Borrowed(value),
    }
}
