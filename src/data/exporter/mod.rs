use crate::data::{Month, MonthSheet, YearStore};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook};
use std::ops::RangeInclusive;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportErr {
    #[error("Month range must stay between 1 and 12: {0}..={1}")]
    InvalidRange(u32, u32),
    #[error("Failed to write spreadsheet: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

pub type ExportResult<T> = Result<T, ExportErr>;

/// Data slots per sheet. Sessions beyond this are dropped from the
/// export with a logged warning.
pub const MAX_SESSIONS_PER_SHEET: usize = 25;

const TITLES: [&str; 4] = ["Datum", "Začátek práce", "Hodiny", "Popis práce"];
const TOTAL_LABEL: &str = "Celkový počet hodin: ";

const TITLE_ROW: u32 = 0;
const HEADER_ROW: u32 = 1;
const FIRST_DATA_ROW: u32 = 2;
const FORMULA_ROW: u32 = 28;

pub struct XlsxExporter;

impl XlsxExporter {
    /// Writes one sheet for the given month.
    pub fn export_month(store: &YearStore, path: &Path, month: u32) -> ExportResult<()> {
        Self::export(store, path, month..=month)
    }

    /// Writes one sheet per month of the inclusive range.
    pub fn export(store: &YearStore, path: &Path, months: RangeInclusive<u32>) -> ExportResult<()> {
        let mut workbook = Self::render(store, months)?;
        workbook.save(path)?;
        log::info!("Exported {} to {}", store.year(), path.display());
        Ok(())
    }

    pub(crate) fn render(store: &YearStore, months: RangeInclusive<u32>) -> ExportResult<Workbook> {
        let (start, end) = (*months.start(), *months.end());
        if start < 1 || end > 12 || start > end {
            return Err(ExportErr::InvalidRange(start, end));
        }

        let styles = SheetStyles::new();
        let mut workbook = Workbook::new();
        for number in months {
            let month = Month::new(number).expect("validated above");
            write_month_sheet(&mut workbook, month, store.month(month), &styles)?;
        }

        Ok(workbook)
    }
}

fn write_month_sheet(
    workbook: &mut Workbook,
    month: Month,
    sheet_data: &MonthSheet,
    styles: &SheetStyles,
) -> ExportResult<()> {
    let sheet = workbook.add_worksheet();
    sheet.set_name(month.name_cz())?;
    sheet.set_landscape();
    sheet.set_print_fit_to_pages(1, 1);
    sheet.set_print_center_horizontally(true);

    // Title: month name across the four columns.
    sheet.set_row_height(TITLE_ROW, 45)?;
    sheet.merge_range(TITLE_ROW, 0, TITLE_ROW, 3, month.name_cz(), &styles.title)?;

    sheet.set_row_height(HEADER_ROW, 40)?;
    for (column, title) in TITLES.iter().enumerate() {
        sheet.write_string_with_format(HEADER_ROW, column as u16, *title, &styles.header)?;
    }

    if sheet_data.len() > MAX_SESSIONS_PER_SHEET {
        log::warn!(
            "Month {} has {} sessions, exporting only the first {}",
            month,
            sheet_data.len(),
            MAX_SESSIONS_PER_SHEET
        );
    }

    // The data region is a fixed 25 slots; unused cells stay blank but
    // keep their borders.
    for slot in 0..MAX_SESSIONS_PER_SHEET {
        let row = FIRST_DATA_ROW + slot as u32;
        match sheet_data.get(slot) {
            Some(session) => {
                let date = session.begin_date;
                let date_text = format!(
                    "{:02}. {}. {}",
                    date.day_of_month(),
                    date.month(),
                    date.year()
                );
                sheet.write_string_with_format(row, 0, &date_text, &styles.data)?;
                sheet.write_string_with_format(
                    row,
                    1,
                    &session.begin_time.to_string(),
                    &styles.data,
                )?;
                sheet.write_number_with_format(
                    row,
                    2,
                    session.duration.hours_rounded(),
                    &styles.hours,
                )?;
                sheet.write_string_with_format(row, 3, &session.description, &styles.description)?;
            }
            None => {
                sheet.write_blank(row, 0, &styles.data)?;
                sheet.write_blank(row, 1, &styles.data)?;
                sheet.write_blank(row, 2, &styles.hours)?;
                sheet.write_blank(row, 3, &styles.description)?;
            }
        }
    }

    sheet.write_string_with_format(FORMULA_ROW, 0, TOTAL_LABEL, &styles.total_label)?;
    sheet.write_formula_with_format(FORMULA_ROW, 1, "SUM(C3:C27)", &styles.total_formula)?;

    sheet.set_column_width(0, 30)?;
    sheet.set_column_width(3, 90)?;

    Ok(())
}

struct SheetStyles {
    title: Format,
    header: Format,
    data: Format,
    hours: Format,
    description: Format,
    total_label: Format,
    total_formula: Format,
}

impl SheetStyles {
    fn new() -> SheetStyles {
        let bordered = Format::new()
            .set_border(FormatBorder::Thin)
            .set_border_color(Color::Black);

        let title = bordered
            .clone()
            .set_font_size(18)
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter);

        let header = bordered
            .clone()
            .set_font_size(11)
            .set_font_color(Color::White)
            .set_background_color(Color::RGB(0x808080))
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_text_wrap();

        let data = bordered
            .clone()
            .set_font_size(10)
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_text_wrap();

        let hours = data.clone().set_num_format("0.#");

        let description = bordered
            .clone()
            .set_font_size(10)
            .set_align(FormatAlign::Left)
            .set_align(FormatAlign::VerticalCenter);

        let total_label = data.clone().set_bold();
        let total_formula = data.clone().set_italic().set_num_format("0.##");

        SheetStyles {
            title,
            header,
            data,
            hours,
            description,
            total_label,
            total_formula,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::data::{Day, WorkSession};
    use crate::parsing::duration::DurationMin;
    use crate::parsing::time::Time;

    fn store_with_sessions(month: u32, count: usize) -> YearStore {
        let mut store = YearStore::new(2022);
        let sheet = store.month_mut(Month::new(month).unwrap());
        for i in 0..count {
            sheet.push(WorkSession {
                begin_date: Day::ymd(2022, month, (i % 28) as u32 + 1),
                begin_time: Time::hm(8, 0),
                duration: DurationMin::new(90),
                description: format!("session {}", i),
                hourly_wage: 0,
            });
        }
        store
    }

    fn render_to_bytes(store: &YearStore, months: RangeInclusive<u32>) -> Vec<u8> {
        let mut workbook = XlsxExporter::render(store, months).unwrap();
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn rejects_invalid_ranges() {
        let store = YearStore::new(2022);
        assert!(matches!(
            XlsxExporter::render(&store, 0..=3),
            Err(ExportErr::InvalidRange(0, 3))
        ));
        assert!(matches!(
            XlsxExporter::render(&store, 1..=13),
            Err(ExportErr::InvalidRange(1, 13))
        ));
        assert!(matches!(
            XlsxExporter::render(&store, 8..=3),
            Err(ExportErr::InvalidRange(8, 3))
        ));
    }

    #[test]
    fn empty_month_renders() {
        let store = YearStore::new(2022);
        let bytes = render_to_bytes(&store, 2..=2);
        // xlsx is a zip container
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn over_capacity_month_renders() {
        let store = store_with_sessions(3, MAX_SESSIONS_PER_SHEET + 1);
        let bytes = render_to_bytes(&store, 3..=3);
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn full_year_renders() {
        let store = store_with_sessions(1, 3);
        let bytes = render_to_bytes(&store, 1..=12);
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn export_writes_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("2022.xlsx");
        let store = store_with_sessions(6, 4);
        XlsxExporter::export_month(&store, &path, 6).unwrap();
        let written = std::fs::metadata(&path).unwrap();
        assert!(written.len() > 0);
    }
}
