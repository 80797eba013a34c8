use domain::models::Record;
use rust_xlsxwriter::{DocProperties, ExcelDateTime, Format, Workbook};

use super::{ExportError, COLUMN_HEADERS};

pub const SHEET_NAME: &str = "User Records";

/// Creation date stamped into the workbook properties. A fixed value keeps
/// the output a pure function of the records.
const WORKBOOK_CREATED: (u16, u8, u8) = (2000, 1, 1);

/// Renders the records as a single-sheet workbook.
///
/// Row 0 holds the column headers, data starts at row 1 in input order.
/// Id and age are written as numbers, everything else as text.
pub fn render_spreadsheet(records: &[Record]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let (year, month, day) = WORKBOOK_CREATED;
    let created = ExcelDateTime::from_ymd(year, month, day)?;
    workbook.set_properties(&DocProperties::new().set_creation_datetime(&created));

    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, header) in (0u16..).zip(COLUMN_HEADERS) {
        worksheet.write_string_with_format(0, col, header, &header_format)?;
    }

    for (row, record) in (1u32..).zip(records) {
        worksheet.write_number(row, 0, f64::from(record.id))?;
        worksheet.write_string(row, 1, &record.name)?;
        worksheet.write_string(row, 2, &record.surname)?;
        worksheet.write_number(row, 3, f64::from(record.age))?;
        worksheet.write_string(row, 4, &record.phone_number)?;
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{open_workbook_from_rs, Data, Range, Reader, Xlsx};
    use std::io::Cursor;
    use std::thread;
    use std::time::Duration;

    fn record(id: i32, name: &str, surname: &str, age: i32, phone: &str) -> Record {
        Record {
            id,
            name: name.to_string(),
            surname: surname.to_string(),
            age,
            phone_number: phone.to_string(),
        }
    }

    fn read_sheet(bytes: Vec<u8>) -> (Vec<String>, Range<Data>) {
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
        let names = workbook.sheet_names().to_vec();
        let range = workbook.worksheet_range(SHEET_NAME).unwrap();
        (names, range)
    }

    #[test]
    fn test_sheet_name_and_headers() {
        let (names, range) = read_sheet(render_spreadsheet(&[]).unwrap());
        assert_eq!(names, vec!["User Records"]);
        assert_eq!(range.height(), 1);

        let headers: Vec<String> = range
            .rows()
            .next()
            .unwrap()
            .iter()
            .map(|c| c.to_string())
            .collect();
        assert_eq!(headers, vec!["ID", "Name", "Surname", "Age", "Phone Number"]);
    }

    #[test]
    fn test_rows_follow_input_order_with_numeric_cells() {
        let records = vec![
            record(7, "Ann", "Lee", 30, "555-1"),
            record(2, "Bo", "Kim", 41, "+1 (555) 000.2"),
        ];
        let (_, range) = read_sheet(render_spreadsheet(&records).unwrap());
        assert_eq!(range.height(), 3);

        assert_eq!(range.get((1, 0)), Some(&Data::Float(7.0)));
        assert_eq!(range.get((1, 1)), Some(&Data::String("Ann".to_string())));
        assert_eq!(range.get((1, 2)), Some(&Data::String("Lee".to_string())));
        assert_eq!(range.get((1, 3)), Some(&Data::Float(30.0)));
        assert_eq!(range.get((1, 4)), Some(&Data::String("555-1".to_string())));

        assert_eq!(range.get((2, 0)), Some(&Data::Float(2.0)));
        assert_eq!(
            range.get((2, 4)),
            Some(&Data::String("+1 (555) 000.2".to_string()))
        );
    }

    #[test]
    fn test_same_input_same_bytes() {
        let records = vec![
            record(1, "Ann", "Lee", 30, "555-1"),
            record(2, "Bo", "Kim", 41, "555-2"),
        ];
        let first = render_spreadsheet(&records).unwrap();
        // Cross a second boundary so a wall-clock timestamp would show up.
        thread::sleep(Duration::from_millis(1100));
        let second = render_spreadsheet(&records).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_different_input_different_bytes() {
        let first = render_spreadsheet(&[record(1, "Ann", "Lee", 30, "555-1")]).unwrap();
        let second = render_spreadsheet(&[record(1, "Ann", "Lee", 31, "555-1")]).unwrap();
        assert_ne!(first, second);
    }
}
