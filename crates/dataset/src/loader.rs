//! Tabular loader for campaign performance tables.
//!
//! Accepts comma- or tab-separated text, or an Excel workbook (.xlsx),
//! with a header row naming the nine required base columns
//! (case-sensitive, order-insensitive). Extra columns are ignored.
//! Every cell is validated on the way in so the rest of the pipeline
//! can assume well-formed records.

use calamine::{Data, Reader, Xlsx};
use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use tracker_core::{CampaignRecord, TrackerError, TrackerResult};
use tracing::debug;

/// The base columns every uploaded table must carry, by exact name.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "Date",
    "Platform",
    "Campaign",
    "Impressions",
    "Clicks",
    "Spend",
    "Conversions",
    "Revenue",
    "Engagements",
];

/// Date formats accepted for the `Date` column. ISO date-times are also
/// accepted; only the date part is kept.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// ZIP local-file signature; an .xlsx workbook is a ZIP archive.
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4b, 0x03, 0x04];

/// Load campaign records from raw upload bytes. A ZIP signature routes
/// to the spreadsheet reader; anything else must be UTF-8 delimited
/// text. Other binary payloads are rejected up front.
pub fn load_bytes(bytes: &[u8]) -> TrackerResult<Vec<CampaignRecord>> {
    if bytes.starts_with(&ZIP_MAGIC) {
        return load_xlsx(bytes);
    }
    let text = std::str::from_utf8(bytes).map_err(|_| {
        TrackerError::Format(
            "input is not UTF-8 text; upload a CSV, TSV, or XLSX export".to_string(),
        )
    })?;
    load_str(text)
}

/// Load campaign records from a file on disk.
pub fn load_path(path: &str) -> TrackerResult<Vec<CampaignRecord>> {
    let bytes = std::fs::read(path)?;
    load_bytes(&bytes)
}

/// Parse delimited text into campaign records.
pub fn load_str(text: &str) -> TrackerResult<Vec<CampaignRecord>> {
    let header_line = text
        .lines()
        .next()
        .ok_or_else(|| TrackerError::Format("input is empty".to_string()))?;

    // Delimiter is sniffed from the header line: tab wins if present,
    // comma otherwise.
    let delimiter = if header_line.contains('\t') { b'\t' } else { b',' };

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(|c| c.to_string()).collect());
    }

    records_from_rows(&headers, rows)
}

/// Parse the first worksheet of an Excel workbook into campaign
/// records. Cells are rendered to text and validated exactly like
/// delimited-text cells.
fn load_xlsx(bytes: &[u8]) -> TrackerResult<Vec<CampaignRecord>> {
    let mut workbook = Xlsx::new(std::io::Cursor::new(bytes)).map_err(|e| {
        TrackerError::Format(format!("not a readable XLSX workbook: {e}"))
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| TrackerError::Format("workbook has no worksheets".to_string()))?
        .map_err(|e| TrackerError::Format(format!("failed to read worksheet: {e}")))?;

    let mut sheet_rows = range.rows();
    let headers: Vec<String> = sheet_rows
        .next()
        .ok_or_else(|| TrackerError::Format("worksheet is empty".to_string()))?
        .iter()
        .map(|c| sheet_cell(c).trim().to_string())
        .collect();

    let rows: Vec<Vec<String>> = sheet_rows
        .map(|row| row.iter().map(sheet_cell).collect())
        .collect();

    records_from_rows(&headers, rows)
}

/// Render one spreadsheet cell as text. Whole-number floats drop the
/// fraction so count columns survive Excel's numeric storage; date
/// cells come out in a format the date parser accepts.
fn sheet_cell(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{e:?}"),
    }
}

/// Validate headers and cells, shared by every input format.
fn records_from_rows(
    headers: &[String],
    rows: Vec<Vec<String>>,
) -> TrackerResult<Vec<CampaignRecord>> {
    // Map each required column to its position, collecting every absentee
    // so the error names all of them at once.
    let mut indices = [0usize; REQUIRED_COLUMNS.len()];
    let mut missing = Vec::new();
    for (slot, name) in REQUIRED_COLUMNS.iter().enumerate() {
        match headers.iter().position(|h| h == name) {
            Some(idx) => indices[slot] = idx,
            None => missing.push(name.to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(TrackerError::Schema { missing });
    }

    let [date_idx, platform_idx, campaign_idx, impressions_idx, clicks_idx, spend_idx, conversions_idx, revenue_idx, engagements_idx] =
        indices;

    let mut records = Vec::new();
    for (row, cells) in rows.iter().enumerate() {
        // Header is row 1 as users see it in an editor.
        let line = row + 2;

        records.push(CampaignRecord {
            date: parse_date(cell(cells, date_idx, line, "Date")?, line)?,
            platform: non_empty(cell(cells, platform_idx, line, "Platform")?, line, "Platform")?,
            campaign: non_empty(cell(cells, campaign_idx, line, "Campaign")?, line, "Campaign")?,
            impressions: parse_count(cell(cells, impressions_idx, line, "Impressions")?, line, "Impressions")?,
            clicks: parse_count(cell(cells, clicks_idx, line, "Clicks")?, line, "Clicks")?,
            spend: parse_money(cell(cells, spend_idx, line, "Spend")?, line, "Spend")?,
            conversions: parse_count(cell(cells, conversions_idx, line, "Conversions")?, line, "Conversions")?,
            revenue: parse_money(cell(cells, revenue_idx, line, "Revenue")?, line, "Revenue")?,
            engagements: parse_count(cell(cells, engagements_idx, line, "Engagements")?, line, "Engagements")?,
        });
    }

    debug!(rows = records.len(), "Parsed campaign dataset");
    Ok(records)
}

fn cell<'a>(
    cells: &'a [String],
    idx: usize,
    line: usize,
    column: &str,
) -> TrackerResult<&'a str> {
    cells.get(idx).map(|c| c.trim()).ok_or_else(|| {
        TrackerError::Format(format!("row {line}: missing value for column '{column}'"))
    })
}

fn non_empty(value: &str, line: usize, column: &str) -> TrackerResult<String> {
    if value.is_empty() {
        return Err(TrackerError::Format(format!(
            "row {line}: column '{column}' is empty"
        )));
    }
    Ok(value.to_string())
}

fn parse_date(value: &str, line: usize) -> TrackerResult<NaiveDate> {
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Ok(date);
        }
    }
    // ISO-8601 date-times: keep the date part.
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(dt.date());
        }
    }
    Err(TrackerError::Format(format!(
        "row {line}: column 'Date' value '{value}' is not a recognized date"
    )))
}

fn parse_count(value: &str, line: usize, column: &str) -> TrackerResult<u64> {
    value.parse::<u64>().map_err(|_| {
        TrackerError::Format(format!(
            "row {line}: column '{column}' value '{value}' is not a non-negative integer"
        ))
    })
}

fn parse_money(value: &str, line: usize, column: &str) -> TrackerResult<f64> {
    let parsed = value.parse::<f64>().map_err(|_| {
        TrackerError::Format(format!(
            "row {line}: column '{column}' value '{value}' is not a number"
        ))
    })?;
    if !parsed.is_finite() || parsed < 0.0 {
        return Err(TrackerError::Format(format!(
            "row {line}: column '{column}' value '{value}' must be a non-negative amount"
        )));
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_CSV: &str = "\
Date,Platform,Campaign,Impressions,Clicks,Spend,Conversions,Revenue,Engagements
2025-01-01,Facebook,Winter Sale,12000,500,100,20,400,800
2025-01-02,Instagram,Winter Sale,15000,700,120,25,500,1000";

    /// Two-row workbook with the same content as VALID_CSV, first
    /// worksheet only, inline strings.
    const VALID_XLSX: &[u8] = include_bytes!("../testdata/campaign.xlsx");

    #[test]
    fn test_parses_valid_csv() {
        let records = load_str(VALID_CSV).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].platform, "Facebook");
        assert_eq!(records[0].impressions, 12000);
        assert_eq!(records[1].date, NaiveDate::from_ymd_opt(2025, 1, 2).unwrap());
        assert_eq!(records[1].spend, 120.0);
    }

    #[test]
    fn test_parses_tab_delimited() {
        let tsv = VALID_CSV.replace(',', "\t");
        let records = load_str(&tsv).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].platform, "Instagram");
    }

    #[test]
    fn test_parses_xlsx_workbook() {
        let records = load_bytes(VALID_XLSX).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].platform, "Facebook");
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(records[0].impressions, 12000);
        assert_eq!(records[1].platform, "Instagram");
        assert_eq!(records[1].spend, 120.0);
        assert_eq!(records[1].engagements, 1000);
    }

    #[test]
    fn test_xlsx_matches_csv_of_same_table() {
        let from_sheet = load_bytes(VALID_XLSX).unwrap();
        let from_text = load_str(VALID_CSV).unwrap();
        assert_eq!(from_sheet, from_text);
    }

    #[test]
    fn test_corrupt_zip_payload_is_format_error() {
        let bytes = [0x50, 0x4b, 0x03, 0x04, 0xff, 0xfe, 0x00, 0x80];
        assert!(matches!(load_bytes(&bytes), Err(TrackerError::Format(_))));
    }

    #[test]
    fn test_columns_are_order_insensitive_and_extras_ignored() {
        let csv = "\
Platform,Date,Campaign,Clicks,Impressions,Spend,Conversions,Revenue,Engagements,Notes
Facebook,2025-01-01,Winter Sale,500,12000,100,20,400,800,ignore me";
        let records = load_str(csv).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].clicks, 500);
        assert_eq!(records[0].impressions, 12000);
    }

    #[test]
    fn test_schema_error_names_every_missing_column() {
        let csv = "Date,Platform,Clicks\n2025-01-01,Facebook,500";
        let err = load_str(csv).unwrap_err();
        match err {
            TrackerError::Schema { missing } => {
                assert_eq!(
                    missing,
                    vec![
                        "Campaign",
                        "Impressions",
                        "Spend",
                        "Conversions",
                        "Revenue",
                        "Engagements"
                    ]
                );
            }
            other => panic!("expected Schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_date_formats_normalize_equal() {
        let expected = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        for value in ["2025-01-05", "2025/01/05", "01/05/2025", "2025-01-05T10:30:00"] {
            assert_eq!(parse_date(value, 2).unwrap(), expected, "format: {value}");
        }
    }

    #[test]
    fn test_bad_cell_reports_row_and_column() {
        let csv = "\
Date,Platform,Campaign,Impressions,Clicks,Spend,Conversions,Revenue,Engagements
2025-01-01,Facebook,Winter Sale,not-a-number,500,100,20,400,800";
        let err = load_str(csv).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("row 2"), "{message}");
        assert!(message.contains("Impressions"), "{message}");
    }

    #[test]
    fn test_negative_spend_rejected() {
        let csv = "\
Date,Platform,Campaign,Impressions,Clicks,Spend,Conversions,Revenue,Engagements
2025-01-01,Facebook,Winter Sale,12000,500,-100,20,400,800";
        assert!(matches!(load_str(csv), Err(TrackerError::Format(_))));
    }

    #[test]
    fn test_binary_payload_rejected() {
        let bytes = [0xd0, 0xcf, 0x11, 0xe0, 0xff, 0xfe, 0x00, 0x80];
        assert!(matches!(load_bytes(&bytes), Err(TrackerError::Format(_))));
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(matches!(load_str(""), Err(TrackerError::Format(_))));
    }

    #[test]
    fn test_sheet_cell_rendering() {
        assert_eq!(sheet_cell(&Data::Int(12000)), "12000");
        assert_eq!(sheet_cell(&Data::Float(12000.0)), "12000");
        assert_eq!(sheet_cell(&Data::Float(99.5)), "99.5");
        assert_eq!(sheet_cell(&Data::String("Facebook".to_string())), "Facebook");
        assert_eq!(sheet_cell(&Data::Empty), "");
    }
}
