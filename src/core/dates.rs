//! Spanish date prose for certificates
//!
//! `15 de marzo de 2024` for dataset dates and
//! `a los 19 días del mes de octubre` for the issue date.

use crate::error::{ConstanciaError, ConstanciaResult};
use crate::types::CellValue;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

const MONTHS_ES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Spanish month name for `month` in 1..=12.
///
/// # Panics
///
/// Panics when `month` is outside 1..=12; chrono never produces such a month.
pub fn month_name(month: u32) -> &'static str {
    assert!(
        (1..=12).contains(&month),
        "month out of range: {}",
        month
    );
    MONTHS_ES[(month - 1) as usize]
}

/// `"{day} de {month} de {year}"`, or an empty string when there is no date
pub fn format_long_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => format!("{} de {} de {}", d.day(), month_name(d.month()), d.year()),
        None => String::new(),
    }
}

/// `"a los {day} días del mes de {month}"` for the given issue date
pub fn format_issue_date(today: NaiveDate) -> String {
    format!(
        "a los {} días del mes de {}",
        today.day(),
        month_name(today.month())
    )
}

/// Render a dataset date cell as long-form prose.
///
/// Blank cells give an empty string; anything that is not a date fails with
/// [`ConstanciaError::InvalidDate`].
pub fn format_cell_date(column: &str, cell: &CellValue) -> ConstanciaResult<String> {
    Ok(format_long_date(cell_to_date(column, cell)?))
}

/// Interpret a cell as a calendar date
pub fn cell_to_date(column: &str, cell: &CellValue) -> ConstanciaResult<Option<NaiveDate>> {
    let invalid = || ConstanciaError::InvalidDate {
        column: column.to_string(),
        value: cell.render(),
    };

    match cell {
        CellValue::Empty => Ok(None),
        CellValue::Date(dt) => Ok(Some(dt.date())),
        CellValue::Number(serial) => excel_serial_to_date(*serial).map(Some).ok_or_else(invalid),
        CellValue::Text(s) if s.trim().is_empty() => Ok(None),
        CellValue::Text(s) => parse_date_text(s.trim()).map(Some).ok_or_else(invalid),
        CellValue::Bool(_) => Err(invalid()),
    }
}

/// Accepts `YYYY-MM-DD` (optionally followed by a time) and `DD/MM/YYYY`
pub fn parse_date_text(text: &str) -> Option<NaiveDate> {
    if let Ok(d) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(d);
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(text, "%d/%m/%Y").ok()
}

/// Excel 1900 date system, serial 1 = 1900-01-01 (with the 1900 leap-year bug)
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    excel_serial_to_datetime(serial).map(|dt| dt.date())
}

/// Serial date with the fractional part read as time of day
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || !(1.0..=2_958_465.0).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let days = serial.trunc() as i64;
    let seconds = (serial.fract() * 86_400.0).round() as i64;
    epoch
        .checked_add_signed(Duration::days(days))?
        .checked_add_signed(Duration::seconds(seconds))
}
