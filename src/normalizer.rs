use chrono::NaiveDate;

use crate::error::{ImportError, Result};
use crate::models::Row;
use crate::settings::{Columns, ImportConfig};

fn field(row: &Row, column: usize, row_num: usize) -> Result<&str> {
    row.get(column)
        .map(|f| f.trim())
        .ok_or(ImportError::MissingColumn {
            row: row_num,
            column: column + 1,
        })
}

pub fn parse_date(raw: &str, format: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, format).map_err(|_| ImportError::InvalidDate {
        row: 0,
        value: raw.to_string(),
    })
}

/// `Ok(None)` for a blank date cell: the row is skipped, not the run.
pub fn extract_date(row: &Row, row_num: usize, config: &ImportConfig) -> Result<Option<NaiveDate>> {
    let raw = field(row, config.columns.date, row_num)?;
    if raw.is_empty() {
        return Ok(None);
    }
    parse_date(raw, &config.date_format)
        .map(Some)
        .map_err(|e| e.at_row(row_num))
}

/// Join the configured payee cells with single spaces. Columns past the end
/// of a short row are left out.
pub fn extract_raw_payee(row: &Row, row_num: usize, columns: &Columns) -> Result<String> {
    let payee = columns
        .payees
        .iter()
        .filter_map(|&idx| row.get(idx))
        .map(|f| f.trim())
        .collect::<Vec<_>>()
        .join(" ");
    if payee.is_empty() {
        return Err(ImportError::EmptyPayee { row: row_num });
    }
    Ok(payee)
}

pub fn parse_amount(raw: &str, decimal_comma: bool) -> Result<f64> {
    let cleaned: String = if decimal_comma {
        raw.replace(',', ".")
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
            .collect()
    } else {
        raw.to_string()
    };
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ImportError::InvalidAmount {
            row: 0,
            value: cleaned.clone(),
        })
}

pub fn extract_amount(row: &Row, row_num: usize, config: &ImportConfig) -> Result<f64> {
    let raw = field(row, config.columns.amount, row_num)?;
    parse_amount(raw, config.decimal_comma).map_err(|e| e.at_row(row_num))
}
