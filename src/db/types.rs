//! SQL Server value rendering.
//!
//! Every cell returned to a client is plain text. This module turns tiberius
//! column data into that text:
//!
//! - NULL becomes `NULL`
//! - numbers use their natural decimal form (DECIMAL/NUMERIC exactly, no float rounding)
//! - binary data is base64 encoded
//! - date/time values go through chrono

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use tiberius::{ColumnData, FromSql, Row};

/// Text used for NULL cells.
pub const NULL_TEXT: &str = "NULL";

/// Render every cell of a row, in column order.
pub fn row_to_strings(row: &Row) -> Vec<String> {
    row.cells()
        .map(|(_column, data)| cell_to_string(data))
        .collect()
}

/// Render a single cell.
pub fn cell_to_string(data: &ColumnData<'static>) -> String {
    temporal_text(data)
        .or_else(|| column_text(data))
        .unwrap_or_else(|| NULL_TEXT.to_string())
}

/// Text for date/time column data. DATETIMEOFFSET keeps its stored offset.
fn temporal_text(data: &ColumnData<'static>) -> Option<String> {
    match data {
        ColumnData::DateTime(Some(_))
        | ColumnData::SmallDateTime(Some(_))
        | ColumnData::DateTime2(Some(_)) => NaiveDateTime::from_sql(data)
            .ok()
            .flatten()
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S%.f").to_string()),
        ColumnData::DateTimeOffset(Some(_)) => DateTime::<FixedOffset>::from_sql(data)
            .ok()
            .flatten()
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S%.f%:z").to_string()),
        ColumnData::Date(Some(_)) => NaiveDate::from_sql(data)
            .ok()
            .flatten()
            .map(|d| d.format("%Y-%m-%d").to_string()),
        ColumnData::Time(Some(_)) => NaiveTime::from_sql(data)
            .ok()
            .flatten()
            .map(|t| t.format("%H:%M:%S%.f").to_string()),
        _ => None,
    }
}

/// Text for non-temporal column data. None for NULL and unsupported types.
pub fn column_text(data: &ColumnData<'_>) -> Option<String> {
    match data {
        ColumnData::Bit(Some(b)) => Some(b.to_string()),
        ColumnData::U8(Some(v)) => Some(v.to_string()),
        ColumnData::I16(Some(v)) => Some(v.to_string()),
        ColumnData::I32(Some(v)) => Some(v.to_string()),
        ColumnData::I64(Some(v)) => Some(v.to_string()),
        ColumnData::F32(Some(v)) => Some(v.to_string()),
        ColumnData::F64(Some(v)) => Some(v.to_string()),
        ColumnData::Numeric(Some(n)) => Some(format_numeric(n.value(), n.scale())),
        ColumnData::String(Some(s)) => Some(s.to_string()),
        ColumnData::Guid(Some(g)) => Some(g.to_string()),
        ColumnData::Binary(Some(b)) => Some(BASE64_STANDARD.encode(b)),
        ColumnData::Xml(Some(xml)) => Some(xml.to_string()),
        _ => None,
    }
}

/// Exact decimal rendering of a scaled integer (`value * 10^-scale`).
pub fn format_numeric(value: i128, scale: u8) -> String {
    let sign = if value < 0 { "-" } else { "" };
    let digits = value.unsigned_abs().to_string();
    let scale = scale as usize;

    if scale == 0 {
        return format!("{}{}", sign, digits);
    }

    let padded = if digits.len() <= scale {
        format!("{:0>width$}", digits, width = scale + 1)
    } else {
        digits
    };
    let (integer, fraction) = padded.split_at(padded.len() - scale);
    format!("{}{}.{}", sign, integer, fraction)
}
