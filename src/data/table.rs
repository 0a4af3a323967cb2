//! Table helpers
//! Defensive column access on Polars DataFrames. Uploaded exports carry no
//! schema guarantee, so every accessor tolerates absent columns.

use polars::prelude::*;
use std::collections::HashSet;

/// True when the table has a column with this exact name.
pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.column(name).is_ok()
}

/// True for integer and float dtypes.
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// True when the column exists and holds numbers.
pub fn is_numeric_column(df: &DataFrame, name: &str) -> bool {
    df.column(name)
        .map(|col| is_numeric_dtype(col.dtype()))
        .unwrap_or(false)
}

/// Names of the numeric columns, in table order.
pub fn numeric_columns(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| is_numeric_dtype(col.dtype()))
        .map(|col| col.name().to_string())
        .collect()
}

/// Column values as text, one entry per row (`None` for nulls).
/// Returns `None` when the column is absent.
pub fn text_values(df: &DataFrame, name: &str) -> Option<Vec<Option<String>>> {
    let column = df.column(name).ok()?;
    let as_text = column.cast(&DataType::String).ok()?;
    let ca = as_text.str().ok()?;
    Some(ca.into_iter().map(|v| v.map(str::to_string)).collect())
}

/// Column values as floats, one entry per row. Nulls and values that cannot
/// be read as numbers become `None`. Returns `None` when the column is absent
/// or has a non-numeric dtype.
pub fn numeric_values(df: &DataFrame, name: &str) -> Option<Vec<Option<f64>>> {
    let column = df.column(name).ok()?;
    if !is_numeric_dtype(column.dtype()) {
        return None;
    }
    let value_f64 = column.cast(&DataType::Float64).ok()?;
    let ca = value_f64.f64().ok()?;
    Some(ca.into_iter().map(|v| v.filter(|x| !x.is_nan())).collect())
}

/// Non-null numeric values of a column, in row order.
pub fn present_values(df: &DataFrame, name: &str) -> Vec<f64> {
    numeric_values(df, name)
        .map(|vals| vals.into_iter().flatten().collect())
        .unwrap_or_default()
}

/// Distinct non-null values of a column, in order of first appearance.
pub fn unique_values(df: &DataFrame, name: &str) -> Vec<String> {
    let Some(values) = text_values(df, name) else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    values
        .into_iter()
        .flatten()
        .filter(|v| seen.insert(v.clone()))
        .collect()
}

/// Render a single cell for display.
pub fn format_cell(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => "None".to_string(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Float64(v) => format_float(*v),
        AnyValue::Float32(v) => format_float(*v as f64),
        other => other.to_string().trim_matches('"').to_string(),
    }
}

/// Fixed six-decimal rendering, trimmed of trailing zeros.
pub fn format_float(v: f64) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    let formatted = format!("{:.6}", v);
    let trimmed = formatted.trim_end_matches('0');
    if trimmed.ends_with('.') {
        format!("{}0", trimmed)
    } else {
        trimmed.to_string()
    }
}
