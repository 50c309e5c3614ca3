//! Field value resolution: lookup, default substitution, format transforms.
//!
//! `resolve` is a pure function of the mapping and the row. Transform
//! failures never abort a row: the pre-transform value is kept and the
//! problem is reported as a note for the job log.

use crate::mapping::FieldMapping;
use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDate, NaiveDateTime};
use labelsmith_ingest::RowValues;

/// Input formats tried in order when parsing a cell as a date.
const DATE_INPUT_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d.%m.%Y",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%Y/%m/%d",
];

/// Input formats tried when the cell carries a time component.
const DATETIME_INPUT_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub value: String,
    /// Non-fatal issues encountered while resolving, for the job log.
    pub notes: Vec<String>,
}

impl Resolution {
    fn plain(value: String) -> Self {
        Self {
            value,
            notes: Vec::new(),
        }
    }
}

/// Resolves the final string for one field against one row.
///
/// Lookup by mapped column; empty or missing cells substitute the mapping's
/// default value (else the empty string). A `format` spec then transforms the
/// value; on any transform failure the untransformed value is returned with a
/// note explaining what went wrong.
pub fn resolve(mapping: &FieldMapping, row: &RowValues) -> Resolution {
    let raw = row
        .get(&mapping.column)
        .map(String::as_str)
        .unwrap_or("")
        .trim();
    let value = if raw.is_empty() {
        mapping.default_value.clone().unwrap_or_default()
    } else {
        raw.to_string()
    };

    let Some(format) = mapping.format.as_deref() else {
        return Resolution::plain(value);
    };
    if value.is_empty() {
        return Resolution::plain(value);
    }

    match apply_format(format, &value) {
        Ok(transformed) => Resolution::plain(transformed),
        Err(reason) => Resolution {
            value,
            notes: vec![format!(
                "format '{format}' failed for field '{}': {reason}",
                mapping.field
            )],
        },
    }
}

fn apply_format(spec: &str, value: &str) -> Result<String, String> {
    if let Some(pattern) = spec.strip_prefix("date:") {
        format_date(pattern, value)
    } else if let Some(num_spec) = spec.strip_prefix("number:") {
        format_number(num_spec, value)
    } else if let Some(template) = spec.strip_prefix("text:") {
        format_text(template, value)
    } else {
        Err("unknown format prefix".to_string())
    }
}

fn format_date(pattern: &str, value: &str) -> Result<String, String> {
    // Reject bad output patterns up front; a DelayedFormat over invalid
    // items fails at Display time.
    let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|i| matches!(i, Item::Error)) {
        return Err(format!("invalid date pattern '{pattern}'"));
    }

    let parsed: Option<NaiveDateTime> = DATETIME_INPUT_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(value, f).ok())
        .or_else(|| {
            DATE_INPUT_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(value, f).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        });
    let datetime = parsed.ok_or_else(|| format!("'{value}' is not a recognized date"))?;
    Ok(datetime.format_with_items(items.into_iter()).to_string())
}

/// Numeric format spec: optional `.<precision>` followed by one of
/// `f` (fixed), `e` (scientific), `%` (percentage) or `d` (integer).
fn format_number(spec: &str, value: &str) -> Result<String, String> {
    let number: f64 = value
        .trim()
        .replace(',', ".")
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;

    let (precision, kind) = parse_number_spec(spec)?;
    Ok(match kind {
        'f' => format!("{:.prec$}", number, prec = precision.unwrap_or(6)),
        'e' => format!("{:.prec$e}", number, prec = precision.unwrap_or(6)),
        '%' => format!("{:.prec$}%", number * 100.0, prec = precision.unwrap_or(6)),
        'd' => format!("{}", number.trunc() as i64),
        _ => unreachable!(),
    })
}

fn parse_number_spec(spec: &str) -> Result<(Option<usize>, char), String> {
    let Some(kind) = spec.chars().last() else {
        return Err("empty number spec".to_string());
    };
    if !matches!(kind, 'f' | 'e' | '%' | 'd') {
        return Err(format!("unsupported number spec '{spec}'"));
    }
    let head = &spec[..spec.len() - 1];
    if head.is_empty() {
        return Ok((None, kind));
    }
    let precision = head
        .strip_prefix('.')
        .and_then(|p| p.parse::<usize>().ok())
        .ok_or_else(|| format!("unsupported number spec '{spec}'"))?;
    Ok((Some(precision), kind))
}

fn format_text(template: &str, value: &str) -> Result<String, String> {
    if !template.contains("{value}") {
        return Err("text template has no {value} placeholder".to_string());
    }
    Ok(template.replace("{value}", value))
}
