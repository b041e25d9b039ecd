//! Built-in processors: date, upper, lower, capitalize, currency, number
//!
//! Each processor here is fallible; the registry wraps them so a failure
//! returns the input unchanged.

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::config::{CurrencyDefaults, DateDefaults, NumberDefaults};
use crate::error::ProcessorError;

use super::locale;

/// Upper bound for decimal places in `number`
pub const MAX_DECIMALS: usize = 20;

/// Naive layouts tried in order after RFC 3339 / RFC 2822
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];
const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y"];

/// Non-empty positional argument
fn arg(args: Option<&[String]>, index: usize) -> Option<&str> {
    args.and_then(|a| a.get(index))
        .map(String::as_str)
        .filter(|s| !s.is_empty())
}

/// Positional argument, kept even when empty
fn raw_arg(args: Option<&[String]>, index: usize) -> Option<&str> {
    args.and_then(|a| a.get(index)).map(String::as_str)
}

// ─────────────────────────────────────────────────────────────
// date
// ─────────────────────────────────────────────────────────────

pub fn date(
    value: &str,
    args: Option<&[String]>,
    defaults: &DateDefaults,
) -> Result<String, ProcessorError> {
    let pattern = arg(args, 0).unwrap_or(&defaults.format);
    let parsed = parse_datetime(value)?;
    format_datetime(&parsed, pattern)
}

/// Accepts RFC 3339, RFC 2822, common naive layouts, Unix seconds and
/// `now`/`today`. Naive values are taken as UTC.
pub fn parse_datetime(value: &str) -> Result<DateTime<FixedOffset>, ProcessorError> {
    let value = value.trim();
    let invalid = || ProcessorError::InvalidDate {
        value: value.to_string(),
    };

    match value.to_ascii_lowercase().as_str() {
        "now" => {
            let now = Local::now();
            return Ok(now.with_timezone(now.offset()));
        }
        "today" => {
            let now = Local::now();
            let midnight = now
                .date_naive()
                .and_hms_opt(0, 0, 0)
                .and_then(|ndt| now.offset().from_local_datetime(&ndt).single())
                .ok_or_else(invalid)?;
            return Ok(midnight);
        }
        _ => {}
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Ok(dt);
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Ok(as_utc(ndt));
        }
    }
    for fmt in NAIVE_DATE_FORMATS {
        if let Ok(nd) = NaiveDate::parse_from_str(value, fmt) {
            let ndt = nd.and_hms_opt(0, 0, 0).ok_or_else(invalid)?;
            return Ok(as_utc(ndt));
        }
    }
    if let Ok(secs) = value.parse::<i64>() {
        return Utc
            .timestamp_opt(secs, 0)
            .single()
            .map(Into::into)
            .ok_or_else(invalid);
    }

    Err(invalid())
}

fn as_utc(ndt: NaiveDateTime) -> DateTime<FixedOffset> {
    Utc.from_utc_datetime(&ndt).into()
}

/// strftime pattern without unknown specifiers
pub fn is_valid_date_pattern(pattern: &str) -> bool {
    StrftimeItems::new(pattern).all(|item| !matches!(item, Item::Error))
}

fn format_datetime(dt: &DateTime<FixedOffset>, pattern: &str) -> Result<String, ProcessorError> {
    let invalid = || ProcessorError::InvalidDatePattern {
        pattern: pattern.to_string(),
    };
    if !is_valid_date_pattern(pattern) {
        return Err(invalid());
    }
    // `to_string()` would panic on a formatting error; `write!` reports it
    let mut out = String::new();
    write!(out, "{}", dt.format(pattern)).map_err(|_| invalid())?;
    Ok(out)
}

// ─────────────────────────────────────────────────────────────
// case
// ─────────────────────────────────────────────────────────────

pub fn upper(value: &str, _args: Option<&[String]>) -> Result<String, ProcessorError> {
    Ok(value.to_uppercase())
}

pub fn lower(value: &str, _args: Option<&[String]>) -> Result<String, ProcessorError> {
    Ok(value.to_lowercase())
}

pub fn capitalize(value: &str, _args: Option<&[String]>) -> Result<String, ProcessorError> {
    let lowered = value.to_lowercase();
    let mut chars = lowered.chars();
    Ok(match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    })
}

// ─────────────────────────────────────────────────────────────
// numbers
// ─────────────────────────────────────────────────────────────

pub fn currency(
    value: &str,
    args: Option<&[String]>,
    defaults: &CurrencyDefaults,
) -> Result<String, ProcessorError> {
    let amount = parse_number(value)?;
    let locale_id = arg(args, 0).unwrap_or(&defaults.locale);
    let code = arg(args, 1).unwrap_or(&defaults.code);
    locale::format_currency(amount, locale_id, code)
}

/// `number:decimals,decimal_separator,thousands_separator`
pub fn number(
    value: &str,
    args: Option<&[String]>,
    defaults: &NumberDefaults,
) -> Result<String, ProcessorError> {
    let amount = parse_number(value)?;
    let decimals = match arg(args, 0) {
        Some(raw) => {
            let parsed = raw
                .trim()
                .parse::<usize>()
                .map_err(|_| ProcessorError::InvalidArgument {
                    param: "decimals",
                    arg: raw.to_string(),
                })?;
            if parsed > MAX_DECIMALS {
                return Err(ProcessorError::InvalidArgument {
                    param: "decimals",
                    arg: raw.to_string(),
                });
            }
            parsed
        }
        None => defaults.decimals,
    };
    let decimal_sep = raw_arg(args, 1).unwrap_or(&defaults.decimal_separator);
    let thousands_sep = raw_arg(args, 2).unwrap_or(&defaults.thousands_separator);
    format_number(amount, decimals, decimal_sep, thousands_sep)
}

pub fn parse_number(value: &str) -> Result<f64, ProcessorError> {
    let trimmed = value.trim();
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(ProcessorError::InvalidNumber {
            value: value.to_string(),
        }),
    }
}

/// Round half away from zero to `decimals` places, then group the integer
/// digits in threes. A value that rounds to zero never carries a sign.
pub(crate) fn format_number(
    value: f64,
    decimals: usize,
    decimal_sep: &str,
    thousands_sep: &str,
) -> Result<String, ProcessorError> {
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value.abs() * factor).round() / factor;
    if !rounded.is_finite() {
        return Err(ProcessorError::Format(format!(
            "{value} cannot be rounded to {decimals} decimals"
        )));
    }

    let plain = format!("{:.*}", decimals, rounded);
    let (int_part, frac_part) = match plain.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (plain.as_str(), None),
    };

    let mut out = String::with_capacity(plain.len() + int_part.len() / 3 * thousands_sep.len() + 1);
    let is_zero = !plain.bytes().any(|b| (b'1'..=b'9').contains(&b));
    if value < 0.0 && !is_zero {
        out.push('-');
    }
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push_str(thousands_sep);
        }
        out.push(digit);
    }
    if let Some(frac) = frac_part {
        out.push_str(decimal_sep);
        out.push_str(frac);
    }
    Ok(out)
}
