//! Declarative validation rule descriptors
//!
//! A [`ValidationRuleDescriptor`] says how a column's cells are validated. The
//! host turns it into native spreadsheet data validation; [`accepts`] lets
//! the core check a value without the host, and [`formula`] renders the
//! custom formula used for rules the host has no native kind for.
//!
//! Numeric rules without a value range still limit the number of digits.
//! Digits are counted on the text rendering of the number exactly the way
//! the sheet formula does it:
//!
//! - total digits = `len(text(value)) - 1`
//! - decimal places = `len(text(value - trunc(value))) - 2`
//!
//! The offsets account for the decimal point and the leading `0.` of the
//! fractional part. Integers and negative values keep the formula's quirks
//! (an integer counts one digit less than it has).
//!
//! [`accepts`]: ValidationRuleDescriptor::accepts
//! [`formula`]: ValidationRuleDescriptor::formula

use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

static EMAIL_RE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok());

static PHONE_RE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^\+?[0-9 ().\-]{7,20}$").ok());

/// Validation rule for one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationRuleDescriptor {
    /// Free text limited in length
    Text { max_len: usize },
    /// Whole number within an inclusive range
    Integer { min: i64, max: i64 },
    /// Number within an inclusive range and a digit-count ceiling
    FloatBounded {
        max_digits: usize,
        max_decimals: usize,
        min: f64,
        max: f64,
    },
    /// Number limited only by a digit-count ceiling
    FloatUnbounded {
        max_digits: usize,
        max_decimals: usize,
    },
    Phone,
    /// ISO date `YYYY-MM-DD`
    Date,
    /// Time of day `HH:MM` or `HH:MM:SS`
    Time,
    Email,
    Url,
    /// Dropdown with the options inlined
    ListInline { options: Vec<String> },
    /// Dropdown reading a column range of another sheet
    ListFromRange {
        sheet_name: String,
        column_name: String,
        start_row: u32,
    },
    /// No rule; must not be applied
    None,
}

impl ValidationRuleDescriptor {
    /// Text rule
    #[must_use]
    pub const fn text(max_len: usize) -> Self {
        Self::Text { max_len }
    }

    /// Integer rule
    #[must_use]
    pub const fn integer(min: i64, max: i64) -> Self {
        Self::Integer { min, max }
    }

    /// Bounded float rule
    #[must_use]
    pub const fn float_bounded(max_digits: usize, max_decimals: usize, min: f64, max: f64) -> Self {
        Self::FloatBounded {
            max_digits,
            max_decimals,
            min,
            max,
        }
    }

    /// Digit-limited float rule
    #[must_use]
    pub const fn float_unbounded(max_digits: usize, max_decimals: usize) -> Self {
        Self::FloatUnbounded {
            max_digits,
            max_decimals,
        }
    }

    /// Inline list from any string-like options
    pub fn list<S: Into<String>>(options: impl IntoIterator<Item = S>) -> Self {
        Self::ListInline {
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether this is the `None` rule
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Short kind name
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Integer { .. } => "integer",
            Self::FloatBounded { .. } => "float_bounded",
            Self::FloatUnbounded { .. } => "float_unbounded",
            Self::Phone => "phone",
            Self::Date => "date",
            Self::Time => "time",
            Self::Email => "email",
            Self::Url => "url",
            Self::ListInline { .. } => "list_inline",
            Self::ListFromRange { .. } => "list_from_range",
            Self::None => "none",
        }
    }

    /// Check a raw cell value against the rule
    ///
    /// Blank cells always pass; requiredness is not a validation rule.
    /// `ListFromRange` cannot be checked without the referenced sheet and
    /// always passes here.
    #[must_use]
    pub fn accepts(&self, raw: &str) -> bool {
        let value = raw.trim();
        if value.is_empty() {
            return true;
        }
        match self {
            Self::Text { max_len } => value.chars().count() <= *max_len,
            Self::Integer { min, max } => parse_whole(value).is_some_and(|n| n >= *min && n <= *max),
            Self::FloatBounded {
                max_digits,
                max_decimals,
                min,
                max,
            } => parse_number(value).is_some_and(|n| {
                n >= *min && n <= *max && DigitCount::of(n).within(*max_digits, *max_decimals)
            }),
            Self::FloatUnbounded {
                max_digits,
                max_decimals,
            } => parse_number(value)
                .is_some_and(|n| DigitCount::of(n).within(*max_digits, *max_decimals)),
            Self::Phone => PHONE_RE.as_ref().is_some_and(|re| re.is_match(value))
                && value.chars().filter(char::is_ascii_digit).count() >= 7,
            Self::Date => NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok(),
            Self::Time => {
                NaiveTime::parse_from_str(value, "%H:%M").is_ok()
                    || NaiveTime::parse_from_str(value, "%H:%M:%S").is_ok()
            }
            Self::Email => EMAIL_RE.as_ref().is_some_and(|re| re.is_match(value)),
            Self::Url => Url::parse(value)
                .is_ok_and(|url| matches!(url.scheme(), "http" | "https") && url.has_host()),
            Self::ListInline { options } => options.iter().any(|o| o == value),
            Self::ListFromRange { .. } | Self::None => true,
        }
    }

    /// Help text shown next to the cell
    #[must_use]
    pub fn help_text(&self) -> String {
        match self {
            Self::Text { max_len } => format!("Text of at most {max_len} characters"),
            Self::Integer { min, max } => format!("Whole number between {min} and {max}"),
            Self::FloatBounded {
                max_digits,
                max_decimals,
                min,
                max,
            } => format!(
                "Number between {min} and {max} with at most {max_digits} digits and {max_decimals} decimal places"
            ),
            Self::FloatUnbounded {
                max_digits,
                max_decimals,
            } => format!("Number with at most {max_digits} digits and {max_decimals} decimal places"),
            Self::Phone => "Phone number, digits with optional +, spaces, dashes or brackets".to_string(),
            Self::Date => "Date in YYYY-MM-DD format".to_string(),
            Self::Time => "Time in HH:MM or HH:MM:SS format".to_string(),
            Self::Email => "Email address".to_string(),
            Self::Url => "Web address starting with http:// or https://".to_string(),
            Self::ListInline { .. } | Self::ListFromRange { .. } => {
                "Select a value from the list".to_string()
            }
            Self::None => String::new(),
        }
    }

    /// Custom formula for the first cell of the validated range
    ///
    /// `column` is zero-based, `row` is the one-based sheet row. Kinds the
    /// host validates natively return `None`.
    #[must_use]
    pub fn formula(&self, column: u16, row: u32) -> Option<String> {
        let cell = format!("{}{row}", column_index_to_letter(column));
        let digits = |max_digits: usize, max_decimals: usize| {
            format!("LEN({cell})-1<={max_digits},LEN({cell}-TRUNC({cell}))-2<={max_decimals}")
        };
        match self {
            Self::Text { max_len } => Some(format!("=LEN({cell})<={max_len}")),
            Self::FloatBounded {
                max_digits,
                max_decimals,
                min,
                max,
            } => Some(format!(
                "=AND(ISNUMBER({cell}),{cell}>={min},{cell}<={max},{})",
                digits(*max_digits, *max_decimals)
            )),
            Self::FloatUnbounded {
                max_digits,
                max_decimals,
            } => Some(format!(
                "=AND(ISNUMBER({cell}),{})",
                digits(*max_digits, *max_decimals)
            )),
            _ => None,
        }
    }
}

impl fmt::Display for ValidationRuleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text { max_len } => write!(f, "Text({max_len})"),
            Self::Integer { min, max } => write!(f, "Integer({min}, {max})"),
            Self::FloatBounded {
                max_digits,
                max_decimals,
                min,
                max,
            } => write!(f, "FloatBounded({max_digits}, {max_decimals}, {min}, {max})"),
            Self::FloatUnbounded {
                max_digits,
                max_decimals,
            } => write!(f, "FloatUnbounded({max_digits}, {max_decimals})"),
            Self::ListInline { options } => write!(f, "ListInline({} options)", options.len()),
            Self::ListFromRange {
                sheet_name,
                column_name,
                start_row,
            } => write!(f, "ListFromRange({sheet_name}!{column_name}{start_row}:)"),
            other => f.write_str(other.kind()),
        }
    }
}

/// Digit counts of a number as the sheet formula computes them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigitCount {
    /// `len(text(value)) - 1`
    pub total: i64,
    /// `len(text(value - trunc(value))) - 2`
    pub decimals: i64,
}

impl DigitCount {
    /// Count digits of a finite number
    #[must_use]
    pub fn of(value: f64) -> Self {
        let text = render_number(value);
        let fraction = fraction_text(&text);
        Self {
            total: text_len(&text) - 1,
            decimals: text_len(&fraction) - 2,
        }
    }

    /// Whether both counts are within the ceilings
    #[must_use]
    pub fn within(self, max_digits: usize, max_decimals: usize) -> bool {
        self.total <= to_i64(max_digits) && self.decimals <= to_i64(max_decimals)
    }
}

/// Shortest text rendering of a number, no exponent
#[must_use]
pub fn render_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}

/// Rendering of `value - trunc(value)` derived from the value's own text
///
/// Working on the text avoids binary noise: `1234.56 - 1234` renders as
/// `0.56`, as it does in the sheet.
fn fraction_text(text: &str) -> String {
    match text.split_once('.') {
        Some((whole, digits)) => {
            let sign = if whole.starts_with('-') { "-" } else { "" };
            format!("{sign}0.{digits}")
        }
        None => "0".to_string(),
    }
}

fn text_len(text: &str) -> i64 {
    to_i64(text.chars().count())
}

fn to_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

fn parse_number(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn parse_whole(value: &str) -> Option<i64> {
    if let Ok(n) = value.parse::<i64>() {
        return Some(n);
    }
    let n = parse_number(value)?;
    if n.fract() != 0.0 || n.abs() > 9.0e15 {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    Some(n as i64)
}

/// Spreadsheet column letters for a zero-based column index
#[must_use]
pub fn column_index_to_letter(column: u16) -> String {
    let mut col = i32::from(column);
    let mut letters = Vec::new();

    loop {
        let remainder = u8::try_from(col % 26).unwrap_or(0);
        letters.push(char::from(b'A' + remainder));
        col = (col / 26) - 1;
        if col < 0 {
            break;
        }
    }

    letters.iter().rev().collect()
}
