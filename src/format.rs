// format.rs

// Values of magnitude 1000 and up get thousands separators and at most
// eight fraction digits. Smaller values are shown as typed so a trailing
// decimal point or trailing zeros stay visible while the operand is entered.

use crate::accumulator::Entry;
use crate::error::CalcError;

/// Message shown in place of a value after a division by zero.
pub const ERROR_MESSAGE: &str = "Error: cannot divide by 0";
/// Message shown when a result does not fit in an `f64`.
pub const OVERFLOW_MESSAGE: &str = "Error: result out of range";

const MAX_FRACTION_DIGITS: usize = 8;

/// Shortest text that parses back to `value`. Negative zero prints as `0`.
pub fn plain(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{}", value)
}

/// Separator characters of the one locale the display is rendered in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Formatter {
    pub thousands_separator: char,
    pub decimal_separator: char,
}

impl Default for Formatter {
    fn default() -> Self {
        Self {
            thousands_separator: ',',
            decimal_separator: '.',
        }
    }
}

impl Formatter {
    pub fn new(thousands_separator: char, decimal_separator: char) -> Self {
        Self {
            thousands_separator,
            decimal_separator,
        }
    }

    pub fn render(&self, entry: &Entry) -> String {
        match entry {
            Entry::Error(CalcError::DivisionByZero) => ERROR_MESSAGE.to_string(),
            Entry::Error(CalcError::Overflow) => OVERFLOW_MESSAGE.to_string(),
            Entry::Error(other) => format!("Error: {}", other),
            Entry::Text(text) => self.render_text(text),
        }
    }

    /// Format a stored number, e.g. a history result.
    pub fn render_value(&self, value: f64) -> String {
        self.render_text(&plain(value))
    }

    fn render_text(&self, text: &str) -> String {
        let value = match text.parse::<f64>() {
            Ok(value) if value.is_finite() => value,
            _ => return text.to_string(),
        };

        let (int_part, frac_part) = match text.split_once('.') {
            Some((int_part, frac_part)) => (int_part, Some(frac_part)),
            None => (text, None),
        };

        if value.abs() < 1000.0 {
            return match frac_part {
                Some(frac) => format!("{}{}{}", int_part, self.decimal_separator, frac),
                None => text.to_string(),
            };
        }

        let negative = value.is_sign_negative();
        let (digits, fraction) = match frac_part {
            Some(frac) if frac.len() <= MAX_FRACTION_DIGITS => {
                (int_part.trim_start_matches('-').to_string(), Some(frac.to_string()))
            }
            _ => {
                let rounded = format!("{:.*}", MAX_FRACTION_DIGITS, value.abs());
                let rounded = rounded.trim_end_matches('0').trim_end_matches('.');
                match rounded.split_once('.') {
                    Some((i, f)) => (i.to_string(), Some(f.to_string())),
                    None => (rounded.to_string(), None),
                }
            }
        };

        let mut out = String::new();
        if negative {
            out.push('-');
        }
        out.push_str(&self.group(&digits));
        if let Some(fraction) = fraction {
            out.push(self.decimal_separator);
            out.push_str(&fraction);
        }
        out
    }

    /// Insert the thousands separator every three digits from the right.
    fn group(&self, digits: &str) -> String {
        let mut grouped = String::new();
        for (i, c) in digits.chars().rev().enumerate() {
            if i > 0 && i % 3 == 0 {
                grouped.push(self.thousands_separator);
            }
            grouped.push(c);
        }
        grouped.chars().rev().collect()
    }
}
