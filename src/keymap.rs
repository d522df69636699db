// keymap.rs

use crate::calculator::Input;
use crate::operator::Operator;

/// Map a single typed character to its calculator input.
pub fn input_for_char(c: char) -> Option<Input> {
    if let Some(d) = c.to_digit(10) {
        return Some(Input::Digit(d as u8));
    }
    if let Some(op) = Operator::from_key(c) {
        return Some(Input::Operator(op));
    }
    match c {
        '=' | '\n' | '\r' => Some(Input::Equals),
        '.' | ',' => Some(Input::DecimalPoint),
        '\x1b' => Some(Input::ClearAll),
        '\x08' | '\x7f' => Some(Input::Backspace),
        _ => None,
    }
}

/// Map a key name (`"7"`, `"Enter"`, `"Escape"`, ...) to its input.
pub fn input_for_key(key: &str) -> Option<Input> {
    match key {
        "Enter" => Some(Input::Equals),
        "Escape" => Some(Input::ClearAll),
        "Backspace" => Some(Input::Backspace),
        _ => {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => input_for_char(c),
                _ => None,
            }
        }
    }
}
