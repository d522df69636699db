// accumulator.rs

use crate::error::CalcError;
use crate::evaluator::{describe, Token};
use crate::format::plain;
use crate::operator::Operator;

/// The current entry: typed text or the marker left by a failed evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Entry {
    Text(String),
    Error(CalcError),
}

impl Entry {
    fn zero() -> Self {
        Entry::Text("0".to_string())
    }

    /// The entry as a number, if it is one.
    pub fn value(&self) -> Option<f64> {
        match self {
            Entry::Text(text) => text.parse::<f64>().ok().filter(|v| v.is_finite()),
            Entry::Error(_) => None,
        }
    }
}

/// A committed operand together with the operator typed after it.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Link {
    operand: f64,
    operator: Operator,
}

/// Tracks keystrokes between two evaluations.
///
/// The chain is stored as links so that the flat sequence it describes
/// always alternates operand/operator and ends on an operator.
#[derive(Clone, Debug, PartialEq)]
pub struct Accumulator {
    current: Entry,
    chain: Vec<Link>,
    waiting_for_operand: bool,
}

impl Default for Accumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Accumulator {
    pub fn new() -> Self {
        Self {
            current: Entry::zero(),
            chain: Vec::new(),
            waiting_for_operand: false,
        }
    }

    pub fn current(&self) -> &Entry {
        &self.current
    }

    pub fn value(&self) -> Option<f64> {
        self.current.value()
    }

    pub fn is_waiting_for_operand(&self) -> bool {
        self.waiting_for_operand
    }

    pub fn has_chain(&self) -> bool {
        !self.chain.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn pending_operator(&self) -> Option<Operator> {
        self.chain.last().map(|link| link.operator)
    }

    pub fn digit(&mut self, digit: u8) {
        if digit > 9 {
            return;
        }
        let ch = char::from(b'0' + digit);
        if self.waiting_for_operand {
            self.current = Entry::Text(ch.to_string());
            self.waiting_for_operand = false;
            return;
        }
        match &mut self.current {
            Entry::Text(text) if text.as_str() != "0" => text.push(ch),
            current => *current = Entry::Text(ch.to_string()),
        }
    }

    pub fn decimal_point(&mut self) {
        if matches!(self.current, Entry::Error(_)) {
            self.current = Entry::zero();
        }
        if self.waiting_for_operand {
            self.current = Entry::Text("0.".to_string());
            self.waiting_for_operand = false;
            return;
        }
        if let Entry::Text(text) = &mut self.current {
            if !text.contains('.') {
                text.push('.');
            }
        }
    }

    /// Commit the current operand with `op`, or swap the pending operator
    /// when no operand was typed since the last one. Ignored when the
    /// current entry is not a number.
    pub fn operator(&mut self, op: Operator) {
        let Some(operand) = self.value() else {
            return;
        };
        if self.waiting_for_operand {
            if let Some(last) = self.chain.last_mut() {
                last.operator = op;
                return;
            }
        }
        self.chain.push(Link {
            operand,
            operator: op,
        });
        self.waiting_for_operand = true;
    }

    pub fn clear_all(&mut self) {
        *self = Self::new();
    }

    pub fn clear_entry(&mut self) {
        self.current = Entry::zero();
    }

    pub fn backspace(&mut self) {
        let next = match &self.current {
            Entry::Text(text) => {
                let mut text = text.clone();
                text.pop();
                text
            }
            Entry::Error(_) => String::new(),
        };
        self.current = if next.is_empty() || next == "-" {
            Entry::zero()
        } else {
            Entry::Text(next)
        };
    }

    /// Show `value` as the current entry; the next digit starts a new operand.
    pub fn set_value(&mut self, value: f64) {
        self.current = Entry::Text(plain(value));
        self.waiting_for_operand = true;
    }

    /// The committed chain followed by the current operand when the chain
    /// still needs a right-hand side.
    pub fn pending_tokens(&self) -> Vec<Token> {
        let mut tokens = self.committed_tokens();
        if !self.chain.is_empty() {
            if let Some(value) = self.value() {
                tokens.push(Token::Operand(value));
            }
        }
        tokens
    }

    /// Drop the chain after it has been evaluated.
    pub fn finish(&mut self, result: f64) {
        self.chain.clear();
        self.set_value(result);
    }

    /// Replace the entry with the error marker and discard the chain.
    pub fn fail(&mut self, error: CalcError) {
        self.chain.clear();
        self.current = Entry::Error(error);
        self.waiting_for_operand = false;
    }

    /// The committed part of the expression, e.g. `5 × 3 +`.
    pub fn preview(&self) -> String {
        describe(&self.committed_tokens())
    }

    fn committed_tokens(&self) -> Vec<Token> {
        self.chain
            .iter()
            .flat_map(|link| [Token::Operand(link.operand), Token::Operator(link.operator)])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(keys: &str) -> Accumulator {
        let mut acc = Accumulator::new();
        for key in keys.chars() {
            match key {
                '0'..='9' => acc.digit(key as u8 - b'0'),
                '.' => acc.decimal_point(),
                '<' => acc.backspace(),
                other => acc.operator(Operator::from_key(other).unwrap()),
            }
        }
        acc
    }

    fn text(s: &str) -> Entry {
        Entry::Text(s.to_string())
    }

    #[test]
    fn test_digits_replace_leading_zero() {
        assert_eq!(typed("0").current(), &text("0"));
        assert_eq!(typed("007").current(), &text("7"));
        assert_eq!(typed("120").current(), &text("120"));
    }

    #[test]
    fn test_decimal_point_once_per_operand() {
        assert_eq!(typed("1.2.3").current(), &text("1.23"));
        assert_eq!(typed(".5").current(), &text("0.5"));
        assert_eq!(typed("3+.").current(), &text("0."));
    }

    #[test]
    fn test_operator_commits_operand() {
        let acc = typed("5*3+");
        assert_eq!(acc.preview(), "5 × 3 +");
        assert!(acc.is_waiting_for_operand());
        assert_eq!(acc.current(), &text("3"));
    }

    #[test]
    fn test_operator_replacement() {
        let acc = typed("7+-");
        assert_eq!(acc.preview(), "7 -");
        assert_eq!(acc.pending_operator(), Some(Operator::Subtract));
        assert_eq!(acc.committed_tokens().len(), 2);
    }

    #[test]
    fn test_operator_ignored_on_error() {
        let mut acc = typed("8/");
        acc.fail(CalcError::DivisionByZero);
        acc.operator(Operator::Add);
        assert!(!acc.has_chain());
        assert_eq!(acc.current(), &Entry::Error(CalcError::DivisionByZero));
    }

    #[test]
    fn test_digit_and_point_recover_from_error() {
        let mut acc = Accumulator::new();
        acc.fail(CalcError::DivisionByZero);
        acc.digit(4);
        assert_eq!(acc.current(), &text("4"));

        acc.fail(CalcError::DivisionByZero);
        acc.decimal_point();
        assert_eq!(acc.current(), &text("0."));
    }

    #[test]
    fn test_pending_tokens_appends_trailing_operand() {
        let acc = typed("2+3*4");
        assert_eq!(
            acc.pending_tokens(),
            vec![
                Token::Operand(2.0),
                Token::Operator(Operator::Add),
                Token::Operand(3.0),
                Token::Operator(Operator::Multiply),
                Token::Operand(4.0),
            ]
        );
        assert!(typed("42").pending_tokens().is_empty());
    }

    #[test]
    fn test_pending_tokens_reuses_operand_after_operator() {
        // "6*" then equals multiplies the shown operand by itself.
        let acc = typed("6*");
        assert_eq!(
            acc.pending_tokens(),
            vec![
                Token::Operand(6.0),
                Token::Operator(Operator::Multiply),
                Token::Operand(6.0),
            ]
        );
    }

    #[test]
    fn test_clear_entry_keeps_chain() {
        let mut acc = typed("9-4");
        acc.clear_entry();
        assert_eq!(acc.current(), &text("0"));
        assert_eq!(acc.preview(), "9 -");

        acc.clear_all();
        assert_eq!(acc, Accumulator::new());
    }

    #[test]
    fn test_backspace() {
        assert_eq!(typed("123<").current(), &text("12"));
        assert_eq!(typed("5<").current(), &text("0"));
        assert_eq!(typed("0<").current(), &text("0"));
        assert_eq!(typed("1.<").current(), &text("1"));

        let mut acc = Accumulator::new();
        acc.set_value(-3.0);
        acc.backspace();
        assert_eq!(acc.current(), &text("0"));

        acc.fail(CalcError::DivisionByZero);
        acc.backspace();
        assert_eq!(acc.current(), &text("0"));
    }

    #[test]
    fn test_out_of_range_digit_is_ignored() {
        let mut acc = typed("4");
        acc.digit(12);
        assert_eq!(acc.current(), &text("4"));
        acc.digit(10);
        acc.digit(9);
        assert_eq!(acc.current(), &text("49"));
    }

    #[test]
    fn test_set_value_starts_new_operand() {
        let mut acc = Accumulator::new();
        acc.set_value(17.0);
        assert_eq!(acc.current(), &text("17"));
        acc.digit(2);
        assert_eq!(acc.current(), &text("2"));
    }
}
