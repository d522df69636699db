// evaluator.rs

use itertools::Itertools;

use crate::error::CalcError;
use crate::format::plain;
use crate::operator::Operator;

/// Fraction digits kept in an evaluated result.
pub const RESULT_PLACES: i32 = 8;

/// One element of a flat expression chain.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Token {
    Operand(f64),
    Operator(Operator),
}

/// Resolve `chain` to a single value, multiply and divide before add and
/// subtract, rounded to [`RESULT_PLACES`] fraction digits.
///
/// An empty chain is 0 and a lone operand comes back untouched. Dividing by
/// zero anywhere in the chain aborts with [`CalcError::DivisionByZero`]; a
/// result that is not finite gives [`CalcError::Overflow`].
pub fn evaluate(chain: &[Token]) -> Result<f64, CalcError> {
    if chain.is_empty() {
        return Ok(0.0);
    }
    let (mut values, mut ops) = split(chain)?;
    if ops.is_empty() {
        return Ok(values[0]);
    }

    contract(&mut values, &mut ops, Operator::binds_tighter)?;
    contract(&mut values, &mut ops, |_| true)?;

    debug_assert_eq!(values.len(), 1);
    if !values[0].is_finite() {
        return Err(CalcError::Overflow);
    }
    let result = round_to_places(values[0], RESULT_PLACES);
    tracing::debug!(expression = %describe(chain), result, "evaluated chain");
    Ok(result)
}

/// Round half away from zero at the given number of fraction digits.
pub fn round_to_places(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

/// Render a chain the way the preview line and history show it, e.g.
/// `5 × 3 + 2`.
pub fn describe(chain: &[Token]) -> String {
    chain
        .iter()
        .map(|token| match token {
            Token::Operand(value) => plain(*value),
            Token::Operator(op) => op.symbol().to_string(),
        })
        .join(" ")
}

fn split(chain: &[Token]) -> Result<(Vec<f64>, Vec<Operator>), CalcError> {
    let mut values = Vec::with_capacity(chain.len() / 2 + 1);
    let mut ops = Vec::with_capacity(chain.len() / 2);
    for (position, token) in chain.iter().enumerate() {
        match (position % 2, token) {
            (0, Token::Operand(value)) => values.push(*value),
            (1, Token::Operator(op)) => ops.push(*op),
            _ => return Err(CalcError::MalformedChain { position }),
        }
    }
    if values.len() != ops.len() + 1 {
        return Err(CalcError::MalformedChain { position: chain.len() });
    }
    Ok((values, ops))
}

/// Replace every `lhs op rhs` triple whose operator matches `select` with its
/// value, scanning left to right over the shrinking sequence.
fn contract(
    values: &mut Vec<f64>,
    ops: &mut Vec<Operator>,
    select: impl Fn(Operator) -> bool,
) -> Result<(), CalcError> {
    let mut i = 0;
    while i < ops.len() {
        if select(ops[i]) {
            let op = ops.remove(i);
            let rhs = values.remove(i + 1);
            values[i] = op.apply(values[i], rhs)?;
        } else {
            i += 1;
        }
    }
    Ok(())
}
