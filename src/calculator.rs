// calculator.rs

use std::time::Instant;

use crate::accumulator::{Accumulator, Entry};
use crate::evaluator::{describe, evaluate};
use crate::format::Formatter;
use crate::history::History;
use crate::memory::Memory;
use crate::operator::Operator;
use crate::timer::AutoClear;

/// A discrete event coming from the keyboard or a command word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Input {
    Digit(u8),
    Operator(Operator),
    DecimalPoint,
    Equals,
    ClearAll,
    ClearEntry,
    Backspace,
    MemoryClear,
    MemoryRecall,
    MemoryAdd,
    MemorySubtract,
    HistoryClear,
    /// Zero-based position in the newest-first history list.
    HistorySelect(usize),
}

/// Owns every piece of calculator state and applies one input at a time.
pub struct Calculator {
    acc: Accumulator,
    memory: Memory,
    history: History,
    auto_clear: AutoClear,
    formatter: Formatter,
}

impl Calculator {
    pub fn new(history: History) -> Self {
        Self::with_options(history, Formatter::default(), AutoClear::default())
    }

    pub fn with_options(history: History, formatter: Formatter, auto_clear: AutoClear) -> Self {
        Self {
            acc: Accumulator::new(),
            memory: Memory::new(),
            history,
            auto_clear,
            formatter,
        }
    }

    pub fn dispatch(&mut self, input: Input) {
        self.dispatch_at(input, Instant::now());
    }

    /// Apply `input` as if it arrived at `now`. A due auto-clear is applied
    /// first.
    pub fn dispatch_at(&mut self, input: Input, now: Instant) {
        self.poll(now);
        match input {
            Input::Digit(d) => self.acc.digit(d),
            Input::Operator(op) => self.acc.operator(op),
            Input::DecimalPoint => self.acc.decimal_point(),
            Input::Equals => self.equals(now),
            Input::ClearAll => {
                self.auto_clear.cancel();
                self.acc.clear_all();
            }
            Input::ClearEntry => self.acc.clear_entry(),
            Input::Backspace => self.acc.backspace(),
            Input::MemoryClear => self.memory.clear(),
            Input::MemoryRecall => self.acc.set_value(self.memory.recall()),
            Input::MemoryAdd => {
                if let Some(value) = self.acc.value() {
                    self.memory.add(value);
                }
            }
            Input::MemorySubtract => {
                if let Some(value) = self.acc.value() {
                    self.memory.subtract(value);
                }
            }
            Input::HistoryClear => self.history.clear_all(),
            Input::HistorySelect(n) => {
                if let Some(entry) = self.history.get(n) {
                    let result = entry.result;
                    self.acc.set_value(result);
                }
            }
        }
    }

    /// Run the pending auto-clear if its delay has elapsed. Returns whether
    /// it fired.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.auto_clear.fire_if_due(now) {
            return false;
        }
        tracing::debug!("auto-clear after error");
        self.acc.clear_all();
        true
    }

    fn equals(&mut self, now: Instant) {
        if !self.acc.has_chain() || self.acc.value().is_none() {
            return;
        }
        let tokens = self.acc.pending_tokens();
        match evaluate(&tokens) {
            Ok(result) => {
                self.history.record(describe(&tokens), result);
                self.acc.finish(result);
            }
            Err(e) => {
                tracing::info!(expression = %describe(&tokens), error = %e, "evaluation failed");
                self.acc.fail(e);
                self.auto_clear.schedule(now);
            }
        }
    }

    /// The current entry as it should be shown.
    pub fn display(&self) -> String {
        self.formatter.render(self.acc.current())
    }

    pub fn expression_preview(&self) -> String {
        self.acc.preview()
    }

    pub fn memory_indicator(&self) -> &'static str {
        if self.memory.is_set() {
            "M"
        } else {
            ""
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.acc.current(), Entry::Error(_))
    }

    pub fn is_reset_pending(&self) -> bool {
        self.auto_clear.is_pending()
    }

    pub fn accumulator(&self) -> &Accumulator {
        &self.acc
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }
}
