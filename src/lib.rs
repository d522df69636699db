// lib.rs

pub mod accumulator;
pub mod calculator;
pub mod completion;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod format;
pub mod history;
pub mod keymap;
pub mod memory;
pub mod operator;
pub mod parser;
pub mod repl;
pub mod storage;
pub mod timer;

pub use calculator::{Calculator, Input};
pub use error::{CalcError, ParseError};
pub use evaluator::{evaluate, Token};
pub use history::{History, HistoryEntry};
pub use operator::Operator;
