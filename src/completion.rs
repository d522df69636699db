// completion.rs

use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Context, Helper};

use crate::parser::COMMAND_WORDS;

/// Completes the word under the cursor against the calculator's command
/// words.
#[derive(Default)]
pub struct CommandCompleter;

impl CommandCompleter {
    pub fn new() -> Self {
        Self
    }

    /// Byte offset where the word ending at `pos` starts, and the candidates
    /// for it.
    pub fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<&'static str>) {
        let head = &line[..pos];
        let start = head
            .rfind(char::is_whitespace)
            .map(|i| i + 1)
            .unwrap_or(0);
        let prefix = head[start..].to_ascii_lowercase();
        if prefix.is_empty() {
            return (start, Vec::new());
        }
        let mut names: Vec<&'static str> = COMMAND_WORDS
            .iter()
            .copied()
            .filter(|w| w.starts_with(prefix.as_str()))
            .collect();
        names.sort();
        (start, names)
    }
}

impl Completer for CommandCompleter {
    type Candidate = Pair;
    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> Result<(usize, Vec<Pair>), ReadlineError> {
        let (start, names) = self.candidates(line, pos);
        let completions = names
            .into_iter()
            .map(|n| Pair {
                display: n.to_string(),
                replacement: format!("{} ", n),
            })
            .collect();
        Ok((start, completions))
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;
    fn hint(&self, _line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<String> {
        None
    }
}

impl Highlighter for CommandCompleter {}

impl Validator for CommandCompleter {
    fn validate(&self, _ctx: &mut ValidationContext) -> Result<ValidationResult, ReadlineError> {
        Ok(ValidationResult::Valid(None))
    }
}

impl Helper for CommandCompleter {}
