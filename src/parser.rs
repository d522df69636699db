// parser.rs

use crate::calculator::Input;
use crate::error::ParseError;
use crate::keymap::input_for_char;

/// What one word of a REPL line asks for.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Input(Input),
    ShowHistory,
    Help,
    Quit,
}

/// Command words offered for completion, in the order `help` lists them.
pub const COMMAND_WORDS: &[&str] = &[
    "c", "ce", "bs", "mc", "mr", "m+", "m-", "hc", "h", "history", "help", "quit",
];

fn command_word(word: &str) -> Option<Command> {
    let input = match word {
        "c" | "ac" | "esc" => Input::ClearAll,
        "ce" => Input::ClearEntry,
        "bs" | "del" => Input::Backspace,
        "mc" => Input::MemoryClear,
        "mr" => Input::MemoryRecall,
        "m+" => Input::MemoryAdd,
        "m-" => Input::MemorySubtract,
        "hc" => Input::HistoryClear,
        "history" => return Some(Command::ShowHistory),
        "help" | "?" => return Some(Command::Help),
        "quit" | "exit" | "q" => return Some(Command::Quit),
        _ => return None,
    };
    Some(Command::Input(input))
}

/// `h3` or `h 3`: select the third history entry as listed (1-based).
fn history_select(word: &str, arg: &str) -> Result<Command, ParseError> {
    match arg.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(Command::Input(Input::HistorySelect(n - 1))),
        _ => Err(ParseError::BadHistoryIndex(word.to_string())),
    }
}

/// Split a line into commands. Words are separated by whitespace; a word
/// that is not a command word is read one key per character, so `5*3+2=`
/// is six inputs.
pub fn parse_line(line: &str) -> Result<Vec<Command>, ParseError> {
    let mut commands = Vec::new();
    let mut words = line.split_whitespace();
    while let Some(word) = words.next() {
        let lower = word.to_ascii_lowercase();
        if let Some(command) = command_word(&lower) {
            commands.push(command);
            continue;
        }
        if lower == "h" {
            let arg = words.next().unwrap_or_default();
            commands.push(history_select(word, arg)?);
            continue;
        }
        if let Some(arg) = lower.strip_prefix('h') {
            if !arg.is_empty() && arg.chars().all(|c| c.is_ascii_digit()) {
                commands.push(history_select(word, arg)?);
                continue;
            }
        }
        for c in word.chars() {
            match input_for_char(c) {
                Some(input) => commands.push(Command::Input(input)),
                None => return Err(ParseError::UnknownCommand(word.to_string())),
            }
        }
    }
    Ok(commands)
}
