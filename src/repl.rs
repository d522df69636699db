// repl.rs

use std::fmt::Write as _;
use std::time::Instant;

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{CompletionType, Config, Editor};

use crate::calculator::{Calculator, Input};
use crate::completion::CommandCompleter;
use crate::parser::{parse_line, Command};

const HELP: &str = "\
keys    0-9 . , + - * / =   (several keys may share one word: 5*3+2=)
enter   on an empty line is =
c       clear all            ce   clear entry       bs   delete last digit
mc mr   memory clear/recall  m+ m-  add/subtract the shown value to memory
history list past results    h<N> reuse result N    hc   clear history
quit    leave";

/// Whether the loop should keep reading lines.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Flow {
    Continue,
    Quit,
}

/// Apply one line to `calc` and return the text to print after it.
pub fn run_line(calc: &mut Calculator, line: &str, now: Instant) -> (Flow, String) {
    let mut out = String::new();
    if calc.poll(now) {
        out.push_str("(cleared)\n");
    }
    if line.trim().is_empty() {
        calc.dispatch_at(Input::Equals, now);
        out.push_str(&render(calc));
        return (Flow::Continue, out);
    }
    let commands = match parse_line(line) {
        Ok(commands) => commands,
        Err(e) => {
            let _ = writeln!(out, "{}", e);
            return (Flow::Continue, out);
        }
    };
    for command in commands {
        match command {
            Command::Input(input) => calc.dispatch_at(input, now),
            Command::ShowHistory => out.push_str(&render_history(calc)),
            Command::Help => {
                let _ = writeln!(out, "{}", HELP);
            }
            Command::Quit => return (Flow::Quit, out),
        }
    }
    out.push_str(&render(calc));
    (Flow::Continue, out)
}

/// The preview line (when a chain is pending) and the display line.
pub fn render(calc: &Calculator) -> String {
    let mut out = String::new();
    let preview = calc.expression_preview();
    if !preview.is_empty() {
        let _ = writeln!(out, "   {}", preview);
    }
    let marker = if calc.is_error() { "!" } else { "=" };
    let _ = writeln!(out, "{:<2}{} {}", calc.memory_indicator(), marker, calc.display());
    out
}

/// History newest-first, numbered the way `h<N>` selects it.
pub fn render_history(calc: &Calculator) -> String {
    let history = calc.history();
    if history.is_empty() {
        return "no history yet\n".to_string();
    }
    let formatter = calc.formatter();
    let mut out = String::new();
    for (i, entry) in history.entries().iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>5}  {} = {}",
            i + 1,
            entry.expression,
            formatter.render_value(entry.result)
        );
    }
    out
}

pub fn start_repl(calc: &mut Calculator) -> Result<()> {
    let config = Config::builder().completion_type(CompletionType::List).build();
    let mut rl: Editor<CommandCompleter, DefaultHistory> = Editor::with_config(config)?;
    rl.set_helper(Some(CommandCompleter::new()));
    print!("{}", render(calc));
    loop {
        let prompt = format!("{}> ", calc.memory_indicator());
        match rl.readline(&prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = rl.add_history_entry(line.as_str());
                }
                let (flow, out) = run_line(calc, &line, Instant::now());
                print!("{}", out);
                if flow == Flow::Quit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}
