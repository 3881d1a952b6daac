use crate::value::Value;
use std::env;
use std::io::{self, BufRead, Write};

static PROMPT: &str = ">> ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Evaluate,
    Compile,
}

impl Mode {
    /// `JSEXPR_MODE=compile` selects compilation; anything else evaluates.
    pub fn from_env() -> Self {
        match env::var("JSEXPR_MODE") {
            Ok(mode) if mode.eq_ignore_ascii_case("compile") => Self::Compile,
            _ => Self::Evaluate,
        }
    }
}

pub fn start(mode: Mode) {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    loop {
        print!("{}", PROMPT);
        let _ = io::stdout().flush();
        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) | Err(_) => return,
            Ok(_) => {}
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        println!("{}", run_line(mode, line));
    }
}

/// Runs one line of input and renders the outcome for display.
pub fn run_line(mode: Mode, line: &str) -> String {
    match mode {
        Mode::Compile => match crate::compile(line) {
            Ok(code) => code,
            Err(err) => format!("\t{}", err),
        },
        Mode::Evaluate => match crate::evaluate(line) {
            Ok(value) => render(&value),
            Err(err) => format!("ERROR: {}", err),
        },
    }
}

// Strings and containers print as JSON so quoting stays visible.
fn render(value: &Value) -> String {
    match value {
        Value::String(_) | Value::Array(_) | Value::Object(_) => value.to_json().to_string(),
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_run_line() {
        let cases = vec![
            (Mode::Evaluate, "true + false", "1"),
            (Mode::Evaluate, "'to' + 'to'", "\"toto\""),
            (Mode::Evaluate, "[1, 'a'][1]", "\"a\""),
            (Mode::Evaluate, "[1.5, null]", "[1.5,null]"),
            (Mode::Evaluate, "1 / 0", "Infinity"),
            (Mode::Evaluate, "null ?? 2", "2"),
            (Mode::Compile, "5 in [1, 2]", "[1,2].includes(5)"),
        ];

        for (mode, input, expected) in cases.into_iter() {
            assert_eq!(run_line(mode, input), expected, "{}", input);
        }
    }

    #[test]
    fn test_run_line_errors() {
        assert_eq!(
            run_line(Mode::Evaluate, "nonexistent"),
            "ERROR: evaluation error: identifier not found: nonexistent"
        );
        assert!(run_line(Mode::Compile, "1 +").starts_with('\t'));
    }
}
