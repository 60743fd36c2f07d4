//! Terminal prompts for the interactive credential source.

use std::io::{self, BufRead, Write};

/// Blocking question-and-answer input used by the interactive source.
///
/// `Ok(None)` means the input was closed before an answer was given.
pub trait Prompter {
    /// Called once before the first question
    fn announce(&mut self, _title: &str) -> io::Result<()> {
        Ok(())
    }

    /// Ask for a value that may be echoed back
    fn ask(&mut self, label: &str, default: Option<&str>) -> io::Result<Option<String>>;

    /// Ask for a value that must not be echoed
    fn ask_secret(&mut self, label: &str) -> io::Result<Option<String>>;
}

/// Prompts on the controlling terminal. Secrets are read without echo.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn announce(&mut self, title: &str) -> io::Result<()> {
        println!("\n=== {} ===\n", title);
        Ok(())
    }

    fn ask(&mut self, label: &str, default: Option<&str>) -> io::Result<Option<String>> {
        match default {
            Some(default) => print!("{} [{}]: ", label, default),
            None => print!("{}: ", label),
        }
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().lock().read_line(&mut input)? == 0 {
            println!();
            return Ok(None);
        }
        Ok(Some(input.trim().to_string()))
    }

    fn ask_secret(&mut self, label: &str) -> io::Result<Option<String>> {
        match rpassword::prompt_password(format!("{}: ", label)) {
            Ok(secret) => Ok(Some(secret)),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(e),
        }
    }
}
