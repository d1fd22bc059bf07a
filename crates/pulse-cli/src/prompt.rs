//! Line-oriented terminal I/O.
//!
//! Generic over the reader and writer so the shell can be driven from a
//! buffer in tests. End of input is reported as `None`, never an error.

use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

pub const INVALID_NUMBER: &str = "Select a valid option!";

pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.output
    }

    /// Print one line.
    pub fn say(&mut self, line: impl Display) -> io::Result<()> {
        writeln!(self.output, "{line}")
    }

    /// Show `message` and read one trimmed line.
    pub fn read_line(&mut self, message: &str) -> io::Result<Option<String>> {
        write!(self.output, "{message}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Read a value, re-prompting until it parses.
    pub fn read_number<T: FromStr>(&mut self, message: &str) -> io::Result<Option<T>> {
        self.read_parsed(message, None)
    }

    /// Like [`Prompt::read_number`], but a blank line yields `default`.
    pub fn read_number_or<T: FromStr>(
        &mut self,
        message: &str,
        default: T,
    ) -> io::Result<Option<T>> {
        self.read_parsed(message, Some(default))
    }

    fn read_parsed<T: FromStr>(
        &mut self,
        message: &str,
        mut default: Option<T>,
    ) -> io::Result<Option<T>> {
        loop {
            let Some(line) = self.read_line(message)? else {
                return Ok(None);
            };
            if line.is_empty() {
                if let Some(value) = default.take() {
                    return Ok(Some(value));
                }
            }
            match line.parse() {
                Ok(value) => return Ok(Some(value)),
                Err(_) => self.say(INVALID_NUMBER)?,
            }
        }
    }
}
