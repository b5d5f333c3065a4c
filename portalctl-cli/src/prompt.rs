//! Prompt backends for the interactive menu
//!
//! On a real terminal answers are read through `inquire` text prompts, which
//! give line editing and help text. When stdin or stdout is redirected the
//! menu falls back to plain line reading, so a session can be scripted:
//!
//! ```text
//! $ printf '2\n\n5\n' | portalctl menu
//! ```

use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::{Context, Result};
use inquire::{InquireError, Text};

/// Check if we're in a context where inquire prompts are usable
pub fn can_use_inquire() -> bool {
    io::stdin().is_terminal() && io::stdout().is_terminal()
}

/// Source of user answers
pub trait Prompter {
    /// Ask for one line of input; `None` once input has ended.
    fn ask(&mut self, label: &str, help: Option<&str>) -> Result<Option<String>>;

    /// Wait for Enter; `false` once input has ended.
    fn pause(&mut self) -> Result<bool>;
}

/// Line-oriented prompter over any reader/writer pair
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read from stdin")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn ask(&mut self, label: &str, _help: Option<&str>) -> Result<Option<String>> {
        write!(self.output, "{} ", label)?;
        self.output.flush()?;
        self.read_line()
    }

    fn pause(&mut self) -> Result<bool> {
        write!(self.output, "\nPress Enter to continue...")?;
        self.output.flush()?;
        Ok(self.read_line()?.is_some())
    }
}

/// Interactive prompter backed by `inquire`
#[derive(Debug, Default)]
pub struct InquirePrompter;

impl InquirePrompter {
    fn finish(result: std::result::Result<String, InquireError>) -> Result<Option<String>> {
        match result {
            Ok(answer) => Ok(Some(answer)),
            // Esc / Ctrl+C end the session like closing stdin would
            Err(InquireError::OperationCanceled) | Err(InquireError::OperationInterrupted) => {
                Ok(None)
            }
            Err(err) => Err(err).context("Failed to read answer"),
        }
    }
}

impl Prompter for InquirePrompter {
    fn ask(&mut self, label: &str, help: Option<&str>) -> Result<Option<String>> {
        let mut prompt = Text::new(label);
        if let Some(help) = help {
            prompt = prompt.with_help_message(help);
        }
        Self::finish(prompt.prompt())
    }

    fn pause(&mut self) -> Result<bool> {
        let answer = Self::finish(Text::new("Press Enter to continue...").prompt())?;
        Ok(answer.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_lines_and_reports_eof() {
        let mut out = Vec::new();
        let mut prompter = LinePrompter::new(Cursor::new("1\r\nMaria\n"), &mut out);

        assert_eq!(prompter.ask("Choose:", None).unwrap().as_deref(), Some("1"));
        assert_eq!(
            prompter.ask("Name:", Some("full name")).unwrap().as_deref(),
            Some("Maria")
        );
        assert_eq!(prompter.ask("Phone:", None).unwrap(), None);
        assert!(!prompter.pause().unwrap());

        let shown = String::from_utf8(out).unwrap();
        assert!(shown.contains("Choose: "));
        assert!(shown.contains("Press Enter to continue..."));
    }

    #[test]
    fn blank_line_is_an_answer_not_eof() {
        let mut prompter = LinePrompter::new(Cursor::new("\n"), io::sink());
        assert_eq!(prompter.ask("Phone:", None).unwrap().as_deref(), Some(""));
    }
}
