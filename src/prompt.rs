//! Yes/no confirmation prompts

use std::io::{self, BufRead, Write};

use crate::args::CmdArgs;
use crate::error::Result;

/// Asks the user to confirm a transaction
pub trait Prompt {
    /// Show `text` and return whether the answer was affirmative
    fn ask_yes_no(&mut self, args: &CmdArgs, text: &str) -> Result<bool>;
}

/// Prompt reading answers from a line-based input
pub struct StdinPrompt<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl StdinPrompt<io::StdinLock<'static>, io::Stdout> {
    /// Prompt on the process's stdin and stdout
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> StdinPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Prompt for StdinPrompt<R, W> {
    fn ask_yes_no(&mut self, args: &CmdArgs, text: &str) -> Result<bool> {
        if args.assume_no {
            return Ok(false);
        }
        if args.assume_yes {
            return Ok(true);
        }

        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut answer = String::new();
        // EOF reads zero bytes and falls through to "no"
        self.input.read_line(&mut answer)?;

        Ok(is_affirmative(&answer))
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
