//! Line prompts on any reader/writer pair.
//!
//! End of input is the only way out of a prompt besides a valid answer;
//! every prompt returns `None` when the input is exhausted.

use std::io::{self, BufRead, Write};

const URLS_PROMPT: &str = "🔗 Paste one or more URLs separated by spaces: ";
const CONFIRM_PROMPT: &str = "👀 Proceed with download? (Y/n): ";
const REPEAT_PROMPT: &str = "🔂 Download more videos? (y/N): ";
const YES_NO: &[&str] = &["y", "n", ""];

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Writer shared with the session for non-prompt output.
    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// One line of whitespace-separated URLs.
    pub fn read_urls(&mut self) -> io::Result<Option<Vec<String>>> {
        Ok(self
            .read_line(URLS_PROMPT)?
            .map(|line| ytgrab_core::batch::split_urls(&line)))
    }

    /// Asks until the trimmed, lower-cased answer is one of `options`.
    pub fn get_user_input(&mut self, prompt: &str, options: &[&str]) -> io::Result<Option<String>> {
        loop {
            let Some(line) = self.read_line(prompt)? else {
                return Ok(None);
            };
            let answer = line.trim().to_lowercase();
            if options.contains(&answer.as_str()) {
                return Ok(Some(answer));
            }
            tracing::debug!(answer = %answer, "rejected prompt answer");
            writeln!(
                self.output,
                "🙂 Invalid input. Valid options: {}",
                describe_options(options)
            )?;
        }
    }

    /// Empty answer means yes.
    pub fn ask_for_confirmation(&mut self) -> io::Result<Option<bool>> {
        Ok(self
            .get_user_input(CONFIRM_PROMPT, YES_NO)?
            .map(|a| a == "y" || a.is_empty()))
    }

    /// Empty answer means no.
    pub fn ask_to_repeat(&mut self) -> io::Result<Option<bool>> {
        Ok(self.get_user_input(REPEAT_PROMPT, YES_NO)?.map(|a| a == "y"))
    }
}

fn describe_options(options: &[&str]) -> String {
    options
        .iter()
        .map(|o| if o.is_empty() { "<enter>" } else { o })
        .collect::<Vec<_>>()
        .join(", ")
}
