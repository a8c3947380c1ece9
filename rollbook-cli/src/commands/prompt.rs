//! Terminal implementation of the prompter port

use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use dialoguer::{Confirm, Input};
use rollbook_core::ports::Prompter;
use rollbook_core::{Error, Result};

/// Prompts on the terminal with dialoguer.
///
/// With `assume_yes` every confirmation is accepted. Without a terminal on
/// stdin, pickers return their defaults and confirmations are declined.
pub struct TerminalPrompter {
    assume_yes: bool,
    interactive: bool,
}

impl TerminalPrompter {
    pub fn new(assume_yes: bool) -> Self {
        Self {
            assume_yes,
            interactive: !atty::isnt(atty::Stream::Stdin),
        }
    }
}

fn prompt_error(e: dialoguer::Error) -> Error {
    Error::Io(io::Error::other(e.to_string()))
}

impl Prompter for TerminalPrompter {
    fn pick_file(&self, title: &str, initial: Option<&Path>) -> Result<Option<PathBuf>> {
        if !self.interactive {
            return Ok(initial.map(Path::to_path_buf));
        }
        let mut input = Input::<String>::new().with_prompt(title).allow_empty(true);
        if let Some(path) = initial {
            input = input.default(path.display().to_string());
        }
        let answer = input.interact_text().map_err(prompt_error)?;
        let answer = answer.trim();
        Ok((!answer.is_empty()).then(|| PathBuf::from(answer)))
    }

    fn pick_date(&self, prompt: &str, default: NaiveDate) -> Result<Option<String>> {
        let default = default.format("%m/%d/%Y").to_string();
        if !self.interactive {
            return Ok(Some(default));
        }
        let answer: String = Input::new()
            .with_prompt(prompt)
            .default(default)
            .allow_empty(true)
            .interact_text()
            .map_err(prompt_error)?;
        let answer = answer.trim();
        Ok((!answer.is_empty()).then(|| answer.to_string()))
    }

    fn confirm(&self, prompt: &str) -> Result<bool> {
        if self.assume_yes {
            return Ok(true);
        }
        if !self.interactive {
            return Ok(false);
        }
        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(prompt_error)
    }
}
