//! Install confirmation dialog.
//!
//! The installer fills an [`InstallerPrompt`] and blocks on
//! [`ConfirmDialog::exec`] until the user answers. The host decides how the
//! prompt is shown; a terminal version and a fixed-answer version are
//! provided here.

use std::io::{BufRead, Write};

use tracing::warn;

use crate::host::GuessedString;
use crate::manifest::ModManifest;

/// Data shown to the user before installing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallerPrompt {
    /// Name suggestions the user can pick from.
    pub name_variants: Vec<String>,
    /// Preselected name.
    pub name: String,
    pub author: String,
    pub version: String,
    pub description: String,
}

impl InstallerPrompt {
    pub fn new(name: &GuessedString, manifest: &ModManifest) -> Self {
        Self {
            name_variants: name.variants().to_vec(),
            name: name.value().to_string(),
            author: manifest.author(),
            version: manifest.version(),
            description: manifest.description(),
        }
    }
}

/// How the dialog was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogCode {
    Accepted,
    Rejected,
}

/// The user's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogResponse {
    pub code: DialogCode,
    /// Rejected in favour of the manual installer.
    pub manual: bool,
    /// Name left in the name field.
    pub name: String,
}

impl DialogResponse {
    pub fn accept(name: impl Into<String>) -> Self {
        Self {
            code: DialogCode::Accepted,
            manual: false,
            name: name.into(),
        }
    }

    pub fn manual(name: impl Into<String>) -> Self {
        Self {
            code: DialogCode::Rejected,
            manual: true,
            name: name.into(),
        }
    }

    pub fn cancel(name: impl Into<String>) -> Self {
        Self {
            code: DialogCode::Rejected,
            manual: false,
            name: name.into(),
        }
    }
}

/// A modal confirmation dialog.
pub trait ConfirmDialog {
    fn exec(&mut self, prompt: &InstallerPrompt) -> DialogResponse;
}

/// Button pressed by an [`AutoDialog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogChoice {
    Install,
    Manual,
    Cancel,
}

/// Answers every prompt the same way, keeping the suggested name.
#[derive(Debug, Clone, Copy)]
pub struct AutoDialog {
    choice: DialogChoice,
}

impl AutoDialog {
    pub fn new(choice: DialogChoice) -> Self {
        Self { choice }
    }
}

impl ConfirmDialog for AutoDialog {
    fn exec(&mut self, prompt: &InstallerPrompt) -> DialogResponse {
        respond(self.choice, prompt.name.clone())
    }
}

fn respond(choice: DialogChoice, name: String) -> DialogResponse {
    match choice {
        DialogChoice::Install => DialogResponse::accept(name),
        DialogChoice::Manual => DialogResponse::manual(name),
        DialogChoice::Cancel => DialogResponse::cancel(name),
    }
}

/// Line-based dialog on a reader/writer pair (stdin/stdout in the CLI).
pub struct TerminalDialog<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalDialog<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_line(&mut self) -> std::io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn show(&mut self, prompt: &InstallerPrompt) -> std::io::Result<()> {
        writeln!(self.output, "Name:        {}", prompt.name)?;
        writeln!(self.output, "Author:      {}", prompt.author)?;
        writeln!(self.output, "Version:     {}", prompt.version)?;
        if !prompt.description.is_empty() {
            writeln!(self.output, "Description:")?;
            for line in prompt.description.lines() {
                writeln!(self.output, "    {}", line.trim_end())?;
            }
        }
        writeln!(self.output)?;
        Ok(())
    }

    /// Ask for a name: blank keeps the suggestion, a number picks a variant.
    fn ask_name(&mut self, prompt: &InstallerPrompt) -> std::io::Result<Option<String>> {
        if prompt.name_variants.len() > 1 {
            for (index, variant) in prompt.name_variants.iter().enumerate() {
                writeln!(self.output, "  [{}] {}", index + 1, variant)?;
            }
        }
        write!(self.output, "Mod name [{}]: ", prompt.name)?;
        self.output.flush()?;

        let Some(answer) = self.read_line()? else {
            return Ok(None);
        };
        let name = match answer.parse::<usize>() {
            _ if answer.is_empty() => prompt.name.clone(),
            Ok(n) if (1..=prompt.name_variants.len()).contains(&n) => {
                prompt.name_variants[n - 1].clone()
            }
            _ => answer,
        };
        Ok(Some(name))
    }

    fn ask_choice(&mut self) -> std::io::Result<Option<DialogChoice>> {
        loop {
            write!(self.output, "[I]nstall, [m]anual, [c]ancel: ")?;
            self.output.flush()?;

            let Some(answer) = self.read_line()? else {
                return Ok(None);
            };
            match answer.to_lowercase().as_str() {
                "" | "i" | "install" => return Ok(Some(DialogChoice::Install)),
                "m" | "manual" => return Ok(Some(DialogChoice::Manual)),
                "c" | "cancel" => return Ok(Some(DialogChoice::Cancel)),
                other => writeln!(self.output, "Unrecognised answer '{}'", other)?,
            }
        }
    }

    fn run(&mut self, prompt: &InstallerPrompt) -> std::io::Result<Option<DialogResponse>> {
        self.show(prompt)?;
        let Some(name) = self.ask_name(prompt)? else {
            return Ok(None);
        };
        let Some(choice) = self.ask_choice()? else {
            return Ok(None);
        };
        Ok(Some(respond(choice, name)))
    }
}

impl<R: BufRead, W: Write> ConfirmDialog for TerminalDialog<R, W> {
    fn exec(&mut self, prompt: &InstallerPrompt) -> DialogResponse {
        match self.run(prompt) {
            Ok(Some(response)) => response,
            Ok(None) => {
                warn!("Input closed before the dialog was answered, canceling");
                DialogResponse::cancel(prompt.name.clone())
            }
            Err(e) => {
                warn!("Dialog I/O failed, canceling: {}", e);
                DialogResponse::cancel(prompt.name.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompt() -> InstallerPrompt {
        InstallerPrompt {
            name_variants: vec!["FS25_LizardPack".to_string(), "Lizard Pack".to_string()],
            name: "Lizard Pack".to_string(),
            author: "Cram42".to_string(),
            version: "1.0.0.0".to_string(),
            description: "Small tractors.".to_string(),
        }
    }

    fn run_terminal(input: &str) -> (DialogResponse, String) {
        let mut output = Vec::new();
        let response = {
            let mut dialog = TerminalDialog::new(Cursor::new(input.to_string()), &mut output);
            dialog.exec(&prompt())
        };
        (response, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_auto_dialog_choices() {
        let prompt = prompt();
        assert_eq!(
            AutoDialog::new(DialogChoice::Install).exec(&prompt),
            DialogResponse::accept("Lizard Pack")
        );
        let manual = AutoDialog::new(DialogChoice::Manual).exec(&prompt);
        assert_eq!(manual.code, DialogCode::Rejected);
        assert!(manual.manual);
        let cancel = AutoDialog::new(DialogChoice::Cancel).exec(&prompt);
        assert_eq!(cancel.code, DialogCode::Rejected);
        assert!(!cancel.manual);
    }

    #[test]
    fn test_terminal_defaults_accept_with_suggested_name() {
        let (response, output) = run_terminal("\n\n");
        assert_eq!(response, DialogResponse::accept("Lizard Pack"));
        assert!(output.contains("Author:      Cram42"));
        assert!(output.contains("[1] FS25_LizardPack"));
    }

    #[test]
    fn test_terminal_pick_variant_and_manual() {
        let (response, _) = run_terminal("1\nm\n");
        assert_eq!(response, DialogResponse::manual("FS25_LizardPack"));
    }

    #[test]
    fn test_terminal_custom_name_after_bad_answer() {
        let (response, output) = run_terminal("My Lizards\nmaybe\nc\n");
        assert_eq!(response, DialogResponse::cancel("My Lizards"));
        assert!(output.contains("Unrecognised answer 'maybe'"));
    }

    #[test]
    fn test_terminal_eof_cancels() {
        let (response, _) = run_terminal("");
        assert_eq!(response, DialogResponse::cancel("Lizard Pack"));
    }
}
